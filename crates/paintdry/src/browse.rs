use anyhow::Result;
use clap::Args;
use paintdry_api::Backend;
use paintdry_browser::{BrowserConfig, tui};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
#[command(about = "Open the interactive browser")]
pub struct BrowseArgs {
    /// Route to open, e.g. /observations/42 (defaults to start_path from the config)
    #[arg(value_name = "PATH")]
    pub path: Option<String>,
}

pub fn execute(args: BrowseArgs, backend: Arc<dyn Backend>, config: &BrowserConfig) -> Result<()> {
    let start = args.path.as_deref().unwrap_or(&config.start_path);
    tui::run(backend, config, start)
}
