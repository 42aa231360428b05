use anyhow::{Result, bail};
use clap::Args;
use paintdry_api::Backend;
use paintdry_browser::{BrowserConfig, DetailState, RecordDetail, Section};

#[derive(Args, Debug)]
#[command(about = "Show the backend configuration (secrets are never exposed)")]
pub struct ConfigArgs {
    /// Print this client's effective configuration instead, as TOML
    #[arg(long)]
    pub local: bool,
}

pub fn execute(args: ConfigArgs, backend: &dyn Backend, config: &BrowserConfig) -> Result<()> {
    if args.local {
        print!("{}", toml::to_string_pretty(config)?);
        return Ok(());
    }

    let mut detail = RecordDetail::document(Section::Config.endpoint());
    let Some(request) = detail.mount() else {
        bail!("Nothing to fetch");
    };
    detail.on_response(request.execute(backend));
    match detail.state() {
        DetailState::Loaded(value) => {
            println!("{}", serde_json::to_string_pretty(value)?);
            Ok(())
        }
        DetailState::Error(message) => bail!("{message}"),
        DetailState::Idle | DetailState::Loading => bail!("Config did not load"),
    }
}
