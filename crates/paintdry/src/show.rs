use anyhow::{Context, Result, bail};
use clap::Args;
use paintdry_api::Backend;
use paintdry_browser::{DetailState, RecordDetail, Section};

#[derive(Args, Debug)]
#[command(about = "Show one record as JSON")]
pub struct ShowArgs {
    /// resources, observations, changes, history or config
    #[arg(value_name = "SECTION")]
    pub section: String,

    /// Record identifier
    #[arg(value_name = "ID")]
    pub id: String,
}

pub fn execute(args: ShowArgs, backend: &dyn Backend) -> Result<()> {
    let section = Section::from_name(&args.section)
        .filter(|s| *s != Section::Search)
        .with_context(|| format!("Unknown section {:?}", args.section))?;

    let mut detail = RecordDetail::record(section.endpoint(), Some(args.id));
    let Some(request) = detail.mount() else {
        bail!("No record identifier given");
    };
    detail.on_response(request.execute(backend));

    match detail.state() {
        DetailState::Loaded(value) => {
            println!("{}", serde_json::to_string_pretty(value)?);
            Ok(())
        }
        DetailState::Error(message) => bail!("{message}"),
        DetailState::Idle | DetailState::Loading => bail!("Record did not load"),
    }
}
