use anyhow::{Result, bail};
use clap::Args;
use colored::Colorize;
use paintdry_api::Backend;
use paintdry_browser::{SearchBrowser, SearchStatus, Section, details_line};

#[derive(Args, Debug)]
#[command(about = "Search resources, observations and changes")]
pub struct SearchArgs {
    /// Search term
    #[arg(value_name = "TERM")]
    pub term: String,

    /// Result page (1-based)
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Print the raw search response as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: SearchArgs, backend: &dyn Backend) -> Result<()> {
    let mut search = SearchBrowser::new(Section::Search.endpoint());
    let Some(request) = search.search(&args.term, args.page) else {
        bail!("Search term must not be blank");
    };
    let response = request.execute(backend);

    // The backend's answer verbatim
    if args.json {
        println!("{}", serde_json::to_string_pretty(&response.result?)?);
        return Ok(());
    }

    search.on_response(response);
    if let SearchStatus::Error(message) = search.status() {
        bail!("{message}");
    }

    if let Some(message) = search.empty_message() {
        println!("{message}");
        return Ok(());
    }
    if let Some(summary) = search.summary() {
        println!("{}", summary.dimmed());
    }
    for result in search.results() {
        let resource = result.resource.as_deref().unwrap_or("-");
        let module = result.module.as_deref().unwrap_or("");
        println!(
            "{:<12} {} {}",
            result.kind.as_str().cyan(),
            resource.bold(),
            module.dimmed()
        );
        let details = details_line(result);
        if !details.is_empty() {
            println!("             {details}");
        }
    }
    if search.show_pagination() {
        println!(
            "{}",
            format!("Page {} of {}", search.page(), search.total_pages()).dimmed()
        );
    }
    Ok(())
}
