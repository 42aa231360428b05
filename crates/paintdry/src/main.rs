use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use env_logger::{Env, Target};
use paintdry_api::{ApiClient, Backend};
use paintdry_browser::BrowserConfig;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

mod browse;
mod config;
mod list;
mod search;
mod show;

#[derive(Parser)]
#[command(name = "paintdry")]
#[command(about = "Browse the resources, observations and changes paintdry has collected", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short = 'd', long = "debug", global = true)]
    debug: bool,

    /// Write log output to this file instead of stderr
    #[arg(long = "log-file", global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Client configuration file (TOML)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Base URL of the paintdry backend
    #[arg(long = "api-url", global = true, value_name = "URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive browser (the default)
    #[command(alias = "b")]
    Browse(browse::BrowseArgs),

    /// List a collection as a table
    #[command(alias = "ls")]
    List(list::ListArgs),

    /// Show one record as JSON
    Show(show::ShowArgs),

    /// Search resources, observations and changes
    #[command(alias = "s")]
    Search(search::SearchArgs),

    /// Show the backend configuration
    Config(config::ConfigArgs),
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {e}", "Error:".red());
        for cause in e.chain().skip(1) {
            eprintln!("  {cause}");
        }
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Default level depends on --debug; RUST_LOG still wins
    let env = if cli.debug {
        Env::default().default_filter_or("debug")
    } else {
        Env::default().default_filter_or("error")
    };
    let mut logger = env_logger::Builder::from_env(env);
    if let Some(path) = &cli.log_file {
        let file = File::create(path)
            .with_context(|| format!("Failed to create log file {}", path.display()))?;
        logger.target(Target::Pipe(Box::new(file)));
    }
    logger.init();

    let config = BrowserConfig::resolve(cli.config.as_deref(), cli.api_url.as_deref())
        .context("Failed to load configuration")?;
    log::debug!("using backend {}", config.api_url);

    let client = ApiClient::new(config.api_url.clone(), config.timeout())
        .context("Failed to create HTTP client")?;
    let backend: Arc<dyn Backend> = Arc::new(client);

    match cli.command {
        None => browse::execute(browse::BrowseArgs::default(), backend, &config),
        Some(Commands::Browse(args)) => browse::execute(args, backend, &config),
        Some(Commands::List(args)) => list::execute(args, backend.as_ref(), &config),
        Some(Commands::Show(args)) => show::execute(args, backend.as_ref()),
        Some(Commands::Search(args)) => search::execute(args, backend.as_ref()),
        Some(Commands::Config(args)) => config::execute(args, backend.as_ref(), &config),
    }
}
