use anyhow::{Result, bail};
use clap::Args;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{ContentArrangement, Table};
use paintdry_api::Backend;
use paintdry_browser::{
    BrowserConfig, CollectionSpec, CollectionTable, COLLECTIONS, Row, Section, TableState,
};
use serde_json::Value;
use std::io::{self, Write};

#[derive(Args, Debug)]
#[command(about = "List a collection as a table")]
pub struct ListArgs {
    /// resources, observations, changes or history
    #[arg(value_name = "SECTION", value_parser = parse_collection)]
    pub section: Section,

    /// Print the records as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

fn parse_collection(name: &str) -> Result<Section, String> {
    Section::from_name(name)
        .filter(|section| CollectionSpec::for_section(*section).is_some())
        .ok_or_else(|| {
            let names: Vec<_> = COLLECTIONS.iter().map(|c| c.section.name()).collect();
            format!("expected one of: {}", names.join(", "))
        })
}

pub fn execute(args: ListArgs, backend: &dyn Backend, config: &BrowserConfig) -> Result<()> {
    let Some(spec) = CollectionSpec::for_section(args.section) else {
        bail!("{} is not a collection", args.section.name());
    };
    let mut table = spec.table(&config.autosize())?;
    let request = table.mount();
    table.on_response(request.execute(backend));

    let mut writer = io::stdout().lock();
    match table.state() {
        TableState::Error(message) => bail!("{message}"),
        TableState::Empty => {
            if args.json {
                writeln!(writer, "[]")?;
            } else {
                eprintln!("No {} found", args.section.name());
            }
        }
        TableState::Loaded(rows) if args.json => {
            let records: Vec<Value> = rows.iter().map(Row::to_json).collect();
            writeln!(writer, "{}", serde_json::to_string_pretty(&records)?)?;
        }
        TableState::Loaded(_) => write_table(&table, &mut writer)?,
        TableState::Loading => bail!("{} did not finish loading", table.endpoint()),
    }
    Ok(())
}

fn write_table<W: Write>(collection: &CollectionTable, mut writer: W) -> io::Result<()> {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(collection.columns().labels());
    for row in collection.rows() {
        table.add_row(collection.columns().cells(row));
    }
    writeln!(writer, "{table}")
}
