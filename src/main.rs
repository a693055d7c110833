use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

use retailgrid::io::{config_io, rows_io};
use retailgrid::state::sort::SortOrder;
use retailgrid::TableEngine;

/// Load a row file, apply sort, query and selection, print the result as JSON.
#[derive(Parser, Debug)]
#[command(name = "retailgrid", version)]
struct Args {
    /// JSON array of rows or of `{ category, rows }` groups.
    #[arg(long)]
    rows: PathBuf,
    /// Table config. Defaults to the `<rows>.table` sidecar when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, default_value = "")]
    query: String,
    #[arg(long)]
    sort: Option<String>,
    #[arg(long, requires = "sort")]
    desc: bool,
    #[arg(long)]
    select_all: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run(Args::parse()) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<String, Box<dyn std::error::Error>> {
    let config = match &args.config {
        Some(path) => config_io::load_config(path)?,
        None => config_io::load_sidecar_or_default(&args.rows)?,
    };
    let groups = rows_io::load_rows(&args.rows)?;
    info!(path = %args.rows.display(), groups = groups.len(), "rows loaded");

    let mut engine = TableEngine::from_groups(config, groups);
    if let Some(field) = &args.sort {
        let order = if args.desc {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        };
        engine.sort_by_order(field, order);
    }
    engine.set_query(&args.query);
    if args.select_all {
        engine.select_all();
    }

    let columns: Vec<&str> = engine
        .visible_columns()
        .iter()
        .map(|column| column.field.as_str())
        .collect();
    let output = json!({
        "columns": columns,
        "sort": engine.sort_state().spec(),
        "rows": engine.visible_rows(),
        "selected": engine.selected_ids(),
    });
    Ok(serde_json::to_string_pretty(&output)?)
}
