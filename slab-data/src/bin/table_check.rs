use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use slab_core::calculations::common::format_percent;
use slab_data::BracketTableLoader;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Validate a bracket table CSV file and print the tables it defines.
///
/// The CSV file should have the following columns:
/// - table: name of the table the row belongs to
/// - upper_bound: the slab's upper bound (empty or `inf` for the top slab)
/// - rate: the marginal tax rate as a decimal (e.g., 0.05)
#[derive(Parser, Debug)]
#[command(name = "slab-table-check")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CSV file containing bracket table data
    #[arg(short, long)]
    file: PathBuf,

    /// Only check the named table
    #[arg(short, long)]
    table: Option<String>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();

    info!("Checking bracket tables in: {}", args.file.display());

    let mut tables = BracketTableLoader::load_from_file(&args.file)
        .with_context(|| format!("Failed to load bracket tables: {}", args.file.display()))?;

    if let Some(name) = &args.table {
        tables.retain(|table_name, _| table_name == name);
        if tables.is_empty() {
            anyhow::bail!("Table '{}' not found in {}", name, args.file.display());
        }
    }

    for (name, table) in &tables {
        println!("{name}");
        for (index, bracket) in table.iter().enumerate() {
            println!("  {:<28} {:>6}", table.label(index), format_percent(bracket.rate));
        }
    }

    println!("{} table(s) valid.", tables.len());

    Ok(())
}
