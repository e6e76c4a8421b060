use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use slab_core::Regime;

use crate::utils::parse_amount;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Progressive income-tax slab calculator.
///
/// Computes tax owed per slab for a regime's bracket table (built in, or
/// loaded from CSV) and compares regimes for the same income.
#[derive(Debug, Parser)]
#[command(name = "slabtax", version, about, long_about = None)]
pub struct Cli {
    /// Path to a TOML config file (default: ./slabtax.toml if present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `warn,slab_core=debug`. RUST_LOG wins when set.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compute tax for one regime or bracket table.
    Calc(CalcArgs),

    /// Compare every built-in regime for the same income.
    Compare(CompareArgs),

    /// List the built-in regimes and their slabs.
    Regimes,
}

#[derive(Debug, Clone, Args)]
pub struct AmountArgs {
    /// Gross income, e.g. 800000 or 8,00,000.
    #[arg(long, value_parser = parse_amount)]
    pub income: Decimal,

    /// Standard deduction (default: the regime's standard deduction).
    #[arg(long, value_parser = parse_amount)]
    pub standard_deduction: Option<Decimal>,

    /// Other deductions such as an NPS contribution.
    #[arg(long, value_parser = parse_amount)]
    pub other_deductions: Option<Decimal>,

    /// Print JSON instead of a text table.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Args)]
pub struct CalcArgs {
    #[command(flatten)]
    pub amounts: AmountArgs,

    /// Regime code: old, new_before_2023, new_after_2023, new_2024_25.
    #[arg(long)]
    pub regime: Option<Regime>,

    /// Load slabs from this CSV file instead of the built-in table.
    #[arg(long)]
    pub table: Option<PathBuf>,

    /// Table to use from the CSV file (default: the regime code).
    #[arg(long, requires = "table")]
    pub table_name: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct CompareArgs {
    #[command(flatten)]
    pub amounts: AmountArgs,
}
