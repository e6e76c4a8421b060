//! Command execution: merges flags with configuration, runs the calculator
//! and renders the output.

use std::path::PathBuf;

use anyhow::{Context, Result};
use slab_core::{BracketTable, Regime, TaxInput, compare_regimes, compute_tax};
use slab_data::BracketTableLoader;
use tracing::{debug, info};

use crate::cli::{AmountArgs, CalcArgs, Command, CompareArgs};
use crate::config::CliConfig;
use crate::render::{render_comparison, render_regimes, render_result};

/// Where the slabs for a calculation came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableSource {
    BuiltIn(Regime),
    File { path: PathBuf, name: String },
}

impl std::fmt::Display for TableSource {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Self::BuiltIn(regime) => write!(f, "{regime}"),
            Self::File { path, name } => write!(f, "table '{name}' from {}", path.display()),
        }
    }
}

/// Builds the calculation input.
///
/// Precedence for each deduction: flag, then config, then the regime default.
pub fn build_input(
    amounts: &AmountArgs,
    config: &CliConfig,
    regime: Regime,
) -> Result<TaxInput> {
    let standard_deduction = amounts
        .standard_deduction
        .or(config.standard_deduction)
        .unwrap_or_else(|| regime.default_standard_deduction());
    let other_deductions = amounts.other_deductions.unwrap_or(config.other_deductions);

    TaxInput::new(amounts.income, standard_deduction, other_deductions)
        .context("Invalid tax input")
}

/// Picks the bracket table for `calc`: a CSV table if one is configured,
/// otherwise the regime's built-in table.
pub fn resolve_table(
    args: &CalcArgs,
    config: &CliConfig,
    regime: Regime,
) -> Result<(BracketTable, TableSource)> {
    let Some(path) = args.table.clone().or_else(|| config.table_file.clone()) else {
        return Ok((regime.bracket_table(), TableSource::BuiltIn(regime)));
    };

    let name = args
        .table_name
        .clone()
        .or_else(|| config.table_name.clone())
        .unwrap_or_else(|| regime.as_str().to_string());

    let table = BracketTableLoader::load_table(&path, &name)
        .with_context(|| format!("Failed to load bracket table '{name}' from {}", path.display()))?;

    Ok((table, TableSource::File { path, name }))
}

fn run_calc(
    args: &CalcArgs,
    config: &CliConfig,
) -> Result<String> {
    let regime = args.regime.unwrap_or(config.regime);
    let input = build_input(&args.amounts, config, regime)?;
    let (table, source) = resolve_table(args, config, regime)?;
    debug!(%source, slabs = table.len(), "bracket table selected");

    let result = compute_tax(&input, &table).context("Tax calculation failed")?;
    info!(total_tax = %result.total_tax, "calculation complete");

    if args.amounts.json {
        return serde_json::to_string_pretty(&result).context("Failed to serialize result");
    }
    Ok(render_result(&source.to_string(), &result))
}

fn run_compare(
    args: &CompareArgs,
    config: &CliConfig,
) -> Result<String> {
    let input = build_input(&args.amounts, config, config.regime)?;
    let comparison = compare_regimes(&input, Regime::all()).context("Comparison failed")?;
    info!(cheapest = comparison.cheapest.as_str(), savings = %comparison.savings, "comparison complete");

    if args.amounts.json {
        return serde_json::to_string_pretty(&comparison).context("Failed to serialize comparison");
    }
    Ok(render_comparison(&comparison))
}

/// Runs `command` and returns what should be printed to stdout.
pub fn run(
    command: &Command,
    config: &CliConfig,
) -> Result<String> {
    match command {
        Command::Calc(args) => run_calc(args, config),
        Command::Compare(args) => run_compare(args, config),
        Command::Regimes => Ok(render_regimes()),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn amounts(income: rust_decimal::Decimal) -> AmountArgs {
        AmountArgs {
            income,
            standard_deduction: None,
            other_deductions: None,
            json: false,
        }
    }

    // =========================================================================
    // build_input tests
    // =========================================================================

    #[test]
    fn build_input_falls_back_to_regime_default() {
        let input =
            build_input(&amounts(dec!(800000)), &CliConfig::default(), Regime::OldRegime).unwrap();

        assert_eq!(input.standard_deduction, dec!(50000));
        assert_eq!(input.other_deductions, dec!(0));
    }

    #[test]
    fn build_input_prefers_config_over_regime_default() {
        let config = CliConfig {
            standard_deduction: Some(dec!(40000)),
            other_deductions: dec!(50000),
            ..CliConfig::default()
        };

        let input = build_input(&amounts(dec!(800000)), &config, Regime::OldRegime).unwrap();

        assert_eq!(input.standard_deduction, dec!(40000));
        assert_eq!(input.other_deductions, dec!(50000));
    }

    #[test]
    fn build_input_prefers_flags_over_config() {
        let config = CliConfig {
            standard_deduction: Some(dec!(40000)),
            other_deductions: dec!(50000),
            ..CliConfig::default()
        };
        let args = AmountArgs {
            standard_deduction: Some(dec!(0)),
            other_deductions: Some(dec!(10000)),
            ..amounts(dec!(800000))
        };

        let input = build_input(&args, &config, Regime::OldRegime).unwrap();

        assert_eq!(input.standard_deduction, dec!(0));
        assert_eq!(input.other_deductions, dec!(10000));
    }

    #[test]
    fn build_input_rejects_negative_income() {
        let result = build_input(&amounts(dec!(-1)), &CliConfig::default(), Regime::OldRegime);

        assert!(result.is_err());
    }

    // =========================================================================
    // run tests
    // =========================================================================

    #[test]
    fn run_calc_uses_built_in_table() {
        let command = Command::Calc(CalcArgs {
            amounts: AmountArgs {
                standard_deduction: Some(dec!(50000)),
                ..amounts(dec!(800000))
            },
            regime: Some(Regime::NewRegimeAfter2023),
            table: None,
            table_name: None,
        });

        let output = run(&command, &CliConfig::default()).unwrap();

        assert!(output.starts_with("New Regime (after Budget 2023)"));
        assert!(output.contains("Total tax"));
        assert!(output.contains("30,000"));
    }

    #[test]
    fn run_calc_json_is_a_tax_result() {
        let command = Command::Calc(CalcArgs {
            amounts: AmountArgs {
                standard_deduction: Some(dec!(50000)),
                json: true,
                ..amounts(dec!(800000))
            },
            regime: Some(Regime::NewRegimeAfter2023),
            table: None,
            table_name: None,
        });

        let output = run(&command, &CliConfig::default()).unwrap();
        let result: slab_core::TaxResult = serde_json::from_str(&output).unwrap();

        assert_eq!(result.total_tax, dec!(30000));
        assert_eq!(result.effective_rate, dec!(0.04));
    }

    #[test]
    fn run_calc_reports_missing_table_file() {
        let command = Command::Calc(CalcArgs {
            amounts: amounts(dec!(800000)),
            regime: None,
            table: Some(PathBuf::from("/nonexistent/brackets.csv")),
            table_name: None,
        });

        let result = run(&command, &CliConfig::default());

        assert!(result.is_err());
    }

    #[test]
    fn run_regimes_lists_tables() {
        let output = run(&Command::Regimes, &CliConfig::default()).unwrap();

        assert!(output.contains("new_before_2023"));
    }
}
