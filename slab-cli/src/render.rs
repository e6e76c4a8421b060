//! Plain-text rendering of calculation results.

use std::fmt::{self, Display, Formatter};

use slab_core::calculations::common::{format_grouped, format_percent};
use slab_core::{BracketTable, Regime, RegimeComparison, TaxResult};

const RULE_WIDTH: usize = 72;

fn rule(f: &mut Formatter<'_>) -> fmt::Result {
    writeln!(f, "{}", "-".repeat(RULE_WIDTH))
}

fn total_line(
    f: &mut Formatter<'_>,
    label: &str,
    value: &str,
) -> fmt::Result {
    writeln!(f, "{label:<28} {value:>42}")
}

struct ResultReport<'a> {
    title: &'a str,
    result: &'a TaxResult,
}

impl Display for ResultReport<'_> {
    fn fmt(
        &self,
        f: &mut Formatter<'_>,
    ) -> fmt::Result {
        let result = self.result;
        writeln!(f, "{}", self.title)?;
        rule(f)?;
        writeln!(f, "{:<28} {:>8} {:>16} {:>16}", "Slab", "Rate", "Taxable", "Tax")?;
        rule(f)?;

        if result.breakdown.is_empty() {
            writeln!(f, "(no taxable income)")?;
        }
        for entry in &result.breakdown {
            writeln!(
                f,
                "{:<28} {:>8} {:>16} {:>16}",
                entry.bracket_label,
                format_percent(entry.rate),
                format_grouped(entry.taxable_amount),
                format_grouped(entry.tax_owed),
            )?;
        }

        rule(f)?;
        total_line(f, "Adjusted income", &format_grouped(result.adjusted_income))?;
        total_line(f, "Total tax", &format_grouped(result.total_tax))?;
        total_line(f, "Effective rate", &format_percent(result.effective_rate))?;
        if let Some(rate) = result.marginal_rate() {
            total_line(f, "Marginal rate", &format_percent(rate))?;
        }
        Ok(())
    }
}

struct ComparisonReport<'a>(&'a RegimeComparison);

impl Display for ComparisonReport<'_> {
    fn fmt(
        &self,
        f: &mut Formatter<'_>,
    ) -> fmt::Result {
        let comparison = self.0;
        writeln!(f, "{:<34} {:>18} {:>10}", "Regime", "Total tax", "Effective")?;
        rule(f)?;
        for outcome in &comparison.outcomes {
            let marker = if outcome.regime == comparison.cheapest { "*" } else { " " };
            writeln!(
                f,
                "{marker}{:<33} {:>18} {:>10}",
                outcome.regime.label(),
                format_grouped(outcome.result.total_tax),
                format_percent(outcome.result.effective_rate),
            )?;
        }
        rule(f)?;

        if comparison.savings.is_zero() {
            writeln!(f, "All regimes result in the same tax amount.")
        } else {
            writeln!(
                f,
                "You save {} by opting for the {}.",
                format_grouped(comparison.savings),
                comparison.cheapest.label(),
            )
        }
    }
}

struct TableReport<'a>(&'a BracketTable);

impl Display for TableReport<'_> {
    fn fmt(
        &self,
        f: &mut Formatter<'_>,
    ) -> fmt::Result {
        let table = self.0;
        for (index, bracket) in table.iter().enumerate() {
            writeln!(f, "  {:<28} {:>6}", table.label(index), format_percent(bracket.rate))?;
        }
        Ok(())
    }
}

struct RegimesReport;

impl Display for RegimesReport {
    fn fmt(
        &self,
        f: &mut Formatter<'_>,
    ) -> fmt::Result {
        for regime in Regime::all() {
            writeln!(
                f,
                "{} ({}), standard deduction {}",
                regime.label(),
                regime.as_str(),
                format_grouped(regime.default_standard_deduction()),
            )?;
            write!(f, "{}", TableReport(&regime.bracket_table()))?;
        }
        Ok(())
    }
}

/// Renders a single result as a breakdown table followed by totals.
pub fn render_result(
    title: &str,
    result: &TaxResult,
) -> String {
    ResultReport { title, result }.to_string()
}

/// Renders a comparison: one summary line per regime and the recommendation.
pub fn render_comparison(comparison: &RegimeComparison) -> String {
    ComparisonReport(comparison).to_string()
}

/// Renders one bracket table as `label  rate` lines.
pub fn render_table(table: &BracketTable) -> String {
    TableReport(table).to_string()
}

/// Renders every built-in regime with its slabs and default deduction.
pub fn render_regimes() -> String {
    RegimesReport.to_string()
}
