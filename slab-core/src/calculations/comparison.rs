//! Side-by-side comparison of tax regimes for the same income.
//!
//! Every requested regime is run against the same [`TaxInput`] using its own
//! built-in slab table. The cheapest regime and the saving it offers over the
//! most expensive one are reported alongside the individual results.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::calculations::slab::compute_tax;
use crate::{Regime, TaxInput, TaxInputError, TaxResult};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ComparisonError {
    #[error("no regimes to compare")]
    NoRegimes,

    #[error(transparent)]
    Input(#[from] TaxInputError),
}

/// Result of one regime within a comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeOutcome {
    pub regime: Regime,
    pub result: TaxResult,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeComparison {
    /// One outcome per regime, in request order.
    pub outcomes: Vec<RegimeOutcome>,

    /// Regime with the lowest total tax. Ties go to the earlier regime.
    pub cheapest: Regime,

    /// Highest total tax minus the lowest.
    pub savings: Decimal,
}

impl RegimeComparison {
    pub fn outcome(
        &self,
        regime: Regime,
    ) -> Option<&RegimeOutcome> {
        self.outcomes.iter().find(|o| o.regime == regime)
    }
}

/// Computes `input` under each of `regimes` and picks the cheapest.
///
/// # Errors
///
/// Returns [`ComparisonError::NoRegimes`] for an empty list, or
/// [`ComparisonError::Input`] if the input is invalid.
pub fn compare_regimes(
    input: &TaxInput,
    regimes: &[Regime],
) -> Result<RegimeComparison, ComparisonError> {
    let outcomes = regimes
        .iter()
        .map(|&regime| {
            let result = compute_tax(input, &regime.bracket_table())?;
            debug!(regime = regime.as_str(), total_tax = %result.total_tax, "regime computed");
            Ok(RegimeOutcome { regime, result })
        })
        .collect::<Result<Vec<_>, TaxInputError>>()?;

    let cheapest = outcomes
        .iter()
        .reduce(|best, o| if o.result.total_tax < best.result.total_tax { o } else { best })
        .ok_or(ComparisonError::NoRegimes)?;

    let highest = outcomes
        .iter()
        .map(|o| o.result.total_tax)
        .max()
        .unwrap_or(Decimal::ZERO);

    Ok(RegimeComparison {
        cheapest: cheapest.regime,
        savings: highest - cheapest.result.total_tax,
        outcomes,
    })
}
