use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Tax attributed to one traversed slab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakdownEntry {
    pub bracket_label: String,
    pub rate: Decimal,
    pub taxable_amount: Decimal,
    pub tax_owed: Decimal,
}

/// Outcome of a slab calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxResult {
    /// Income after deductions, floored at zero.
    pub adjusted_income: Decimal,

    /// Sum of `tax_owed` over the breakdown.
    pub total_tax: Decimal,

    /// `total_tax / adjusted_income` as a fraction, or zero with no income.
    pub effective_rate: Decimal,

    /// One entry per slab that received income, lowest slab first.
    pub breakdown: Vec<TaxBreakdownEntry>,
}

impl TaxResult {
    /// The result for an income that never reaches the first slab.
    pub fn zero() -> Self {
        Self {
            adjusted_income: Decimal::ZERO,
            total_tax: Decimal::ZERO,
            effective_rate: Decimal::ZERO,
            breakdown: Vec::new(),
        }
    }

    /// Rate applied to the last unit of income, if any income was taxed.
    pub fn marginal_rate(&self) -> Option<Decimal> {
        self.breakdown.last().map(|entry| entry.rate)
    }
}
