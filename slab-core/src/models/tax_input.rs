use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calculations::common::{max, round_half_up};

/// Rejected calculation input. No partial computation is attempted.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxInputError {
    #[error("{field} must not be negative (got {amount})")]
    NegativeAmount { field: &'static str, amount: Decimal },
}

/// Income and deductions for a single calculation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxInput {
    /// Gross income before any deductions.
    pub gross_income: Decimal,

    /// Standard deduction allowed by the regime.
    pub standard_deduction: Decimal,

    /// Any further deductions (e.g. NPS contribution).
    #[serde(default)]
    pub other_deductions: Decimal,
}

impl TaxInput {
    /// Builds an input, rejecting negative amounts.
    pub fn new(
        gross_income: Decimal,
        standard_deduction: Decimal,
        other_deductions: Decimal,
    ) -> Result<Self, TaxInputError> {
        let input = Self {
            gross_income,
            standard_deduction,
            other_deductions,
        };
        input.validate()?;
        Ok(input)
    }

    /// Checks that every amount is zero or positive.
    ///
    /// # Errors
    ///
    /// Returns [`TaxInputError::NegativeAmount`] naming the first negative field.
    pub fn validate(&self) -> Result<(), TaxInputError> {
        let fields = [
            ("gross income", self.gross_income),
            ("standard deduction", self.standard_deduction),
            ("other deductions", self.other_deductions),
        ];

        match fields.into_iter().find(|(_, amount)| *amount < Decimal::ZERO) {
            Some((field, amount)) => Err(TaxInputError::NegativeAmount { field, amount }),
            None => Ok(()),
        }
    }

    /// Sum of all deductions, saturating at `Decimal::MAX`.
    pub fn total_deductions(&self) -> Decimal {
        round_half_up(self.standard_deduction.saturating_add(self.other_deductions))
    }

    /// Income subject to the slabs: gross minus deductions, floored at zero.
    ///
    /// Subtraction can only overflow below `-Decimal::MAX`, which floors to zero.
    pub fn adjusted_income(&self) -> Decimal {
        let remaining = self
            .gross_income
            .checked_sub(self.standard_deduction)
            .and_then(|r| r.checked_sub(self.other_deductions))
            .unwrap_or(Decimal::ZERO);
        max(round_half_up(remaining), Decimal::ZERO)
    }
}
