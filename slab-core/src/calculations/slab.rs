//! Progressive slab tax calculation.
//!
//! Income is walked through the bracket table from the lowest slab upward.
//! Each slab taxes only the portion of adjusted income that falls between
//! the previous slab's upper bound and its own, at its marginal rate.
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Reject negative income or deductions |
//! | 2    | Adjusted income = gross − standard − other deductions (minimum 0) |
//! | 3    | For each slab while income remains: taxable portion × rate |
//! | 4    | Total tax = sum of per-slab tax |
//! | 5    | Effective rate = total tax ÷ adjusted income (0 with no income) |
//!
//! Breakdown entries are emitted only while income remains; slabs above the
//! adjusted income are not listed.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use slab_core::calculations::compute_tax;
//! use slab_core::{BracketTable, TaxInput};
//!
//! let table = BracketTable::from_pairs([
//!     (Some(dec!(300000)), dec!(0.00)),
//!     (Some(dec!(600000)), dec!(0.05)),
//!     (None, dec!(0.10)),
//! ])
//! .unwrap();
//!
//! let input = TaxInput::new(dec!(800000), dec!(50000), dec!(0)).unwrap();
//! let result = compute_tax(&input, &table).unwrap();
//!
//! assert_eq!(result.adjusted_income, dec!(750000));
//! assert_eq!(result.total_tax, dec!(30000));
//! assert_eq!(result.effective_rate, dec!(0.04));
//! assert_eq!(result.breakdown.len(), 3);
//! ```

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::common::{max, round_half_up, round_rate};
use crate::{BracketTable, TaxBreakdownEntry, TaxInput, TaxInputError, TaxResult};

/// Computes the slab tax for `input` under `table`.
///
/// Shorthand for `SlabCalculator::new(table).calculate(input)`.
///
/// # Errors
///
/// Returns [`TaxInputError`] if any input amount is negative.
pub fn compute_tax(
    input: &TaxInput,
    table: &BracketTable,
) -> Result<TaxResult, TaxInputError> {
    SlabCalculator::new(table).calculate(input)
}

/// Calculator bound to a single bracket table.
#[derive(Debug, Clone, Copy)]
pub struct SlabCalculator<'a> {
    table: &'a BracketTable,
}

impl<'a> SlabCalculator<'a> {
    pub fn new(table: &'a BracketTable) -> Self {
        Self { table }
    }

    /// Runs the full calculation.
    ///
    /// # Errors
    ///
    /// Returns [`TaxInputError`] if any input amount is negative; nothing is
    /// computed in that case.
    pub fn calculate(
        &self,
        input: &TaxInput,
    ) -> Result<TaxResult, TaxInputError> {
        input.validate()?;

        let adjusted_income = input.adjusted_income();
        debug!(
            gross_income = %input.gross_income,
            deductions = %input.total_deductions(),
            %adjusted_income,
            "computing slab tax"
        );

        if adjusted_income <= Decimal::ZERO {
            return Ok(TaxResult::zero());
        }

        let mut remaining = adjusted_income;
        let mut previous_bound = Decimal::ZERO;
        let mut breakdown = Vec::with_capacity(self.table.len());

        for (index, bracket) in self.table.iter().enumerate() {
            if remaining <= Decimal::ZERO {
                break;
            }

            let taxable_amount =
                self.taxable_in_bracket(remaining, previous_bound, bracket.upper_bound);
            let tax_owed = self.tax_for_amount(taxable_amount, bracket.rate);
            debug!(index, rate = %bracket.rate, %taxable_amount, %tax_owed, "slab applied");

            breakdown.push(TaxBreakdownEntry {
                bracket_label: self.table.label(index),
                rate: bracket.rate,
                taxable_amount,
                tax_owed,
            });

            remaining -= taxable_amount;
            if let Some(bound) = bracket.upper_bound {
                previous_bound = bound;
            }
        }

        let total_tax: Decimal = breakdown.iter().map(|entry| entry.tax_owed).sum();
        let effective_rate = self.effective_rate(total_tax, adjusted_income);

        Ok(TaxResult {
            adjusted_income,
            total_tax,
            effective_rate,
            breakdown,
        })
    }

    /// Portion of the remaining income that falls inside one slab.
    ///
    /// An unbounded slab takes everything that remains.
    fn taxable_in_bracket(
        &self,
        remaining: Decimal,
        previous_bound: Decimal,
        upper_bound: Option<Decimal>,
    ) -> Decimal {
        let taken = upper_bound.map_or(remaining, |bound| remaining.min(bound - previous_bound));
        max(taken, Decimal::ZERO)
    }

    fn tax_for_amount(
        &self,
        amount: Decimal,
        rate: Decimal,
    ) -> Decimal {
        round_half_up(amount * rate)
    }

    fn effective_rate(
        &self,
        total_tax: Decimal,
        adjusted_income: Decimal,
    ) -> Decimal {
        if adjusted_income <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        round_rate(total_tax / adjusted_income)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::Regime;

    fn three_slab_table() -> BracketTable {
        BracketTable::from_pairs([
            (Some(dec!(300000)), dec!(0.00)),
            (Some(dec!(600000)), dec!(0.05)),
            (None, dec!(0.10)),
        ])
        .unwrap()
    }

    fn tax_on(
        table: &BracketTable,
        adjusted_income: Decimal,
    ) -> Decimal {
        let input = TaxInput::new(adjusted_income, dec!(0), dec!(0)).unwrap();
        compute_tax(&input, table).unwrap().total_tax
    }

    // =========================================================================
    // taxable_in_bracket tests
    // =========================================================================

    #[test]
    fn taxable_in_bracket_caps_at_upper_bound() {
        let table = three_slab_table();
        let calculator = SlabCalculator::new(&table);

        let result = calculator.taxable_in_bracket(dec!(750000), dec!(0), Some(dec!(300000)));

        assert_eq!(result, dec!(300000));
    }

    #[test]
    fn taxable_in_bracket_takes_partial_slab() {
        let table = three_slab_table();
        let calculator = SlabCalculator::new(&table);

        let result =
            calculator.taxable_in_bracket(dec!(100000), dec!(300000), Some(dec!(600000)));

        assert_eq!(result, dec!(100000));
    }

    #[test]
    fn taxable_in_bracket_unbounded_takes_everything() {
        let table = three_slab_table();
        let calculator = SlabCalculator::new(&table);

        let result = calculator.taxable_in_bracket(dec!(150000), dec!(600000), None);

        assert_eq!(result, dec!(150000));
    }

    #[test]
    fn taxable_in_bracket_handles_maximal_remaining_income() {
        let table = three_slab_table();
        let calculator = SlabCalculator::new(&table);

        let result =
            calculator.taxable_in_bracket(Decimal::MAX, dec!(300000), Some(dec!(600000)));

        assert_eq!(result, dec!(300000));
    }

    // =========================================================================
    // effective_rate tests
    // =========================================================================

    #[test]
    fn effective_rate_is_zero_without_income() {
        let table = three_slab_table();
        let calculator = SlabCalculator::new(&table);

        assert_eq!(calculator.effective_rate(dec!(0), dec!(0)), dec!(0));
    }

    #[test]
    fn effective_rate_rounds_to_four_places() {
        let table = three_slab_table();
        let calculator = SlabCalculator::new(&table);

        // 1000 / 3000 = 0.3333...
        assert_eq!(calculator.effective_rate(dec!(1000), dec!(3000)), dec!(0.3333));
    }

    // =========================================================================
    // calculate scenarios
    // =========================================================================

    #[test]
    fn calculate_with_maximal_deductions_owes_nothing() {
        let table = three_slab_table();
        let input = TaxInput::new(dec!(1), Decimal::MAX, Decimal::MAX).unwrap();

        let result = compute_tax(&input, &table).unwrap();

        assert_eq!(result, TaxResult::zero());
    }

    #[test]
    fn calculate_with_maximal_income_fills_every_slab() {
        let table = three_slab_table();
        let input = TaxInput::new(Decimal::MAX, dec!(0), dec!(0)).unwrap();

        let result = compute_tax(&input, &table).unwrap();

        assert_eq!(result.breakdown.len(), 3);
        assert_eq!(result.breakdown[1].taxable_amount, dec!(300000));
    }

    #[test]
    fn calculate_three_slab_scenario() {
        let table = three_slab_table();
        let input = TaxInput::new(dec!(800000), dec!(50000), dec!(0)).unwrap();

        let result = compute_tax(&input, &table).unwrap();

        assert_eq!(
            result,
            TaxResult {
                adjusted_income: dec!(750000),
                total_tax: dec!(30000),
                effective_rate: dec!(0.04),
                breakdown: vec![
                    TaxBreakdownEntry {
                        bracket_label: "Up to 3,00,000".to_string(),
                        rate: dec!(0.00),
                        taxable_amount: dec!(300000),
                        tax_owed: dec!(0),
                    },
                    TaxBreakdownEntry {
                        bracket_label: "3,00,000 to 6,00,000".to_string(),
                        rate: dec!(0.05),
                        taxable_amount: dec!(300000),
                        tax_owed: dec!(15000),
                    },
                    TaxBreakdownEntry {
                        bracket_label: "Above 6,00,000".to_string(),
                        rate: dec!(0.10),
                        taxable_amount: dec!(150000),
                        tax_owed: dec!(15000),
                    },
                ],
            }
        );
    }

    #[test]
    fn calculate_deductions_exceeding_income_yield_zero() {
        let table = three_slab_table();
        let input = TaxInput::new(dec!(40000), dec!(50000), dec!(0)).unwrap();

        let result = compute_tax(&input, &table).unwrap();

        assert_eq!(result, TaxResult::zero());
    }

    #[test]
    fn calculate_zero_income_has_empty_breakdown() {
        let table = three_slab_table();

        let result = compute_tax(&TaxInput::default(), &table).unwrap();

        assert_eq!(result.total_tax, dec!(0));
        assert_eq!(result.effective_rate, dec!(0));
        assert!(result.breakdown.is_empty());
    }

    #[test]
    fn calculate_stops_listing_once_income_is_used_up() {
        let table = three_slab_table();
        let input = TaxInput::new(dec!(450000), dec!(0), dec!(0)).unwrap();

        let result = compute_tax(&input, &table).unwrap();

        assert_eq!(result.breakdown.len(), 2);
        assert_eq!(result.breakdown[1].taxable_amount, dec!(150000));
        assert_eq!(result.total_tax, dec!(7500));
        assert_eq!(result.marginal_rate(), Some(dec!(0.05)));
    }

    #[test]
    fn calculate_income_exactly_at_bound_does_not_enter_next_slab() {
        let table = three_slab_table();
        let input = TaxInput::new(dec!(600000), dec!(0), dec!(0)).unwrap();

        let result = compute_tax(&input, &table).unwrap();

        assert_eq!(result.breakdown.len(), 2);
        assert_eq!(result.total_tax, dec!(15000));
    }

    #[test]
    fn calculate_rejects_negative_input_before_computing() {
        let table = three_slab_table();
        let input = TaxInput {
            gross_income: dec!(500000),
            standard_deduction: dec!(-50000),
            other_deductions: dec!(0),
        };

        let result = compute_tax(&input, &table);

        assert_eq!(
            result,
            Err(TaxInputError::NegativeAmount {
                field: "standard deduction",
                amount: dec!(-50000),
            })
        );
    }

    #[test]
    fn calculate_rounds_each_slab_to_paise() {
        let table = BracketTable::from_pairs([(Some(dec!(100)), dec!(0.05)), (None, dec!(0.10))])
            .unwrap();
        let input = TaxInput::new(dec!(100.15), dec!(0), dec!(0)).unwrap();

        let result = compute_tax(&input, &table).unwrap();

        // 100 * 0.05 = 5.00; 0.15 * 0.10 = 0.015 -> 0.02
        assert_eq!(result.breakdown[1].tax_owed, dec!(0.02));
        assert_eq!(result.total_tax, dec!(5.02));
    }

    #[test]
    fn calculate_single_unbounded_slab_is_flat_tax() {
        let table = BracketTable::from_pairs([(None, dec!(0.15))]).unwrap();
        let input = TaxInput::new(dec!(200000), dec!(0), dec!(0)).unwrap();

        let result = compute_tax(&input, &table).unwrap();

        assert_eq!(result.total_tax, dec!(30000));
        assert_eq!(result.effective_rate, dec!(0.15));
        assert_eq!(result.breakdown[0].bracket_label, "All income");
    }

    #[test]
    fn calculate_old_regime_with_nps_contribution() {
        let table = Regime::OldRegime.bracket_table();
        let input = TaxInput::new(dec!(1200000), dec!(50000), dec!(50000)).unwrap();

        let result = compute_tax(&input, &table).unwrap();

        // 0 + 12500 + 100000 + (1100000 - 1000000) * 0.30
        assert_eq!(result.adjusted_income, dec!(1100000));
        assert_eq!(result.total_tax, dec!(142500));
        assert_eq!(result.breakdown.len(), 4);
    }

    #[test]
    fn calculate_fy_2024_25_regime() {
        let table = Regime::NewRegime2024_25.bracket_table();
        let input = TaxInput::new(dec!(1075000), dec!(75000), dec!(0)).unwrap();

        let result = compute_tax(&input, &table).unwrap();

        // 0 + 20000 + 30000
        assert_eq!(result.total_tax, dec!(50000));
        assert_eq!(result.effective_rate, dec!(0.05));
    }

    // =========================================================================
    // properties
    // =========================================================================

    #[test]
    fn total_tax_is_monotonic_in_income() {
        for regime in Regime::all() {
            let table = regime.bracket_table();
            let mut previous = Decimal::ZERO;
            let mut income = Decimal::ZERO;

            while income <= dec!(2500000) {
                let tax = tax_on(&table, income);
                assert!(tax >= previous, "{regime}: tax fell at income {income}");
                previous = tax;
                income += dec!(12345.67);
            }
        }
    }

    #[test]
    fn total_tax_is_continuous_at_every_bound() {
        for regime in Regime::all() {
            let table = regime.bracket_table();

            for bound in table.iter().filter_map(|b| b.upper_bound) {
                let below = tax_on(&table, bound - dec!(0.01));
                let at = tax_on(&table, bound);
                let above = tax_on(&table, bound + dec!(0.01));

                // A paisa of income can add at most a paisa of tax.
                assert!(at - below <= dec!(0.01), "{regime}: jump below {bound}");
                assert!(above - at <= dec!(0.01), "{regime}: jump above {bound}");
            }
        }
    }

    #[test]
    fn income_beyond_table_is_taxed_at_top_rate() {
        let table = three_slab_table();
        let income = dec!(10000000);

        let result = tax_on(&table, income);

        let lower_slabs = tax_on(&table, dec!(600000));
        let expected = lower_slabs + (income - dec!(600000)) * table.top_rate();
        assert_eq!(result, expected);
        assert_eq!(result, dec!(955000));
    }

    #[test]
    fn standard_deduction_equals_lower_gross_income() {
        let table = Regime::NewRegimeAfter2023.bracket_table();

        for (gross, deduction) in [
            (dec!(800000), dec!(50000)),
            (dec!(1650000), dec!(75000)),
            (dec!(50000), dec!(50000)),
            (dec!(312345.67), dec!(12345.67)),
        ] {
            let with_deduction = TaxInput::new(gross, deduction, dec!(0)).unwrap();
            let pre_reduced = TaxInput::new(gross - deduction, dec!(0), dec!(0)).unwrap();

            assert_eq!(
                compute_tax(&with_deduction, &table),
                compute_tax(&pre_reduced, &table)
            );
        }
    }
}
