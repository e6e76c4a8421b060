//! Common utility functions for slab tax calculations.
//!
//! This module provides shared rounding and formatting helpers used by the
//! calculator, the bracket table labels and the comparison report.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places kept for an effective rate expressed as a fraction.
pub const RATE_DECIMAL_PLACES: u32 = 4;

/// Rounds a money value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero, matching how paise
/// are rounded on a tax computation sheet.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use slab_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a rate fraction (e.g. `0.04` for 4%) to [`RATE_DECIMAL_PLACES`].
pub fn round_rate(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(RATE_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the maximum of two decimal values.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use slab_core::calculations::common::max;
///
/// assert_eq!(max(dec!(100.00), dec!(200.00)), dec!(200.00));
/// assert_eq!(max(dec!(-100.00), dec!(-200.00)), dec!(-100.00));
/// ```
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Formats an amount with Indian digit grouping (`15,00,000`).
///
/// Whole amounts are printed without a fractional part; anything else is
/// rounded half-up and printed with two decimal places.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use slab_core::calculations::common::format_grouped;
///
/// assert_eq!(format_grouped(dec!(300000)), "3,00,000");
/// assert_eq!(format_grouped(dec!(1192.5)), "1,192.50");
/// ```
pub fn format_grouped(value: Decimal) -> String {
    let rounded = round_half_up(value).normalize();
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let text = rounded.abs().to_string();

    let (int_part, frac_part) = match text.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (text.as_str(), None),
    };

    let grouped = if int_part.len() <= 3 {
        int_part.to_string()
    } else {
        let (head, tail) = int_part.split_at(int_part.len() - 3);
        let mut groups = Vec::new();
        let mut end = head.len();
        while end > 2 {
            groups.push(&head[end - 2..end]);
            end -= 2;
        }
        groups.push(&head[..end]);
        groups.reverse();
        format!("{},{}", groups.join(","), tail)
    };

    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac:0<2}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Formats a rate fraction as a percentage string (`0.05` → `"5%"`).
pub fn format_percent(rate: Decimal) -> String {
    let percent = (rate * Decimal::ONE_HUNDRED).normalize();
    format!("{percent}%")
}
