use rust_decimal::Decimal;
use thiserror::Error;

/// Error returned when a command-line amount cannot be parsed.
#[derive(Debug, Error)]
pub enum ParseAmountError {
    #[error("amount must not be empty")]
    Empty,

    #[error("invalid amount '{input}': {source}")]
    Invalid {
        input: String,
        #[source]
        source: rust_decimal::Error,
    },
}

/// Normalizes input for decimal parsing: trims whitespace and removes commas
/// (both `1,234,567` and lakh-style `12,34,567` grouping).
fn normalize_amount_input(s: &str) -> String {
    s.trim().replace(['₹', ','], "")
}

/// Parses an amount such as `"8,00,000"`, `"750000"` or `"₹ 1,234.50"`.
pub fn parse_amount(s: &str) -> Result<Decimal, ParseAmountError> {
    let normalized = normalize_amount_input(s);
    let normalized = normalized.trim();
    if normalized.is_empty() {
        return Err(ParseAmountError::Empty);
    }
    normalized.parse().map_err(|e| {
        tracing::error!(input = %s, "invalid amount: {}", e);
        ParseAmountError::Invalid {
            input: s.to_string(),
            source: e,
        }
    })
}
