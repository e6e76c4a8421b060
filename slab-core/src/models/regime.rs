use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::bracket_table::{BracketTable, TaxBracket};

/// Returned when a regime code is not recognised.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown tax regime '{0}' (expected one of: old, new_before_2023, new_after_2023, new_2024_25)")]
pub struct UnknownRegime(pub String);

/// Indian income-tax regimes with built-in slab tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Regime {
    #[serde(rename = "old")]
    OldRegime,
    #[serde(rename = "new_before_2023")]
    NewRegimeBefore2023,
    #[serde(rename = "new_after_2023")]
    NewRegimeAfter2023,
    #[serde(rename = "new_2024_25")]
    NewRegime2024_25,
}

impl Regime {
    pub fn all() -> &'static [Regime] {
        &[
            Regime::OldRegime,
            Regime::NewRegimeBefore2023,
            Regime::NewRegimeAfter2023,
            Regime::NewRegime2024_25,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OldRegime => "old",
            Self::NewRegimeBefore2023 => "new_before_2023",
            Self::NewRegimeAfter2023 => "new_after_2023",
            Self::NewRegime2024_25 => "new_2024_25",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "old" => Some(Self::OldRegime),
            "new_before_2023" => Some(Self::NewRegimeBefore2023),
            "new_after_2023" => Some(Self::NewRegimeAfter2023),
            "new_2024_25" => Some(Self::NewRegime2024_25),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::OldRegime => "Old Regime",
            Self::NewRegimeBefore2023 => "New Regime (before Budget 2023)",
            Self::NewRegimeAfter2023 => "New Regime (after Budget 2023)",
            Self::NewRegime2024_25 => "New Regime (FY 2024-25)",
        }
    }

    /// Standard deduction assumed when the caller does not supply one.
    pub fn default_standard_deduction(&self) -> Decimal {
        match self {
            Self::NewRegime2024_25 => Decimal::new(75_000, 0),
            _ => Decimal::new(50_000, 0),
        }
    }

    /// The slab table for this regime.
    pub fn bracket_table(&self) -> BracketTable {
        let slabs: &[(i64, i64)] = match self {
            Self::OldRegime => &[(250_000, 0), (500_000, 5), (1_000_000, 20)],
            Self::NewRegimeBefore2023 => &[
                (250_000, 0),
                (500_000, 5),
                (750_000, 10),
                (1_000_000, 15),
                (1_250_000, 20),
                (1_500_000, 25),
            ],
            Self::NewRegimeAfter2023 => &[
                (300_000, 0),
                (600_000, 5),
                (900_000, 10),
                (1_200_000, 15),
                (1_500_000, 20),
            ],
            Self::NewRegime2024_25 => &[
                (300_000, 0),
                (700_000, 5),
                (1_000_000, 10),
                (1_200_000, 15),
                (1_500_000, 20),
            ],
        };

        // Every regime tops out at 30%.
        let mut brackets: Vec<TaxBracket> = slabs
            .iter()
            .map(|&(bound, percent)| TaxBracket::bounded(Decimal::new(bound, 0), Decimal::new(percent, 2)))
            .collect();
        brackets.push(TaxBracket::unbounded(Decimal::new(30, 2)));

        BracketTable::from_validated(brackets)
    }
}

impl fmt::Display for Regime {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Regime {
    type Err = UnknownRegime;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s.trim()).ok_or_else(|| UnknownRegime(s.to_string()))
    }
}
