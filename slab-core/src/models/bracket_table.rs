use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::calculations::common::format_grouped;

/// A construction-time problem with a bracket table.
///
/// A table that fails validation is never built, so the calculator only
/// ever sees well-formed tables.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BracketTableError {
    /// The table has no brackets at all.
    #[error("bracket table is empty")]
    Empty,

    /// An upper bound is below zero.
    #[error("bracket {index} has negative upper bound {bound}")]
    NegativeBound { index: usize, bound: Decimal },

    /// An upper bound does not exceed the bound before it.
    #[error("bracket {index} upper bound {bound} does not exceed previous bound {previous}")]
    NotAscending {
        index: usize,
        bound: Decimal,
        previous: Decimal,
    },

    /// An unbounded bracket appears before the last position.
    #[error("bracket {index} is unbounded but is not the last bracket")]
    UnboundedBeforeEnd { index: usize },

    /// A marginal rate outside `[0, 1]`.
    #[error("bracket {index} rate {rate} is outside the range 0 to 1")]
    RateOutOfRange { index: usize, rate: Decimal },

    /// A marginal rate lower than the rate of the slab below it.
    #[error("bracket {index} rate {rate} is lower than previous rate {previous}")]
    RateNotAscending {
        index: usize,
        rate: Decimal,
        previous: Decimal,
    },
}

/// One slab: income up to `upper_bound` taxed at the marginal `rate`.
///
/// `upper_bound` of `None` means the slab is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
}

impl TaxBracket {
    pub fn bounded(
        upper_bound: Decimal,
        rate: Decimal,
    ) -> Self {
        Self {
            upper_bound: Some(upper_bound),
            rate,
        }
    }

    pub fn unbounded(rate: Decimal) -> Self {
        Self {
            upper_bound: None,
            rate,
        }
    }
}

/// An ordered, validated list of tax slabs.
///
/// Bounds are strictly increasing, rates never decrease and every rate lies
/// in `[0, 1]`. The last bracket is always the catch-all top slab: a finite
/// bound supplied for it is dropped at construction. Tables are immutable once built; different
/// jurisdictions or years get different tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TaxBracket>", into = "Vec<TaxBracket>")]
pub struct BracketTable {
    brackets: Vec<TaxBracket>,
}

impl BracketTable {
    /// Validates `brackets` and builds a table from them.
    ///
    /// # Errors
    ///
    /// Returns [`BracketTableError`] if the list is empty, a bound is
    /// negative or out of order, an unbounded bracket is not last, a rate
    /// falls outside `[0, 1]`, or a rate is lower than the one before it.
    pub fn new(mut brackets: Vec<TaxBracket>) -> Result<Self, BracketTableError> {
        if brackets.is_empty() {
            return Err(BracketTableError::Empty);
        }

        let last_index = brackets.len() - 1;
        let mut previous: Option<Decimal> = None;
        let mut previous_rate = Decimal::ZERO;

        for (index, bracket) in brackets.iter().enumerate() {
            if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
                return Err(BracketTableError::RateOutOfRange {
                    index,
                    rate: bracket.rate,
                });
            }
            if bracket.rate < previous_rate {
                return Err(BracketTableError::RateNotAscending {
                    index,
                    rate: bracket.rate,
                    previous: previous_rate,
                });
            }
            previous_rate = bracket.rate;

            match bracket.upper_bound {
                None if index != last_index => {
                    return Err(BracketTableError::UnboundedBeforeEnd { index });
                }
                None => {}
                Some(bound) if bound < Decimal::ZERO => {
                    return Err(BracketTableError::NegativeBound { index, bound });
                }
                Some(bound) => {
                    if let Some(previous) = previous {
                        if bound <= previous {
                            return Err(BracketTableError::NotAscending {
                                index,
                                bound,
                                previous,
                            });
                        }
                    }
                    previous = Some(bound);
                }
            }
        }

        if let Some(bound) = brackets[last_index].upper_bound.take() {
            warn!(%bound, "top bracket bound ignored; the last bracket is unbounded");
        }

        Ok(Self { brackets })
    }

    /// Builds a table from `(upper_bound, rate)` pairs.
    pub fn from_pairs<I>(pairs: I) -> Result<Self, BracketTableError>
    where
        I: IntoIterator<Item = (Option<Decimal>, Decimal)>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(upper_bound, rate)| TaxBracket { upper_bound, rate })
                .collect(),
        )
    }

    /// Wraps brackets already known to satisfy every table invariant.
    pub(crate) fn from_validated(brackets: Vec<TaxBracket>) -> Self {
        Self { brackets }
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TaxBracket> {
        self.brackets.iter()
    }

    pub fn len(&self) -> usize {
        self.brackets.len()
    }

    /// Always `false`; kept alongside [`len`](Self::len) for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.brackets.is_empty()
    }

    /// The largest finite upper bound, or `None` for a single-slab table.
    pub fn highest_finite_bound(&self) -> Option<Decimal> {
        self.brackets.iter().filter_map(|b| b.upper_bound).last()
    }

    /// The marginal rate of the unbounded top slab.
    pub fn top_rate(&self) -> Decimal {
        self.brackets
            .last()
            .map(|b| b.rate)
            .unwrap_or(Decimal::ZERO)
    }

    /// Lower bound of the bracket at `index` (the previous bracket's upper bound).
    pub fn lower_bound(
        &self,
        index: usize,
    ) -> Decimal {
        index
            .checked_sub(1)
            .and_then(|prev| self.brackets.get(prev))
            .and_then(|b| b.upper_bound)
            .unwrap_or(Decimal::ZERO)
    }

    /// Human-readable range for the bracket at `index`.
    ///
    /// Produces `"Up to 3,00,000"` for the first slab, `"3,00,000 to 6,00,000"`
    /// for middle slabs and `"Above 15,00,000"` for the top slab.
    pub fn label(
        &self,
        index: usize,
    ) -> String {
        let upper = self.brackets.get(index).and_then(|b| b.upper_bound);
        let lower = self.lower_bound(index);

        match (index, upper) {
            (0, Some(upper)) => format!("Up to {}", format_grouped(upper)),
            (0, None) => "All income".to_string(),
            (_, Some(upper)) => format!("{} to {}", format_grouped(lower), format_grouped(upper)),
            (_, None) => format!("Above {}", format_grouped(lower)),
        }
    }
}

impl TryFrom<Vec<TaxBracket>> for BracketTable {
    type Error = BracketTableError;

    fn try_from(brackets: Vec<TaxBracket>) -> Result<Self, Self::Error> {
        Self::new(brackets)
    }
}

impl From<BracketTable> for Vec<TaxBracket> {
    fn from(table: BracketTable) -> Self {
        table.brackets
    }
}

impl<'a> IntoIterator for &'a BracketTable {
    type Item = &'a TaxBracket;
    type IntoIter = std::slice::Iter<'a, TaxBracket>;

    fn into_iter(self) -> Self::IntoIter {
        self.brackets.iter()
    }
}
