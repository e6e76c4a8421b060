//! Slab tax calculations.
//!
//! [`slab`] holds the bracket calculator; [`comparison`] runs it across
//! several regimes for the same income.

pub mod common;
pub mod comparison;
pub mod slab;

pub use comparison::{ComparisonError, RegimeComparison, RegimeOutcome, compare_regimes};
pub use slab::{SlabCalculator, compute_tax};
