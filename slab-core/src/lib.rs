pub mod calculations;
pub mod models;

pub use calculations::{
    ComparisonError, RegimeComparison, RegimeOutcome, SlabCalculator, compare_regimes, compute_tax,
};
pub use models::*;
