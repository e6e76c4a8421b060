//! CSV loading for slab tax bracket tables.
//!
//! ## CSV Format
//!
//! | Column        | Type    | Notes                                          |
//! |---------------|---------|------------------------------------------------|
//! | `table`       | string  | Name of the table the row belongs to           |
//! | `upper_bound` | decimal | Leave empty (or `inf`) for the top slab         |
//! | `rate`        | decimal | Marginal rate as a fraction, e.g. `0.05`        |
//!
//! ```csv
//! table,upper_bound,rate
//! custom,300000,0.00
//! custom,600000,0.05
//! custom,,0.10
//! ```

mod loader;

pub use loader::{BracketRecord, BracketTableLoader, BracketTableLoaderError};
