mod bracket_table;
mod regime;
mod tax_input;
mod tax_result;

pub use bracket_table::{BracketTable, BracketTableError, TaxBracket};
pub use regime::{Regime, UnknownRegime};
pub use tax_input::{TaxInput, TaxInputError};
pub use tax_result::{TaxBreakdownEntry, TaxResult};
