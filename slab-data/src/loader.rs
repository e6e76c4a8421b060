use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;
use slab_core::{BracketTable, BracketTableError, TaxBracket};
use thiserror::Error;
use tracing::{debug, error};

/// Errors that can occur when loading bracket table data.
#[derive(Debug, Error)]
pub enum BracketTableLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("row {row} has an empty table name")]
    EmptyTableName { row: usize },

    #[error("invalid bracket table '{table}': {source}")]
    InvalidTable {
        table: String,
        #[source]
        source: BracketTableError,
    },

    #[error("bracket table '{0}' not found")]
    TableNotFound(String),
}

impl From<csv::Error> for BracketTableLoaderError {
    fn from(err: csv::Error) -> Self {
        error!(%err, "bracket CSV could not be parsed");
        BracketTableLoaderError::CsvParse(err.to_string())
    }
}

/// A single row of the bracket CSV file.
///
/// - `table`: name of the table the row belongs to (e.g. `old`, `custom`)
/// - `upper_bound`: upper bound of the slab; empty, `inf` or `infinity` for unbounded
/// - `rate`: marginal rate as a fraction (e.g. `0.05` for 5%)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BracketRecord {
    pub table: String,
    #[serde(deserialize_with = "deserialize_upper_bound")]
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
}

fn deserialize_upper_bound<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) if s.eq_ignore_ascii_case("inf") || s.eq_ignore_ascii_case("infinity") => Ok(None),
        Some(s) => s
            .replace(',', "")
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Loader for bracket tables stored as CSV.
///
/// Rows are grouped by their `table` column; within a table the rows keep
/// file order and must already be sorted by upper bound.
pub struct BracketTableLoader;

impl BracketTableLoader {
    /// Parse bracket records from a CSV reader.
    ///
    /// The reader can be any type that implements `Read`, such as a file or
    /// a byte slice.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<BracketRecord>, BracketTableLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: BracketRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Group records by table name and validate each table.
    ///
    /// # Errors
    ///
    /// Returns [`BracketTableLoaderError::EmptyTableName`] for a row without a
    /// table name and [`BracketTableLoaderError::InvalidTable`] for the first
    /// table that fails validation.
    pub fn build(
        records: &[BracketRecord]
    ) -> Result<BTreeMap<String, BracketTable>, BracketTableLoaderError> {
        let mut groups: BTreeMap<String, Vec<TaxBracket>> = BTreeMap::new();

        for (index, record) in records.iter().enumerate() {
            let name = record.table.trim();
            if name.is_empty() {
                return Err(BracketTableLoaderError::EmptyTableName { row: index + 1 });
            }
            groups.entry(name.to_string()).or_default().push(TaxBracket {
                upper_bound: record.upper_bound,
                rate: record.rate,
            });
        }

        groups
            .into_iter()
            .map(|(table, brackets)| {
                debug!(%table, slabs = brackets.len(), "validating bracket table");
                match BracketTable::new(brackets) {
                    Ok(built) => Ok((table, built)),
                    Err(source) => Err(BracketTableLoaderError::InvalidTable { table, source }),
                }
            })
            .collect()
    }

    /// Parse and build in one step from any reader.
    pub fn load<R: Read>(
        reader: R
    ) -> Result<BTreeMap<String, BracketTable>, BracketTableLoaderError> {
        let records = Self::parse(reader)?;
        Self::build(&records)
    }

    /// Parse and build the tables stored in the CSV file at `path`.
    pub fn load_from_file(
        path: &Path
    ) -> Result<BTreeMap<String, BracketTable>, BracketTableLoaderError> {
        let file = File::open(path).map_err(|source| BracketTableLoaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::load(file)
    }

    /// Load the file at `path` and return the table called `name`.
    pub fn load_table(
        path: &Path,
        name: &str,
    ) -> Result<BracketTable, BracketTableLoaderError> {
        let mut tables = Self::load_from_file(path)?;
        tables
            .remove(name)
            .ok_or_else(|| BracketTableLoaderError::TableNotFound(name.to_string()))
    }
}
