//! `slabtax.toml` configuration.
//!
//! Every key is optional:
//!
//! ```toml
//! regime = "new_2024_25"          # default regime code
//! standard_deduction = "75000"    # overrides the regime's default
//! other_deductions = "50000"      # e.g. NPS contribution
//! table_file = "brackets.csv"     # load slabs from CSV instead of the built-in tables
//! table_name = "custom"           # table inside table_file (defaults to the regime code)
//! log_level = "warn"
//! ```
//!
//! Command-line flags override the file; the file overrides regime defaults.

use std::fs;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use slab_core::Regime;
use thiserror::Error;
use tracing::debug;

/// File looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "slabtax.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    pub regime: Regime,
    pub standard_deduction: Option<Decimal>,
    pub other_deductions: Decimal,
    pub table_file: Option<PathBuf>,
    pub table_name: Option<String>,
    pub log_level: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            regime: Regime::NewRegime2024_25,
            standard_deduction: None,
            // NPS and similar contributions are opt-in.
            other_deductions: Decimal::ZERO,
            table_file: None,
            table_name: None,
            log_level: "warn".to_string(),
        }
    }
}

impl CliConfig {
    /// Parses configuration text. `origin` is only used in error messages.
    pub fn from_toml_str(
        text: &str,
        origin: &Path,
    ) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Loads configuration.
    ///
    /// An explicit `path` must exist. Without one, [`DEFAULT_CONFIG_FILE`] is
    /// read from the working directory if present, otherwise defaults apply.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !fallback.is_file() {
                    debug!("no {DEFAULT_CONFIG_FILE} found; using defaults");
                    return Ok(Self::default());
                }
                fallback
            }
        };

        let text = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), "loaded config");

        let mut config = Self::from_toml_str(&text, &path)?;

        // A relative table_file is relative to the config file, not the cwd.
        let resolved = match (&config.table_file, path.parent()) {
            (Some(table_file), Some(dir))
                if table_file.is_relative() && !dir.as_os_str().is_empty() =>
            {
                Some(dir.join(table_file))
            }
            _ => None,
        };
        if resolved.is_some() {
            config.table_file = resolved;
        }

        Ok(config)
    }
}
