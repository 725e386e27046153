// =====================================================================
// File: config.rs
//
// Description:
//   Catalog configuration, read from a TOML file. Every field has a
//   default so a partial file (or no file) is fine:
//
//     backend       = "tree"      # or "hash"
//     table_size    = 179         # buckets, hash backend only
//     hash_strategy = "charsum"   # or "numeric"
//     log_level     = "info"
//     data_file     = "courses.csv"
//     data_format   = "courses"   # or "bids"
// =====================================================================
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Backend, CatalogError, DataFormat, HashStrategy, DEFAULT_TABLE_SIZE};

/// Settings for building a [`crate::Catalog`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub backend: Backend,
    pub table_size: usize,
    pub hash_strategy: HashStrategy,
    pub log_level: String,
    /// Data file loaded at startup, if any.
    pub data_file: Option<PathBuf>,
    pub data_format: DataFormat,
}


impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Tree,
            table_size: DEFAULT_TABLE_SIZE,
            hash_strategy: HashStrategy::CharSum,
            log_level: "info".to_string(),
            data_file: None,
            data_format: DataFormat::Courses,
        }
    }
}


impl CatalogConfig {
    /// Reads and validates a TOML config file.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Parses and validates TOML text.
    ///
    /// # Example
    /// ```
    /// use recordindex::{Backend, CatalogConfig};
    /// let config = CatalogConfig::from_toml_str("backend = \"hash\"\ntable_size = 5").unwrap();
    /// assert_eq!(config.backend, Backend::Hash);
    /// assert_eq!(config.table_size, 5);
    /// ```
    pub fn from_toml_str(contents: &str) -> Result<Self, CatalogError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.table_size == 0 {
            return Err(CatalogError::Config("table_size must be at least 1".to_string()));
        }
        Ok(())
    }
}
