// =====================================================================
// File: error.rs
//
// Description:
//   Error types shared by the index backends and the catalog layer.
//
//   - `IndexError`   : rejections raised by an index on insert.
//   - `CatalogError` : loader, configuration and lookup failures seen by
//                      the catalog and the REPL.
//
// Notes:
//   * A missing key is never an `IndexError`. The index answers `None`
//     and the catalog turns that into `CatalogError::NotFound`.
// =====================================================================
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors an index can return from `insert`.
///
/// A rejected insert never leaves a partially linked node behind.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IndexError {
    /// The key is already stored in this index instance.
    #[error("duplicate key '{key}'")]
    DuplicateKey { key: String },

    /// The key cannot be hashed or compared under the index's rules.
    #[error("key '{key}' violates the key format: {reason}")]
    KeyFormat { key: String, reason: &'static str },
}

/// Errors produced above the index: loading, configuration and lookups.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("key '{0}' not found")]
    NotFound(String),

    #[error("key '{key}' violates the key format: {reason}")]
    KeyFormat { key: String, reason: &'static str },

    #[error("line {line}: {reason}")]
    MalformedLine { line: usize, reason: String },

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error("could not read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    ConfigParse(#[from] toml::de::Error),
}
