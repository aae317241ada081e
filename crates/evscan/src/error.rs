//! Error types for event-store scanning.

use std::path::PathBuf;

use thiserror::Error;

use crate::column::ElementKind;

/// Errors raised while opening a store, decoding rows, or filling histograms.
///
/// Every variant is fatal to a scan: the pipeline never retries or skips rows.
#[derive(Error, Debug)]
pub enum Error {
    /// The resource could not be opened (bad path, permissions).
    #[error("cannot open resource '{path}': {source}")]
    ResourceOpen {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The resource was opened but its catalog could not be parsed.
    #[error("malformed resource: {0}")]
    Format(String),

    /// Object key absent from the catalog.
    #[error("object not found: {0}")]
    ObjectNotFound(String),

    /// Object exists but is not tabular.
    #[error("'{key}' is {class}, not a tree")]
    WrongObjectKind {
        /// Requested key.
        key: String,
        /// Class name stored in the catalog.
        class: String,
    },

    /// Record field has no mapping entry.
    #[error("field not found in mapping: {0}")]
    FieldNotFound(String),

    /// Mapping table is inconsistent with the record shape.
    #[error("invalid field mapping: {0}")]
    InvalidMapping(String),

    /// Mapping references a column the tree does not have.
    #[error("column '{column}' missing from '{object}'")]
    ColumnMissing {
        /// Column name from the mapping.
        column: String,
        /// Tree name.
        object: String,
    },

    /// Stored element kind disagrees with the declared kind.
    #[error("type mismatch for column '{column}': declared {expected}, stored {found}")]
    TypeMismatch {
        /// Column name.
        column: String,
        /// Kind declared in the mapping.
        expected: ElementKind,
        /// Kind found in the store.
        found: ElementKind,
    },

    /// A sequence length disagrees with its group's declared multiplicity.
    #[error(
        "entry {entry}: column '{column}' has {found} elements, {group} multiplicity is {expected}"
    )]
    Multiplicity {
        /// Row index.
        entry: u64,
        /// Group name (`tracks`, `towers`).
        group: &'static str,
        /// Offending column.
        column: String,
        /// Declared multiplicity.
        expected: i64,
        /// Actual sequence length.
        found: usize,
    },

    /// Cursor failure (I/O mid-scan, read before first advance, read after close).
    #[error("cursor error: {0}")]
    Cursor(String),

    /// Invalid configuration (histogram geometry, scan settings).
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Format(err.to_string())
    }
}

/// Result alias for evscan operations.
pub type Result<T> = std::result::Result<T, Error>;
