//! Error types for the Sheetguard library.
//!
//! Data quality findings are never reported through these types; they are
//! returned as [`ValidationError`](crate::validation::ValidationError) values.
//! These errors cover loading datasets and configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Sheetguard operations.
#[derive(Debug, Error)]
pub enum SheetguardError {
    /// Error reading or writing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The input does not have the dataset shape (sheet name -> list of rows).
    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for Sheetguard operations.
pub type Result<T> = std::result::Result<T, SheetguardError>;
