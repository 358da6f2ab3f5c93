//! Error types for the data-loader crate.
//!
//! Only structural problems with the catalog file are errors. Malformed
//! values inside a row are not: numeric fields that fail to parse are
//! coerced to `None` by the parser and never reach this enum.

use thiserror::Error;

/// Errors that can occur while loading the movie catalog
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The CSV reader could not make sense of the header row
    #[error("Malformed header in {file}: {reason}")]
    HeaderError { file: String, reason: String },

    /// A column the engine depends on is absent from the header
    #[error("Missing required column '{column}' in {file}")]
    MissingColumn { file: String, column: String },

    /// Data validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
