//! Error types for data operations.

use crate::month::Month;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur while loading a price series.
#[derive(Debug, Error)]
pub enum DataError {
    /// The price file could not be opened
    #[error("Failed to open {}: {source}", path.display())]
    Open {
        /// Path that was requested
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV decoding error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The input had no header row
    #[error("Input contains no header row")]
    EmptyInput,

    /// A date cell did not match the expected format
    #[error("Invalid date '{value}' for format '{format}'")]
    InvalidDate {
        /// Raw date text
        value: String,
        /// chrono format string it was parsed with
        format: String,
    },

    /// Two rows resolved to the same month
    #[error("Duplicate month {0} in price series")]
    DuplicateMonth(Month),
}
