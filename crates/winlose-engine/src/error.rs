//! Error types for portfolio construction and reporting.

use thiserror::Error;
use winlose_data::Month;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Fatal errors. Any of these aborts the run; no partial report is produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// The requested month is not in the series
    #[error("Couldn't find {0} in the price series")]
    DateNotFound(Month),

    /// A return was requested from a previous value of zero
    #[error("Division by zero: previous price or market total is zero")]
    DivisionByZero,

    /// No share was priced in both of two consecutive months
    #[error("No shares priced in both {previous} and {current}")]
    EmptyMarket {
        /// Earlier month
        previous: Month,
        /// Later month
        current: Month,
    },

    /// The report start month is the first month of the series
    #[error("No month precedes {0}; cannot compute returns for it")]
    NoPriorMonth(Month),

    /// A tracked share has never been priced
    #[error("No known price for share code {share} before {month}")]
    NoKnownPrice {
        /// Share code
        share: String,
        /// Month the price was needed for
        month: Month,
    },
}
