#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/winlose/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod diagnostics;
pub mod error;
pub mod month;
pub mod parser;
pub mod series;

pub use diagnostics::{Diagnostic, DiagnosticSink, LogSink, Tee};
pub use error::{DataError, Result};
pub use month::Month;
pub use parser::{DEFAULT_DATE_FORMAT, PriceCsvParser};
pub use series::{PriceSeries, ShareUniverse, Snapshot};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
