#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/winlose/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod pipeline;

// Re-export main types from sub-crates
pub use winlose_data as data;
pub use winlose_engine as engine;
pub use winlose_output as output;

pub use config::RunConfig;
pub use pipeline::{PipelineError, RunOutcome};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
