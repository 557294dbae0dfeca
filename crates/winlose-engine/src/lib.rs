#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/winlose/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod batch;
pub mod carry;
pub mod error;
pub mod portfolio;
pub mod report;
pub mod returns;
pub mod selection;

pub use batch::{BatchOutcome, build_portfolios};
pub use carry::{LastKnownPrices, PriceStep};
pub use error::{EngineError, Result};
pub use portfolio::{PortfolioBuilder, PortfolioParams, find_month, portfolio_first_index};
pub use report::{
    PerformanceReport, PerformanceReporter, PerformanceRow, ReportParams, SharePerformance,
    output_last_index,
};
pub use returns::{
    MarketReturn, MarketReturns, market_average_return, market_total_return, percent_return,
};
pub use selection::{RankedShare, Selection, SelectionSize, ShareRole};
