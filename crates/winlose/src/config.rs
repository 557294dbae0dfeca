//! Settings for one end-to-end run.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use winlose_data::{DEFAULT_DATE_FORMAT, Month};
use winlose_engine::{MarketReturn, PortfolioParams, ReportParams, SelectionSize};
use winlose_output::ExportFormat;

/// Everything needed to go from a price file to a written report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Price CSV to read
    pub input: PathBuf,
    /// Report file to write
    pub output: PathBuf,
    /// Month the portfolio is formed for
    pub start_month: Month,
    /// chrono format of the date column
    #[serde(default = "default_date_format")]
    pub date_format: String,
    /// Months to look back when ranking shares
    #[serde(default = "default_months")]
    pub lookback_months: usize,
    /// Months to report on; defaults to `lookback_months`
    #[serde(default)]
    pub output_months: Option<usize>,
    /// How many winners and losers to pick
    #[serde(default)]
    pub selection: SelectionSize,
    /// Market return estimator
    #[serde(default)]
    pub market_return: MarketReturn,
    /// Report file format
    #[serde(default)]
    pub format: ExportFormat,
}

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

const fn default_months() -> usize {
    12
}

impl RunConfig {
    /// Create a config with default parameters.
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>, start_month: Month) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            start_month,
            date_format: default_date_format(),
            lookback_months: default_months(),
            output_months: None,
            selection: SelectionSize::default(),
            market_return: MarketReturn::default(),
            format: ExportFormat::default(),
        }
    }

    /// Months reported after the start month.
    pub fn output_months(&self) -> usize {
        self.output_months.unwrap_or(self.lookback_months)
    }

    /// Parameters for the portfolio build.
    pub const fn portfolio_params(&self) -> PortfolioParams {
        PortfolioParams {
            lookback_months: self.lookback_months,
            selection: self.selection,
            market_return: self.market_return,
        }
    }

    /// Parameters for the performance report.
    pub fn report_params(&self) -> ReportParams {
        ReportParams {
            output_months: self.output_months(),
            market_return: self.market_return,
        }
    }
}
