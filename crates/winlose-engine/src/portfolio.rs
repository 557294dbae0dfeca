//! Portfolio construction over a look-back window.
//!
//! For every month in the window, each tracked share's residual return
//! (its percentage return minus the market return `Rm`) is added to a
//! running total. Shares are then ranked by that cumulative residual; the
//! highest are the winners, the lowest the losers.
//!
//! The window ends the month before the start month and reaches back at most
//! `lookback_months` snapshots, but never before the second snapshot: the
//! first snapshot only ever serves as the "previous" month of the second.

use crate::carry::LastKnownPrices;
use crate::error::{EngineError, Result};
use crate::returns::MarketReturn;
use crate::selection::{RankedShare, Selection, SelectionSize};
use serde::{Deserialize, Serialize};
use winlose_data::{DiagnosticSink, Month, PriceSeries, Snapshot};

/// Zero-based index of an exact month.
///
/// # Errors
///
/// Returns [`EngineError::DateNotFound`] if the month is not in the series.
/// No nearest-month fallback is attempted.
pub fn find_month(series: &PriceSeries, month: Month) -> Result<usize> {
    tracing::debug!("Looking for date {month}");
    series
        .position(month)
        .ok_or(EngineError::DateNotFound(month))
}

/// Index of the first month of the look-back window.
///
/// Clamped so the window never starts before index 1.
pub const fn portfolio_first_index(start_index: usize, lookback_months: usize) -> usize {
    let first = start_index.saturating_sub(lookback_months);
    if first < 1 { 1 } else { first }
}

/// Parameters of a portfolio build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioParams {
    /// Number of months to look back from the start month
    pub lookback_months: usize,
    /// How many winners, and as many losers, to pick
    pub selection: SelectionSize,
    /// Estimator used as the market return `Rm`
    pub market_return: MarketReturn,
}

impl Default for PortfolioParams {
    fn default() -> Self {
        Self {
            lookback_months: 12,
            selection: SelectionSize::default(),
            market_return: MarketReturn::Average,
        }
    }
}

/// Builds a winners/losers [`Selection`] from a price series.
#[derive(Debug, Clone, Default)]
pub struct PortfolioBuilder {
    params: PortfolioParams,
}

impl PortfolioBuilder {
    /// Create a builder.
    pub const fn new(params: PortfolioParams) -> Self {
        Self { params }
    }

    /// Parameters in use.
    pub const fn params(&self) -> &PortfolioParams {
        &self.params
    }

    /// Rank shares by cumulative residual over the look-back window ending
    /// the month before `start_month`.
    ///
    /// Only shares priced in the month before the window are tracked. A
    /// tracked share missing from a later month keeps its last known price
    /// (reported to `sink`), so it earns a zero return that month.
    ///
    /// Ties in cumulative residual keep the share universe's header order.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DateNotFound`] if `start_month` is not in the
    /// series, or a return computation error for corrupt prices.
    pub fn build(
        &self,
        series: &PriceSeries,
        start_month: Month,
        sink: &mut impl DiagnosticSink,
    ) -> Result<Selection> {
        let start_index = find_month(series, start_month)?;
        let first_index = portfolio_first_index(start_index, self.params.lookback_months);
        let snapshots = series.snapshots();
        let seed = &snapshots[first_index - 1];
        let window = snapshots.get(first_index..start_index).unwrap_or_default();

        match (window.first(), window.last()) {
            (Some(first), Some(last)) => tracing::info!(
                "Calculating winners and losers from {} to {}.",
                first.month(),
                last.month()
            ),
            _ => tracing::warn!(
                "No months before {start_month} to rank shares on; all residuals are zero"
            ),
        }
        tracing::info!(
            "Using {} to calc residuals.",
            self.params.market_return.description()
        );

        let mut ranking = tracked_shares(series, seed);
        let mut last_known = LastKnownPrices::from_snapshot(seed);
        let mut prev = seed;

        for snapshot in window {
            let rm = self.params.market_return.compute(prev, snapshot, sink)?;
            for entry in &mut ranking {
                let step = last_known.advance(&entry.share, snapshot, sink)?;
                entry.cumulative_residual += step.percent_return()? - rm;
            }
            prev = snapshot;
        }

        tracing::debug!("Cumulative residuals after portfolio generation: {ranking:?}");

        // Stable sort: equal residuals stay in universe order.
        ranking.sort_by(|a, b| a.cumulative_residual.total_cmp(&b.cumulative_residual));

        let n = self.params.selection.count(series.universe().len());
        let selection = Selection::from_ranking(start_month, ranking, n);
        tracing::info!("Finished picking winners and losers.");
        Ok(selection)
    }
}

/// Shares priced in the seed month, universe order first, each starting at a
/// zero cumulative residual.
fn tracked_shares(series: &PriceSeries, seed: &Snapshot) -> Vec<RankedShare> {
    let universe = series.universe();
    let in_universe = universe.iter().filter(|share| seed.contains(share));
    let outside_universe = seed.prices().keys().filter(|share| !universe.contains(share));

    in_universe
        .chain(outside_universe)
        .map(|share| RankedShare {
            share: share.clone(),
            cumulative_residual: 0.0,
        })
        .collect()
}
