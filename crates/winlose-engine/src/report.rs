//! Forward-looking performance of a selection.
//!
//! Starting at the portfolio's start month, each reported month gets both
//! market return estimates and, for every selected share, its absolute
//! return, percentage return and residual against the chosen `Rm`.

use crate::carry::LastKnownPrices;
use crate::error::{EngineError, Result};
use crate::portfolio::find_month;
use crate::returns::{MarketReturn, MarketReturns};
use crate::selection::{Selection, ShareRole};
use serde::{Deserialize, Serialize};
use winlose_data::{Diagnostic, DiagnosticSink, Month, PriceSeries, Snapshot};

/// Exclusive end index of the reported months.
///
/// Clamped to the last index of a series of `len` months.
pub const fn output_last_index(len: usize, start_index: usize, output_months: usize) -> usize {
    let last = len.saturating_sub(1);
    let wanted = start_index.saturating_add(output_months);
    if wanted < last { wanted } else { last }
}

/// Parameters of a performance report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportParams {
    /// Number of months to report on from the start month
    pub output_months: usize,
    /// Estimator used as the market return `Rm` for residuals
    pub market_return: MarketReturn,
}

impl Default for ReportParams {
    fn default() -> Self {
        Self {
            output_months: 12,
            market_return: MarketReturn::Average,
        }
    }
}

/// One selected share's performance in one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharePerformance {
    /// Share code
    pub share: String,
    /// Side of the portfolio
    pub role: ShareRole,
    /// Price change in currency units
    pub absolute_return: f64,
    /// Price change in percent
    pub percent_return: f64,
    /// Percent return minus the market return
    pub residual: f64,
    /// Whether this month's price was carried forward
    pub carried_forward: bool,
}

/// All figures for one reported month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRow {
    /// Reported month
    pub month: Month,
    /// Equal-weighted market return, in percent
    pub market_average_return: f64,
    /// Value-weighted market return, in percent
    pub market_total_return: f64,
    /// Winners then losers, in selection order
    pub shares: Vec<SharePerformance>,
}

impl PerformanceRow {
    /// Month label, `Mon-YYYY`.
    pub fn label(&self) -> String {
        self.month.to_string()
    }

    /// Numeric cells in header order.
    pub fn values(&self) -> Vec<f64> {
        let mut values = Vec::with_capacity(2 + self.shares.len() * 3);
        values.push(self.market_average_return);
        values.push(self.market_total_return);
        for share in &self.shares {
            values.extend([share.absolute_return, share.percent_return, share.residual]);
        }
        values
    }
}

/// Monthly performance of a selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    /// Selection the report follows
    pub selection: Selection,
    /// Estimator residuals are measured against
    pub market_return: MarketReturn,
    /// One row per reported month, ascending
    pub rows: Vec<PerformanceRow>,
}

impl PerformanceReport {
    /// Column labels matching [`PerformanceRow::label`] followed by
    /// [`PerformanceRow::values`].
    pub fn header(&self) -> Vec<String> {
        let mut header = vec![
            "Date".to_string(),
            "Market average return (%)".to_string(),
            "Market total return (%)".to_string(),
        ];
        for (role, share) in self.selection.shares() {
            header.push(format!("{role} [{share}] absolute return"));
            header.push(format!("{role} [{share}] % return"));
            header.push(format!("{role} [{share}] % residual"));
        }
        header
    }

    /// Month the portfolio was formed for.
    pub const fn start_month(&self) -> Month {
        self.selection.start_month
    }

    /// Number of reported months.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no month was reported.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Tracks a [`Selection`] forward through the series.
#[derive(Debug, Clone, Default)]
pub struct PerformanceReporter {
    params: ReportParams,
}

impl PerformanceReporter {
    /// Create a reporter.
    pub const fn new(params: ReportParams) -> Self {
        Self { params }
    }

    /// Parameters in use.
    pub const fn params(&self) -> &ReportParams {
        &self.params
    }

    /// Report on `selection` from `start_month` for up to `output_months`
    /// months, stopping at the end of the series.
    ///
    /// Prices are tracked from the month before `start_month`. A selected
    /// share not priced then starts from its most recent earlier price.
    ///
    /// # Errors
    ///
    /// - [`EngineError::DateNotFound`] if `start_month` is not in the series
    /// - [`EngineError::NoPriorMonth`] if it is the first month of the series
    /// - [`EngineError::NoKnownPrice`] if a selected share has no price
    ///   before `start_month`
    /// - return computation errors for corrupt prices or an empty market
    pub fn build(
        &self,
        series: &PriceSeries,
        selection: &Selection,
        start_month: Month,
        sink: &mut impl DiagnosticSink,
    ) -> Result<PerformanceReport> {
        let start_index = find_month(series, start_month)?;
        if start_index == 0 {
            return Err(EngineError::NoPriorMonth(start_month));
        }
        let last_index = output_last_index(series.len(), start_index, self.params.output_months);
        let snapshots = series.snapshots();

        tracing::info!(
            "Reporting on {} shares from {} for {} months.",
            selection.len(),
            start_month,
            last_index.saturating_sub(start_index)
        );

        let mut last_known =
            seed_prices(&snapshots[..start_index], selection, start_month, sink)?;
        let mut rows = Vec::with_capacity(last_index.saturating_sub(start_index));

        for pair in snapshots
            .get(start_index - 1..last_index)
            .unwrap_or_default()
            .windows(2)
        {
            let (prev, curr) = (&pair[0], &pair[1]);
            let market = MarketReturns::between(prev, curr, sink)?;
            let rm = self.params.market_return.select(&market);

            let mut shares = Vec::with_capacity(selection.len());
            for (role, share) in selection.shares() {
                let step = last_known.advance(share, curr, sink)?;
                let percent_return = step.percent_return()?;
                shares.push(SharePerformance {
                    share: share.to_string(),
                    role,
                    absolute_return: step.absolute_return(),
                    percent_return,
                    residual: percent_return - rm,
                    carried_forward: step.carried_forward,
                });
            }

            rows.push(PerformanceRow {
                month: curr.month(),
                market_average_return: market.average,
                market_total_return: market.total,
                shares,
            });
        }

        Ok(PerformanceReport {
            selection: selection.clone(),
            market_return: self.params.market_return,
            rows,
        })
    }
}

/// Last known prices as of the final snapshot of `history`.
///
/// Selected shares missing from that snapshot are backfilled from their most
/// recent earlier observation.
fn seed_prices(
    history: &[Snapshot],
    selection: &Selection,
    start_month: Month,
    sink: &mut impl DiagnosticSink,
) -> Result<LastKnownPrices> {
    let Some(seed) = history.last() else {
        return Err(EngineError::NoPriorMonth(start_month));
    };
    let mut last_known = LastKnownPrices::from_snapshot(seed);

    for (_, share) in selection.shares() {
        if last_known.get(share).is_some() {
            continue;
        }
        let price = history
            .iter()
            .rev()
            .find_map(|snapshot| snapshot.price(share))
            .ok_or_else(|| EngineError::NoKnownPrice {
                share: share.to_string(),
                month: start_month,
            })?;
        sink.record(Diagnostic::CarryForward {
            month: seed.month(),
            share: share.to_string(),
            price,
        });
        last_known.insert(share, price);
    }

    Ok(last_known)
}
