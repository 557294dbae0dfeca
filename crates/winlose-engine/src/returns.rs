//! Share and market returns.
//!
//! The market return `Rm` is the baseline every share's return is measured
//! against. Two estimators are available:
//!
//! - **Average**: arithmetic mean of the percentage returns of all shares
//!   priced in both months. Every share counts equally.
//! - **Total**: percentage return of the sum of those shares' prices.
//!   High-priced shares dominate.
//!
//! Both always work on two raw, consecutive snapshots. A share priced in the
//! earlier month but not the later one has dropped out of the market and is
//! excluded (it does not count toward the average's denominator either).

use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use winlose_data::{Diagnostic, DiagnosticSink, Snapshot};

/// Percentage return from `prev` to `curr`.
///
/// # Errors
///
/// Returns [`EngineError::DivisionByZero`] if `prev` is zero.
///
/// # Examples
///
/// ```
/// use winlose_engine::percent_return;
///
/// assert_eq!(percent_return(1000.0, 1010.0).unwrap(), 1.0);
/// assert_eq!(percent_return(1000.0, 990.0).unwrap(), -1.0);
/// assert!(percent_return(0.0, 5.0).is_err());
/// ```
pub fn percent_return(prev: f64, curr: f64) -> Result<f64> {
    if prev == 0.0 {
        return Err(EngineError::DivisionByZero);
    }
    Ok(((curr - prev) / prev) * 100.0)
}

/// Choice of market return estimator used as `Rm`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketReturn {
    /// Equal-weighted average of share returns
    #[default]
    Average,
    /// Return of the summed share prices
    Total,
}

impl MarketReturn {
    /// Compute this estimator between two snapshots.
    ///
    /// # Errors
    ///
    /// See [`market_average_return`] and [`market_total_return`].
    pub fn compute(
        self,
        prev: &Snapshot,
        curr: &Snapshot,
        sink: &mut impl DiagnosticSink,
    ) -> Result<f64> {
        match self {
            Self::Average => market_average_return(prev, curr, sink),
            Self::Total => market_total_return(prev, curr, sink),
        }
    }

    /// Pick this estimator's value out of a pair of precomputed returns.
    pub const fn select(self, returns: &MarketReturns) -> f64 {
        match self {
            Self::Average => returns.average,
            Self::Total => returns.total,
        }
    }

    /// Human-readable name, used in log messages.
    pub const fn description(self) -> &'static str {
        match self {
            Self::Average => "market average return",
            Self::Total => "market total return",
        }
    }
}

impl fmt::Display for MarketReturn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Both market return estimates for one month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketReturns {
    /// Average percentage return of overlapping shares
    pub average: f64,
    /// Percentage return of the summed prices of overlapping shares
    pub total: f64,
    /// Number of shares priced in both months
    pub shares: usize,
}

impl MarketReturns {
    /// Compute both estimators in one pass over the overlapping shares.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::EmptyMarket`] if no share is priced in both
    /// months, or [`EngineError::DivisionByZero`] on a zero previous price.
    pub fn between(
        prev: &Snapshot,
        curr: &Snapshot,
        sink: &mut impl DiagnosticSink,
    ) -> Result<Self> {
        let pairs = overlapping_prices(prev, curr, sink)?;
        let average = average_of(&pairs)?;
        let total = total_of(&pairs)?;

        tracing::info!(
            "Market avge return for {} = {}% ({} shares)",
            curr.month(),
            average,
            pairs.len()
        );
        tracing::info!(
            "Market total return for {} = {}% ({} shares)",
            curr.month(),
            total,
            pairs.len()
        );

        Ok(Self {
            average,
            total,
            shares: pairs.len(),
        })
    }
}

/// Average percentage return of all shares priced in both snapshots.
///
/// Shares priced in `prev` but missing from `curr` are reported to `sink` as
/// [`Diagnostic::DroppedOut`] and left out of the average.
///
/// # Errors
///
/// Returns [`EngineError::EmptyMarket`] if no share is priced in both
/// months, or [`EngineError::DivisionByZero`] on a zero previous price.
pub fn market_average_return(
    prev: &Snapshot,
    curr: &Snapshot,
    sink: &mut impl DiagnosticSink,
) -> Result<f64> {
    let pairs = overlapping_prices(prev, curr, sink)?;
    let average = average_of(&pairs)?;
    tracing::info!(
        "Market avge return for {} = {}% ({} shares)",
        curr.month(),
        average,
        pairs.len()
    );
    Ok(average)
}

/// Percentage return of the summed prices of all shares priced in both
/// snapshots.
///
/// # Errors
///
/// Returns [`EngineError::EmptyMarket`] if no share is priced in both
/// months, or [`EngineError::DivisionByZero`] if their previous prices sum
/// to zero.
pub fn market_total_return(
    prev: &Snapshot,
    curr: &Snapshot,
    sink: &mut impl DiagnosticSink,
) -> Result<f64> {
    let pairs = overlapping_prices(prev, curr, sink)?;
    let total = total_of(&pairs)?;
    tracing::info!(
        "Market total return for {} = {}% ({} shares)",
        curr.month(),
        total,
        pairs.len()
    );
    Ok(total)
}

/// `(previous, current)` prices of shares priced in both snapshots.
fn overlapping_prices(
    prev: &Snapshot,
    curr: &Snapshot,
    sink: &mut impl DiagnosticSink,
) -> Result<Vec<(f64, f64)>> {
    let mut pairs = Vec::with_capacity(prev.len());
    for (share, &prev_price) in prev.prices() {
        match curr.price(share) {
            Some(curr_price) => pairs.push((prev_price, curr_price)),
            None => sink.record(Diagnostic::DroppedOut {
                month: curr.month(),
                share: share.clone(),
            }),
        }
    }

    if pairs.is_empty() {
        return Err(EngineError::EmptyMarket {
            previous: prev.month(),
            current: curr.month(),
        });
    }
    Ok(pairs)
}

fn average_of(pairs: &[(f64, f64)]) -> Result<f64> {
    let mut sum = 0.0;
    for &(prev, curr) in pairs {
        sum += percent_return(prev, curr)?;
    }
    Ok(sum / pairs.len() as f64)
}

fn total_of(pairs: &[(f64, f64)]) -> Result<f64> {
    let (prev_sum, curr_sum) = pairs
        .iter()
        .fold((0.0, 0.0), |(p, c), &(prev, curr)| (p + prev, c + curr));
    percent_return(prev_sum, curr_sum)
}
