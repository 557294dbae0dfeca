//! Monthly price snapshots and the series that holds them.

use crate::error::{DataError, Result};
use crate::month::Month;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Share codes known at parse time, in header order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareUniverse {
    shares: Vec<String>,
}

impl ShareUniverse {
    /// Create a universe from share codes in their original order.
    pub const fn new(shares: Vec<String>) -> Self {
        Self { shares }
    }

    /// All share codes.
    pub fn shares(&self) -> &[String] {
        &self.shares
    }

    /// Number of share codes.
    pub const fn len(&self) -> usize {
        self.shares.len()
    }

    /// Whether the universe has no shares.
    pub const fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }

    /// Check if a share code is in the universe.
    pub fn contains(&self, share: &str) -> bool {
        self.shares.iter().any(|s| s == share)
    }

    /// Iterate over share codes in header order.
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.shares.iter()
    }
}

impl<S: Into<String>> FromIterator<S> for ShareUniverse {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

impl<'a> IntoIterator for &'a ShareUniverse {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Prices observed in one month.
///
/// A share without a price in this month is simply absent from the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    month: Month,
    prices: BTreeMap<String, f64>,
}

impl Snapshot {
    /// Create a snapshot.
    pub const fn new(month: Month, prices: BTreeMap<String, f64>) -> Self {
        Self { month, prices }
    }

    /// Month of the snapshot.
    pub const fn month(&self) -> Month {
        self.month
    }

    /// All prices keyed by share code.
    pub const fn prices(&self) -> &BTreeMap<String, f64> {
        &self.prices
    }

    /// Price of a share, if observed this month.
    pub fn price(&self, share: &str) -> Option<f64> {
        self.prices.get(share).copied()
    }

    /// Whether the share has a price this month.
    pub fn contains(&self, share: &str) -> bool {
        self.prices.contains_key(share)
    }

    /// Number of priced shares.
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    /// Whether no share is priced.
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

/// Snapshots in strictly ascending month order.
///
/// Months with no data are absent rather than stored as empty snapshots, so
/// consecutive entries are not necessarily consecutive calendar months. The
/// series is immutable once built and can be shared between threads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PriceSeriesRepr")]
pub struct PriceSeries {
    universe: ShareUniverse,
    snapshots: Vec<Snapshot>,
}

/// Unchecked wire form, validated through [`PriceSeries::new`].
#[derive(Deserialize)]
struct PriceSeriesRepr {
    universe: ShareUniverse,
    snapshots: Vec<Snapshot>,
}

impl TryFrom<PriceSeriesRepr> for PriceSeries {
    type Error = DataError;

    fn try_from(repr: PriceSeriesRepr) -> Result<Self> {
        Self::new(repr.universe, repr.snapshots)
    }
}

impl PriceSeries {
    /// Build a series, sorting snapshots by month.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::DuplicateMonth`] if two snapshots share a month.
    pub fn new(universe: ShareUniverse, mut snapshots: Vec<Snapshot>) -> Result<Self> {
        snapshots.sort_by_key(Snapshot::month);

        if let Some(pair) = snapshots.windows(2).find(|w| w[0].month == w[1].month) {
            return Err(DataError::DuplicateMonth(pair[0].month));
        }

        Ok(Self {
            universe,
            snapshots,
        })
    }

    /// Share codes from the header.
    pub const fn universe(&self) -> &ShareUniverse {
        &self.universe
    }

    /// All snapshots, oldest first.
    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    /// Snapshot at a position.
    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.snapshots.get(index)
    }

    /// Number of months.
    pub const fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Whether the series has no months.
    pub const fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Zero-based position of an exact month, if present.
    pub fn position(&self, month: Month) -> Option<usize> {
        self.snapshots
            .binary_search_by_key(&month, Snapshot::month)
            .ok()
    }

    /// Months in order.
    pub fn months(&self) -> impl Iterator<Item = Month> + '_ {
        self.snapshots.iter().map(Snapshot::month)
    }

    /// Earliest month.
    pub fn first_month(&self) -> Option<Month> {
        self.snapshots.first().map(Snapshot::month)
    }

    /// Latest month.
    pub fn last_month(&self) -> Option<Month> {
        self.snapshots.last().map(Snapshot::month)
    }
}
