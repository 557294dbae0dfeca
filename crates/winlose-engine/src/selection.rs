//! Winners and losers.

use serde::{Deserialize, Serialize};
use std::fmt;
use winlose_data::Month;

/// How many winners (and as many losers) to pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "n", rename_all = "snake_case")]
pub enum SelectionSize {
    /// A fixed count, capped at the universe size
    Fixed(usize),
    /// A percentage of the universe, rounded up
    Percent(usize),
}

impl Default for SelectionSize {
    fn default() -> Self {
        Self::Fixed(10)
    }
}

impl SelectionSize {
    /// Number of winners (and of losers) for a universe of `universe_len`
    /// shares.
    ///
    /// `Fixed(n)` never exceeds the universe; `Percent(n)` is the ceiling of
    /// `n%` of the universe and is not capped.
    ///
    /// # Examples
    ///
    /// ```
    /// use winlose_engine::SelectionSize;
    ///
    /// assert_eq!(SelectionSize::Fixed(10).count(50), 10);
    /// assert_eq!(SelectionSize::Fixed(10).count(5), 5);
    /// assert_eq!(SelectionSize::Percent(10).count(50), 5);
    /// assert_eq!(SelectionSize::Percent(10).count(5), 1);
    /// ```
    pub const fn count(self, universe_len: usize) -> usize {
        match self {
            Self::Fixed(n) => {
                if n < universe_len {
                    n
                } else {
                    universe_len
                }
            }
            Self::Percent(n) => n.saturating_mul(universe_len).div_ceil(100),
        }
    }
}

/// Which side of the portfolio a share was picked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShareRole {
    /// Highest cumulative residual
    Winner,
    /// Lowest cumulative residual
    Loser,
}

impl ShareRole {
    /// Column label prefix.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Winner => "Winner",
            Self::Loser => "Loser",
        }
    }
}

impl fmt::Display for ShareRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// A share with its cumulative residual over the look-back window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedShare {
    /// Share code
    pub share: String,
    /// Sum of monthly residual returns, in percent
    pub cumulative_residual: f64,
}

/// Result of a portfolio build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    /// Month the portfolio was formed for
    pub start_month: Month,
    /// Top shares by cumulative residual, in ascending rank order
    pub winners: Vec<String>,
    /// Bottom shares by cumulative residual, in ascending rank order
    pub losers: Vec<String>,
    /// Every ranked share, lowest cumulative residual first
    pub ranking: Vec<RankedShare>,
}

impl Selection {
    /// Slice an ascending ranking into losers (first `n`) and winners
    /// (last `n`).
    ///
    /// The two sides overlap when the ranking holds fewer than `2 * n`
    /// shares; both are clamped to the ranking length.
    pub fn from_ranking(start_month: Month, ranking: Vec<RankedShare>, n: usize) -> Self {
        let n = n.min(ranking.len());
        let losers = ranking[..n].iter().map(|r| r.share.clone()).collect();
        let winners = ranking[ranking.len() - n..]
            .iter()
            .map(|r| r.share.clone())
            .collect();

        Self {
            start_month,
            winners,
            losers,
            ranking,
        }
    }

    /// Winners then losers, each tagged with its role.
    pub fn shares(&self) -> impl Iterator<Item = (ShareRole, &str)> + '_ {
        self.winners
            .iter()
            .map(|s| (ShareRole::Winner, s.as_str()))
            .chain(self.losers.iter().map(|s| (ShareRole::Loser, s.as_str())))
    }

    /// Total number of picks (winners plus losers).
    pub fn len(&self) -> usize {
        self.winners.len() + self.losers.len()
    }

    /// Whether nothing was picked.
    pub fn is_empty(&self) -> bool {
        self.winners.is_empty() && self.losers.is_empty()
    }

    /// Cumulative residual of a ranked share.
    pub fn cumulative_residual(&self, share: &str) -> Option<f64> {
        self.ranking
            .iter()
            .find(|r| r.share == share)
            .map(|r| r.cumulative_residual)
    }
}
