//! Last-known-price tracking with carry-forward.
//!
//! Each portfolio build or report owns one [`LastKnownPrices`] and advances it
//! month by month. When a share has no price in a month, its last known price
//! stands in, so its return for that month is zero. The substitution is
//! reported as [`Diagnostic::CarryForward`]; the snapshot itself is never
//! modified.

use crate::error::{EngineError, Result};
use crate::returns::percent_return;
use std::collections::HashMap;
use winlose_data::{Diagnostic, DiagnosticSink, Snapshot};

/// Price movement of one share from its last known price to this month.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceStep {
    /// Last known price before this month
    pub previous: f64,
    /// Price used for this month
    pub current: f64,
    /// Whether `current` was carried forward rather than observed
    pub carried_forward: bool,
}

impl PriceStep {
    /// Price change in currency units.
    pub fn absolute_return(&self) -> f64 {
        self.current - self.previous
    }

    /// Price change as a percentage of the previous price.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DivisionByZero`] if the previous price is zero.
    pub fn percent_return(&self) -> Result<f64> {
        percent_return(self.previous, self.current)
    }
}

/// Scratch map of the most recent price seen for each share.
#[derive(Debug, Clone, Default)]
pub struct LastKnownPrices {
    prices: HashMap<String, f64>,
}

impl LastKnownPrices {
    /// Seed from every price in a snapshot.
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self {
            prices: snapshot
                .prices()
                .iter()
                .map(|(share, &price)| (share.clone(), price))
                .collect(),
        }
    }

    /// Last known price of a share.
    pub fn get(&self, share: &str) -> Option<f64> {
        self.prices.get(share).copied()
    }

    /// Set the last known price of a share.
    pub fn insert(&mut self, share: impl Into<String>, price: f64) {
        self.prices.insert(share.into(), price);
    }

    /// Move a share forward to `snapshot`'s month.
    ///
    /// Uses the snapshot's price if present, otherwise carries the last known
    /// price forward and records a [`Diagnostic::CarryForward`].
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NoKnownPrice`] if the share has never been seen.
    pub fn advance(
        &mut self,
        share: &str,
        snapshot: &Snapshot,
        sink: &mut impl DiagnosticSink,
    ) -> Result<PriceStep> {
        let previous = self.get(share).ok_or_else(|| EngineError::NoKnownPrice {
            share: share.to_string(),
            month: snapshot.month(),
        })?;

        let (current, carried_forward) = match snapshot.price(share) {
            Some(price) => (price, false),
            None => {
                sink.record(Diagnostic::CarryForward {
                    month: snapshot.month(),
                    share: share.to_string(),
                    price: previous,
                });
                (previous, true)
            }
        };

        self.insert(share, current);
        Ok(PriceStep {
            previous,
            current,
            carried_forward,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winlose_data::Month;

    fn snapshot(m: u32, prices: &[(&str, f64)]) -> Snapshot {
        Snapshot::new(
            Month::new(2009, m).unwrap(),
            prices.iter().map(|(s, p)| (s.to_string(), *p)).collect(),
        )
    }

    #[test]
    fn test_advance_observed_price() {
        let mut last = LastKnownPrices::from_snapshot(&snapshot(1, &[("A", 100.0)]));
        let mut sink: Vec<Diagnostic> = Vec::new();

        let step = last
            .advance("A", &snapshot(2, &[("A", 110.0)]), &mut sink)
            .unwrap();

        assert_eq!(step.previous, 100.0);
        assert_eq!(step.current, 110.0);
        assert!(!step.carried_forward);
        assert_eq!(step.absolute_return(), 10.0);
        assert_eq!(last.get("A"), Some(110.0));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_advance_carries_forward_missing_price() {
        let mut last = LastKnownPrices::from_snapshot(&snapshot(1, &[("A", 100.0)]));
        let mut sink: Vec<Diagnostic> = Vec::new();

        let step = last.advance("A", &snapshot(2, &[]), &mut sink).unwrap();

        assert!(step.carried_forward);
        assert_eq!(step.absolute_return(), 0.0);
        assert_eq!(step.percent_return().unwrap(), 0.0);
        assert_eq!(sink.len(), 1);
        assert!(sink[0].is_carry_forward());
    }

    #[test]
    fn test_advance_unknown_share() {
        let mut last = LastKnownPrices::default();
        let mut sink: Vec<Diagnostic> = Vec::new();

        let err = last
            .advance("A", &snapshot(2, &[("A", 1.0)]), &mut sink)
            .unwrap_err();
        assert!(matches!(err, EngineError::NoKnownPrice { .. }));
    }

    #[test]
    fn test_seed_does_not_alias_snapshot() {
        let seed = snapshot(1, &[("A", 100.0)]);
        let mut last = LastKnownPrices::from_snapshot(&seed);
        let mut sink: Vec<Diagnostic> = Vec::new();
        last.advance("A", &snapshot(2, &[("A", 150.0)]), &mut sink)
            .unwrap();

        assert_eq!(seed.price("A"), Some(100.0));
    }
}
