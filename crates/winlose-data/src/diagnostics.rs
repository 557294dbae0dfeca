//! Non-fatal events raised while parsing and computing returns.
//!
//! Recoverable conditions (a cell that is not a number, a share that has left
//! the market, a price carried forward from an earlier month) never abort a
//! run. They are reported to a [`DiagnosticSink`] supplied by the caller, so
//! library code does not depend on any particular logger being installed.

use crate::month::Month;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A recoverable event tied to one share in one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Diagnostic {
    /// A price cell could not be converted to a number and was dropped.
    UnparsablePrice {
        /// Month of the row
        month: Month,
        /// Share code of the column
        share: String,
        /// Cell text
        raw: String,
    },

    /// A share priced in the previous month has no price this month.
    DroppedOut {
        /// Month the share went missing
        month: Month,
        /// Share code
        share: String,
    },

    /// A missing price was replaced by the share's last known price.
    CarryForward {
        /// Month with the missing price
        month: Month,
        /// Share code
        share: String,
        /// Price that was substituted
        price: f64,
    },
}

impl Diagnostic {
    /// Month the event refers to.
    pub const fn month(&self) -> Month {
        match self {
            Self::UnparsablePrice { month, .. }
            | Self::DroppedOut { month, .. }
            | Self::CarryForward { month, .. } => *month,
        }
    }

    /// Share code the event refers to.
    pub fn share(&self) -> &str {
        match self {
            Self::UnparsablePrice { share, .. }
            | Self::DroppedOut { share, .. }
            | Self::CarryForward { share, .. } => share,
        }
    }

    /// Whether this event records a substituted (carried-forward) price.
    pub const fn is_carry_forward(&self) -> bool {
        matches!(self, Self::CarryForward { .. })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnparsablePrice { month, share, raw } => {
                write!(f, "{month}: failed to parse price '{raw}' for share code {share}")
            }
            Self::DroppedOut { month, share } => {
                write!(
                    f,
                    "{month}: share code {share} appears to have dropped out of the market"
                )
            }
            Self::CarryForward {
                month,
                share,
                price,
            } => write!(
                f,
                "{month}: price missing for share code {share}, using last known price {price}"
            ),
        }
    }
}

/// Receiver for [`Diagnostic`] events.
pub trait DiagnosticSink {
    /// Record one event.
    fn record(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn record(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn record(&mut self, diagnostic: Diagnostic) {
        (**self).record(diagnostic);
    }
}

/// Sink that forwards every event to `tracing`.
///
/// Unparsable prices are logged at `debug`; dropped-out shares and
/// carried-forward prices at `info`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn record(&mut self, diagnostic: Diagnostic) {
        match &diagnostic {
            Diagnostic::UnparsablePrice { month, share, raw } => {
                tracing::debug!(%month, share = %share, raw = %raw, "{diagnostic}");
            }
            Diagnostic::DroppedOut { month, share } => {
                tracing::info!(%month, share = %share, "{diagnostic}");
            }
            Diagnostic::CarryForward {
                month,
                share,
                price,
            } => {
                tracing::info!(%month, share = %share, price, "{diagnostic}");
            }
        }
    }
}

/// Sink that sends every event to two sinks.
#[derive(Debug, Default)]
pub struct Tee<A, B>(pub A, pub B);

impl<A: DiagnosticSink, B: DiagnosticSink> DiagnosticSink for Tee<A, B> {
    fn record(&mut self, diagnostic: Diagnostic) {
        self.0.record(diagnostic.clone());
        self.1.record(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aug_2009() -> Month {
        Month::new(2009, 8).unwrap()
    }

    #[test]
    fn test_vec_sink_collects_in_order() {
        let mut sink: Vec<Diagnostic> = Vec::new();
        sink.record(Diagnostic::DroppedOut {
            month: aug_2009(),
            share: "ABC".to_string(),
        });
        sink.record(Diagnostic::CarryForward {
            month: aug_2009(),
            share: "DEF".to_string(),
            price: 12.5,
        });

        assert_eq!(sink.len(), 2);
        assert_eq!(sink[0].share(), "ABC");
        assert!(!sink[0].is_carry_forward());
        assert!(sink[1].is_carry_forward());
    }

    #[test]
    fn test_tee_records_to_both() {
        let mut first: Vec<Diagnostic> = Vec::new();
        let mut second: Vec<Diagnostic> = Vec::new();
        {
            let mut tee = Tee(&mut first, &mut second);
            tee.record(Diagnostic::DroppedOut {
                month: aug_2009(),
                share: "ABC".to_string(),
            });
        }
        assert_eq!(first, second);
        assert_eq!(first.len(), 1);
    }

    #[test]
    fn test_display_mentions_share_and_month() {
        let diagnostic = Diagnostic::UnparsablePrice {
            month: aug_2009(),
            share: "ABC".to_string(),
            raw: "n/a".to_string(),
        };
        let text = diagnostic.to_string();
        assert!(text.contains("Aug-2009"));
        assert!(text.contains("ABC"));
        assert!(text.contains("n/a"));
        assert_eq!(diagnostic.month(), aug_2009());
    }
}
