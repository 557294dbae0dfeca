//! Parallel portfolio builds over many start months.

use crate::error::Result;
use crate::portfolio::PortfolioBuilder;
use crate::selection::Selection;
use rayon::prelude::*;
use winlose_data::{Diagnostic, Month, PriceSeries};

/// Result of one build in a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome {
    /// Start month the build was run for
    pub start_month: Month,
    /// Selection, or the error that stopped this build
    pub result: Result<Selection>,
    /// Events raised by this build only
    pub diagnostics: Vec<Diagnostic>,
}

/// Build one portfolio per start month in parallel.
///
/// Builds share the series read-only and never affect each other; a failing
/// month does not stop the rest. Outcomes are in the order of `start_months`.
pub fn build_portfolios(
    series: &PriceSeries,
    start_months: &[Month],
    builder: &PortfolioBuilder,
) -> Vec<BatchOutcome> {
    tracing::info!("Building {} portfolios", start_months.len());

    start_months
        .par_iter()
        .map(|&start_month| {
            let mut diagnostics: Vec<Diagnostic> = Vec::new();
            let result = builder.build(series, start_month, &mut diagnostics);
            BatchOutcome {
                start_month,
                result,
                diagnostics,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::portfolio::PortfolioParams;
    use crate::selection::SelectionSize;
    use winlose_data::{ShareUniverse, Snapshot};

    fn month(m: u32) -> Month {
        Month::new(2010, m).unwrap()
    }

    fn series() -> PriceSeries {
        let universe: ShareUniverse = ["A", "B"].into_iter().collect();
        let prices = [
            (100.0, 100.0),
            (110.0, 90.0),
            (99.0, 99.0),
            (120.0, 80.0),
            (100.0, 100.0),
        ];
        let snapshots = prices
            .iter()
            .zip(1..)
            .map(|(&(a, b), m)| {
                Snapshot::new(
                    month(m),
                    [("A".to_string(), a), ("B".to_string(), b)]
                        .into_iter()
                        .collect(),
                )
            })
            .collect();
        PriceSeries::new(universe, snapshots).unwrap()
    }

    #[test]
    fn test_batch_matches_sequential_builds() {
        let s = series();
        let builder = PortfolioBuilder::new(PortfolioParams {
            lookback_months: 2,
            selection: SelectionSize::Fixed(1),
            ..PortfolioParams::default()
        });
        let months = [month(5), month(3), month(4)];

        let outcomes = build_portfolios(&s, &months, &builder);

        assert_eq!(outcomes.len(), 3);
        for (outcome, &m) in outcomes.iter().zip(&months) {
            assert_eq!(outcome.start_month, m);
            let mut sink: Vec<Diagnostic> = Vec::new();
            let expected = builder.build(&s, m, &mut sink);
            assert_eq!(outcome.result, expected);
            assert_eq!(outcome.diagnostics, sink);
        }
    }

    #[test]
    fn test_failed_month_does_not_stop_batch() {
        let s = series();
        let builder = PortfolioBuilder::default();
        let outcomes = build_portfolios(&s, &[month(2), month(11)], &builder);

        assert!(outcomes[0].result.is_ok());
        assert_eq!(
            outcomes[1].result,
            Err(EngineError::DateNotFound(month(11)))
        );
    }
}
