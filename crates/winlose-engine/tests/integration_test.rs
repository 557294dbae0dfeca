//! Integration tests for portfolio construction and reporting.

use approx::assert_relative_eq;
use winlose_data::{Diagnostic, Month, PriceCsvParser, PriceSeries};
use winlose_engine::{
    MarketReturn, PerformanceReporter, PortfolioBuilder, PortfolioParams, ReportParams,
    SelectionSize, ShareRole, build_portfolios,
};

const PRICES: &str = "\
Date,A,B,C,D
Jan-09,100,100,50,20
Feb-09,110,90,50,21
Mar-09,121,81,,22
Apr-09,108.9,89.1,55,n/a
May-09,100,100,60,23
Jun-09,110,95,60,24
";

fn series(sink: &mut Vec<Diagnostic>) -> PriceSeries {
    PriceCsvParser::default()
        .parse_reader(PRICES.as_bytes(), sink)
        .unwrap()
}

fn month(m: u32) -> Month {
    Month::new(2009, m).unwrap()
}

#[test]
fn test_full_portfolio_workflow() {
    let mut sink = Vec::new();
    let series = series(&mut sink);
    assert_eq!(series.len(), 6);
    assert_eq!(
        sink,
        vec![Diagnostic::UnparsablePrice {
            month: month(4),
            share: "D".to_string(),
            raw: "n/a".to_string(),
        }]
    );

    let start = month(4);
    let selection = PortfolioBuilder::new(PortfolioParams {
        lookback_months: 3,
        selection: SelectionSize::Fixed(1),
        market_return: MarketReturn::Average,
    })
    .build(&series, start, &mut sink)
    .unwrap();

    assert_eq!(selection.winners, vec!["A"]);
    assert_eq!(selection.losers, vec!["B"]);
    assert_eq!(selection.ranking.len(), 4);

    let report = PerformanceReporter::new(ReportParams {
        output_months: 3,
        market_return: MarketReturn::Average,
    })
    .build(&series, &selection, start, &mut sink)
    .unwrap();

    // Apr, May, Jun minus the series' final month
    let months: Vec<Month> = report.rows.iter().map(|row| row.month).collect();
    assert_eq!(months, vec![month(4), month(5)]);

    let april = &report.rows[0];
    assert_eq!(april.shares[0].role, ShareRole::Winner);
    assert_relative_eq!(april.shares[0].percent_return, -10.0, epsilon = 1e-9);
    assert_relative_eq!(april.shares[1].percent_return, 10.0, epsilon = 1e-9);
    assert_eq!(report.header().len(), 3 + 2 * 3);
    assert_eq!(april.values().len(), report.header().len() - 1);
}

#[test]
fn test_carried_forward_prices_are_flagged() {
    let mut sink = Vec::new();
    let series = series(&mut sink);

    // C has no price in March.
    let selection = PortfolioBuilder::new(PortfolioParams {
        lookback_months: 1,
        selection: SelectionSize::Percent(50),
        market_return: MarketReturn::Total,
    })
    .build(&series, month(2), &mut sink)
    .unwrap();
    assert_eq!(selection.len(), 4);

    sink.clear();
    let report = PerformanceReporter::new(ReportParams {
        output_months: 2,
        market_return: MarketReturn::Total,
    })
    .build(&series, &selection, month(2), &mut sink)
    .unwrap();

    let march = &report.rows[1];
    for share in march.shares.iter().filter(|s| s.share == "C") {
        assert!(share.carried_forward);
        assert_eq!(share.percent_return, 0.0);
    }
    assert!(sink.iter().any(|d| d.is_carry_forward() && d.share() == "C"));
}

#[test]
fn test_batch_over_every_month() {
    let mut sink = Vec::new();
    let series = series(&mut sink);
    let months: Vec<Month> = series.months().collect();

    let outcomes = build_portfolios(&series, &months, &PortfolioBuilder::default());

    assert_eq!(outcomes.len(), months.len());
    assert!(outcomes.iter().all(|o| o.result.is_ok()));
}
