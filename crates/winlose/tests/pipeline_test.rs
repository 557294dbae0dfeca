//! End-to-end runs from a price file on disk.

use std::fs;
use std::path::PathBuf;
use winlose::engine::{MarketReturn, SelectionSize};
use winlose::output::ExportFormat;
use winlose::{PipelineError, RunConfig, pipeline};

const PRICES: &str = "\
Date,A,B,C,D
Jan-09,100,100,50,20
Feb-09,110,90,50,21
Mar-09,121,81,,22
Apr-09,108.9,89.1,55,23
May-09,100,100,60,23
Jun-09,110,95,60,24
";

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("winlose_pipeline_{}_{name}", std::process::id()))
}

#[test]
fn test_run_writes_csv_report() {
    let input = temp_path("prices.csv");
    let output = temp_path("report.csv");
    fs::write(&input, PRICES).unwrap();

    let mut config = RunConfig::new(&input, &output, "04/2009".parse().unwrap());
    config.lookback_months = 3;
    config.selection = SelectionSize::Fixed(1);

    let outcome = pipeline::run(&config).unwrap();
    let content = fs::read_to_string(&output).unwrap();
    fs::remove_file(&input).ok();
    fs::remove_file(&output).ok();

    assert_eq!(outcome.report.selection.winners, vec!["A"]);
    assert_eq!(outcome.report.selection.losers, vec!["B"]);
    // C is missing in March and carried forward during ranking.
    assert!(outcome.carried_forward() > 0);

    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(
        lines[0],
        "Date,Market average return (%),Market total return (%),\
         Winner [A] absolute return,Winner [A] % return,Winner [A] % residual,\
         Loser [B] absolute return,Loser [B] % return,Loser [B] % residual"
    );
    assert!(lines[1].starts_with("Apr-2009,"));
    assert!(lines[2].starts_with("May-2009,"));
    assert_eq!(lines.len(), 3);

    let summary = outcome.summary();
    assert_eq!(summary.months, 2);
}

#[test]
fn test_run_writes_json_with_total_estimator() {
    let input = temp_path("prices_json.csv");
    let output = temp_path("report.json");
    fs::write(&input, PRICES).unwrap();

    let mut config = RunConfig::new(&input, &output, "03/2009".parse().unwrap());
    config.lookback_months = 2;
    config.output_months = Some(1);
    config.selection = SelectionSize::Percent(25);
    config.market_return = MarketReturn::Total;
    config.format = ExportFormat::Json;

    let outcome = pipeline::run(&config).unwrap();
    let content = fs::read_to_string(&output).unwrap();
    fs::remove_file(&input).ok();
    fs::remove_file(&output).ok();

    assert_eq!(outcome.report.len(), 1);
    assert!(content.contains("\"market_return\":\"total\""));
    assert!(content.contains("\"rows\""));
}

#[test]
fn test_failed_run_writes_nothing() {
    let input = temp_path("prices_fail.csv");
    let output = temp_path("report_fail.csv");
    fs::write(&input, PRICES).unwrap();

    let config = RunConfig::new(&input, &output, "12/2010".parse().unwrap());
    let err = pipeline::run(&config).unwrap_err();
    fs::remove_file(&input).ok();

    assert!(matches!(err, PipelineError::Engine(_)));
    assert!(!output.exists());
}
