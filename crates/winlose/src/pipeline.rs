//! Price file in, report file out.
//!
//! The report is built in full before the output file is created, so a run
//! that fails leaves no partial output behind.

use crate::config::RunConfig;
use thiserror::Error;
use winlose_data::{
    DataError, Diagnostic, DiagnosticSink, LogSink, PriceCsvParser, PriceSeries, Tee,
};
use winlose_engine::{EngineError, PerformanceReport, PerformanceReporter, PortfolioBuilder};
use winlose_output::{ExportError, Exporter, PerformanceSummary};

/// Errors that abort a run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Reading or parsing the price file failed
    #[error(transparent)]
    Data(#[from] DataError),

    /// Building the portfolio or report failed
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Writing the report failed
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// The performance report, including its selection
    pub report: PerformanceReport,
    /// Every recoverable event raised along the way
    pub diagnostics: Vec<Diagnostic>,
}

impl RunOutcome {
    /// Per-share totals of the report.
    pub fn summary(&self) -> PerformanceSummary {
        PerformanceSummary::from_report(&self.report)
    }

    /// Number of prices that were carried forward.
    pub fn carried_forward(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.is_carry_forward())
            .count()
    }
}

/// Pick winners and losers from a parsed series and report on them.
///
/// # Errors
///
/// Returns [`PipelineError::Engine`] if the start month is not in the series
/// or a return cannot be computed.
pub fn analyze(
    series: &PriceSeries,
    config: &RunConfig,
    sink: &mut impl DiagnosticSink,
) -> Result<PerformanceReport, PipelineError> {
    let selection = PortfolioBuilder::new(config.portfolio_params()).build(
        series,
        config.start_month,
        sink,
    )?;
    tracing::info!(
        "Winners: {:?}, losers: {:?}",
        selection.winners,
        selection.losers
    );

    let report = PerformanceReporter::new(config.report_params()).build(
        series,
        &selection,
        config.start_month,
        sink,
    )?;
    Ok(report)
}

/// Run end to end: parse `config.input`, analyze, write `config.output`.
///
/// Diagnostics are logged through `tracing` as they happen and also
/// collected into the outcome.
///
/// # Errors
///
/// Returns the first error from parsing, analysis or export.
pub fn run(config: &RunConfig) -> Result<RunOutcome, PipelineError> {
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    let mut sink = Tee(LogSink, &mut diagnostics);

    let series =
        PriceCsvParser::new(config.date_format.as_str()).parse_file(&config.input, &mut sink)?;
    let report = analyze(&series, config, &mut sink)?;

    if !config.format.matches_path(&config.output) {
        tracing::warn!(
            "Output file {} does not end in .{} for {} format",
            config.output.display(),
            config.format.extension(),
            config.format
        );
    }
    tracing::info!("Writing output to file {}", config.output.display());
    report.export_to_file(&config.output, config.format)?;

    Ok(RunOutcome {
        report,
        diagnostics,
    })
}
