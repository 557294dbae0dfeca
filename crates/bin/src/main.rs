//! winlose CLI binary.
//!
//! Picks momentum winners and losers from a CSV of monthly share prices and
//! writes their subsequent performance to a report file.

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use winlose::data::{DEFAULT_DATE_FORMAT, Month};
use winlose::engine::{MarketReturn, SelectionSize};
use winlose::output::ExportFormat;
use winlose::{RunConfig, pipeline};

#[derive(Debug, Parser)]
#[command(name = "winlose")]
#[command(about = "Pick momentum winners and losers from monthly share prices", long_about = None)]
#[command(version)]
struct Cli {
    /// CSV of monthly prices: a header of share codes, then one row per month
    input_file: PathBuf,

    /// Report file to write
    output_file: PathBuf,

    /// Month to form the portfolio for (MM/YYYY)
    start_date: Month,

    /// Months to look back when ranking shares
    portfolio_months: usize,

    /// Number of winners and of losers to pick
    n: usize,

    /// Date format of the CSV's first column (e.g. 'Mar-09' is %b-%y, '10/2005' is %m/%Y)
    #[arg(short, long = "dateformat", default_value = DEFAULT_DATE_FORMAT)]
    dateformat: String,

    /// Choose N% of shares as winners and losers
    #[arg(short, long)]
    percentage: bool,

    /// Months of data to output [default: portfolio_months]
    #[arg(short, long)]
    months: Option<usize>,

    /// Use market total % return to calculate residuals (default: market average % return)
    #[arg(short, long = "totalreturn")]
    totalreturn: bool,

    /// Report format: csv, json or pretty-json
    #[arg(short, long, default_value = "csv")]
    format: ExportFormat,

    /// Don't print the summary table
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn into_config(self) -> RunConfig {
        let mut config = RunConfig::new(self.input_file, self.output_file, self.start_date);
        config.date_format = self.dateformat;
        config.lookback_months = self.portfolio_months;
        config.output_months = self.months;
        config.selection = if self.percentage {
            SelectionSize::Percent(self.n)
        } else {
            SelectionSize::Fixed(self.n)
        };
        config.market_return = if self.totalreturn {
            MarketReturn::Total
        } else {
            MarketReturn::Average
        };
        config.format = self.format;
        config
    }
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.kind() == ErrorKind::MissingRequiredArgument => {
            Cli::command().print_help()?;
            return Ok(());
        }
        Err(e) => e.exit(),
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let quiet = cli.quiet;
    let config = cli.into_config();
    tracing::info!(
        "Forming portfolio for {} from {} months of {} using {:?} picks",
        config.start_month,
        config.lookback_months,
        config.input.display(),
        config.selection
    );

    let outcome = pipeline::run(&config)?;

    if !quiet {
        println!("{}", outcome.summary().to_ascii_table());
    }
    tracing::info!(
        "Wrote {} months to {} ({} prices carried forward)",
        outcome.report.len(),
        config.output.display(),
        outcome.carried_forward()
    );

    Ok(())
}
