//! CSV price file parsing.
//!
//! Input files have a header row of share codes (the first cell is ignored,
//! it usually says `Date`) followed by one row per month:
//!
//! ```text
//! Date,ABC,DEF,GHI
//! Aug-09,123.001,456.5,
//! Sep-09,125.2,n/a,78.0
//! ```
//!
//! Empty cells mean the share has no price that month. Cells that are not
//! numbers are dropped and reported as [`Diagnostic::UnparsablePrice`].

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::{DataError, Result};
use crate::month::Month;
use crate::series::{PriceSeries, ShareUniverse, Snapshot};
use csv::StringRecord;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Default date format for the first column, e.g. `Mar-09`.
pub const DEFAULT_DATE_FORMAT: &str = "%b-%y";

/// Parser for monthly price CSV files.
#[derive(Debug, Clone)]
pub struct PriceCsvParser {
    date_format: String,
}

impl Default for PriceCsvParser {
    fn default() -> Self {
        Self::new(DEFAULT_DATE_FORMAT)
    }
}

impl PriceCsvParser {
    /// Create a parser using a chrono date format for the first column.
    pub fn new(date_format: impl Into<String>) -> Self {
        Self {
            date_format: date_format.into(),
        }
    }

    /// Date format in use.
    pub fn date_format(&self) -> &str {
        &self.date_format
    }

    /// Parse a CSV file from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or the contents are not
    /// a valid price file.
    pub fn parse_file(
        &self,
        path: impl AsRef<Path>,
        sink: &mut impl DiagnosticSink,
    ) -> Result<PriceSeries> {
        let path = path.as_ref();
        tracing::info!("Opening CSV file {}", path.display());

        let file = File::open(path).map_err(|source| DataError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let series = self.parse_reader(file, sink)?;

        tracing::info!(
            "Successfully parsed CSV file {}. Found {} dates and {} share codes",
            path.display(),
            series.len(),
            series.universe().len()
        );
        if let (Some(first), Some(last)) = (series.first_month(), series.last_month()) {
            tracing::info!("Prices run from {} to {}", first, last);
        }
        Ok(series)
    }

    /// Parse CSV content from any reader.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::EmptyInput`] if there is no header row,
    /// [`DataError::InvalidDate`] for a row whose date does not match the
    /// format, and [`DataError::DuplicateMonth`] if two rows share a month.
    pub fn parse_reader<R: Read>(
        &self,
        reader: R,
        sink: &mut impl DiagnosticSink,
    ) -> Result<PriceSeries> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);
        let mut records = csv_reader.records();

        let header = records.next().ok_or(DataError::EmptyInput)??;
        let universe = parse_header(&header);
        tracing::debug!("Share codes: {:?}", universe.shares());

        let mut snapshots = Vec::new();
        for record in records {
            let record = record?;
            if record.iter().all(|cell| cell.trim().is_empty()) {
                tracing::debug!("Skipping blank row at {:?}", record.position());
                continue;
            }
            let snapshot = self.parse_row(&record, &universe, sink)?;
            tracing::debug!(
                "Parsed {} prices for {}",
                snapshot.len(),
                snapshot.month()
            );
            snapshots.push(snapshot);
        }

        PriceSeries::new(universe, snapshots)
    }

    /// Parse one `date,price1,price2,...` row.
    ///
    /// Prices are matched to share codes by position. Empty cells are
    /// skipped; cells that fail numeric conversion are reported to `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::InvalidDate`] if the first cell is not a date in
    /// this parser's format.
    pub fn parse_row(
        &self,
        record: &StringRecord,
        universe: &ShareUniverse,
        sink: &mut impl DiagnosticSink,
    ) -> Result<Snapshot> {
        let month = Month::parse(record.get(0).unwrap_or_default(), &self.date_format)?;

        let mut prices = BTreeMap::new();
        for (share, cell) in universe.iter().zip(record.iter().skip(1)) {
            let cell = cell.trim();
            if cell.is_empty() {
                continue;
            }
            match cell.parse::<f64>() {
                Ok(price) => {
                    prices.insert(share.clone(), price);
                }
                Err(_) => sink.record(Diagnostic::UnparsablePrice {
                    month,
                    share: share.clone(),
                    raw: cell.to_string(),
                }),
            }
        }

        Ok(Snapshot::new(month, prices))
    }
}

/// Extract share codes from the header row.
///
/// The first cell is ignored; the remaining cells are trimmed.
pub fn parse_header(record: &StringRecord) -> ShareUniverse {
    record.iter().skip(1).map(str::trim).collect()
}
