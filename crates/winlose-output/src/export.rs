//! CSV and JSON export of selections and performance reports.
//!
//! The CSV form of a [`PerformanceReport`] is the tabular report: a header
//! row from [`PerformanceReport::header`] and one row per month with the
//! date formatted `Mon-YYYY`. The JSON forms serialize the full structures.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use winlose_engine::{PerformanceReport, Selection, ShareRole};

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialized CSV was not valid UTF-8.
    #[error("CSV output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Unknown format name.
    #[error("Invalid format: {0} (expected csv, json or pretty-json)")]
    InvalidFormat(String),
}

/// Export format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportFormat {
    /// Comma-separated values format.
    #[default]
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }

    /// Whether `path` carries this format's extension (case-insensitive).
    pub fn matches_path(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(self.extension()))
    }

    /// Name accepted by [`FromStr`].
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::PrettyJson => "pretty-json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "pretty-json" | "pretty_json" | "prettyjson" => Ok(Self::PrettyJson),
            other => Err(ExportError::InvalidFormat(other.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// The content is fully serialized before the file is created, so a
    /// serialization failure leaves no file behind.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String, ExportError> {
    if pretty {
        Ok(serde_json::to_string_pretty(value)?)
    } else {
        Ok(serde_json::to_string(value)?)
    }
}

fn into_string(wtr: csv::Writer<Vec<u8>>) -> Result<String, ExportError> {
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

impl Exporter for PerformanceReport {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut wtr = csv::Writer::from_writer(vec![]);
                wtr.write_record(self.header())?;
                for row in &self.rows {
                    let mut record = Vec::with_capacity(1 + row.shares.len() * 3 + 2);
                    record.push(row.label());
                    record.extend(row.values().iter().map(f64::to_string));
                    wtr.write_record(&record)?;
                }
                into_string(wtr)
            }
            ExportFormat::Json => to_json(self, false),
            ExportFormat::PrettyJson => to_json(self, true),
        }
    }
}

/// One picked share, flattened for CSV.
#[derive(Debug, Serialize)]
struct SelectionRecord<'a> {
    start_month: String,
    role: ShareRole,
    share: &'a str,
    cumulative_residual: Option<f64>,
}

impl Exporter for Selection {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut wtr = csv::Writer::from_writer(vec![]);
                for (role, share) in self.shares() {
                    wtr.serialize(SelectionRecord {
                        start_month: self.start_month.to_string(),
                        role,
                        share,
                        cumulative_residual: self.cumulative_residual(share),
                    })?;
                }
                into_string(wtr)
            }
            ExportFormat::Json => to_json(self, false),
            ExportFormat::PrettyJson => to_json(self, true),
        }
    }
}
