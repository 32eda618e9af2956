#![warn(missing_docs)]
//! Leibniz Report - Result Records and Output Formats
//!
//! Defines the records streamed out of a sweep and renders them as:
//! - JSON (machine-readable, complete report)
//! - CSV (spreadsheet-compatible, streamable)
//!
//! Human-readable tables are rendered by the CLI.

mod csv;
mod json;
mod report;

pub use csv::{CSV_HEADER, csv_row};
pub use json::{generate_json_report, parse_json_report};
pub use report::{
    ConfigRecord, ConfigResult, ConfigStatus, ConfigSummary, FailureInfo, Report, ReportMeta,
    ReportSummary, RunnerSettings, SystemInfo, TrialRecord,
};

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON with full schema
    Json,
    /// CSV for spreadsheets
    Csv,
    /// Human-readable terminal table
    Human,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "human" | "text" | "table" => Ok(OutputFormat::Human),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}
