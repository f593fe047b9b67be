//! Export module for job reports
//!
//! This module handles:
//! - Flattening accumulated output into CSV rows
//! - Summarizing a job's output
//! - Rendering a markdown report of the summary
//! - Naming export files

mod csv_export;
mod markdown;
mod summary;

pub use csv_export::{export_rows, write_csv, ExportRow, CSV_COLUMNS};
pub use markdown::{format_markdown_report, write_markdown_report};
pub use summary::{print_summary, summarize, DomainCount, JobSummary};

use chrono::{DateTime, TimeZone};
use std::fmt::Display;
use thiserror::Error;

/// Errors that can occur while exporting
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for export operations
pub type ExportResult<T> = Result<T, ExportError>;

/// Builds a timestamped export file name such as `suggestions_20240101_120000.csv`
pub fn export_file_name<Tz>(prefix: &str, extension: &str, at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!("{}_{}.{}", prefix, at.format("%Y%m%d_%H%M%S"), extension)
}
