//! CSV export of accumulated job output

use crate::export::{ExportError, ExportResult};
use crate::job::ProcessedCandidate;
use serde::Serialize;
use std::io::Write;

/// Column order of the exported table
pub const CSV_COLUMNS: [&str; 7] = [
    "query",
    "suggestion",
    "domain",
    "cluster_size",
    "title",
    "link",
    "snippet",
];

/// One (candidate, suggestion, domain, result) row
///
/// Field order defines the CSV header and must match [`CSV_COLUMNS`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRow<'a> {
    pub query: &'a str,
    pub suggestion: &'a str,
    pub domain: &'a str,
    pub cluster_size: usize,
    pub title: &'a str,
    pub link: &'a str,
    pub snippet: &'a str,
}

/// Flattens accumulated output into rows, in processing order
///
/// Candidates without suggestions and suggestions without results produce no
/// rows.
pub fn export_rows(processed: &[ProcessedCandidate]) -> impl Iterator<Item = ExportRow<'_>> {
    processed.iter().flat_map(|item| {
        item.entries.iter().flat_map(move |entry| {
            entry.clusters.iter().flat_map(move |cluster| {
                cluster.results.iter().map(move |result| ExportRow {
                    query: &item.candidate.text,
                    suggestion: &entry.suggestion,
                    domain: &cluster.domain,
                    cluster_size: cluster.cluster_size,
                    title: &result.title,
                    link: &result.link,
                    snippet: &result.snippet,
                })
            })
        })
    })
}

/// Writes the accumulated output as CSV into `writer` and hands it back
///
/// The header row is always written, even when there are no rows.
pub fn write_csv<W: Write>(processed: &[ProcessedCandidate], writer: W) -> ExportResult<W> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv_writer.write_record(CSV_COLUMNS)?;
    for row in export_rows(processed) {
        csv_writer.serialize(row)?;
    }

    csv_writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))
}
