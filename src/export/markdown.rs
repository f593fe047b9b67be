//! Markdown report generation
//!
//! Renders a human-readable report of a job: the summary statistics followed
//! by every candidate that produced suggestions, with its domain clusters.

use crate::export::summary::JobSummary;
use crate::export::ExportResult;
use crate::job::ProcessedCandidate;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes a markdown report to `output_path`
pub fn write_markdown_report(
    title: &str,
    summary: &JobSummary,
    processed: &[ProcessedCandidate],
    output_path: &Path,
) -> ExportResult<()> {
    let markdown = format_markdown_report(title, summary, processed);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a job report as markdown
pub fn format_markdown_report(
    title: &str,
    summary: &JobSummary,
    processed: &[ProcessedCandidate],
) -> String {
    let mut md = String::new();

    md.push_str(&format!("# {}\n\n", title));

    md.push_str("## Overview\n\n");
    md.push_str(&format!(
        "- **Candidates processed**: {}\n",
        summary.candidates_processed
    ));
    md.push_str(&format!(
        "- **Candidates with suggestions**: {} ({:.1}%)\n",
        summary.candidates_with_suggestions,
        summary.hit_rate()
    ));
    md.push_str(&format!("- **Suggestions**: {}\n", summary.suggestions));
    md.push_str(&format!("- **Search results**: {}\n", summary.results));
    md.push_str(&format!("- **Unique domains**: {}\n\n", summary.unique_domains));

    if !summary.top_domains.is_empty() {
        md.push_str("## Top Domains\n\n");
        md.push_str("| Domain | Results |\n");
        md.push_str("|--------|---------|\n");
        for entry in &summary.top_domains {
            md.push_str(&format!(
                "| {} | {} |\n",
                escape_cell(&entry.domain),
                entry.results
            ));
        }
        md.push('\n');
    }

    md.push_str("## Suggestions\n\n");
    let mut any = false;
    for item in processed.iter().filter(|item| !item.entries.is_empty()) {
        any = true;
        md.push_str(&format!("### {}\n\n", item.candidate.text));
        for entry in &item.entries {
            md.push_str(&format!("{}. **{}**", entry.rank, entry.suggestion));
            if entry.clusters.is_empty() {
                md.push_str(" (no results)\n");
                continue;
            }
            md.push('\n');
            for cluster in &entry.clusters {
                md.push_str(&format!(
                    "   - {} ({})\n",
                    cluster.domain, cluster.cluster_size
                ));
            }
        }
        md.push('\n');
    }

    if !any {
        md.push_str("_No suggestions were returned._\n");
    }

    md
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
