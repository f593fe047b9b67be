//! Summary statistics over accumulated job output

use crate::job::ProcessedCandidate;
use std::collections::HashMap;

/// Number of search results seen for one domain across the whole job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainCount {
    pub domain: String,
    pub results: usize,
}

/// Job summary statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobSummary {
    /// Candidates whose step has been committed
    pub candidates_processed: usize,

    /// Candidates for which the autocomplete service returned anything
    pub candidates_with_suggestions: usize,

    /// Suggestions expanded across all candidates
    pub suggestions: usize,

    /// Search results across all suggestions
    pub results: usize,

    pub unique_domains: usize,

    /// Domains ordered by result count (descending), ties by name
    pub top_domains: Vec<DomainCount>,
}

/// Number of domains kept in [`JobSummary::top_domains`]
const TOP_DOMAINS: usize = 10;

impl JobSummary {
    /// Share of processed candidates that produced suggestions, as a percentage
    pub fn hit_rate(&self) -> f64 {
        if self.candidates_processed == 0 {
            return 0.0;
        }
        (self.candidates_with_suggestions as f64 / self.candidates_processed as f64) * 100.0
    }
}

/// Computes summary statistics for the given output
pub fn summarize(processed: &[ProcessedCandidate]) -> JobSummary {
    let mut summary = JobSummary {
        candidates_processed: processed.len(),
        ..JobSummary::default()
    };
    let mut per_domain: HashMap<&str, usize> = HashMap::new();

    for item in processed {
        if !item.entries.is_empty() {
            summary.candidates_with_suggestions += 1;
        }
        summary.suggestions += item.entries.len();

        for entry in &item.entries {
            for cluster in &entry.clusters {
                summary.results += cluster.cluster_size;
                *per_domain.entry(cluster.domain.as_str()).or_default() += cluster.cluster_size;
            }
        }
    }

    summary.unique_domains = per_domain.len();

    let mut domains: Vec<DomainCount> = per_domain
        .into_iter()
        .map(|(domain, results)| DomainCount {
            domain: domain.to_string(),
            results,
        })
        .collect();
    domains.sort_by(|a, b| b.results.cmp(&a.results).then_with(|| a.domain.cmp(&b.domain)));
    domains.truncate(TOP_DOMAINS);
    summary.top_domains = domains;

    summary
}

/// Prints a summary to stdout in a formatted manner
pub fn print_summary(summary: &JobSummary) {
    println!("=== Job Summary ===\n");

    println!("Overview:");
    println!("  Candidates processed: {}", summary.candidates_processed);
    println!(
        "  Candidates with suggestions: {} ({:.1}%)",
        summary.candidates_with_suggestions,
        summary.hit_rate()
    );
    println!("  Suggestions expanded: {}", summary.suggestions);
    println!("  Search results: {}", summary.results);
    println!("  Unique domains: {}", summary.unique_domains);
    println!();

    if !summary.top_domains.is_empty() {
        println!("Top Domains:");
        for entry in &summary.top_domains {
            println!("  - {} ({} results)", entry.domain, entry.results);
        }
        println!();
    }
}
