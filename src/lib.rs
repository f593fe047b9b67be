//! Autosuggest Explorer: maps how an autocomplete service completes a word
//!
//! This crate enumerates a base word extended by one or two alphabet letters,
//! asks an autocomplete endpoint for suggestions on each candidate, fetches the
//! search results behind every suggestion and clusters them by domain. The work
//! is driven one step at a time through a pausable [`job::JobController`].

pub mod cluster;
pub mod config;
pub mod enumerate;
pub mod export;
pub mod fetch;
pub mod job;

use thiserror::Error;

/// Main error type for Autosuggest Explorer operations
#[derive(Debug, Error)]
pub enum ExplorerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Job error: {0}")]
    Job(#[from] JobError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Export error: {0}")]
    Export(#[from] export::ExportError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors reported by a single outbound call to an external endpoint
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// Network failure, timeout, non-2xx status or unparseable body
    #[error("Transient failure for {url}: {message}")]
    Transient { url: String, message: String },

    /// The endpoint explicitly throttled us (HTTP 429)
    #[error("Rate limited by {url}")]
    RateLimited { url: String },
}

/// Errors reported by job controller operations
///
/// None of these are fatal: the job state is left exactly as it was before
/// the failing call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JobError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Job is not running")]
    NotRunning,

    #[error("Job is not paused")]
    NotPaused,

    #[error("Job is not complete")]
    JobNotComplete,

    #[error("Transient error: {0}")]
    TransientError(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),
}

impl From<FetchError> for JobError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Transient { .. } => JobError::TransientError(err.to_string()),
            FetchError::RateLimited { .. } => JobError::RateLimited(err.to_string()),
        }
    }
}

/// Result type alias for Autosuggest Explorer operations
pub type Result<T> = std::result::Result<T, ExplorerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for external calls
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Result type alias for job controller operations
pub type JobResult<T> = std::result::Result<T, JobError>;

// Re-export commonly used types
pub use cluster::{cluster_results, extract_domain, Cluster, SearchResult};
pub use config::Config;
pub use enumerate::{Candidate, CandidateEnumerator};
pub use job::{JobController, JobSnapshot, JobStatus, StepReport, StepStatus, SuggestionEntry};
