//! Collaborator traits consumed by the job controller
//!
//! Both endpoints are treated as untrusted, slow and rate limited. The
//! controller only ever sees these traits, so tests can substitute scripted
//! implementations for the HTTP ones.

use crate::cluster::SearchResult;
use crate::FetchResult;
use async_trait::async_trait;

/// Source of autocomplete suggestions
#[async_trait]
pub trait SuggestionClient: Send + Sync {
    /// Returns the suggestions for `candidate`, best ranked first
    ///
    /// Performs exactly one outbound call.
    async fn fetch(&self, candidate: &str) -> FetchResult<Vec<String>>;
}

/// Source of web search results
#[async_trait]
pub trait ResultFetcher: Send + Sync {
    /// Returns the organic results for `suggestion` in page order
    ///
    /// Performs exactly one outbound call. An empty list is a valid answer.
    async fn fetch(&self, suggestion: &str) -> FetchResult<Vec<SearchResult>>;
}
