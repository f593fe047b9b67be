//! Outbound calls to the external autocomplete and search endpoints
//!
//! This module contains:
//! - The collaborator traits the job controller depends on
//! - HTTP client construction with timeouts and user agent
//! - The autocomplete client and its JSON payload parsing
//! - The search result fetcher and its HTML result parsing
//!
//! Every call is a single request. Nothing here retries: failures are
//! classified into [`FetchError`](crate::FetchError) and handed back to the
//! caller.

mod client;
mod search;
mod suggest;
mod traits;

pub use client::{build_http_client, format_user_agent};
pub use search::{parse_search_results, HttpResultFetcher};
pub use suggest::{parse_suggestions, HttpSuggestionClient};
pub use traits::{ResultFetcher, SuggestionClient};
