//! Grouping of search results by source domain
//!
//! - `domain`: extracting the domain a result link points at
//! - `clusterer`: building per-domain clusters in first-seen order

mod clusterer;
mod domain;

pub use clusterer::{cluster_results, Cluster, SearchResult};
pub use domain::extract_domain;
