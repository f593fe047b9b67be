use crate::cluster::domain::extract_domain;
use std::collections::HashMap;

/// A single organic search result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub title: String,
    pub link: String,
    pub snippet: String,
}

/// Search results under one suggestion that share a source domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    pub domain: String,

    /// Number of results in this cluster; always equals `results.len()`
    pub cluster_size: usize,

    /// Results in the order the search endpoint returned them
    pub results: Vec<SearchResult>,
}

/// Groups results by the domain of their link
///
/// Clusters are ordered by the first appearance of their domain, and results
/// keep their original relative order inside a cluster. An empty input
/// yields no clusters.
pub fn cluster_results(results: Vec<SearchResult>) -> Vec<Cluster> {
    let mut clusters: Vec<Cluster> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for result in results {
        let domain = extract_domain(&result.link);
        match positions.get(&domain) {
            Some(&pos) => {
                let cluster = &mut clusters[pos];
                cluster.results.push(result);
                cluster.cluster_size += 1;
            }
            None => {
                positions.insert(domain.clone(), clusters.len());
                clusters.push(Cluster {
                    domain,
                    cluster_size: 1,
                    results: vec![result],
                });
            }
        }
    }

    clusters
}
