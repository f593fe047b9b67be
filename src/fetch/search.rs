//! Web search result fetcher and HTML result extraction

use crate::cluster::SearchResult;
use crate::config::EndpointConfig;
use crate::fetch::client::get_text;
use crate::fetch::traits::ResultFetcher;
use crate::FetchResult;
use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use url::Url;

const RESULT_CONTAINER: &str = "div.g";
const RESULT_TITLE: &str = "h3";
const RESULT_LINK: &str = "a[href]";
const RESULT_SNIPPET: &str = "div.VwiC3b";

/// Snippet used when a result carries no description
pub const MISSING_SNIPPET: &str = "No description available";

/// Fetches a search results page and extracts its organic results
///
/// Request: `GET {search-url}?q={suggestion}&hl={language}`.
#[derive(Debug, Clone)]
pub struct HttpResultFetcher {
    client: Client,
    endpoint: Url,
    language: String,
    max_results: usize,
}

impl HttpResultFetcher {
    pub fn new(client: Client, endpoints: &EndpointConfig) -> Result<Self, url::ParseError> {
        Ok(Self {
            client,
            endpoint: Url::parse(&endpoints.search_url)?,
            language: endpoints.language.clone(),
            max_results: endpoints.max_results_per_suggestion,
        })
    }

    fn request_url(&self, suggestion: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("q", suggestion)
            .append_pair("hl", &self.language);
        url
    }
}

#[async_trait]
impl ResultFetcher for HttpResultFetcher {
    async fn fetch(&self, suggestion: &str) -> FetchResult<Vec<SearchResult>> {
        let url = self.request_url(suggestion);
        tracing::debug!("Fetching search results for '{}'", suggestion);

        let html = get_text(&self.client, url).await?;
        let results = parse_search_results(&html, &self.endpoint, self.max_results);

        tracing::debug!(
            "Extracted {} search results for '{}'",
            results.len(),
            suggestion
        );
        Ok(results)
    }
}

/// Extracts organic results from a search results page
///
/// # Extraction Rules
///
/// - Each `div.g` container is one candidate result
/// - A result needs an `h3` title and an `a[href]` link, otherwise it is skipped
/// - The snippet comes from `div.VwiC3b`, defaulting to [`MISSING_SNIPPET`]
/// - Redirect links of the form `/url?q=<target>` are unwrapped to the target
/// - At most `max_results` results are returned
///
/// # Example
///
/// ```
/// use autosuggest_explorer::fetch::parse_search_results;
/// use url::Url;
///
/// let html = r#"<div class="g"><a href="https://example.com/"><h3>Example</h3></a></div>"#;
/// let base = Url::parse("https://www.google.com/search").unwrap();
/// let results = parse_search_results(html, &base, 5);
/// assert_eq!(results[0].link, "https://example.com/");
/// ```
pub fn parse_search_results(html: &str, base_url: &Url, max_results: usize) -> Vec<SearchResult> {
    let document = Html::parse_document(html);
    let mut results = Vec::new();

    let (Ok(container), Ok(title), Ok(link), Ok(snippet)) = (
        Selector::parse(RESULT_CONTAINER),
        Selector::parse(RESULT_TITLE),
        Selector::parse(RESULT_LINK),
        Selector::parse(RESULT_SNIPPET),
    ) else {
        return results;
    };

    for element in document.select(&container) {
        if results.len() >= max_results {
            break;
        }

        let Some(title_text) = element_text(element, &title) else {
            continue;
        };

        let Some(href) = element
            .select(&link)
            .next()
            .and_then(|a| a.value().attr("href"))
        else {
            continue;
        };

        let Some(resolved) = resolve_result_link(href, base_url) else {
            continue;
        };

        let snippet_text =
            element_text(element, &snippet).unwrap_or_else(|| MISSING_SNIPPET.to_string());

        results.push(SearchResult {
            title: title_text,
            link: resolved,
            snippet: snippet_text,
        });
    }

    results
}

/// Returns the trimmed text of the first matching descendant, if non-empty
fn element_text(element: ElementRef<'_>, selector: &Selector) -> Option<String> {
    element
        .select(selector)
        .next()
        .map(|e| e.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Resolves a result href to an absolute http(s) URL
///
/// Returns None for empty hrefs, fragments and non-web schemes.
fn resolve_result_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let absolute = base_url.join(href).ok()?;

    // Search engines wrap outbound links in a redirect: /url?q=<target>
    if absolute.path() == "/url" {
        let target = absolute
            .query_pairs()
            .find(|(key, _)| key == "q" || key == "url")
            .and_then(|(_, value)| Url::parse(&value).ok());
        if let Some(target) = target {
            return is_web_url(&target).then(|| target.to_string());
        }
    }

    is_web_url(&absolute).then(|| absolute.to_string())
}

fn is_web_url(url: &Url) -> bool {
    url.scheme() == "http" || url.scheme() == "https"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FetchError;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn base_url() -> Url {
        Url::parse("https://www.google.com/search").unwrap()
    }

    fn result_block(href: &str, title: &str, snippet: Option<&str>) -> String {
        let snippet = snippet
            .map(|s| format!(r#"<div class="VwiC3b">{}</div>"#, s))
            .unwrap_or_default();
        format!(
            r#"<div class="g"><a href="{}"><h3>{}</h3></a>{}</div>"#,
            href, title, snippet
        )
    }

    fn page(blocks: &[String]) -> String {
        format!("<html><body>{}</body></html>", blocks.concat())
    }

    #[test]
    fn test_extracts_title_link_and_snippet() {
        let html = page(&[result_block(
            "https://example.com/apple",
            "Apple facts",
            Some("All about apples"),
        )]);
        let results = parse_search_results(&html, &base_url(), 5);

        assert_eq!(
            results,
            vec![SearchResult {
                title: "Apple facts".to_string(),
                link: "https://example.com/apple".to_string(),
                snippet: "All about apples".to_string(),
            }]
        );
    }

    #[test]
    fn test_missing_snippet_uses_placeholder() {
        let html = page(&[result_block("https://example.com/", "Title", None)]);
        let results = parse_search_results(&html, &base_url(), 5);
        assert_eq!(results[0].snippet, MISSING_SNIPPET);
    }

    #[test]
    fn test_skips_blocks_without_title_or_link() {
        let html = page(&[
            r#"<div class="g"><a href="https://example.com/">no heading</a></div>"#.to_string(),
            r#"<div class="g"><h3>No link</h3></div>"#.to_string(),
            result_block("https://kept.com/", "Kept", None),
        ]);
        let results = parse_search_results(&html, &base_url(), 5);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Kept");
    }

    #[test]
    fn test_caps_result_count() {
        let blocks: Vec<String> = (0..8)
            .map(|i| result_block(&format!("https://site{}.com/", i), &format!("T{}", i), None))
            .collect();
        let results = parse_search_results(&page(&blocks), &base_url(), 5);
        assert_eq!(results.len(), 5);
        assert_eq!(results[4].title, "T4");
    }

    #[test]
    fn test_unwraps_redirect_links() {
        let html = page(&[result_block(
            "/url?q=https://target.example.org/page&amp;sa=U",
            "Wrapped",
            None,
        )]);
        let results = parse_search_results(&html, &base_url(), 5);
        assert_eq!(results[0].link, "https://target.example.org/page");
    }

    #[test]
    fn test_resolves_relative_links() {
        let html = page(&[result_block("/images?q=x", "Relative", None)]);
        let results = parse_search_results(&html, &base_url(), 5);
        assert_eq!(results[0].link, "https://www.google.com/images?q=x");
    }

    #[test]
    fn test_skips_non_web_links() {
        let html = page(&[
            result_block("javascript:void(0)", "Script", None),
            result_block("#top", "Fragment", None),
        ]);
        assert!(parse_search_results(&html, &base_url(), 5).is_empty());
    }

    #[tokio::test]
    async fn test_fetch_sends_query_and_language() {
        let server = MockServer::start().await;
        let html = page(&[result_block("https://a.com/", "A", Some("about a"))]);
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "apple pie"))
            .and(query_param("hl", "fa"))
            .respond_with(ResponseTemplate::new(200).set_body_string(html))
            .expect(1)
            .mount(&server)
            .await;

        let endpoints = EndpointConfig {
            search_url: format!("{}/search", server.uri()),
            ..EndpointConfig::default()
        };
        let fetcher = HttpResultFetcher::new(Client::new(), &endpoints).unwrap();
        let results = fetcher.fetch("apple pie").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].link, "https://a.com/");
    }

    #[tokio::test]
    async fn test_fetch_error_status_is_transient() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let endpoints = EndpointConfig {
            search_url: format!("{}/search", server.uri()),
            ..EndpointConfig::default()
        };
        let fetcher = HttpResultFetcher::new(Client::new(), &endpoints).unwrap();
        let err = fetcher.fetch("x").await.unwrap_err();
        assert!(matches!(err, FetchError::Transient { .. }));
    }
}
