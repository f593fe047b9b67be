use url::Url;

/// Extracts the domain a search result link points at
///
/// The host is lowercased and any port is dropped. Links that do not parse
/// as absolute URLs, or that carry no host, are returned unchanged so they
/// still form a cluster of their own.
///
/// # Examples
///
/// ```
/// use autosuggest_explorer::extract_domain;
///
/// assert_eq!(extract_domain("https://EXAMPLE.com/path"), "example.com");
/// assert_eq!(extract_domain("https://sub.example.com:8443/"), "sub.example.com");
/// assert_eq!(extract_domain("not a link"), "not a link");
/// ```
pub fn extract_domain(link: &str) -> String {
    Url::parse(link)
        .ok()
        .and_then(|url| url.host_str().map(|h| h.to_lowercase()))
        .filter(|host| !host.is_empty())
        .unwrap_or_else(|| link.to_string())
}
