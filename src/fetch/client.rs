//! HTTP client construction and response classification

use crate::config::{EndpointConfig, UserAgentConfig};
use crate::{FetchError, FetchResult};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use url::Url;

/// Formats the user agent string sent with every request
///
/// Format: `Name/Version (+ContactURL; ContactEmail)`
pub fn format_user_agent(config: &UserAgentConfig) -> String {
    format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    )
}

/// Builds an HTTP client with proper configuration
///
/// Both the connect phase and the whole request are bounded by the configured
/// timeouts, so no outbound call can block a job step indefinitely.
///
/// # Example
///
/// ```no_run
/// use autosuggest_explorer::config::{EndpointConfig, UserAgentConfig};
/// use autosuggest_explorer::fetch::build_http_client;
///
/// let user_agent = UserAgentConfig {
///     crawler_name: "AutosuggestExplorer".to_string(),
///     crawler_version: "0.1".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&user_agent, &EndpointConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    endpoints: &EndpointConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(format_user_agent(user_agent))
        .timeout(Duration::from_secs(endpoints.request_timeout_secs))
        .connect_timeout(Duration::from_secs(endpoints.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Sends a GET request and returns the body of a successful response
///
/// | Condition | Result |
/// |-----------|--------|
/// | HTTP 2xx | body text |
/// | HTTP 429 | `RateLimited` |
/// | other status | `Transient` |
/// | timeout, connect, body errors | `Transient` |
pub(crate) async fn get_text(client: &Client, url: Url) -> FetchResult<String> {
    let display = url.to_string();

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| classify_error(&display, e))?;

    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(FetchError::RateLimited { url: display });
    }

    if !status.is_success() {
        return Err(FetchError::Transient {
            url: display,
            message: format!("HTTP {}", status.as_u16()),
        });
    }

    response
        .text()
        .await
        .map_err(|e| classify_error(&display, e))
}

fn classify_error(url: &str, error: reqwest::Error) -> FetchError {
    let message = if error.is_timeout() {
        "Request timeout".to_string()
    } else if error.is_connect() {
        "Connection refused".to_string()
    } else {
        error.to_string()
    };

    FetchError::Transient {
        url: url.to_string(),
        message,
    }
}
