//! Autocomplete endpoint client

use crate::config::EndpointConfig;
use crate::fetch::client::get_text;
use crate::fetch::traits::SuggestionClient;
use crate::{FetchError, FetchResult};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use url::Url;

/// Queries a Google-style suggest endpoint
///
/// Request: `GET {suggest-url}?client={suggest-client}&q={candidate}`.
#[derive(Debug, Clone)]
pub struct HttpSuggestionClient {
    client: Client,
    endpoint: Url,
    client_param: String,
}

impl HttpSuggestionClient {
    pub fn new(client: Client, endpoints: &EndpointConfig) -> Result<Self, url::ParseError> {
        Ok(Self {
            client,
            endpoint: Url::parse(&endpoints.suggest_url)?,
            client_param: endpoints.suggest_client.clone(),
        })
    }

    fn request_url(&self, candidate: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("client", &self.client_param)
            .append_pair("q", candidate);
        url
    }
}

#[async_trait]
impl SuggestionClient for HttpSuggestionClient {
    async fn fetch(&self, candidate: &str) -> FetchResult<Vec<String>> {
        let url = self.request_url(candidate);
        tracing::debug!("Fetching suggestions for '{}'", candidate);

        let body = get_text(&self.client, url.clone()).await?;
        let suggestions = parse_suggestions(&body).map_err(|message| FetchError::Transient {
            url: url.to_string(),
            message,
        })?;

        tracing::debug!(
            "Received {} suggestions for '{}'",
            suggestions.len(),
            candidate
        );
        Ok(suggestions)
    }
}

/// Parses a suggest payload of the form `["query", ["s1", "s2", ...], ...]`
///
/// Non-string entries in the suggestion list are skipped.
///
/// # Example
///
/// ```
/// use autosuggest_explorer::fetch::parse_suggestions;
///
/// let parsed = parse_suggestions(r#"["ab",["abc","abd"]]"#).unwrap();
/// assert_eq!(parsed, vec!["abc", "abd"]);
/// ```
pub fn parse_suggestions(body: &str) -> Result<Vec<String>, String> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| format!("invalid suggest payload: {}", e))?;

    let list = value
        .get(1)
        .and_then(Value::as_array)
        .ok_or_else(|| "suggest payload has no suggestion list".to_string())?;

    Ok(list
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect())
}
