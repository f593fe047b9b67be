use serde::Deserialize;

/// Letters appended to the base word when no alphabet is configured
pub const DEFAULT_ALPHABET: &str = "ابپتثجچحخدذرزژسشصضطظعغفقکگلمنوهی";

/// Main configuration structure for Autosuggest Explorer
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub job: JobConfig,
    #[serde(default)]
    pub endpoints: EndpointConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Enumeration job behavior
#[derive(Debug, Clone, Deserialize)]
pub struct JobConfig {
    /// Letters to append, one letter per character (whitespace is ignored)
    #[serde(default = "default_alphabet")]
    pub alphabet: String,

    /// Inserted between the base word and the generated suffix
    #[serde(default = "default_separator")]
    pub separator: String,

    /// Maximum number of suggestions expanded per candidate
    #[serde(rename = "max-suggestions", default = "default_max_suggestions")]
    pub max_suggestions: usize,

    /// Minimum time between two outbound calls (milliseconds)
    #[serde(
        rename = "min-request-interval-ms",
        default = "default_min_request_interval_ms"
    )]
    pub min_request_interval_ms: u64,

    /// How long the driver waits after being rate limited (seconds)
    #[serde(
        rename = "rate-limit-backoff-secs",
        default = "default_rate_limit_backoff_secs"
    )]
    pub rate_limit_backoff_secs: u64,

    /// Consecutive failed steps after which the driver gives up
    #[serde(
        rename = "max-consecutive-failures",
        default = "default_max_consecutive_failures"
    )]
    pub max_consecutive_failures: u32,
}

impl JobConfig {
    /// Splits the configured alphabet into individual letters
    pub fn letters(&self) -> Vec<String> {
        self.alphabet
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(String::from)
            .collect()
    }
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            alphabet: default_alphabet(),
            separator: default_separator(),
            max_suggestions: default_max_suggestions(),
            min_request_interval_ms: default_min_request_interval_ms(),
            rate_limit_backoff_secs: default_rate_limit_backoff_secs(),
            max_consecutive_failures: default_max_consecutive_failures(),
        }
    }
}

/// External endpoints and request limits
#[derive(Debug, Clone, Deserialize)]
pub struct EndpointConfig {
    /// Autocomplete endpoint
    #[serde(rename = "suggest-url", default = "default_suggest_url")]
    pub suggest_url: String,

    /// Value of the `client` query parameter sent to the autocomplete endpoint
    #[serde(rename = "suggest-client", default = "default_suggest_client")]
    pub suggest_client: String,

    /// Web search endpoint
    #[serde(rename = "search-url", default = "default_search_url")]
    pub search_url: String,

    /// Interface language requested from the search endpoint (`hl`)
    #[serde(default = "default_language")]
    pub language: String,

    /// Maximum number of search results kept per suggestion
    #[serde(
        rename = "max-results-per-suggestion",
        default = "default_max_results_per_suggestion"
    )]
    pub max_results_per_suggestion: usize,

    #[serde(rename = "request-timeout-secs", default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            suggest_url: default_suggest_url(),
            suggest_client: default_suggest_client(),
            search_url: default_search_url(),
            language: default_language(),
            max_results_per_suggestion: default_max_results_per_suggestion(),
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the explorer
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the explorer
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the explorer
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory where exported CSV and markdown files are written
    #[serde(default = "default_output_directory")]
    pub directory: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
        }
    }
}

fn default_alphabet() -> String {
    DEFAULT_ALPHABET.to_string()
}

fn default_separator() -> String {
    " ".to_string()
}

fn default_max_suggestions() -> usize {
    10
}

fn default_min_request_interval_ms() -> u64 {
    1000
}

fn default_rate_limit_backoff_secs() -> u64 {
    30
}

fn default_max_consecutive_failures() -> u32 {
    5
}

fn default_suggest_url() -> String {
    "http://suggestqueries.google.com/complete/search".to_string()
}

fn default_suggest_client() -> String {
    "firefox".to_string()
}

fn default_search_url() -> String {
    "https://www.google.com/search".to_string()
}

fn default_language() -> String {
    "fa".to_string()
}

fn default_max_results_per_suggestion() -> usize {
    5
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_output_directory() -> String {
    ".".to_string()
}
