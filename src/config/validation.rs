use crate::config::types::{Config, EndpointConfig, JobConfig, OutputConfig, UserAgentConfig};
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_job_config(&config.job)?;
    validate_endpoint_config(&config.endpoints)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates job configuration
fn validate_job_config(config: &JobConfig) -> Result<(), ConfigError> {
    let letters = config.letters();
    if letters.is_empty() {
        return Err(ConfigError::Validation(
            "alphabet must contain at least one letter".to_string(),
        ));
    }

    // Duplicate letters would produce duplicate candidates
    let mut seen = HashSet::new();
    for letter in &letters {
        if !seen.insert(letter) {
            return Err(ConfigError::Validation(format!(
                "alphabet contains duplicate letter '{}'",
                letter
            )));
        }
    }

    if config.max_suggestions < 1 {
        return Err(ConfigError::Validation(
            "max_suggestions must be >= 1".to_string(),
        ));
    }

    if config.max_consecutive_failures < 1 {
        return Err(ConfigError::Validation(
            "max_consecutive_failures must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates endpoint configuration
fn validate_endpoint_config(config: &EndpointConfig) -> Result<(), ConfigError> {
    validate_http_url("suggest_url", &config.suggest_url)?;
    validate_http_url("search_url", &config.search_url)?;

    if config.suggest_client.is_empty() {
        return Err(ConfigError::Validation(
            "suggest_client cannot be empty".to_string(),
        ));
    }

    if config.max_results_per_suggestion < 1 {
        return Err(ConfigError::Validation(
            "max_results_per_suggestion must be >= 1".to_string(),
        ));
    }

    if config.request_timeout_secs < 1 || config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeouts must be >= 1s, got request={}s connect={}s",
            config.request_timeout_secs, config.connect_timeout_secs
        )));
    }

    Ok(())
}

fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            field, value
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !parts[1].contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
