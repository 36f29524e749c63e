use crate::config::types::{Config, ExtractSection, FetchConfig, FetchSection};
use crate::extract::SelectorExtractor;
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

/// Upper bound for both the worker and connection limits
const MAX_PARALLELISM: usize = 1000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_fetch_section(&config.fetch)?;
    validate_extract_section(&config.extract)?;
    validate_urls(&config.urls)?;
    Ok(())
}

/// Validates fetch limits and timing
fn validate_fetch_section(fetch: &FetchSection) -> Result<(), ConfigError> {
    check_limit("connection-limit", fetch.connection_limit)?;
    check_limit("worker-count", fetch.worker_count)?;

    if fetch.retry_delay_seconds < 1 {
        return Err(ConfigError::Validation(
            "retry-delay-seconds must be >= 1".to_string(),
        ));
    }

    if fetch.request_timeout_seconds == Some(0) {
        return Err(ConfigError::Validation(
            "request-timeout-seconds must be >= 1 when set".to_string(),
        ));
    }

    if fetch.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

impl FetchConfig {
    /// Checks the runtime limits before a run builds its semaphores
    ///
    /// A zero limit would leave every task waiting on a permit forever.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_limit("connection_limit", self.connection_limit)?;
        check_limit("worker_count", self.worker_count)?;
        Ok(())
    }
}

fn check_limit(name: &str, value: usize) -> Result<(), ConfigError> {
    if value < 1 || value > MAX_PARALLELISM {
        return Err(ConfigError::Validation(format!(
            "{} must be between 1 and {}, got {}",
            name, MAX_PARALLELISM, value
        )));
    }
    Ok(())
}

/// Validates field names and that every selector parses
fn validate_extract_section(extract: &ExtractSection) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for field in &extract.fields {
        if field.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "extract field name cannot be empty".to_string(),
            ));
        }

        if !seen.insert(field.name.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate extract field '{}'",
                field.name
            )));
        }
    }

    SelectorExtractor::from_section(extract).map(|_| ())
}

/// Validates the URL list: non-empty, absolute, http(s)
fn validate_urls(urls: &[String]) -> Result<(), ConfigError> {
    if urls.is_empty() {
        return Err(ConfigError::Validation(
            "at least one URL is required".to_string(),
        ));
    }

    for raw in urls {
        let url = Url::parse(raw)
            .map_err(|e| ConfigError::InvalidUrl(format!("'{}': {}", raw, e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::InvalidUrl(format!(
                "'{}' must use http or https",
                raw
            )));
        }
    }

    Ok(())
}
