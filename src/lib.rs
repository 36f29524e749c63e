//! Sumi-Gather: a patient concurrent page harvester
//!
//! This crate fetches a fixed list of URLs with bounded worker and connection
//! parallelism, retries each URL after a fixed delay until the server answers
//! `200 OK`, and collects the records extracted from every page into a single
//! map keyed by URL.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod state;

use thiserror::Error;

/// Main error type for Sumi-Gather operations
#[derive(Debug, Error)]
pub enum GatherError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),
}

/// A single fetch attempt that never produced an HTTP status
///
/// These are retried exactly like non-200 responses, but are reported
/// separately so the log shows what actually went wrong.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}: {message}")]
    Connect { url: String, message: String },

    #[error("Request failed for {url}: {message}")]
    Request { url: String, message: String },

    #[error("Failed to read body from {url}: {message}")]
    Body { url: String, message: String },
}

impl TransportError {
    /// Classifies a reqwest error for the given URL
    pub fn from_reqwest(url: &str, err: &reqwest::Error) -> Self {
        let url = url.to_string();
        if err.is_timeout() {
            TransportError::Timeout { url }
        } else if err.is_connect() {
            TransportError::Connect {
                url,
                message: err.to_string(),
            }
        } else if err.is_body() || err.is_decode() {
            TransportError::Body {
                url,
                message: err.to_string(),
            }
        } else {
            TransportError::Request {
                url,
                message: err.to_string(),
            }
        }
    }
}

/// Result type alias for Sumi-Gather operations
pub type Result<T> = std::result::Result<T, GatherError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{Config, FetchConfig, DEFAULT_USER_AGENT};
pub use crawler::{run_all, Harvest, HttpFetcher, PageFetcher, RawResponse, WorkerPool};
pub use extract::{ExtractedRecord, PageExtractor, RecordSet, SelectorExtractor};
pub use state::TaskState;
