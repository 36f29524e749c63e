//! HTTP fetcher implementation
//!
//! One call to [`PageFetcher::fetch`] is exactly one GET. Retrying, waiting
//! and connection accounting all live in the caller; the fetcher only
//! reports what happened.

use crate::config::FetchConfig;
use crate::TransportError;
use reqwest::Client;
use std::future::Future;

/// Status and body of a completed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body, fully read
    pub body: String,
}

/// Result of one fetch attempt
pub type FetchOutcome = Result<RawResponse, TransportError>;

/// Issues a single GET for a URL
///
/// Callers hold a connection permit for the whole call, so an implementation
/// must not return until the body has been read or the request has failed.
pub trait PageFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> impl Future<Output = FetchOutcome> + Send;
}

/// Builds the HTTP client used for every request of a run
///
/// The user agent is the only header added on top of reqwest's defaults.
/// Redirects and compression are left to reqwest.
pub fn build_http_client(config: &FetchConfig) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .user_agent(config.user_agent.as_str())
        .pool_max_idle_per_host(config.connection_limit)
        .gzip(true)
        .brotli(true);

    if let Some(timeout) = config.request_timeout {
        builder = builder.timeout(timeout);
    }

    builder.build()
}

/// [`PageFetcher`] backed by a shared reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher with a client configured from `config`
    pub fn new(config: &FetchConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }

    /// Wraps an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchOutcome {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(url, &e))?;

        let status = response.status().as_u16();

        // Read the body for every status so the connection goes back to the pool
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::from_reqwest(url, &e))?;

        Ok(RawResponse { status, body })
    }
}
