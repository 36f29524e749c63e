use serde::Deserialize;
use std::time::Duration;

/// Browser-identifying user agent sent with every request
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/70.0.3538.102 Safari/537.36 Edge/18.19582";

pub const DEFAULT_CONNECTION_LIMIT: usize = 10;
pub const DEFAULT_WORKER_COUNT: usize = 10;
pub const DEFAULT_RETRY_DELAY_SECONDS: u64 = 30;
pub const DEFAULT_CONTAINER_SELECTOR: &str = "div.prod-content";

/// Main configuration structure for Sumi-Gather
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// URLs to harvest, in submission order
    #[serde(default)]
    pub urls: Vec<String>,

    #[serde(default)]
    pub fetch: FetchSection,

    #[serde(default)]
    pub extract: ExtractSection,
}

/// The `[fetch]` table
#[derive(Debug, Clone, Deserialize)]
pub struct FetchSection {
    /// Maximum number of outbound requests in flight at once
    #[serde(rename = "connection-limit", default = "default_connection_limit")]
    pub connection_limit: usize,

    /// Maximum number of fetch tasks running at once
    #[serde(rename = "worker-count", default = "default_worker_count")]
    pub worker_count: usize,

    /// Wait between a failed attempt and the next one
    #[serde(rename = "retry-delay-seconds", default = "default_retry_delay")]
    pub retry_delay_seconds: u64,

    /// Attempts per URL before giving up; 0 or absent retries forever
    #[serde(rename = "max-attempts", default)]
    pub max_attempts: Option<u32>,

    #[serde(rename = "request-timeout-seconds", default)]
    pub request_timeout_seconds: Option<u64>,

    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FetchSection {
    fn default() -> Self {
        Self {
            connection_limit: DEFAULT_CONNECTION_LIMIT,
            worker_count: DEFAULT_WORKER_COUNT,
            retry_delay_seconds: DEFAULT_RETRY_DELAY_SECONDS,
            max_attempts: None,
            request_timeout_seconds: None,
            user_agent: default_user_agent(),
        }
    }
}

/// The `[extract]` table
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractSection {
    /// Selector matching one container element per record
    #[serde(default = "default_container")]
    pub container: String,

    #[serde(default)]
    pub fields: Vec<FieldEntry>,
}

impl Default for ExtractSection {
    fn default() -> Self {
        Self {
            container: default_container(),
            fields: Vec::new(),
        }
    }
}

/// One `[[extract.fields]]` entry
#[derive(Debug, Clone, Deserialize)]
pub struct FieldEntry {
    /// Key the value is stored under in each record
    pub name: String,

    /// Selector evaluated inside the container element
    pub selector: String,

    /// Attribute to read instead of the element text
    #[serde(default)]
    pub attribute: Option<String>,

    /// A record missing a required field is dropped from the page
    #[serde(default)]
    pub required: bool,
}

/// Runtime settings for one harvest run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    pub connection_limit: usize,
    pub worker_count: usize,
    pub retry_delay: Duration,
    /// `None` keeps retrying until the server answers 200
    pub max_attempts: Option<u32>,
    pub request_timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            connection_limit: DEFAULT_CONNECTION_LIMIT,
            worker_count: DEFAULT_WORKER_COUNT,
            retry_delay: Duration::from_secs(DEFAULT_RETRY_DELAY_SECONDS),
            max_attempts: None,
            request_timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl From<&FetchSection> for FetchConfig {
    fn from(section: &FetchSection) -> Self {
        Self {
            connection_limit: section.connection_limit,
            worker_count: section.worker_count,
            retry_delay: Duration::from_secs(section.retry_delay_seconds),
            max_attempts: section.max_attempts.filter(|&n| n > 0),
            request_timeout: section.request_timeout_seconds.map(Duration::from_secs),
            user_agent: section.user_agent.clone(),
        }
    }
}

impl Config {
    /// Runtime fetch settings derived from the `[fetch]` table
    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig::from(&self.fetch)
    }
}

fn default_connection_limit() -> usize {
    DEFAULT_CONNECTION_LIMIT
}

fn default_worker_count() -> usize {
    DEFAULT_WORKER_COUNT
}

fn default_retry_delay() -> u64 {
    DEFAULT_RETRY_DELAY_SECONDS
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_container() -> String {
    DEFAULT_CONTAINER_SELECTOR.to_string()
}
