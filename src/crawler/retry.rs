//! Retry policy for fetch attempts
//!
//! | Outcome | Action |
//! |---------|--------|
//! | HTTP 200 | Done, hand the body to the extractor |
//! | Any other status | Wait the fixed delay, try again |
//! | Transport error | Wait the fixed delay, try again |
//! | Attempt cap reached (if set) | Give up |
//!
//! The delay never grows and there is no jitter. Without an attempt cap a URL
//! is retried until it succeeds.

use crate::config::FetchConfig;
use crate::crawler::fetcher::{FetchOutcome, RawResponse};
use crate::TransportError;
use std::fmt;
use std::time::Duration;

/// The only status accepted as success
pub const SUCCESS_STATUS: u16 = 200;

/// Whether to try again and how long to wait first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryDecision {
    pub retry: bool,
    pub delay: Duration,
}

/// Why an attempt did not succeed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryReason {
    Status(u16),
    Transport(TransportError),
}

impl fmt::Display for RetryReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(code) => write!(f, "Response status code: {}", code),
            Self::Transport(err) => write!(f, "{}", err),
        }
    }
}

/// What a fetch task should do with the outcome of its latest attempt
#[derive(Debug)]
pub enum Verdict {
    Success(RawResponse),
    Retry { reason: RetryReason, delay: Duration },
    GiveUp { reason: RetryReason },
}

/// Fixed-delay retry policy with an optional attempt cap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    delay: Duration,
    max_attempts: Option<u32>,
}

impl RetryPolicy {
    /// Retries forever with the given delay
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            max_attempts: None,
        }
    }

    /// Stops after `max_attempts` attempts; `0` keeps retrying forever
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = (max_attempts > 0).then_some(max_attempts);
        self
    }

    pub fn from_config(config: &FetchConfig) -> Self {
        Self {
            delay: config.retry_delay,
            max_attempts: config.max_attempts,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn max_attempts(&self) -> Option<u32> {
        self.max_attempts
    }

    /// Decides whether an outcome calls for another attempt
    ///
    /// Only a 200 ends the loop; the attempt cap is applied by [`RetryPolicy::judge`].
    pub fn should_retry(&self, outcome: &FetchOutcome) -> RetryDecision {
        match outcome {
            Ok(response) if response.status == SUCCESS_STATUS => RetryDecision {
                retry: false,
                delay: Duration::ZERO,
            },
            _ => RetryDecision {
                retry: true,
                delay: self.delay,
            },
        }
    }

    /// Turns the outcome of attempt number `attempt` (1-based) into a verdict
    pub fn judge(&self, outcome: FetchOutcome, attempt: u32) -> Verdict {
        let decision = self.should_retry(&outcome);

        let reason = match outcome {
            Ok(response) if !decision.retry => return Verdict::Success(response),
            Ok(response) => RetryReason::Status(response.status),
            Err(err) => RetryReason::Transport(err),
        };

        match self.max_attempts {
            Some(max) if attempt >= max => Verdict::GiveUp { reason },
            _ => Verdict::Retry {
                reason,
                delay: decision.delay,
            },
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&FetchConfig::default())
    }
}
