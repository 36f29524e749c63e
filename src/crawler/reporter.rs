//! Fetch task events
//!
//! Every state change of a [`FetchTask`](crate::crawler::FetchTask) is
//! reported through a [`TaskReporter`]. The default reporter writes them to
//! `tracing`; tests plug in their own to observe the state machine.

use crate::crawler::retry::RetryReason;
use std::time::Duration;

/// Events emitted by fetch tasks
#[derive(Debug, Clone, Copy)]
pub enum TaskEvent<'a> {
    /// The task got a worker slot
    Started { url: &'a str },
    /// Attempt number `attempt` (1-based) is about to be issued
    Requesting { url: &'a str, attempt: u32 },
    /// The attempt failed and the task is sleeping for `delay`
    Retrying {
        url: &'a str,
        attempt: u32,
        reason: &'a RetryReason,
        delay: Duration,
    },
    /// The page was extracted and stored
    Succeeded {
        url: &'a str,
        attempts: u32,
        records: usize,
    },
    /// The attempt cap was reached without a 200
    Exhausted {
        url: &'a str,
        attempts: u32,
        reason: &'a RetryReason,
    },
}

/// Receives fetch task events
pub trait TaskReporter: Send + Sync {
    fn report(&self, _event: TaskEvent<'_>) {}
}

/// Reporter that uses the `tracing` crate
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl TaskReporter for TracingReporter {
    fn report(&self, event: TaskEvent<'_>) {
        match event {
            TaskEvent::Started { url } => {
                tracing::debug!(%url, "Fetch task started");
            }
            TaskEvent::Requesting { url, attempt } => {
                tracing::trace!(%url, attempt, "Requesting");
            }
            TaskEvent::Retrying {
                url,
                attempt,
                reason,
                delay,
            } => {
                tracing::warn!(
                    %url,
                    attempt,
                    "{}. Timeout for {} s",
                    reason,
                    delay.as_secs_f64()
                );
            }
            TaskEvent::Succeeded {
                url,
                attempts,
                records,
            } => {
                tracing::info!(%url, attempts, records, "Page harvested");
            }
            TaskEvent::Exhausted {
                url,
                attempts,
                reason,
            } => {
                tracing::error!(%url, attempts, "Giving up after last failure: {}", reason);
            }
        }
    }
}
