//! Per-URL fetch task
//!
//! A task loops `Requesting -> Retrying -> Requesting ...` until its URL
//! answers 200, then extracts the body and writes the records to the shared
//! store in one replace. Failed attempts never touch the store.

use crate::crawler::fetcher::PageFetcher;
use crate::crawler::reporter::{TaskEvent, TaskReporter};
use crate::crawler::retry::{RetryPolicy, RetryReason, Verdict};
use crate::crawler::store::ResultStore;
use crate::extract::PageExtractor;
use crate::state::TaskState;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Everything a fetch task shares with the other tasks of its run
pub struct TaskContext<F, E> {
    pub fetcher: Arc<F>,
    pub extractor: Arc<E>,
    pub policy: RetryPolicy,
    /// Counting semaphore bounding requests in flight across all tasks
    pub connections: Arc<Semaphore>,
    pub store: Arc<ResultStore>,
    pub reporter: Arc<dyn TaskReporter>,
}

/// Summary of a finished task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskReport {
    pub url: String,
    /// `Succeeded` or `Exhausted`
    pub state: TaskState,
    pub attempts: u32,
    pub status_failures: u32,
    pub transport_failures: u32,
    /// Records stored for the URL; zero when exhausted
    pub records: usize,
}

/// The retry-until-success state machine for one URL
#[derive(Debug)]
pub struct FetchTask {
    url: String,
    state: TaskState,
    attempts: u32,
    status_failures: u32,
    transport_failures: u32,
}

impl FetchTask {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            state: TaskState::Pending,
            attempts: 0,
            status_failures: 0,
            transport_failures: 0,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn state(&self) -> TaskState {
        self.state
    }

    /// Runs the task to a terminal state
    ///
    /// The caller is expected to hold a worker slot for the whole call.
    pub async fn run<F, E>(mut self, ctx: &TaskContext<F, E>) -> TaskReport
    where
        F: PageFetcher,
        E: PageExtractor,
    {
        ctx.reporter.report(TaskEvent::Started { url: &self.url });

        loop {
            self.enter(TaskState::Requesting);
            self.attempts += 1;
            ctx.reporter.report(TaskEvent::Requesting {
                url: &self.url,
                attempt: self.attempts,
            });

            let outcome = {
                // The pool is never closed, so acquire always yields a permit
                let _permit = ctx.connections.acquire().await.ok();
                ctx.fetcher.fetch(&self.url).await
            };

            match ctx.policy.judge(outcome, self.attempts) {
                Verdict::Success(response) => {
                    let records = ctx.extractor.extract(&response.body);
                    let count = records.len();

                    if ctx.store.insert(&self.url, records).is_some() {
                        tracing::warn!(url = %self.url, "Replaced earlier results for duplicate URL");
                    }

                    self.enter(TaskState::Succeeded);
                    ctx.reporter.report(TaskEvent::Succeeded {
                        url: &self.url,
                        attempts: self.attempts,
                        records: count,
                    });
                    return self.into_report(count);
                }
                Verdict::Retry { reason, delay } => {
                    self.count_failure(&reason);
                    self.enter(TaskState::Retrying);
                    ctx.reporter.report(TaskEvent::Retrying {
                        url: &self.url,
                        attempt: self.attempts,
                        reason: &reason,
                        delay,
                    });
                    tokio::time::sleep(delay).await;
                }
                Verdict::GiveUp { reason } => {
                    self.count_failure(&reason);
                    self.enter(TaskState::Retrying);
                    self.enter(TaskState::Exhausted);
                    ctx.reporter.report(TaskEvent::Exhausted {
                        url: &self.url,
                        attempts: self.attempts,
                        reason: &reason,
                    });
                    return self.into_report(0);
                }
            }
        }
    }

    fn enter(&mut self, next: TaskState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "invalid task transition {} -> {}",
            self.state,
            next
        );
        tracing::trace!(url = %self.url, from = %self.state, to = %next, "Task transition");
        self.state = next;
    }

    fn count_failure(&mut self, reason: &RetryReason) {
        match reason {
            RetryReason::Status(_) => self.status_failures += 1,
            RetryReason::Transport(_) => self.transport_failures += 1,
        }
    }

    fn into_report(self, records: usize) -> TaskReport {
        TaskReport {
            url: self.url,
            state: self.state,
            attempts: self.attempts,
            status_failures: self.status_failures,
            transport_failures: self.transport_failures,
            records,
        }
    }
}
