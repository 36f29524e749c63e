//! Run statistics
//!
//! Collected from task reports as they finish and printed to stderr at the
//! end of a run, so they never mix with the JSON written to stdout.

use crate::crawler::TaskReport;
use crate::state::TaskState;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::{Duration, Instant};

/// Harvest run statistics
#[derive(Debug, Clone, Serialize)]
pub struct RunStats {
    pub started_at: DateTime<Utc>,

    #[serde(skip)]
    started: Instant,

    /// Wall time from start to the last task finishing
    pub elapsed: Duration,

    /// URLs submitted, duplicates included
    pub urls: usize,

    pub succeeded: usize,
    pub exhausted: usize,

    /// Tasks that panicked before reaching a terminal state
    pub panicked: usize,

    /// Requests issued across all tasks
    pub attempts: u64,

    /// Attempts beyond the first, per task, summed
    pub retries: u64,

    pub status_failures: u64,
    pub transport_failures: u64,

    /// Records stored across all successful URLs
    pub records: usize,
}

impl RunStats {
    /// Starts the clock for a run over `urls` URLs
    pub fn start(urls: usize) -> Self {
        Self {
            started_at: Utc::now(),
            started: Instant::now(),
            elapsed: Duration::ZERO,
            urls,
            succeeded: 0,
            exhausted: 0,
            panicked: 0,
            attempts: 0,
            retries: 0,
            status_failures: 0,
            transport_failures: 0,
            records: 0,
        }
    }

    /// Folds a finished task into the totals
    pub fn record(&mut self, report: &TaskReport) {
        match report.state {
            TaskState::Succeeded => self.succeeded += 1,
            TaskState::Exhausted => self.exhausted += 1,
            other => tracing::warn!(url = %report.url, state = %other, "Task reported in non-terminal state"),
        }

        self.attempts += u64::from(report.attempts);
        self.retries += u64::from(report.attempts.saturating_sub(1));
        self.status_failures += u64::from(report.status_failures);
        self.transport_failures += u64::from(report.transport_failures);
        self.records += report.records;
    }

    /// Counts a task that never produced a report
    pub fn record_panic(&mut self) {
        self.panicked += 1;
    }

    /// Stops the clock
    pub fn finish(&mut self) {
        self.elapsed = self.started.elapsed();
    }
}

/// Prints statistics to stderr in a formatted manner
pub fn print_statistics(stats: &RunStats) {
    eprintln!("=== Harvest Statistics ===\n");

    eprintln!("Overview:");
    eprintln!("  Started: {}", stats.started_at.to_rfc3339());
    eprintln!("  Elapsed: {:.1}s", stats.elapsed.as_secs_f64());
    eprintln!("  URLs submitted: {}", stats.urls);
    eprintln!("  Succeeded: {}", stats.succeeded);
    if stats.exhausted > 0 {
        eprintln!("  Gave up: {}", stats.exhausted);
    }
    if stats.panicked > 0 {
        eprintln!("  Panicked: {}", stats.panicked);
    }
    eprintln!("  Records extracted: {}", stats.records);
    eprintln!();

    eprintln!("Requests:");
    eprintln!("  Total attempts: {}", stats.attempts);
    eprintln!("  Retries: {}", stats.retries);
    eprintln!("  Non-200 responses: {}", stats.status_failures);
    eprintln!("  Transport errors: {}", stats.transport_failures);
}
