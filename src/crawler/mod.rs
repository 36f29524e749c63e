//! Crawler module: the concurrent fetch-retry-aggregate engine
//!
//! This module contains:
//! - HTTP fetching, one GET per attempt
//! - The fixed-delay retry policy
//! - The per-URL fetch task state machine
//! - The worker pool bounding tasks and connections
//! - The shared result store

mod fetcher;
mod reporter;
mod retry;
mod scheduler;
mod store;
mod task;

pub use fetcher::{build_http_client, FetchOutcome, HttpFetcher, PageFetcher, RawResponse};
pub use reporter::{TaskEvent, TaskReporter, TracingReporter};
pub use retry::{RetryDecision, RetryPolicy, RetryReason, Verdict, SUCCESS_STATUS};
pub use scheduler::{run_all, Harvest, WorkerPool};
pub use store::{ResultMap, ResultStore};
pub use task::{FetchTask, TaskContext, TaskReport};
