//! Worker pool that fans a URL list out over bounded fetch tasks
//!
//! Two independent budgets apply:
//! - Worker slots: at most `worker_count` tasks are running. The rest wait in
//!   `Pending` and start in submission order as slots free up.
//! - Connection permits: at most `connection_limit` requests are in flight,
//!   whichever tasks issue them. A running task may sit on its worker slot
//!   while it waits for a permit.

use crate::config::FetchConfig;
use crate::crawler::fetcher::{HttpFetcher, PageFetcher};
use crate::crawler::reporter::{TaskReporter, TracingReporter};
use crate::crawler::retry::RetryPolicy;
use crate::crawler::store::{ResultMap, ResultStore};
use crate::crawler::task::{FetchTask, TaskContext};
use crate::extract::PageExtractor;
use crate::output::RunStats;
use crate::state::TaskState;
use crate::GatherError;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Everything a finished run produced
#[derive(Debug, Clone)]
pub struct Harvest {
    /// URL to records for every URL that reached `Succeeded`
    pub results: ResultMap,
    pub stats: RunStats,
    /// URLs that hit the attempt cap, in completion order
    pub exhausted: Vec<String>,
}

/// Runs fetch tasks for a URL list with bounded parallelism
pub struct WorkerPool<F, E> {
    fetcher: Arc<F>,
    extractor: Arc<E>,
    config: FetchConfig,
    reporter: Arc<dyn TaskReporter>,
}

impl<F, E> WorkerPool<F, E>
where
    F: PageFetcher + 'static,
    E: PageExtractor + 'static,
{
    pub fn new(fetcher: F, extractor: E, config: FetchConfig) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            extractor: Arc::new(extractor),
            config,
            reporter: Arc::new(TracingReporter),
        }
    }

    /// Replaces the default `tracing` reporter
    pub fn with_reporter(mut self, reporter: Arc<dyn TaskReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Fetches every URL and returns once all tasks are terminal
    ///
    /// Without an attempt cap this only returns after every URL has answered
    /// 200. A URL that never does keeps the run alive indefinitely.
    ///
    /// A task that panics is logged and counted in `stats.panicked`; its URL
    /// gets no entry and the remaining tasks still run to completion.
    pub async fn run(&self, urls: &[String]) -> Result<Harvest, GatherError> {
        self.config.validate()?;

        let mut stats = RunStats::start(urls.len());

        let ctx = Arc::new(TaskContext {
            fetcher: Arc::clone(&self.fetcher),
            extractor: Arc::clone(&self.extractor),
            policy: RetryPolicy::from_config(&self.config),
            connections: Arc::new(Semaphore::new(self.config.connection_limit)),
            store: Arc::new(ResultStore::new()),
            reporter: Arc::clone(&self.reporter),
        });
        let workers = Arc::new(Semaphore::new(self.config.worker_count));

        tracing::info!(
            urls = urls.len(),
            workers = self.config.worker_count,
            connections = self.config.connection_limit,
            "Starting harvest"
        );

        let mut tasks = JoinSet::new();
        let mut exhausted = Vec::new();

        for url in urls {
            // Acquiring here, not inside the task, keeps start order equal to submission order
            let Ok(slot) = Arc::clone(&workers).acquire_owned().await else {
                break;
            };

            let ctx = Arc::clone(&ctx);
            let task = FetchTask::new(url.as_str());
            tasks.spawn(async move {
                let report = task.run(&ctx).await;
                drop(slot);
                report
            });
        }

        while let Some(joined) = tasks.join_next().await {
            let report = match joined {
                Ok(report) => report,
                Err(err) => {
                    tracing::error!(error = %err, "Fetch task panicked, its URL is dropped");
                    stats.record_panic();
                    continue;
                }
            };
            if report.state == TaskState::Exhausted {
                exhausted.push(report.url.clone());
            }
            stats.record(&report);
        }

        stats.finish();
        tracing::info!(
            succeeded = stats.succeeded,
            exhausted = stats.exhausted,
            panicked = stats.panicked,
            retries = stats.retries,
            elapsed = ?stats.elapsed,
            "Harvest complete"
        );

        Ok(Harvest {
            results: ctx.store.take(),
            stats,
            exhausted,
        })
    }
}

/// Fetches `urls` over HTTP with the given settings and extractor
///
/// # Example
///
/// ```no_run
/// use sumi_gather::extract::{FieldRule, SelectorExtractor};
/// use sumi_gather::{run_all, FetchConfig};
///
/// # async fn example() -> Result<(), sumi_gather::GatherError> {
/// let extractor = SelectorExtractor::new("div.prod-content")?
///     .with_field(FieldRule::text("title", ".title")?);
/// let urls = vec!["https://shop.example.com/catalog".to_string()];
///
/// let harvest = run_all(&urls, FetchConfig::default(), extractor).await?;
/// println!("{} pages harvested", harvest.results.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_all<E>(
    urls: &[String],
    config: FetchConfig,
    extractor: E,
) -> Result<Harvest, GatherError>
where
    E: PageExtractor + 'static,
{
    config.validate()?;
    let fetcher = HttpFetcher::new(&config)?;
    WorkerPool::new(fetcher, extractor, config).run(urls).await
}
