//! Bounded-concurrency execution of independent work items.
//!
//! Each item gets a 1-based ID in submission order. Items run on a
//! [`JoinSet`], at most `workers` at a time, and the results come back in ID
//! order whatever order they finished in.

use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::fetch::PageSource;

/// Default number of concurrent workers.
pub const DEFAULT_WORKERS: usize = 2;

/// A unit of crawl work: fetch, extract and segment one document.
#[async_trait]
pub trait WorkItem: Send + Sync + 'static {
    type Output: Send + 'static;

    /// Run the item. Fetch failures are handled inside and yield empty content.
    async fn process(&self, source: &dyn PageSource) -> Self::Output;

    /// The empty-content result used when the item's task dies.
    fn degraded(&self) -> Self::Output;

    /// URL the item starts from, for logging.
    fn url(&self) -> &str;
}

/// An item's result tagged with its submission ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completed<T> {
    pub id: usize,
    pub output: T,
}

/// Progress bar in the crawl style, hidden when `visible` is false.
pub fn progress_bar(len: usize, message: &str, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new(len as u64);
    match ProgressStyle::default_bar().template("{msg} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})") {
        Ok(style) => bar.set_style(style.progress_chars("#>-")),
        Err(e) => tracing::debug!(error = %e, "falling back to default progress style"),
    }
    bar.set_message(message.to_string());
    bar
}

/// Runs work items against a shared page source.
#[derive(Clone)]
pub struct FetchScheduler {
    source: Arc<dyn PageSource>,
    workers: usize,
    progress: Option<ProgressBar>,
}

impl FetchScheduler {
    /// A scheduler with `workers` concurrent slots (at least one).
    pub fn new(source: Arc<dyn PageSource>, workers: usize) -> Self {
        Self { source, workers: workers.max(1), progress: None }
    }

    /// Tick `bar` once per finished item.
    pub fn with_progress(mut self, bar: ProgressBar) -> Self {
        self.progress = Some(bar);
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Process all items and return their outputs in submission order.
    pub async fn run<W: WorkItem>(&self, items: Vec<W>) -> Vec<Completed<W::Output>> {
        let items: Vec<Arc<W>> = items.into_iter().map(Arc::new).collect();
        let semaphore = Arc::new(Semaphore::new(self.workers));

        if let Some(bar) = &self.progress {
            bar.set_length(items.len() as u64);
        }

        let mut join_set = JoinSet::new();
        for (index, item) in items.iter().enumerate() {
            let id = index + 1;
            let item = Arc::clone(item);
            let source = Arc::clone(&self.source);
            let semaphore = Arc::clone(&semaphore);

            join_set.spawn(async move {
                // NOTE: Hold permit for task duration to enforce concurrency limit
                let _permit = semaphore.acquire_owned().await.ok();
                let output = item.process(source.as_ref()).await;
                (id, output)
            });
        }

        let mut slots: Vec<Option<W::Output>> = items.iter().map(|_| None).collect();
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((id, output)) => slots[id - 1] = Some(output),
                Err(e) => tracing::error!(error = %e, "work item task failed"),
            }
            if let Some(bar) = &self.progress {
                bar.inc(1);
            }
        }

        if let Some(bar) = &self.progress {
            bar.finish_and_clear();
        }

        slots
            .into_iter()
            .zip(&items)
            .enumerate()
            .map(|(index, (slot, item))| {
                let output = slot.unwrap_or_else(|| {
                    tracing::warn!(id = index + 1, url = item.url(), "degrading item after task failure");
                    item.degraded()
                });
                Completed { id: index + 1, output }
            })
            .collect()
    }
}
