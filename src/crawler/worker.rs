//! Crawl workers
//!
//! A worker repeatedly claims one frontier entry, fetches it outside the
//! job lock, and merges the outcome back. It exits once it sees the frontier
//! drained or the job cancelled.

use crate::crawler::fetcher::{FetchedPage, PageFetcher};
use crate::state::{Claim, Frontier, Job};
use std::any::Any;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// One member of a job's worker pool
pub struct Worker {
    ordinal: usize,
    job: Arc<Job>,
    fetcher: Arc<dyn PageFetcher>,
    idle_poll: Duration,
}

impl Worker {
    /// Creates a worker
    ///
    /// # Arguments
    ///
    /// * `ordinal` - Position of the worker within its job's pool
    /// * `job` - The job to drain
    /// * `fetcher` - Page fetcher shared by the pool
    /// * `idle_poll` - Longest wait for progress before re-checking the frontier
    pub fn new(
        ordinal: usize,
        job: Arc<Job>,
        fetcher: Arc<dyn PageFetcher>,
        idle_poll: Duration,
    ) -> Self {
        Self {
            ordinal,
            job,
            fetcher,
            idle_poll,
        }
    }

    /// Runs until the job is drained or cancelled, returning the ordinal
    pub async fn run(self) -> usize {
        let job_id = self.job.id();
        let mut pages = 0usize;
        tracing::debug!(%job_id, worker = self.ordinal, "Worker started");

        loop {
            // Register interest before looking, so a wake-up between the
            // claim and the wait is not lost.
            let progressed = self.job.progress().notified();
            tokio::pin!(progressed);
            progressed.as_mut().enable();

            if self.job.is_cancelled() {
                tracing::debug!(%job_id, worker = self.ordinal, "Job cancelled, worker stopping");
                break;
            }

            match self.job.with_frontier(Frontier::claim_next) {
                Claim::Url { url, depth } => {
                    self.crawl(&url, depth).await;
                    pages += 1;
                }
                Claim::Wait => {
                    // Other workers may still discover links
                    let _ = tokio::time::timeout(self.idle_poll, progressed).await;
                }
                Claim::Drained => break,
            }
        }

        tracing::debug!(%job_id, worker = self.ordinal, pages, "Worker is done");
        self.ordinal
    }

    /// Fetches one claimed URL and records the outcome
    async fn crawl(&self, url: &str, depth: u32) {
        let job_id = self.job.id();
        tracing::info!(%job_id, worker = self.ordinal, url, depth, "Crawling");

        let fetched = match Url::parse(url) {
            Ok(parsed) => self.fetch_isolated(parsed).await,
            Err(e) => Err(format!("Invalid URL: {}", e)),
        };

        match fetched {
            Ok(page) => {
                let enqueued = self.job.with_frontier(|frontier| {
                    frontier.complete_fetch(url, page.resources);
                    frontier.expand(depth, page.links)
                });
                tracing::debug!(%job_id, worker = self.ordinal, url, enqueued, "Page crawled");
            }
            Err(reason) => {
                tracing::warn!(%job_id, worker = self.ordinal, url, "Fetch failed: {}", reason);
                self.job
                    .with_frontier(|frontier| frontier.record_failure(url, reason));
            }
        }

        self.job.progress().notify_waiters();
    }

    /// Runs the fetch on its own task so a panicking fetcher fails only this URL
    async fn fetch_isolated(&self, url: Url) -> Result<FetchedPage, String> {
        let fetcher = Arc::clone(&self.fetcher);
        let task = tokio::spawn(async move { fetcher.fetch(&url).await });

        match task.await {
            Ok(fetched) => fetched.map_err(|e| e.to_string()),
            Err(e) if e.is_panic() => Err(format!(
                "Fetch panicked: {}",
                panic_message(e.into_panic())
            )),
            Err(e) => Err(format!("Fetch task aborted: {}", e)),
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    match payload.downcast::<String>() {
        Ok(message) => *message,
        Err(payload) => match payload.downcast::<&'static str>() {
            Ok(message) => message.to_string(),
            Err(_) => "unknown panic payload".to_string(),
        },
    }
}
