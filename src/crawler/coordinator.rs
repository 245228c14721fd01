//! Crawler coordinator - job lifecycle orchestration
//!
//! This module owns everything that happens to a job between submission
//! and eviction:
//! - Validating the request and seeding the frontier
//! - Launching the worker pool
//! - Joining the pool and recording completion
//! - Enforcing the optional deadline
//! - Evicting the job once the retention window has passed

use crate::config::CrawlerConfig;
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::registry::JobRegistry;
use crate::crawler::worker::Worker;
use crate::state::{CrawlReport, Job, JobId, JobOutcome, JobStatus};
use crate::{JobError, JobResult};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::task::JoinSet;
use url::Url;

/// A crawl submission
///
/// `workers` and `max_depth` fall back to the configured defaults.
#[derive(Debug, Clone, Default)]
pub struct JobRequest {
    pub urls: Vec<String>,
    pub workers: Option<usize>,
    pub max_depth: Option<u32>,
}

impl JobRequest {
    pub fn new<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            urls: urls.into_iter().map(Into::into).collect(),
            workers: None,
            max_depth: None,
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = Some(max_depth);
        self
    }
}

/// What was accepted for a newly registered job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedJob {
    pub id: JobId,
    pub workers: usize,
    pub max_depth: u32,
    /// De-duplicated seed URLs, in submission order
    pub urls: Vec<String>,
}

/// Main crawler coordinator structure
///
/// Cheap to clone; clones share the same registry and fetcher.
#[derive(Clone)]
pub struct Coordinator {
    config: Arc<CrawlerConfig>,
    registry: JobRegistry,
    fetcher: Arc<dyn PageFetcher>,
}

impl Coordinator {
    /// Creates a new coordinator with an empty registry
    ///
    /// # Arguments
    ///
    /// * `config` - Crawl defaults, limits and timing
    /// * `fetcher` - Page fetcher shared by every job's workers
    pub fn new(config: CrawlerConfig, fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            config: Arc::new(config),
            registry: JobRegistry::new(),
            fetcher,
        }
    }

    pub fn registry(&self) -> &JobRegistry {
        &self.registry
    }

    pub fn config(&self) -> &CrawlerConfig {
        &self.config
    }

    /// Registers a job and starts its worker pool
    ///
    /// Returns as soon as the job is registered; the crawl itself runs on
    /// the tokio runtime. Must be called from within a runtime.
    ///
    /// # Errors
    ///
    /// `JobError::InvalidRequest` if there are no seeds, a seed is not an
    /// absolute URL, or the worker count or depth is out of range. No job is
    /// created in that case.
    pub fn submit(&self, request: JobRequest) -> JobResult<SubmittedJob> {
        let workers = request.workers.unwrap_or(self.config.default_workers);
        let max_depth = request.max_depth.unwrap_or(self.config.default_max_depth);

        if workers < 1 || workers > self.config.max_workers {
            return Err(JobError::InvalidRequest(format!(
                "worker count must be between 1 and {}, got {}",
                self.config.max_workers, workers
            )));
        }

        if max_depth < 1 {
            return Err(JobError::InvalidRequest(format!(
                "max depth must be >= 1, got {}",
                max_depth
            )));
        }

        let urls = dedup_seeds(&request.urls)?;

        let job = Arc::new(Job::new(urls.clone(), max_depth));
        let id = job.id();
        self.registry.insert(job.clone());

        tracing::info!(
            job_id = %id,
            workers,
            max_depth,
            seeds = urls.len(),
            "Starting crawling job"
        );

        tokio::spawn(self.clone().drive(job, workers));

        Ok(SubmittedJob {
            id,
            workers,
            max_depth,
            urls,
        })
    }

    /// Progress counters of a live job
    pub fn status(&self, id: &JobId) -> JobResult<JobStatus> {
        self.registry.status(id)
    }

    /// Results of a finished job, or `Pending` while it runs
    pub fn result(&self, id: &JobId) -> JobResult<JobOutcome> {
        self.registry.outcome(id)
    }

    /// Stops a job after its in-flight fetches complete
    pub fn cancel(&self, id: &JobId) -> JobResult<()> {
        let job = self.registry.get(id).ok_or(JobError::NotFound(*id))?;
        if job.is_finished() {
            tracing::debug!(job_id = %id, "Cancel ignored, job already finished");
        } else {
            tracing::info!(job_id = %id, "Cancelling job");
            job.cancel();
        }
        Ok(())
    }

    /// Waits for a job to finish and returns its report
    ///
    /// The report is returned even if the job is evicted while waiting.
    pub async fn wait(&self, id: &JobId) -> JobResult<CrawlReport> {
        let job = self.registry.get(id).ok_or(JobError::NotFound(*id))?;
        loop {
            job.wait_finished().await;
            if let JobOutcome::Ready(report) = job.outcome() {
                return Ok(report);
            }
        }
    }

    /// Runs a job from first worker start to eviction
    async fn drive(self, job: Arc<Job>, workers: usize) {
        let job_id = job.id();
        job.mark_running();

        let mut pool = JoinSet::new();
        for ordinal in 0..workers {
            let worker = Worker::new(
                ordinal,
                job.clone(),
                self.fetcher.clone(),
                self.config.idle_poll(),
            );
            pool.spawn(worker.run());
        }

        let deadline = self.config.job_deadline().map(|limit| {
            let token = job.cancellation_token().clone();
            let job = job.clone();
            tokio::spawn(async move {
                tokio::select! {
                    _ = tokio::time::sleep(limit) => {
                        tracing::warn!(
                            job_id = %job.id(),
                            ?limit,
                            "Job deadline reached, cancelling"
                        );
                        job.cancel();
                    }
                    _ = token.cancelled() => {}
                }
            })
        });

        while let Some(joined) = pool.join_next().await {
            match joined {
                Ok(ordinal) => tracing::debug!(%job_id, worker = ordinal, "Worker joined"),
                Err(e) => tracing::error!(%job_id, "Worker task failed: {}", e),
            }
        }

        if let Some(deadline) = deadline {
            deadline.abort();
        }

        let phase = job.finish();
        let counts = job.counts();
        let elapsed = job
            .finished_at()
            .map(|finished_at| finished_at - job.started_at())
            .unwrap_or_else(chrono::Duration::zero);
        tracing::info!(
            %job_id,
            %phase,
            completed = counts.completed,
            failed = counts.failed,
            "Job completed in {:.3} seconds",
            elapsed.num_milliseconds() as f64 / 1000.0
        );

        tokio::time::sleep(self.config.retention()).await;
        self.registry.remove(&job_id);
        tracing::info!(%job_id, "Removed job metadata (retention expired)");
    }
}

/// Validates seed URLs and drops repeats, keeping the first occurrence
fn dedup_seeds(urls: &[String]) -> Result<Vec<String>, JobError> {
    if urls.is_empty() {
        return Err(JobError::InvalidRequest(
            "at least one seed URL is required".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    let mut seeds = Vec::with_capacity(urls.len());
    for url in urls {
        let parsed = Url::parse(url.trim()).map_err(|e| {
            JobError::InvalidRequest(format!("invalid seed URL '{}': {}", url, e))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(JobError::InvalidRequest(format!(
                "seed URL '{}' must use http or https",
                url
            )));
        }

        let seed = parsed.to_string();
        if seen.insert(seed.clone()) {
            seeds.push(seed);
        }
    }
    Ok(seeds)
}
