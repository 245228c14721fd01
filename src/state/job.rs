//! The typed job record shared between the coordinator, its workers and
//! the query surface.

use crate::state::frontier::{Frontier, FrontierCounts};
use crate::state::JobPhase;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Opaque job identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for JobId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Point-in-time progress of a job
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobStatus {
    pub completed: usize,
    #[serde(rename = "inprogress")]
    pub in_progress: usize,
    pub failed: usize,
    pub phase: JobPhase,
}

/// Everything a finished job collected
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrawlReport {
    pub job_id: JobId,
    pub phase: JobPhase,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Crawled URL -> resources referenced by that page
    pub results: BTreeMap<String, Vec<String>>,
    /// URL whose fetch failed -> reason
    pub failed: BTreeMap<String, String>,
}

/// Answer to a result query on an existing job
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// Workers are still running
    Pending,

    /// All workers have exited
    Ready(CrawlReport),
}

#[derive(Debug)]
struct Lifecycle {
    phase: JobPhase,
    finished_at: Option<DateTime<Utc>>,
}

/// A crawl job
///
/// The frontier sits behind its own mutex; every read or write of the URL
/// sets goes through [`Job::with_frontier`], and callers must not hold the
/// guard across an `.await`.
#[derive(Debug)]
pub struct Job {
    id: JobId,
    started_at: DateTime<Utc>,
    frontier: Mutex<Frontier>,
    lifecycle: Mutex<Lifecycle>,
    progress: Notify,
    completed: Notify,
    cancel: CancellationToken,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Job {
    /// Creates a job whose frontier holds `seeds` at depth 0
    pub fn new(seeds: Vec<String>, max_depth: u32) -> Self {
        Self {
            id: JobId::new(),
            started_at: Utc::now(),
            frontier: Mutex::new(Frontier::new(seeds, max_depth)),
            lifecycle: Mutex::new(Lifecycle {
                phase: JobPhase::Created,
                finished_at: None,
            }),
            progress: Notify::new(),
            completed: Notify::new(),
            cancel: CancellationToken::new(),
        }
    }

    pub fn id(&self) -> JobId {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Runs `f` inside the job's critical section
    pub fn with_frontier<R>(&self, f: impl FnOnce(&mut Frontier) -> R) -> R {
        let mut frontier = lock(&self.frontier);
        f(&mut frontier)
    }

    pub fn phase(&self) -> JobPhase {
        lock(&self.lifecycle).phase
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        lock(&self.lifecycle).finished_at
    }

    pub fn is_finished(&self) -> bool {
        self.phase().is_finished()
    }

    /// Moves `Created -> Running`; returns false if the job already started
    pub fn mark_running(&self) -> bool {
        let mut lifecycle = lock(&self.lifecycle);
        if !lifecycle.phase.can_transition_to(JobPhase::Running) {
            return false;
        }
        lifecycle.phase = JobPhase::Running;
        true
    }

    /// Records completion once every worker has exited
    ///
    /// The job ends `Cancelled` if its token was tripped, `Finished`
    /// otherwise. Returns the phase the job is in afterwards.
    pub fn finish(&self) -> JobPhase {
        let next = if self.cancel.is_cancelled() {
            JobPhase::Cancelled
        } else {
            JobPhase::Finished
        };

        let phase = {
            let mut lifecycle = lock(&self.lifecycle);
            if lifecycle.phase == JobPhase::Created {
                lifecycle.phase = JobPhase::Running;
            }
            if lifecycle.phase.can_transition_to(next) {
                lifecycle.phase = next;
                lifecycle.finished_at = Some(Utc::now());
            }
            lifecycle.phase
        };
        self.completed.notify_waiters();
        phase
    }

    /// Resolves once the job is `Finished` or `Cancelled`
    pub async fn wait_finished(&self) {
        loop {
            let notified = self.completed.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.is_finished() {
                return;
            }
            notified.await;
        }
    }

    /// Asks the workers to stop after their current fetch
    pub fn cancel(&self) {
        self.cancel.cancel();
        self.progress.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Signalled whenever the frontier changes in a way idle workers care about
    pub fn progress(&self) -> &Notify {
        &self.progress
    }

    pub fn counts(&self) -> FrontierCounts {
        self.with_frontier(|frontier| frontier.counts())
    }

    pub fn status(&self) -> JobStatus {
        let phase = self.phase();
        let counts = self.counts();
        JobStatus {
            completed: counts.completed,
            in_progress: counts.in_progress,
            failed: counts.failed,
            phase,
        }
    }

    /// Full results once finished, `Pending` before that
    pub fn outcome(&self) -> JobOutcome {
        let (phase, finished_at) = {
            let lifecycle = lock(&self.lifecycle);
            (lifecycle.phase, lifecycle.finished_at)
        };

        match finished_at {
            Some(finished_at) if phase.is_finished() => {
                let (results, failed) =
                    self.with_frontier(|frontier| (frontier.results(), frontier.failures()));
                JobOutcome::Ready(CrawlReport {
                    job_id: self.id,
                    phase,
                    started_at: self.started_at,
                    finished_at,
                    results,
                    failed,
                })
            }
            _ => JobOutcome::Pending,
        }
    }
}
