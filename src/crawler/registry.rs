//! Process-wide job registry
//!
//! Jobs are stored in a sharded concurrent map, so submissions, queries and
//! evictions for different jobs never contend on a single lock.

use crate::state::{Job, JobId, JobOutcome, JobStatus};
use crate::{JobError, JobResult};
use dashmap::DashMap;
use std::sync::Arc;

/// Shared handle to the live jobs; clones refer to the same map
#[derive(Debug, Clone, Default)]
pub struct JobRegistry {
    jobs: Arc<DashMap<JobId, Arc<Job>>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, job: Arc<Job>) {
        self.jobs.insert(job.id(), job);
    }

    pub fn get(&self, id: &JobId) -> Option<Arc<Job>> {
        self.jobs.get(id).map(|entry| Arc::clone(entry.value()))
    }

    /// Evicts a job; later queries report it as not found
    pub fn remove(&self, id: &JobId) -> Option<Arc<Job>> {
        self.jobs.remove(id).map(|(_, job)| job)
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn status(&self, id: &JobId) -> JobResult<JobStatus> {
        self.get(id)
            .map(|job| job.status())
            .ok_or(JobError::NotFound(*id))
    }

    pub fn outcome(&self, id: &JobId) -> JobResult<JobOutcome> {
        self.get(id)
            .map(|job| job.outcome())
            .ok_or(JobError::NotFound(*id))
    }
}
