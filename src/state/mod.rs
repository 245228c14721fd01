//! State module for tracking crawl jobs
//!
//! # Components
//!
//! - `Frontier`: the pending/processing/results/failed URL sets of one job
//! - `Job`: the typed job record wrapping a frontier in its own lock
//! - `JobPhase`: the job lifecycle (`Created`, `Running`, `Finished`, `Cancelled`)

mod frontier;
mod job;
mod job_phase;

// Re-export main types
pub use frontier::{Claim, Frontier, FrontierCounts};
pub use job::{CrawlReport, Job, JobId, JobOutcome, JobStatus};
pub use job_phase::JobPhase;
