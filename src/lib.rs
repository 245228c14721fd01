//! link-harvest: a depth-bounded crawl job service
//!
//! This crate accepts crawl jobs (a set of seed URLs, a worker count and a
//! maximum depth), crawls outward through hyperlinks with a per-job pool of
//! concurrent workers, and collects the resources (image sources) referenced
//! by every visited page. Jobs can be queried while running and are evicted
//! a fixed retention interval after they finish.

pub mod config;
pub mod crawler;
pub mod server;
pub mod state;

use thiserror::Error;

/// Errors from building or running the service
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Errors surfaced by job submission and job queries
#[derive(Debug, Error)]
pub enum JobError {
    /// The submission was malformed; no job was created
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The job never existed or has already been evicted
    #[error("Job not found: {0}")]
    NotFound(state::JobId),
}

/// Errors produced while fetching or extracting a single page
///
/// These never escape a worker: the URL is recorded as failed and the crawl
/// carries on.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request to {url} failed: {source}")]
    Request { url: String, source: reqwest::Error },

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to read body of {url}: {message}")]
    Body { url: String, message: String },
}

/// Result type alias for link-harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for job operations
pub type JobResult<T> = std::result::Result<T, JobError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, FetchedPage, HttpFetcher, JobRequest, PageFetcher};
pub use state::{CrawlReport, JobId, JobOutcome, JobPhase, JobStatus};
