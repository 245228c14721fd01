//! Crawler module: the crawl job engine
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching and HTML extraction behind the `PageFetcher` trait
//! - The per-job worker pool that drains a job's frontier
//! - The process-wide job registry
//! - Job lifecycle coordination (launch, completion, deadline, eviction)

mod coordinator;
mod fetcher;
mod parser;
mod registry;
mod worker;

pub use coordinator::{Coordinator, JobRequest, SubmittedJob};
pub use fetcher::{build_http_client, FetchedPage, HttpFetcher, PageFetcher};
pub use parser::{parse_html, ParsedPage};
pub use registry::JobRegistry;
pub use worker::Worker;

use crate::config::Config;
use std::sync::Arc;

/// Builds a coordinator that fetches pages over HTTP
///
/// # Arguments
///
/// * `config` - The full configuration; the `[crawler]` and `[fetcher]`
///   sections are used
///
/// # Returns
///
/// * `Ok(Coordinator)` - Ready to accept jobs
/// * `Err(HarvestError::Http)` - The HTTP client could not be built
pub fn http_coordinator(config: &Config) -> crate::Result<Coordinator> {
    let fetcher = HttpFetcher::new(&config.fetcher)?;
    Ok(Coordinator::new(config.crawler.clone(), Arc::new(fetcher)))
}
