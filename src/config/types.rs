use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main configuration structure for link-harvest
///
/// Every section is optional; a missing section takes its defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
}

/// HTTP API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Socket address the API listens on
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

/// Crawl job configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CrawlerConfig {
    /// Worker count used when a submission does not specify one
    #[serde(rename = "default-workers", default = "default_workers")]
    pub default_workers: usize,

    /// Maximum depth used when a submission does not specify one
    #[serde(rename = "default-max-depth", default = "default_max_depth")]
    pub default_max_depth: u32,

    /// Upper bound on the worker count a single job may request
    #[serde(rename = "max-workers", default = "default_max_workers")]
    pub max_workers: usize,

    /// How long a finished job stays queryable (seconds)
    #[serde(rename = "retention-secs", default = "default_retention_secs")]
    pub retention_secs: u64,

    /// Longest an idle worker waits before re-checking the frontier (milliseconds)
    #[serde(rename = "idle-poll-ms", default = "default_idle_poll_ms")]
    pub idle_poll_ms: u64,

    /// Optional wall-clock limit after which a running job is cancelled (seconds)
    #[serde(rename = "job-deadline-secs", default)]
    pub job_deadline_secs: Option<u64>,
}

impl CrawlerConfig {
    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_secs)
    }

    pub fn idle_poll(&self) -> Duration {
        Duration::from_millis(self.idle_poll_ms)
    }

    pub fn job_deadline(&self) -> Option<Duration> {
        self.job_deadline_secs.map(Duration::from_secs)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            default_workers: default_workers(),
            default_max_depth: default_max_depth(),
            max_workers: default_max_workers(),
            retention_secs: default_retention_secs(),
            idle_poll_ms: default_idle_poll_ms(),
            job_deadline_secs: None,
        }
    }
}

/// Page fetcher configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FetcherConfig {
    /// User-Agent header sent with every page request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Total request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// TCP connect timeout (seconds)
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Maximum number of redirects followed per request
    #[serde(rename = "max-redirects", default = "default_max_redirects")]
    pub max_redirects: usize,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            max_redirects: default_max_redirects(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_workers() -> usize {
    1
}

fn default_max_depth() -> u32 {
    2
}

fn default_max_workers() -> usize {
    64
}

fn default_retention_secs() -> u64 {
    600
}

fn default_idle_poll_ms() -> u64 {
    1000
}

fn default_user_agent() -> String {
    format!("Mozilla/5.0 (compatible; link-harvest/{})", env!("CARGO_PKG_VERSION"))
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_max_redirects() -> usize {
    10
}
