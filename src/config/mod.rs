//! Configuration module for link-harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section and key is optional, so an empty file (or no file at all)
//! yields the defaults.
//!
//! # Example
//!
//! ```no_run
//! use link_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Finished jobs are kept for {}s", config.crawler.retention_secs);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, FetcherConfig, ServerConfig};

// Re-export parser functions
pub use parser::{load_config, load_config_or_default, parse_config};
