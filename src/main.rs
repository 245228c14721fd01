//! link-harvest main entry point
//!
//! This is the command-line interface for the link-harvest crawl job service.

use anyhow::Context;
use clap::{Parser, Subcommand};
use link_harvest::config::{load_config_or_default, Config};
use link_harvest::crawler::{http_coordinator, JobRequest};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// link-harvest: a depth-bounded crawl job service
///
/// Crawls outward from seed URLs through hyperlinks, up to a maximum depth,
/// collecting the images referenced by every page visited.
#[derive(Parser, Debug)]
#[command(name = "link-harvest")]
#[command(version)]
#[command(about = "A depth-bounded crawl job service", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API
    Serve {
        /// Address to listen on (overrides [server] bind)
        #[arg(long, value_name = "ADDR")]
        bind: Option<String>,
    },

    /// Run a single crawl job and print its report as JSON
    Crawl {
        /// Seed URLs
        #[arg(value_name = "URL", required = true)]
        urls: Vec<String>,

        /// Number of concurrent workers
        #[arg(short, long)]
        threads: Option<usize>,

        /// Maximum crawl depth (1 crawls only the seeds)
        #[arg(short, long)]
        levels: Option<u32>,
    },

    /// Validate the configuration and print the effective settings
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_config_or_default(cli.config.as_deref()).with_context(|| match &cli.config {
        Some(path) => format!("Failed to load configuration from {}", path.display()),
        None => "Invalid default configuration".to_string(),
    })?;

    match cli.command {
        Command::Serve { bind } => handle_serve(config, bind).await,
        Command::Crawl {
            urls,
            threads,
            levels,
        } => handle_crawl(config, urls, threads, levels).await,
        Command::CheckConfig => handle_check_config(&config),
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// `RUST_LOG` takes precedence over the flags when set.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if quiet {
            // Only show errors
            EnvFilter::new("error")
        } else {
            match verbose {
                0 => EnvFilter::new("link_harvest=info,warn"),
                1 => EnvFilter::new("link_harvest=debug,tower_http=debug,info"),
                2 => EnvFilter::new("link_harvest=trace,debug"),
                _ => EnvFilter::new("trace"),
            }
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Handles `serve`: runs the HTTP API until Ctrl+C
async fn handle_serve(config: Config, bind: Option<String>) -> anyhow::Result<()> {
    let bind = bind.unwrap_or_else(|| config.server.bind.clone());
    let coordinator = http_coordinator(&config).context("Failed to build page fetcher")?;

    tracing::info!(
        "Defaults: {} worker(s), depth {}, retention {}s",
        config.crawler.default_workers,
        config.crawler.default_max_depth,
        config.crawler.retention_secs
    );

    link_harvest::server::serve(coordinator, &bind)
        .await
        .with_context(|| format!("Server on {} failed", bind))
}

/// Handles `crawl`: runs one job to completion in-process
async fn handle_crawl(
    config: Config,
    urls: Vec<String>,
    threads: Option<usize>,
    levels: Option<u32>,
) -> anyhow::Result<()> {
    let coordinator = http_coordinator(&config).context("Failed to build page fetcher")?;

    let submitted = coordinator.submit(JobRequest {
        urls,
        workers: threads,
        max_depth: levels,
    })?;
    tracing::info!(
        "Job {} started with {} worker(s), depth {}",
        submitted.id,
        submitted.workers,
        submitted.max_depth
    );

    let report = coordinator.wait(&submitted.id).await?;
    tracing::info!(
        "Crawled {} page(s), {} failed",
        report.results.len(),
        report.failed.len()
    );

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Handles `check-config`: prints the effective configuration
fn handle_check_config(config: &Config) -> anyhow::Result<()> {
    println!("{}", toml::to_string_pretty(config)?);
    println!("# ✓ Configuration is valid");
    Ok(())
}
