use crate::config::types::{Config, CrawlerConfig, FetcherConfig, ServerConfig};
use crate::{ConfigError, ConfigResult};
use std::net::SocketAddr;

/// Validates the entire configuration
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_server_config(&config.server)?;
    validate_crawler_config(&config.crawler)?;
    validate_fetcher_config(&config.fetcher)?;
    Ok(())
}

fn validate_server_config(config: &ServerConfig) -> ConfigResult<()> {
    config.bind.parse::<SocketAddr>().map_err(|e| {
        ConfigError::Validation(format!(
            "bind must be a socket address, got '{}': {}",
            config.bind, e
        ))
    })?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> ConfigResult<()> {
    if config.max_workers < 1 {
        return Err(ConfigError::Validation(format!(
            "max-workers must be >= 1, got {}",
            config.max_workers
        )));
    }

    if config.default_workers < 1 || config.default_workers > config.max_workers {
        return Err(ConfigError::Validation(format!(
            "default-workers must be between 1 and {}, got {}",
            config.max_workers, config.default_workers
        )));
    }

    if config.default_max_depth < 1 {
        return Err(ConfigError::Validation(format!(
            "default-max-depth must be >= 1, got {}",
            config.default_max_depth
        )));
    }

    if config.idle_poll_ms < 1 {
        return Err(ConfigError::Validation("idle-poll-ms must be >= 1".to_string()));
    }

    if config.job_deadline_secs == Some(0) {
        return Err(ConfigError::Validation("job-deadline-secs must be >= 1 when set".to_string()));
    }

    Ok(())
}

fn validate_fetcher_config(config: &FetcherConfig) -> ConfigResult<()> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation("user-agent cannot be empty".to_string()));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 || config.connect_timeout_secs > config.timeout_secs {
        return Err(ConfigError::Validation(format!(
            "connect-timeout-secs must be between 1 and timeout-secs ({}), got {}",
            config.timeout_secs, config.connect_timeout_secs
        )));
    }

    Ok(())
}
