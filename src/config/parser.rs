use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigResult;
use std::path::Path;

/// Reads a TOML file and returns the validated service configuration
///
/// # Arguments
///
/// * `path` - Location of the `[server]`/`[crawler]`/`[fetcher]` TOML file
///
/// # Returns
///
/// * `Ok(Config)` - Settings with defaults filled in for missing keys
/// * `Err(ConfigError)` - The file is unreadable, malformed, or out of range
pub fn load_config(path: &Path) -> ConfigResult<Config> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from TOML text
pub fn parse_config(content: &str) -> ConfigResult<Config> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Loads the configuration at `path` when given, otherwise validated defaults
pub fn load_config_or_default(path: Option<&Path>) -> ConfigResult<Config> {
    match path {
        Some(path) => load_config(path),
        None => {
            let config = Config::default();
            validate(&config)?;
            Ok(config)
        }
    }
}
