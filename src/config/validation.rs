use crate::config::types::Config;
use crate::ConfigError;
use regex::Regex;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_pipeline(config)?;
    validate_entry_url(&config.entry_url)?;
    validate_host_pattern(&config.host_pattern)?;
    validate_path_pattern(&config.path_pattern)?;
    validate_output(config)?;
    validate_user_agent(&config.user_agent)?;
    Ok(())
}

/// Validates worker count, batch size and queue capacity
fn validate_pipeline(config: &Config) -> Result<(), ConfigError> {
    if config.workers < 1 {
        return Err(ConfigError::Validation(format!(
            "workers must be >= 1, got {}",
            config.workers
        )));
    }

    if config.batch_size < 1 {
        return Err(ConfigError::Validation(format!(
            "batch_size must be >= 1, got {}",
            config.batch_size
        )));
    }

    if config.queue_capacity < 1 {
        return Err(ConfigError::Validation(format!(
            "queue_capacity must be >= 1, got {}",
            config.queue_capacity
        )));
    }

    Ok(())
}

fn validate_entry_url(entry_url: &str) -> Result<(), ConfigError> {
    let url = Url::parse(entry_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid entry URL '{}': {}", entry_url, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Entry URL '{}' must use HTTP or HTTPS",
            entry_url
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "Entry URL '{}' has no host",
            entry_url
        )));
    }

    Ok(())
}

fn validate_host_pattern(pattern: &str) -> Result<(), ConfigError> {
    Regex::new(pattern)
        .map_err(|e| ConfigError::InvalidPattern(format!("host pattern '{}': {}", pattern, e)))?;
    Ok(())
}

/// The path pattern must compile and carry exactly one capture group
fn validate_path_pattern(pattern: &str) -> Result<(), ConfigError> {
    let regex = Regex::new(pattern)
        .map_err(|e| ConfigError::InvalidPattern(format!("path pattern '{}': {}", pattern, e)))?;

    // captures_len counts the implicit whole-match group
    let groups = regex.captures_len() - 1;
    if groups != 1 {
        return Err(ConfigError::InvalidPattern(format!(
            "path pattern '{}' must contain exactly one capture group, found {}",
            pattern, groups
        )));
    }

    Ok(())
}

fn validate_output(config: &Config) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_user_agent(user_agent: &str) -> Result<(), ConfigError> {
    if user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }
    Ok(())
}
