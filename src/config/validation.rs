use crate::config::types::{Config, CrawlerConfig, NavigatorConfig, OutputConfig, ProxyConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_navigator_config(&config.navigator)?;
    validate_proxy_config(&config.proxy)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the time budget given on the command line
pub fn validate_time(seconds: i64) -> Result<u64, ConfigError> {
    if seconds < 1 {
        return Err(ConfigError::InvalidTime(seconds));
    }
    Ok(seconds as u64)
}

/// Validates the depth budget given on the command line
pub fn validate_depth(depth: i64) -> Result<u32, ConfigError> {
    if depth < 1 || depth > u32::MAX as i64 {
        return Err(ConfigError::InvalidDepth(depth));
    }
    Ok(depth as u32)
}

/// Validates crawl parameters
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_time < 1 {
        return Err(ConfigError::InvalidTime(0));
    }

    if config.max_depth < 1 {
        return Err(ConfigError::InvalidDepth(0));
    }

    Ok(())
}

/// Validates anti-bot navigation settings
fn validate_navigator_config(config: &NavigatorConfig) -> Result<(), ConfigError> {
    if config.user_agents.is_empty() {
        return Err(ConfigError::Validation(
            "user-agents must contain at least one entry".to_string(),
        ));
    }

    if let Some(agent) = config.user_agents.iter().find(|a| a.trim().is_empty()) {
        return Err(ConfigError::Validation(format!(
            "user-agents cannot contain blank entries, got '{}'",
            agent
        )));
    }

    Url::parse(&config.bootstrap_referer).map_err(|e| {
        ConfigError::Validation(format!(
            "bootstrap-referer '{}' is not a URL: {}",
            config.bootstrap_referer, e
        ))
    })?;

    if config.consent_selector.trim().is_empty() {
        return Err(ConfigError::Validation(
            "consent-selector cannot be empty".to_string(),
        ));
    }

    if scraper::Selector::parse(&config.consent_selector).is_err() {
        return Err(ConfigError::Validation(format!(
            "consent-selector '{}' is not a valid CSS selector",
            config.consent_selector
        )));
    }

    if config.consent_wait_min_ms > config.consent_wait_max_ms {
        return Err(ConfigError::Validation(format!(
            "consent-wait-min-ms ({}) must not exceed consent-wait-max-ms ({})",
            config.consent_wait_min_ms, config.consent_wait_max_ms
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "request-timeout-secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates proxy settings
fn validate_proxy_config(config: &ProxyConfig) -> Result<(), ConfigError> {
    match &config.server {
        Some(server) => {
            Url::parse(server).map_err(|e| {
                ConfigError::Validation(format!("proxy server '{}' is not a URL: {}", server, e))
            })?;
        }
        None => {
            if config.username.is_some() || config.password.is_some() {
                return Err(ConfigError::Validation(
                    "proxy username/password given without a proxy server".to_string(),
                ));
            }
        }
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}
