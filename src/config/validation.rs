use crate::config::types::{CatalogConfig, Config, CrawlerConfig, HeaderConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_header_config(&config.headers)?;
    validate_catalog_config(&config.catalog)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    let host = Url::parse(&config.host)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid host '{}': {}", config.host, e)))?;

    if host.scheme() != "https" && host.scheme() != "http" {
        return Err(ConfigError::InvalidUrl(format!(
            "Host '{}' must use http or https",
            config.host
        )));
    }

    if host.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "Host '{}' has no host name",
            config.host
        )));
    }

    if config.request_timeout < 1 {
        return Err(ConfigError::Validation(
            "request_timeout must be >= 1s".to_string(),
        ));
    }

    if config.connect_timeout < 1 {
        return Err(ConfigError::Validation(
            "connect_timeout must be >= 1s".to_string(),
        ));
    }

    if config.min_pause > config.max_pause {
        return Err(ConfigError::Validation(format!(
            "min_pause ({}ms) must not exceed max_pause ({}ms)",
            config.min_pause, config.max_pause
        )));
    }

    Ok(())
}

/// Validates request headers
fn validate_header_config(config: &HeaderConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates extra catalog subcategories
fn validate_catalog_config(config: &CatalogConfig) -> Result<(), ConfigError> {
    for sub in &config.subcategory {
        validate_slug(&sub.slug)?;

        if sub.id == 0 {
            return Err(ConfigError::Validation(format!(
                "Subcategory '{}' must have a non-zero id",
                sub.slug
            )));
        }
    }

    Ok(())
}

/// Validates a path slug: non-empty, alphanumeric plus hyphens and underscores
fn validate_slug(slug: &str) -> Result<(), ConfigError> {
    if slug.is_empty() {
        return Err(ConfigError::Validation(
            "Subcategory slug cannot be empty".to_string(),
        ));
    }

    if !slug
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "Subcategory slug '{}' contains invalid characters",
            slug
        )));
    }

    Ok(())
}
