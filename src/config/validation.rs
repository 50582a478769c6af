use crate::config::types::{
    CatalogConfig, CheckpointConfig, Config, PreviewConfig, RendererConfig, ScrapeConfig,
    Strategy,
};
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_preview_config(&config.preview)?;
    validate_renderer_config(&config.renderer)?;
    validate_checkpoint_config(&config.checkpoint)?;

    match config.crawler.strategy {
        Strategy::Scrape => validate_scrape_config(config.scrape_section()?)?,
        Strategy::Catalog => validate_catalog_config(config.catalog_section()?)?,
    }

    Ok(())
}

fn validate_preview_config(config: &PreviewConfig) -> Result<(), ConfigError> {
    validate_http_url("preview root", &config.root)
}

fn validate_renderer_config(config: &RendererConfig) -> Result<(), ConfigError> {
    Url::parse(&config.webdriver_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid webdriver-url: {}", e)))?;

    if config.timeout_secs < 1 || config.timeout_secs > 600 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be between 1 and 600, got {}",
            config.timeout_secs
        )));
    }

    if config.poll_interval_ms < 50 {
        return Err(ConfigError::Validation(format!(
            "poll-interval-ms must be >= 50ms, got {}ms",
            config.poll_interval_ms
        )));
    }

    validate_css_selector("success-selector", &config.success_selector)?;

    if config.error_xpath.trim().is_empty() {
        return Err(ConfigError::Validation("error-xpath cannot be empty".to_string()));
    }

    Ok(())
}

fn validate_checkpoint_config(config: &CheckpointConfig) -> Result<(), ConfigError> {
    if config.completed_path.is_empty() {
        return Err(ConfigError::Validation("completed-path cannot be empty".to_string()));
    }

    if let Some(errors_path) = &config.errors_path {
        if errors_path.is_empty() {
            return Err(ConfigError::Validation(
                "errors-path cannot be empty (omit it to disable the errored store)".to_string(),
            ));
        }

        if *errors_path == config.completed_path {
            return Err(ConfigError::Validation(format!(
                "errors-path and completed-path must differ, both are '{}'",
                errors_path
            )));
        }
    }

    Ok(())
}

fn validate_scrape_config(config: &ScrapeConfig) -> Result<(), ConfigError> {
    validate_css_selector("ready-selector", &config.ready_selector)?;

    if !config.path_prefix.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "path-prefix must start with '/', got '{}'",
            config.path_prefix
        )));
    }

    Ok(())
}

fn validate_catalog_config(config: &CatalogConfig) -> Result<(), ConfigError> {
    validate_http_url("catalog api-url", &config.api_url)?;

    if config.limit < 1 {
        return Err(ConfigError::Validation(format!(
            "catalog limit must be >= 1, got {}",
            config.limit
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "catalog request-timeout-secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Checks that a URL parses and uses an HTTP(S) scheme
fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            field, value
        )));
    }

    Ok(())
}

fn validate_css_selector(field: &str, selector: &str) -> Result<(), ConfigError> {
    Selector::parse(selector).map_err(|e| {
        ConfigError::Validation(format!(
            "{} '{}' is not a valid CSS selector: {:?}",
            field, selector, e
        ))
    })?;
    Ok(())
}
