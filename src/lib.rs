//! Preview-Sweep: a checkpointed crawler for a preview-rendering service
//!
//! This crate walks the pages of a preview service that renders translation
//! resource repositories, drives a browser to each page, and records whether
//! the page rendered or showed an error. Outcomes are appended to flat
//! checkpoint files so that repeated runs only visit what is left.

pub mod checkpoint;
pub mod config;
pub mod crawler;
pub mod output;
pub mod renderer;
pub mod state;
pub mod targets;

use thiserror::Error;

/// Main error type for Preview-Sweep operations
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Malformed catalog response from {url}: {source}")]
    CatalogFormat {
        url: String,
        source: serde_json::Error,
    },

    #[error("Renderer error: {0}")]
    Render(#[from] renderer::RenderError),

    #[error("Checkpoint error: {0}")]
    Checkpoint(#[from] checkpoint::CheckpointError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Preview-Sweep operations
pub type Result<T> = std::result::Result<T, SweepError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use checkpoint::CheckpointStore;
pub use config::Config;
pub use crawler::{run_sweep, sweep, CrawlLoop, CrawlReport};
pub use renderer::{Outcome, PageRenderer};
pub use state::VisitState;
pub use targets::{CandidateUrl, TargetEnumerator};
