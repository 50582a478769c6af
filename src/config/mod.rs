//! Configuration module for Preview-Sweep
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use preview_sweep::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sweep.toml")).unwrap();
//! println!("Sweeping {}", config.preview.root);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Browser, CatalogConfig, CheckpointConfig, Config, CrawlerConfig, PreviewConfig,
    RendererConfig, ScrapeConfig, Strategy,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
