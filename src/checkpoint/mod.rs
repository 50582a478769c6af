//! Checkpoint module for persisting visit outcomes
//!
//! This module handles the flat files that make repeated sweeps incremental:
//! - Loading previously completed and errored URLs
//! - Appending each new outcome as soon as it is known
//! - Answering whether a candidate was already classified

mod store;

pub use store::{read_lines, CheckpointStore};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or writing checkpoint files
#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("Checkpoint file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type for checkpoint operations
pub type CheckpointResult<T> = Result<T, CheckpointError>;
