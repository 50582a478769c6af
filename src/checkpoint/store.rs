//! Flat-file checkpoint store
//!
//! Two append-only files of newline-delimited keys: one for pages that
//! rendered, one for pages that errored. Both are read fully at startup and
//! appended to one line at a time afterwards.

use crate::checkpoint::{CheckpointError, CheckpointResult};
use crate::config::CheckpointConfig;
use crate::targets::CandidateUrl;
use std::collections::HashSet;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Durable record of URLs already classified by earlier runs
#[derive(Debug)]
pub struct CheckpointStore {
    completed_path: PathBuf,
    errors_path: Option<PathBuf>,
    completed: HashSet<String>,
    errored: HashSet<String>,
}

impl CheckpointStore {
    /// Opens the store, loading any existing records
    ///
    /// Missing files are treated as empty. Passing `None` for `errors_path`
    /// disables the errored store entirely.
    pub fn open(
        completed_path: impl Into<PathBuf>,
        errors_path: Option<PathBuf>,
    ) -> CheckpointResult<Self> {
        let completed_path = completed_path.into();
        let completed: HashSet<String> = read_lines(&completed_path)?.into_iter().collect();

        let errored: HashSet<String> = match &errors_path {
            Some(path) => read_lines(path)?.into_iter().collect(),
            None => HashSet::new(),
        };

        tracing::info!(
            "Loaded checkpoints: {} completed, {} errored",
            completed.len(),
            errored.len()
        );

        Ok(Self {
            completed_path,
            errors_path,
            completed,
            errored,
        })
    }

    /// Opens the store at the locations named in the configuration
    pub fn from_config(config: &CheckpointConfig) -> CheckpointResult<Self> {
        Self::open(
            &config.completed_path,
            config.errors_path.as_ref().map(PathBuf::from),
        )
    }

    /// Returns true if `key` is recorded as completed or errored
    pub fn contains(&self, key: &str) -> bool {
        self.completed.contains(key) || self.errored.contains(key)
    }

    /// Returns true if any of the candidate's skip keys is recorded
    pub fn covers(&self, candidate: &CandidateUrl) -> bool {
        candidate.skip_keys().any(|key| self.contains(key))
    }

    /// Appends `key` to the completed file
    pub fn append_completed(&mut self, key: &str) -> CheckpointResult<()> {
        append_line(&self.completed_path, key)?;
        self.completed.insert(key.to_string());
        Ok(())
    }

    /// Appends `key` to the errored file
    ///
    /// Returns `false` without touching disk when the errored store is disabled.
    pub fn append_errored(&mut self, key: &str) -> CheckpointResult<bool> {
        let Some(path) = &self.errors_path else {
            return Ok(false);
        };

        append_line(path, key)?;
        self.errored.insert(key.to_string());
        Ok(true)
    }

    pub fn errors_enabled(&self) -> bool {
        self.errors_path.is_some()
    }

    pub fn completed_len(&self) -> usize {
        self.completed.len()
    }

    pub fn errored_len(&self) -> usize {
        self.errored.len()
    }
}

/// Reads every non-blank line of a checkpoint file
///
/// A file that does not exist yet yields no lines.
pub fn read_lines(path: &Path) -> CheckpointResult<Vec<String>> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
        Err(source) => Err(CheckpointError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Appends one line and syncs it to disk before returning
fn append_line(path: &Path, line: &str) -> CheckpointResult<()> {
    let io_err = |source: std::io::Error| CheckpointError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(io_err)?;

    writeln!(file, "{}", line).map_err(io_err)?;
    file.flush().map_err(io_err)?;
    file.sync_data().map_err(io_err)?;

    Ok(())
}
