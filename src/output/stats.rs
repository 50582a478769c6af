//! Statistics over the checkpoint files
//!
//! This module reads the completed and errored files directly, so it works
//! without a browser and without a previous run in the same process.

use crate::checkpoint::{read_lines, CheckpointResult};
use crate::config::CheckpointConfig;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Counts for one checkpoint file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStatistics {
    pub path: PathBuf,

    /// Non-blank lines in the file
    pub lines: usize,

    /// Distinct keys
    pub unique: usize,

    /// Lines repeating an earlier key
    pub duplicates: usize,
}

/// Checkpoint statistics summary
#[derive(Debug, Clone)]
pub struct CheckpointStatistics {
    pub completed: FileStatistics,

    /// `None` when the errored store is disabled
    pub errored: Option<FileStatistics>,

    /// Keys present in both files, sorted
    pub in_both: Vec<String>,
}

/// Loads statistics from the configured checkpoint files
///
/// Missing files count as empty.
pub fn load_statistics(config: &CheckpointConfig) -> CheckpointResult<CheckpointStatistics> {
    let (completed, completed_keys) = file_statistics(Path::new(&config.completed_path))?;

    let (errored, in_both) = match &config.errors_path {
        Some(errors_path) => {
            let (stats, errored_keys) = file_statistics(Path::new(errors_path))?;
            let mut in_both: Vec<String> = completed_keys
                .intersection(&errored_keys)
                .cloned()
                .collect();
            in_both.sort();
            (Some(stats), in_both)
        }
        None => (None, Vec::new()),
    };

    Ok(CheckpointStatistics {
        completed,
        errored,
        in_both,
    })
}

fn file_statistics(path: &Path) -> CheckpointResult<(FileStatistics, HashSet<String>)> {
    let lines = read_lines(path)?;
    let line_count = lines.len();
    let keys: HashSet<String> = lines.into_iter().collect();

    let stats = FileStatistics {
        path: path.to_path_buf(),
        lines: line_count,
        unique: keys.len(),
        duplicates: line_count - keys.len(),
    };

    Ok((stats, keys))
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CheckpointStatistics) {
    println!("=== Checkpoint Statistics ===\n");

    print_file("Completed", &stats.completed);

    match &stats.errored {
        Some(errored) => print_file("Errored", errored),
        None => {
            println!("Errored:");
            println!("  (errored store disabled)");
            println!();
        }
    }

    if !stats.in_both.is_empty() {
        println!("Keys in both files ({}):", stats.in_both.len());
        for key in &stats.in_both {
            println!("  - {}", key);
        }
        println!();
    }

    let errored_unique = stats.errored.as_ref().map(|e| e.unique).unwrap_or(0);
    let classified = stats.completed.unique + errored_unique;
    let success_rate = if classified > 0 {
        (stats.completed.unique as f64 / classified as f64) * 100.0
    } else {
        0.0
    };

    println!(
        "Success Rate: {:.1}% ({} / {} keys completed)",
        success_rate, stats.completed.unique, classified
    );
}

fn print_file(label: &str, stats: &FileStatistics) {
    println!("{} ({}):", label, stats.path.display());
    println!("  Lines: {}", stats.lines);
    println!("  Unique keys: {}", stats.unique);
    println!("  Duplicates: {}", stats.duplicates);
    println!();
}
