//! Output module for run reports and checkpoint summaries
//!
//! This module handles:
//! - Printing the end-of-run report
//! - Printing the dry-run plan
//! - Reading and printing checkpoint statistics

pub mod stats;

pub use stats::{load_statistics, print_statistics, CheckpointStatistics, FileStatistics};

use crate::crawler::{CrawlReport, SweepPlan};

/// Prints the end-of-run report to stdout
pub fn print_report(report: &CrawlReport) {
    println!("=== Sweep Report ===\n");

    println!("Candidates: {}", report.candidates);
    println!("  Skipped (already checkpointed): {}", report.skipped);
    println!("  Succeeded: {}", report.succeeded);
    println!("  Errored: {}", report.errored);

    if let Some(seconds) = report.duration_seconds() {
        println!("  Duration: {}s", seconds);
    }
    println!();

    if !report.failures.is_empty() {
        println!("Errored URLs ({}):", report.failures.len());
        for (key, message) in &report.failures {
            println!("  - {}: {}", key, message);
        }
        println!();
    }
}

/// Prints which candidates a sweep would visit and which it would skip
pub fn print_plan(plan: &SweepPlan) {
    println!("Would visit ({}):", plan.pending.len());
    for candidate in &plan.pending {
        println!("  - {}", candidate);
    }
    println!();

    println!("Would skip ({}):", plan.skipped.len());
    for candidate in &plan.skipped {
        println!("  - {}", candidate);
    }
    println!();
}
