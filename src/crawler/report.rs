//! Per-run tallies of the crawl loop

use crate::state::VisitState;
use chrono::{DateTime, Utc};

/// Summary of one sweep
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Number of candidates produced by the enumerator
    pub candidates: usize,

    /// Candidates already present in a checkpoint file
    pub skipped: usize,

    /// Candidates rendered successfully in this run
    pub succeeded: usize,

    /// Candidates that errored in this run
    pub errored: usize,

    /// Errored keys with the renderer's message, in visiting order
    pub failures: Vec<(String, String)>,

    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl CrawlReport {
    pub fn new(candidates: usize) -> Self {
        Self {
            candidates,
            skipped: 0,
            succeeded: 0,
            errored: 0,
            failures: Vec::new(),
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Counts one candidate that reached `state`
    pub fn record(&mut self, key: &str, state: VisitState, message: Option<&str>) {
        match state {
            VisitState::Skipped => self.skipped += 1,
            VisitState::Success => self.succeeded += 1,
            VisitState::Errored => {
                self.errored += 1;
                self.failures
                    .push((key.to_string(), message.unwrap_or_default().to_string()));
            }
            VisitState::Pending => {
                tracing::debug!("Ignoring non-terminal state for {}", key);
            }
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Candidates rendered in this run
    pub fn visited(&self) -> usize {
        self.succeeded + self.errored
    }

    /// Candidates not yet accounted for
    pub fn remaining(&self) -> usize {
        self.candidates.saturating_sub(self.visited() + self.skipped)
    }

    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at.map(|finished| (finished - self.started_at).num_seconds())
    }
}
