//! Crawl loop - visits candidates and records their outcomes
//!
//! For every candidate, in order:
//! - skip it if any of its keys is already checkpointed
//! - otherwise render it once and append the key to the completed or errored store
//! - pause for the fixed delay after a success
//!
//! A single bad page never stops the loop; only a failed checkpoint write does.

use crate::checkpoint::CheckpointStore;
use crate::config::Config;
use crate::crawler::CrawlReport;
use crate::renderer::{Outcome, PageRenderer};
use crate::state::VisitState;
use crate::targets::CandidateUrl;
use crate::SweepError;
use std::time::Duration;
use url::Url;

/// Per-run knobs of the crawl loop
#[derive(Debug, Clone)]
pub struct LoopSettings {
    /// Append `?rerender=1` to visited pages
    pub rerender: bool,

    /// Maximum wait for each page
    pub timeout: Duration,

    /// Pause after each successful visit
    pub delay_after_success: Duration,
}

impl LoopSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            rerender: config.preview.rerender,
            timeout: Duration::from_secs(config.renderer.timeout_secs),
            delay_after_success: Duration::from_millis(config.crawler.delay_after_success_ms),
        }
    }
}

/// Sequential crawl over a fixed candidate list
pub struct CrawlLoop<'a, R: PageRenderer> {
    renderer: &'a mut R,
    store: &'a mut CheckpointStore,
    root: Url,
    settings: LoopSettings,
}

impl<'a, R: PageRenderer> CrawlLoop<'a, R> {
    pub fn new(
        renderer: &'a mut R,
        store: &'a mut CheckpointStore,
        root: Url,
        settings: LoopSettings,
    ) -> Self {
        Self {
            renderer,
            store,
            root,
            settings,
        }
    }

    /// Runs the loop to completion
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlReport)` - Every candidate was visited or skipped
    /// * `Err(SweepError)` - A checkpoint file could not be written
    pub async fn run(&mut self, candidates: &[CandidateUrl]) -> Result<CrawlReport, SweepError> {
        tracing::info!(
            "Starting sweep over {} candidates ({} completed, {} errored on record)",
            candidates.len(),
            self.store.completed_len(),
            self.store.errored_len()
        );
        if !self.store.errors_enabled() {
            tracing::info!("Errored store disabled; failing pages will be retried on the next run");
        }

        let mut report = CrawlReport::new(candidates.len());

        for candidate in candidates {
            let (state, message) = self.process_candidate(candidate).await?;
            report.record(candidate.key(), state, message.as_deref());

            if state.was_visited() && report.visited() % 10 == 0 {
                tracing::info!(
                    "Progress: {} visited ({} ok, {} errored), {} skipped, {} remaining",
                    report.visited(),
                    report.succeeded,
                    report.errored,
                    report.skipped,
                    report.remaining()
                );
            }
        }

        report.finish();
        tracing::info!(
            "Sweep finished: {} succeeded, {} errored, {} skipped",
            report.succeeded,
            report.errored,
            report.skipped
        );

        Ok(report)
    }

    /// Moves one candidate out of `Pending`
    async fn process_candidate(
        &mut self,
        candidate: &CandidateUrl,
    ) -> Result<(VisitState, Option<String>), SweepError> {
        if self.store.covers(candidate) {
            tracing::debug!("Skipping {} (already checkpointed)", candidate);
            return Ok((VisitState::Skipped, None));
        }

        let outcome = match candidate.preview_url(&self.root, self.settings.rerender) {
            Ok(url) => {
                tracing::info!("Rendering {}", url);
                self.renderer.render(&url, self.settings.timeout).await
            }
            Err(e) => Outcome::Error(format!("Cannot build preview URL: {}", e)),
        };

        let state = VisitState::from_outcome(&outcome);
        debug_assert!(VisitState::Pending.can_transition_to(state));

        if outcome.is_success() {
            self.store.append_completed(candidate.key())?;
            tracing::info!("SUCCESS: {}", candidate);

            if !self.settings.delay_after_success.is_zero() {
                tokio::time::sleep(self.settings.delay_after_success).await;
            }

            return Ok((state, None));
        }

        let message = outcome.message().unwrap_or_default().to_string();
        tracing::warn!("ERROR: {}: {}", candidate, message);
        self.store.append_errored(candidate.key())?;
        Ok((state, Some(message)))
    }
}
