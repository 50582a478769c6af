//! Crawler module for sweeping the preview service
//!
//! This module contains the crawl-checkpoint-and-classify logic:
//! - Enumerating candidates with the configured strategy
//! - Partitioning them against the checkpoint store
//! - Visiting each pending page and recording its outcome

mod coordinator;
mod report;

pub use coordinator::{CrawlLoop, LoopSettings};
pub use report::CrawlReport;

use crate::checkpoint::CheckpointStore;
use crate::config::{Config, Strategy};
use crate::renderer::{PageRenderer, WebDriverRenderer};
use crate::targets::{enumerate_targets, CandidateUrl, CatalogEnumerator, TargetEnumerator};
use crate::SweepError;
use url::Url;

/// Runs a complete sweep
///
/// This is the main entry point. It will:
/// 1. Open the checkpoint store
/// 2. Connect to the browser
/// 3. Enumerate candidates
/// 4. Visit every candidate not already checkpointed
///
/// The browser session is closed whether or not the sweep succeeded.
pub async fn run_sweep(config: &Config) -> Result<CrawlReport, SweepError> {
    let mut store = CheckpointStore::from_config(&config.checkpoint)?;
    let mut renderer = WebDriverRenderer::connect(&config.renderer).await?;

    let result = sweep(config, &mut renderer, &mut store).await;

    if let Err(e) = renderer.quit().await {
        tracing::warn!("Failed to close browser session: {}", e);
    }

    result
}

/// Enumerates and visits candidates with an already-open renderer and store
pub async fn sweep<R: PageRenderer>(
    config: &Config,
    renderer: &mut R,
    store: &mut CheckpointStore,
) -> Result<CrawlReport, SweepError> {
    let root = Url::parse(&config.preview.root)?;
    let candidates = enumerate_targets(config, &root, renderer).await?;

    let mut crawl = CrawlLoop::new(renderer, store, root, LoopSettings::from_config(config));
    crawl.run(&candidates).await
}

/// Candidates split by whether a sweep would visit them
#[derive(Debug, Clone, Default)]
pub struct SweepPlan {
    pub pending: Vec<CandidateUrl>,
    pub skipped: Vec<CandidateUrl>,
}

impl SweepPlan {
    pub fn partition(candidates: Vec<CandidateUrl>, store: &CheckpointStore) -> Self {
        let (skipped, pending) = candidates
            .into_iter()
            .partition(|candidate| store.covers(candidate));
        Self { pending, skipped }
    }
}

/// Enumerates candidates without rendering any of them
///
/// The catalog strategy needs no browser. The scrape strategy opens one just
/// long enough to load the listing page.
pub async fn plan_sweep(config: &Config) -> Result<SweepPlan, SweepError> {
    let store = CheckpointStore::from_config(&config.checkpoint)?;
    let root = Url::parse(&config.preview.root)?;

    let candidates = match config.crawler.strategy {
        Strategy::Catalog => {
            CatalogEnumerator::new(config.catalog_section()?.clone())?
                .enumerate()
                .await?
        }
        Strategy::Scrape => {
            let mut renderer = WebDriverRenderer::connect(&config.renderer).await?;
            let result = enumerate_targets(config, &root, &mut renderer).await;
            if let Err(e) = renderer.quit().await {
                tracing::warn!("Failed to close browser session: {}", e);
            }
            result?
        }
    };

    Ok(SweepPlan::partition(candidates, &store))
}
