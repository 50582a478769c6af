//! Target enumeration
//!
//! This module produces the ordered list of preview pages a sweep visits:
//! - Scraping preview links from a rendered listing page
//! - Flattening entries returned by the catalog search API
//!
//! Enumeration is eager and happens once, before the crawl loop starts. A
//! failure here aborts the sweep.

mod candidate;
mod catalog;
mod links;
mod scrape;

pub use candidate::CandidateUrl;
pub use catalog::{
    build_http_client, flatten_entries, CatalogEnumerator, CatalogEntry, CatalogResponse,
    Ingredient,
};
pub use links::extract_preview_links;
pub use scrape::ScrapeEnumerator;

use crate::config::{Config, Strategy};
use crate::renderer::PageRenderer;
use crate::SweepError;
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

/// Source of candidate URLs
#[async_trait]
pub trait TargetEnumerator: Send {
    /// Produces every candidate for this run, in visiting order
    async fn enumerate(&mut self) -> Result<Vec<CandidateUrl>, SweepError>;
}

/// Runs the enumerator selected by the configuration
///
/// The scrape strategy borrows `renderer` to load the listing page; the
/// catalog strategy never touches it.
pub async fn enumerate_targets<R: PageRenderer>(
    config: &Config,
    root: &Url,
    renderer: &mut R,
) -> Result<Vec<CandidateUrl>, SweepError> {
    match config.crawler.strategy {
        Strategy::Scrape => {
            let timeout = Duration::from_secs(config.renderer.timeout_secs);
            ScrapeEnumerator::new(renderer, root, config.scrape_section()?, timeout)?
                .enumerate()
                .await
        }
        Strategy::Catalog => {
            CatalogEnumerator::new(config.catalog_section()?.clone())?
                .enumerate()
                .await
        }
    }
}
