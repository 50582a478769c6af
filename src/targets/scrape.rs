//! Listing-page scrape enumerator

use crate::config::ScrapeConfig;
use crate::renderer::PageRenderer;
use crate::targets::links::extract_preview_links;
use crate::targets::{CandidateUrl, TargetEnumerator};
use crate::SweepError;
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

/// Produces candidates by scraping links from one rendered listing page
///
/// Borrows the sweep's renderer for the duration of the enumeration, so the
/// same browser session later visits the candidates.
pub struct ScrapeEnumerator<'a, R: PageRenderer> {
    renderer: &'a mut R,
    root: Url,
    listing_url: Url,
    ready_selector: String,
    path_prefix: String,
    timeout: Duration,
}

impl<'a, R: PageRenderer> ScrapeEnumerator<'a, R> {
    pub fn new(
        renderer: &'a mut R,
        root: &Url,
        config: &ScrapeConfig,
        timeout: Duration,
    ) -> Result<Self, SweepError> {
        let listing_url = root.join(&config.listing_query)?;

        Ok(Self {
            renderer,
            root: root.clone(),
            listing_url,
            ready_selector: config.ready_selector.clone(),
            path_prefix: config.path_prefix.clone(),
            timeout,
        })
    }
}

#[async_trait]
impl<'a, R: PageRenderer> TargetEnumerator for ScrapeEnumerator<'a, R> {
    async fn enumerate(&mut self) -> Result<Vec<CandidateUrl>, SweepError> {
        let html = self
            .renderer
            .page_source(&self.listing_url, &self.ready_selector, self.timeout)
            .await?;

        let links = extract_preview_links(&html, &self.root, &self.path_prefix);
        tracing::info!(
            "Scraped {} preview links from {}",
            links.len(),
            self.listing_url
        );

        Ok(links.iter().map(|link| CandidateUrl::parse(link)).collect())
    }
}
