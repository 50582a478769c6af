//! Catalog search enumerator
//!
//! This module handles the catalog strategy:
//! - Building the search request from the configured owners and subjects
//! - Fetching and decoding the JSON entry list
//! - Flattening entries into one candidate per (entry, ref, ingredient)

use crate::config::CatalogConfig;
use crate::targets::{CandidateUrl, TargetEnumerator};
use crate::SweepError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;
use url::Url;

/// Top-level catalog search response
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogResponse {
    pub data: Vec<CatalogEntry>,
}

/// One released resource in the catalog
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntry {
    pub owner: String,

    /// `<owner>/<repo>`
    pub full_name: String,

    pub branch_or_tag_name: String,

    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
}

/// A named sub-resource of an entry, e.g. a book
#[derive(Debug, Clone, Deserialize)]
pub struct Ingredient {
    pub identifier: String,
}

/// Builds the HTTP client used for catalog requests
///
/// # Example
///
/// ```no_run
/// use preview_sweep::targets::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    let user_agent = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Produces candidates from the catalog search API
pub struct CatalogEnumerator {
    client: Client,
    config: CatalogConfig,
}

impl CatalogEnumerator {
    pub fn new(config: CatalogConfig) -> Result<Self, SweepError> {
        let client = build_http_client(Duration::from_secs(config.request_timeout_secs))?;
        Ok(Self { client, config })
    }

    /// Search URL with repeated `owner` and `subject` parameters
    pub fn search_url(&self) -> Result<Url, SweepError> {
        let mut url = Url::parse(&self.config.api_url)?;

        {
            let mut query = url.query_pairs_mut();
            for owner in &self.config.owners {
                query.append_pair("owner", owner);
            }
            for subject in &self.config.subjects {
                query.append_pair("subject", subject);
            }
            query
                .append_pair("stage", &self.config.stage)
                .append_pair("sort", &self.config.sort)
                .append_pair("order", &self.config.order)
                .append_pair("limit", &self.config.limit.to_string());
        }

        Ok(url)
    }

    /// Fetches the entry list
    ///
    /// Any transport failure, non-success status, or undecodable body is
    /// returned as an error; the sweep cannot proceed without it.
    pub async fn fetch_entries(&self) -> Result<Vec<CatalogEntry>, SweepError> {
        let url = self.search_url()?;
        tracing::info!("Querying catalog: {}", url);

        let http_err = |source: reqwest::Error| SweepError::Http {
            url: url.to_string(),
            source,
        };

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(http_err)?
            .error_for_status()
            .map_err(http_err)?;

        let body = response.text().await.map_err(http_err)?;

        let parsed: CatalogResponse =
            serde_json::from_str(&body).map_err(|source| SweepError::CatalogFormat {
                url: url.to_string(),
                source,
            })?;

        tracing::info!("Catalog returned {} entries", parsed.data.len());
        Ok(parsed.data)
    }
}

#[async_trait]
impl TargetEnumerator for CatalogEnumerator {
    async fn enumerate(&mut self) -> Result<Vec<CandidateUrl>, SweepError> {
        let entries = self.fetch_entries().await?;
        let candidates = flatten_entries(&entries, &self.config);
        tracing::info!(
            "Flattened {} catalog entries into {} candidates",
            entries.len(),
            candidates.len()
        );
        Ok(candidates)
    }
}

/// Flattens catalog entries into candidates
///
/// Entries whose owner is excluded contribute nothing. For the rest, each
/// ref (the entry's own branch or tag, then any extra refs) is crossed with
/// every ingredient that is not excluded. Keys containing a line break are
/// dropped, as are duplicates, keeping first-seen order.
pub fn flatten_entries(entries: &[CatalogEntry], config: &CatalogConfig) -> Vec<CandidateUrl> {
    let mut seen = HashSet::new();
    let mut candidates = Vec::new();

    for entry in entries {
        if config.exclude_owners.iter().any(|o| *o == entry.owner) {
            tracing::debug!("Skipping {} (excluded owner)", entry.full_name);
            continue;
        }

        let mut refs = vec![entry.branch_or_tag_name.as_str()];
        for extra in &config.extra_refs {
            if !refs.contains(&extra.as_str()) {
                refs.push(extra.as_str());
            }
        }

        for reference in refs {
            for ingredient in &entry.ingredients {
                if config
                    .exclude_ingredients
                    .iter()
                    .any(|i| *i == ingredient.identifier)
                {
                    continue;
                }

                let candidate =
                    CandidateUrl::from_catalog(&entry.full_name, reference, &ingredient.identifier);

                // Checkpoint files hold one key per line
                if candidate.key().contains(['\n', '\r']) {
                    tracing::warn!("Skipping {:?} (line break in key)", candidate.key());
                    continue;
                }

                if seen.insert(candidate.key().to_string()) {
                    candidates.push(candidate);
                }
            }
        }
    }

    candidates
}
