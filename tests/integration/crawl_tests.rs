//! Integration tests for the sweep
//!
//! These tests use wiremock to stand in for the catalog API and a scripted
//! renderer in place of the browser, and test the full
//! enumerate-visit-checkpoint cycle end-to-end.

use async_trait::async_trait;
use preview_sweep::checkpoint::{read_lines, CheckpointStore};
use preview_sweep::config::{
    CatalogConfig, CheckpointConfig, Config, CrawlerConfig, PreviewConfig, RendererConfig,
    ScrapeConfig, Strategy,
};
use preview_sweep::crawler::{plan_sweep, sweep};
use preview_sweep::renderer::{Outcome, PageRenderer, RenderError, RenderResult};
use preview_sweep::targets::{CatalogEnumerator, TargetEnumerator};
use preview_sweep::SweepError;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PREVIEW_ROOT: &str = "https://preview.example.org";

/// Renderer that replays scripted outcomes and records every page it is asked for
#[derive(Default)]
struct ScriptedRenderer {
    /// Outcome per `<path>#<fragment>`; unscripted pages succeed
    outcomes: HashMap<String, Outcome>,
    listing_html: Option<String>,
    rendered: Vec<String>,
    listings: Vec<String>,
}

impl ScriptedRenderer {
    fn with_outcome(mut self, key: &str, outcome: Outcome) -> Self {
        self.outcomes.insert(key.to_string(), outcome);
        self
    }

    fn with_listing(mut self, html: &str) -> Self {
        self.listing_html = Some(html.to_string());
        self
    }
}

fn page_key(url: &Url) -> String {
    match url.fragment() {
        Some(fragment) => format!("{}#{}", url.path(), fragment),
        None => url.path().to_string(),
    }
}

#[async_trait]
impl PageRenderer for ScriptedRenderer {
    async fn render(&mut self, url: &Url, _timeout: Duration) -> Outcome {
        self.rendered.push(url.to_string());
        self.outcomes
            .get(&page_key(url))
            .cloned()
            .unwrap_or(Outcome::Success)
    }

    async fn page_source(
        &mut self,
        url: &Url,
        _ready_selector: &str,
        timeout: Duration,
    ) -> RenderResult<String> {
        self.listings.push(url.to_string());
        self.listing_html.clone().ok_or(RenderError::Timeout {
            url: url.to_string(),
            seconds: timeout.as_secs(),
        })
    }
}

struct Paths {
    _dir: TempDir,
    completed: PathBuf,
    errors: PathBuf,
}

fn temp_paths() -> Paths {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let completed = dir.path().join("completed_urls");
    let errors = dir.path().join("errors_urls");
    Paths {
        _dir: dir,
        completed,
        errors,
    }
}

/// Creates a catalog-strategy configuration against the given API endpoint
fn catalog_config(api_url: &str, paths: &Paths) -> Config {
    let mut catalog = CatalogConfig::with_api_url(api_url);
    catalog.owners = vec!["org".to_string()];
    catalog.subjects = vec!["Aligned Bible".to_string()];

    Config {
        preview: PreviewConfig {
            root: PREVIEW_ROOT.to_string(),
            rerender: false,
        },
        renderer: RendererConfig::default(),
        crawler: CrawlerConfig {
            strategy: Strategy::Catalog,
            delay_after_success_ms: 0, // No pause between pages in tests
        },
        checkpoint: CheckpointConfig {
            completed_path: paths.completed.to_string_lossy().into_owned(),
            errors_path: Some(paths.errors.to_string_lossy().into_owned()),
        },
        scrape: None,
        catalog: Some(catalog),
    }
}

fn scrape_config(paths: &Paths) -> Config {
    let mut config = catalog_config("http://127.0.0.1:1/unused", paths);
    config.crawler.strategy = Strategy::Scrape;
    config.catalog = None;
    config.scrape = Some(ScrapeConfig {
        listing_query: "?stage=latest".to_string(),
        ready_selector: ".listing".to_string(),
        path_prefix: "/u/".to_string(),
    });
    config
}

fn open_store(config: &Config) -> CheckpointStore {
    CheckpointStore::from_config(&config.checkpoint).expect("Failed to open checkpoint store")
}

async fn mount_catalog(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/api/v1/catalog/search"))
        .and(query_param("owner", "org"))
        .and(query_param("subject", "Aligned Bible"))
        .and(query_param("stage", "prod"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn single_entry_catalog() -> serde_json::Value {
    serde_json::json!({
        "data": [{
            "owner": "org",
            "full_name": "org/repo",
            "branch_or_tag_name": "v1",
            "ingredients": [{ "identifier": "gen" }]
        }]
    })
}

fn api_url(server: &MockServer) -> String {
    format!("{}/api/v1/catalog/search", server.uri())
}

#[tokio::test]
async fn test_single_success_is_checkpointed() {
    let server = MockServer::start().await;
    mount_catalog(&server, single_entry_catalog()).await;

    let paths = temp_paths();
    let config = catalog_config(&api_url(&server), &paths);
    let mut store = open_store(&config);
    let mut renderer = ScriptedRenderer::default();

    let report = sweep(&config, &mut renderer, &mut store)
        .await
        .expect("Sweep failed");

    assert_eq!(report.candidates, 1);
    assert_eq!(report.succeeded, 1);
    assert_eq!(report.errored, 0);

    assert_eq!(
        renderer.rendered,
        vec!["https://preview.example.org/u/org/repo/v1#gen".to_string()]
    );
    assert_eq!(
        read_lines(&paths.completed).unwrap(),
        vec!["/u/org/repo/v1#gen".to_string()]
    );
    assert!(read_lines(&paths.errors).unwrap().is_empty());
}

#[tokio::test]
async fn test_error_outcome_goes_to_errored_store() {
    let server = MockServer::start().await;
    mount_catalog(
        &server,
        serde_json::json!({
            "data": [{
                "owner": "org",
                "full_name": "org/repo",
                "branch_or_tag_name": "v1",
                "ingredients": [
                    { "identifier": "frt" },
                    { "identifier": "gen" },
                    { "identifier": "exo" },
                    { "identifier": "bak" }
                ]
            }]
        }),
    )
    .await;

    let paths = temp_paths();
    let config = catalog_config(&api_url(&server), &paths);
    let mut store = open_store(&config);
    let mut renderer = ScriptedRenderer::default().with_outcome(
        "/u/org/repo/v1#exo",
        Outcome::Error("Error marker on page: Error: bad USFM".to_string()),
    );

    let report = sweep(&config, &mut renderer, &mut store)
        .await
        .expect("Sweep failed");

    // Front and back matter are never visited
    assert_eq!(report.candidates, 2);
    assert_eq!(report.succeeded, 1);
    assert_eq!(report.errored, 1);
    assert_eq!(
        report.failures,
        vec![(
            "/u/org/repo/v1#exo".to_string(),
            "Error marker on page: Error: bad USFM".to_string()
        )]
    );

    assert_eq!(
        read_lines(&paths.completed).unwrap(),
        vec!["/u/org/repo/v1#gen".to_string()]
    );
    assert_eq!(
        read_lines(&paths.errors).unwrap(),
        vec!["/u/org/repo/v1#exo".to_string()]
    );
}

#[tokio::test]
async fn test_second_run_visits_nothing() {
    let server = MockServer::start().await;
    mount_catalog(
        &server,
        serde_json::json!({
            "data": [{
                "owner": "org",
                "full_name": "org/repo",
                "branch_or_tag_name": "v1",
                "ingredients": [{ "identifier": "gen" }, { "identifier": "exo" }]
            }]
        }),
    )
    .await;

    let paths = temp_paths();
    let config = catalog_config(&api_url(&server), &paths);

    let mut first = ScriptedRenderer::default()
        .with_outcome("/u/org/repo/v1#exo", Outcome::Error("Timed out".to_string()));
    let mut store = open_store(&config);
    sweep(&config, &mut first, &mut store)
        .await
        .expect("First sweep failed");
    assert_eq!(first.rendered.len(), 2);

    // Fresh store, as a restarted process would see it
    let mut second = ScriptedRenderer::default();
    let mut store = open_store(&config);
    let report = sweep(&config, &mut second, &mut store)
        .await
        .expect("Second sweep failed");

    assert!(second.rendered.is_empty());
    assert_eq!(report.skipped, 2);
    assert_eq!(report.visited(), 0);

    // Nothing was appended twice
    assert_eq!(read_lines(&paths.completed).unwrap().len(), 1);
    assert_eq!(read_lines(&paths.errors).unwrap().len(), 1);
}

#[tokio::test]
async fn test_checkpointed_keys_are_skipped() {
    let server = MockServer::start().await;
    mount_catalog(
        &server,
        serde_json::json!({
            "data": [{
                "owner": "org",
                "full_name": "org/repo",
                "branch_or_tag_name": "v1",
                "ingredients": [
                    { "identifier": "gen" },
                    { "identifier": "exo" },
                    { "identifier": "lev" }
                ]
            }]
        }),
    )
    .await;

    let paths = temp_paths();
    std::fs::write(&paths.completed, "/u/org/repo/v1#gen\n").unwrap();
    // Un-referenced form of the page also counts
    std::fs::write(&paths.errors, "/u/org/repo#exo\n").unwrap();

    let config = catalog_config(&api_url(&server), &paths);
    let mut store = open_store(&config);
    let mut renderer = ScriptedRenderer::default();

    let report = sweep(&config, &mut renderer, &mut store)
        .await
        .expect("Sweep failed");

    assert_eq!(
        renderer.rendered,
        vec!["https://preview.example.org/u/org/repo/v1#lev".to_string()]
    );
    assert_eq!(report.skipped, 2);
    assert_eq!(report.succeeded, 1);
}

#[tokio::test]
async fn test_errored_store_disabled() {
    let server = MockServer::start().await;
    mount_catalog(&server, single_entry_catalog()).await;

    let paths = temp_paths();
    let mut config = catalog_config(&api_url(&server), &paths);
    config.checkpoint.errors_path = None;

    let mut renderer = ScriptedRenderer::default()
        .with_outcome("/u/org/repo/v1#gen", Outcome::Error("Timed out".to_string()));

    let mut store = open_store(&config);
    let report = sweep(&config, &mut renderer, &mut store)
        .await
        .expect("Sweep failed");
    assert_eq!(report.errored, 1);
    assert!(!paths.errors.exists());
    assert!(read_lines(&paths.completed).unwrap().is_empty());

    // Without an errored store the page is retried on the next run
    let mut store = open_store(&config);
    sweep(&config, &mut renderer, &mut store)
        .await
        .expect("Second sweep failed");
    assert_eq!(renderer.rendered.len(), 2);
}

#[tokio::test]
async fn test_rerender_flag_in_visited_url() {
    let server = MockServer::start().await;
    mount_catalog(&server, single_entry_catalog()).await;

    let paths = temp_paths();
    let mut config = catalog_config(&api_url(&server), &paths);
    config.preview.rerender = true;

    let mut store = open_store(&config);
    let mut renderer = ScriptedRenderer::default();
    sweep(&config, &mut renderer, &mut store)
        .await
        .expect("Sweep failed");

    assert_eq!(
        renderer.rendered,
        vec!["https://preview.example.org/u/org/repo/v1?rerender=1#gen".to_string()]
    );
    // The checkpoint key never carries the query
    assert_eq!(
        read_lines(&paths.completed).unwrap(),
        vec!["/u/org/repo/v1#gen".to_string()]
    );
}

#[tokio::test]
async fn test_catalog_server_error_aborts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/catalog/search"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let paths = temp_paths();
    let config = catalog_config(&api_url(&server), &paths);
    let mut store = open_store(&config);
    let mut renderer = ScriptedRenderer::default();

    let result = sweep(&config, &mut renderer, &mut store).await;

    assert!(matches!(result, Err(SweepError::Http { .. })));
    assert!(renderer.rendered.is_empty());
    assert!(!paths.completed.exists());
}

#[tokio::test]
async fn test_malformed_catalog_aborts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/catalog/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"data\": 42}"))
        .mount(&server)
        .await;

    let paths = temp_paths();
    let config = catalog_config(&api_url(&server), &paths);

    let mut enumerator =
        CatalogEnumerator::new(config.catalog.clone().unwrap()).expect("Failed to build client");
    let result = enumerator.enumerate().await;

    assert!(matches!(result, Err(SweepError::CatalogFormat { .. })));
}

#[tokio::test]
async fn test_catalog_excludes_owners_and_adds_extra_refs() {
    let server = MockServer::start().await;
    mount_catalog(
        &server,
        serde_json::json!({
            "data": [
                {
                    "owner": "Door43-Catalog",
                    "full_name": "Door43-Catalog/en_ult",
                    "branch_or_tag_name": "v40",
                    "ingredients": [{ "identifier": "gen" }]
                },
                {
                    "owner": "org",
                    "full_name": "org/repo",
                    "branch_or_tag_name": "v1",
                    "ingredients": [{ "identifier": "rut" }]
                },
                {
                    "owner": "org",
                    "full_name": "org/empty",
                    "branch_or_tag_name": "v2"
                }
            ]
        }),
    )
    .await;

    let paths = temp_paths();
    let mut config = catalog_config(&api_url(&server), &paths);
    if let Some(catalog) = config.catalog.as_mut() {
        catalog.extra_refs = vec!["master".to_string()];
    }

    let mut enumerator =
        CatalogEnumerator::new(config.catalog.clone().unwrap()).expect("Failed to build client");
    let candidates = enumerator.enumerate().await.expect("Enumeration failed");

    let keys: Vec<&str> = candidates.iter().map(|c| c.key()).collect();
    assert_eq!(keys, vec!["/u/org/repo/v1#rut", "/u/org/repo/master#rut"]);
}

#[tokio::test]
async fn test_scrape_strategy_visits_listing_links() {
    let paths = temp_paths();
    let config = scrape_config(&paths);

    let listing = r#"<html><body><div class="listing">
        <a href="/u/org/repo/v1#gen">Genesis</a>
        <a href="https://preview.example.org/u/org/repo/v2">Repo v2</a>
        <a href="/u/org/repo/v1#gen">Genesis again</a>
        <a href="/about">About</a>
        <a href="https://elsewhere.example.com/u/x/y">Elsewhere</a>
        <a href="/u/org/repo/v3" download>Download</a>
    </div></body></html>"#;

    let mut renderer = ScriptedRenderer::default()
        .with_listing(listing)
        .with_outcome("/u/org/repo/v2", Outcome::Error("Timed out".to_string()));
    let mut store = open_store(&config);

    let report = sweep(&config, &mut renderer, &mut store)
        .await
        .expect("Sweep failed");

    assert_eq!(
        renderer.listings,
        vec!["https://preview.example.org/?stage=latest".to_string()]
    );
    assert_eq!(
        renderer.rendered,
        vec![
            "https://preview.example.org/u/org/repo/v1#gen".to_string(),
            "https://preview.example.org/u/org/repo/v2".to_string(),
        ]
    );
    assert_eq!(report.succeeded, 1);
    assert_eq!(report.errored, 1);

    assert_eq!(
        read_lines(&paths.completed).unwrap(),
        vec!["/u/org/repo/v1#gen".to_string()]
    );
    assert_eq!(
        read_lines(&paths.errors).unwrap(),
        vec!["/u/org/repo/v2".to_string()]
    );
}

#[tokio::test]
async fn test_scrape_listing_failure_aborts() {
    let paths = temp_paths();
    let config = scrape_config(&paths);

    // No listing scripted, so loading it times out
    let mut renderer = ScriptedRenderer::default();
    let mut store = open_store(&config);

    let result = sweep(&config, &mut renderer, &mut store).await;

    assert!(matches!(result, Err(SweepError::Render(RenderError::Timeout { .. }))));
    assert!(renderer.rendered.is_empty());
}

#[tokio::test]
async fn test_plan_partitions_without_rendering() {
    let server = MockServer::start().await;
    mount_catalog(
        &server,
        serde_json::json!({
            "data": [{
                "owner": "org",
                "full_name": "org/repo",
                "branch_or_tag_name": "v1",
                "ingredients": [{ "identifier": "gen" }, { "identifier": "exo" }]
            }]
        }),
    )
    .await;

    let paths = temp_paths();
    std::fs::write(&paths.completed, "/u/org/repo/v1#gen\n").unwrap();
    let config = catalog_config(&api_url(&server), &paths);

    let plan = plan_sweep(&config).await.expect("Planning failed");

    let pending: Vec<&str> = plan.pending.iter().map(|c| c.key()).collect();
    let skipped: Vec<&str> = plan.skipped.iter().map(|c| c.key()).collect();
    assert_eq!(pending, vec!["/u/org/repo/v1#exo"]);
    assert_eq!(skipped, vec!["/u/org/repo/v1#gen"]);

    // Planning never writes checkpoints
    assert_eq!(read_lines(&paths.completed).unwrap().len(), 1);
}
