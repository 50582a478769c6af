use crate::ConfigError;
use serde::Deserialize;

/// Main configuration structure for Preview-Sweep
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub preview: PreviewConfig,
    #[serde(default)]
    pub renderer: RendererConfig,
    pub crawler: CrawlerConfig,
    pub checkpoint: CheckpointConfig,
    #[serde(default)]
    pub scrape: Option<ScrapeConfig>,
    #[serde(default)]
    pub catalog: Option<CatalogConfig>,
}

/// The preview service being swept
#[derive(Debug, Clone, Deserialize)]
pub struct PreviewConfig {
    /// Service root, e.g. "https://preview.door43.org"
    pub root: String,

    /// Append `?rerender=1` to every visited page
    #[serde(default)]
    pub rerender: bool,
}

/// Browser automation configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RendererConfig {
    /// Address of the running WebDriver server
    #[serde(rename = "webdriver-url", default = "default_webdriver_url")]
    pub webdriver_url: String,

    #[serde(default)]
    pub browser: Browser,

    #[serde(default)]
    pub headless: bool,

    /// Maximum wait for a terminal marker on each page (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// How often the markers are polled while waiting (milliseconds)
    #[serde(rename = "poll-interval-ms", default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Page loaded between visits so a marker from the previous page is never observed
    #[serde(rename = "blank-url", default = "default_blank_url")]
    pub blank_url: String,

    /// CSS selector of the element that must be clickable on a rendered page
    #[serde(rename = "success-selector", default = "default_success_selector")]
    pub success_selector: String,

    /// XPath of the element shown when rendering failed
    #[serde(rename = "error-xpath", default = "default_error_xpath")]
    pub error_xpath: String,
}

/// Browser driven through WebDriver
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Browser {
    #[default]
    Chrome,
    Firefox,
}

/// Crawl loop configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// How the candidate URLs are produced
    pub strategy: Strategy,

    /// Fixed pause after every successful visit (milliseconds)
    #[serde(rename = "delay-after-success-ms", default = "default_delay_after_success_ms")]
    pub delay_after_success_ms: u64,
}

/// Target enumeration strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Scrape preview links from a listing page
    Scrape,
    /// Flatten entries from the catalog search API
    Catalog,
}

/// Checkpoint file locations
#[derive(Debug, Clone, Deserialize)]
pub struct CheckpointConfig {
    #[serde(rename = "completed-path")]
    pub completed_path: String,

    /// Omit to stop recording errored URLs
    #[serde(rename = "errors-path", default)]
    pub errors_path: Option<String>,
}

/// Scrape strategy settings
#[derive(Debug, Clone, Deserialize)]
pub struct ScrapeConfig {
    /// Query string (or path) appended to the preview root to reach the listing page
    #[serde(rename = "listing-query")]
    pub listing_query: String,

    /// CSS selector that marks the listing as loaded
    #[serde(rename = "ready-selector")]
    pub ready_selector: String,

    /// Only links starting with this prefix become candidates
    #[serde(rename = "path-prefix", default = "default_path_prefix")]
    pub path_prefix: String,
}

/// Catalog strategy settings
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// Catalog search endpoint
    #[serde(rename = "api-url")]
    pub api_url: String,

    #[serde(default)]
    pub owners: Vec<String>,

    #[serde(default)]
    pub subjects: Vec<String>,

    #[serde(default = "default_stage")]
    pub stage: String,

    #[serde(default = "default_sort")]
    pub sort: String,

    #[serde(default = "default_order")]
    pub order: String,

    #[serde(default = "default_limit")]
    pub limit: u32,

    #[serde(rename = "request-timeout-secs", default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Ingredient identifiers never visited (front and back matter)
    #[serde(rename = "exclude-ingredients", default = "default_exclude_ingredients")]
    pub exclude_ingredients: Vec<String>,

    /// Entries owned by these organizations are never visited
    #[serde(rename = "exclude-owners", default = "default_exclude_owners")]
    pub exclude_owners: Vec<String>,

    /// Refs visited in addition to each entry's own branch or tag
    #[serde(rename = "extra-refs", default)]
    pub extra_refs: Vec<String>,
}

fn default_webdriver_url() -> String {
    "http://127.0.0.1:4444".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_poll_interval_ms() -> u64 {
    500
}

fn default_blank_url() -> String {
    "about:blank".to_string()
}

fn default_success_selector() -> String {
    "button[value=print]".to_string()
}

fn default_error_xpath() -> String {
    "//div[contains(text(), 'Error')]".to_string()
}

fn default_delay_after_success_ms() -> u64 {
    5000
}

fn default_path_prefix() -> String {
    "/u/".to_string()
}

fn default_stage() -> String {
    "prod".to_string()
}

fn default_sort() -> String {
    "released".to_string()
}

fn default_order() -> String {
    "desc".to_string()
}

fn default_limit() -> u32 {
    300
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_exclude_ingredients() -> Vec<String> {
    vec!["frt".to_string(), "bak".to_string()]
}

fn default_exclude_owners() -> Vec<String> {
    vec!["unfoldingWord".to_string(), "Door43-Catalog".to_string()]
}

impl Config {
    /// The `[scrape]` section, required by the scrape strategy
    pub fn scrape_section(&self) -> Result<&ScrapeConfig, ConfigError> {
        self.scrape.as_ref().ok_or_else(|| {
            ConfigError::Validation("strategy \"scrape\" requires a [scrape] section".to_string())
        })
    }

    /// The `[catalog]` section, required by the catalog strategy
    pub fn catalog_section(&self) -> Result<&CatalogConfig, ConfigError> {
        self.catalog.as_ref().ok_or_else(|| {
            ConfigError::Validation("strategy \"catalog\" requires a [catalog] section".to_string())
        })
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            browser: Browser::default(),
            headless: false,
            timeout_secs: default_timeout_secs(),
            poll_interval_ms: default_poll_interval_ms(),
            blank_url: default_blank_url(),
            success_selector: default_success_selector(),
            error_xpath: default_error_xpath(),
        }
    }
}

impl CatalogConfig {
    /// Builds a catalog section with default filters for the given endpoint
    pub fn with_api_url(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            owners: Vec::new(),
            subjects: Vec::new(),
            stage: default_stage(),
            sort: default_sort(),
            order: default_order(),
            limit: default_limit(),
            request_timeout_secs: default_request_timeout_secs(),
            exclude_ingredients: default_exclude_ingredients(),
            exclude_owners: default_exclude_owners(),
            extra_refs: Vec::new(),
        }
    }
}
