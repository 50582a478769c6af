//! Page renderer capability
//!
//! The sweep never drives a browser directly. It talks to a [`PageRenderer`],
//! which navigates to a page and reports a single tagged [`Outcome`] once a
//! success or error marker shows up (or the wait times out).
//!
//! - `WebDriverRenderer` is the production implementation backed by a
//!   WebDriver server
//! - `await_terminal_marker` holds the marker race, so any [`MarkerProbe`]
//!   shares the same timing rules
//! - tests substitute scripted renderers

mod markers;
mod webdriver;

pub use markers::{await_terminal_marker, MarkerProbe};
pub use webdriver::WebDriverRenderer;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Result of rendering one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The success marker became available
    Success,

    /// The error marker appeared, the wait timed out, or automation failed
    Error(String),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// The failure message, if any
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success => None,
            Self::Error(message) => Some(message),
        }
    }
}

/// Errors raised by renderer operations that do not produce an [`Outcome`]
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("WebDriver error: {0}")]
    WebDriver(#[from] thirtyfour::error::WebDriverError),

    #[error("Timed out after {seconds}s waiting for {url}")]
    Timeout { url: String, seconds: u64 },
}

/// Result type for renderer operations
pub type RenderResult<T> = Result<T, RenderError>;

/// Browser capability used by the sweep
#[async_trait]
pub trait PageRenderer: Send {
    /// Renders `url` and classifies it
    ///
    /// Implementations must never fail: navigation and wait errors are
    /// folded into [`Outcome::Error`] so one bad page cannot abort a sweep.
    async fn render(&mut self, url: &Url, timeout: Duration) -> Outcome;

    /// Loads `url`, waits for `ready_selector` to match, and returns the DOM source
    async fn page_source(
        &mut self,
        url: &Url,
        ready_selector: &str,
        timeout: Duration,
    ) -> RenderResult<String>;
}
