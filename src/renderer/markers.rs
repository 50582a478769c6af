//! Terminal-marker wait shared by browser renderers

use crate::renderer::{Outcome, RenderError, RenderResult};
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::Instant;
use url::Url;

/// Checks for the two markers that end a page visit
#[async_trait]
pub trait MarkerProbe: Send + Sync {
    /// Text of the error marker, if one is on the page
    async fn error_marker(&self) -> RenderResult<Option<String>>;

    /// Whether a success element is present and clickable
    async fn success_marker_ready(&self) -> RenderResult<bool>;
}

/// Polls both markers until one holds or `deadline` passes
///
/// The error marker is checked first on every poll, so a page showing both
/// is classified as errored. A passed deadline yields an `Outcome::Error`
/// carrying the timeout message.
pub async fn await_terminal_marker<P: MarkerProbe + ?Sized>(
    probe: &P,
    url: &Url,
    timeout: Duration,
    deadline: Instant,
    poll_interval: Duration,
) -> RenderResult<Outcome> {
    loop {
        if let Some(text) = probe.error_marker().await? {
            return Ok(Outcome::Error(format!("Error marker on page: {}", text.trim())));
        }

        if probe.success_marker_ready().await? {
            return Ok(Outcome::Success);
        }

        if Instant::now() >= deadline {
            return Ok(Outcome::Error(timeout_error(url, timeout).to_string()));
        }

        tokio::time::sleep(poll_interval).await;
    }
}

pub(crate) fn timeout_error(url: &Url, timeout: Duration) -> RenderError {
    RenderError::Timeout {
        url: url.to_string(),
        seconds: timeout.as_secs(),
    }
}
