//! WebDriver-backed renderer
//!
//! Drives one browser session through a WebDriver server for the whole sweep.
//! Requires chromedriver or geckodriver to be running at the configured address.

use crate::config::{Browser, RendererConfig};
use crate::renderer::markers::{await_terminal_marker, timeout_error, MarkerProbe};
use crate::renderer::{Outcome, PageRenderer, RenderError, RenderResult};
use async_trait::async_trait;
use std::time::Duration;
use thirtyfour::{By, ChromiumLikeCapabilities, DesiredCapabilities, WebDriver};
use tokio::time::Instant;
use url::Url;

/// Renders preview pages in a real browser
pub struct WebDriverRenderer {
    driver: WebDriver,
    blank_url: String,
    success_selector: String,
    error_xpath: String,
    poll_interval: Duration,
}

impl WebDriverRenderer {
    /// Opens a browser session on the configured WebDriver server
    ///
    /// # Errors
    ///
    /// Returns an error if the WebDriver connection fails.
    pub async fn connect(config: &RendererConfig) -> RenderResult<Self> {
        tracing::info!(
            "Connecting to WebDriver at {} ({:?}, headless: {})",
            config.webdriver_url,
            config.browser,
            config.headless
        );

        let driver = match config.browser {
            Browser::Chrome => {
                let mut caps = DesiredCapabilities::chrome();
                if config.headless {
                    caps.set_headless()?;
                }
                WebDriver::new(config.webdriver_url.as_str(), caps).await?
            }
            Browser::Firefox => {
                let mut caps = DesiredCapabilities::firefox();
                if config.headless {
                    caps.set_headless()?;
                }
                WebDriver::new(config.webdriver_url.as_str(), caps).await?
            }
        };

        // Bounds each navigation on the browser side too
        driver
            .set_page_load_timeout(Duration::from_secs(config.timeout_secs))
            .await?;

        Ok(Self {
            driver,
            blank_url: config.blank_url.clone(),
            success_selector: config.success_selector.clone(),
            error_xpath: config.error_xpath.clone(),
            poll_interval: Duration::from_millis(config.poll_interval_ms),
        })
    }

    /// Closes the browser session
    pub async fn quit(self) -> RenderResult<()> {
        self.driver.quit().await?;
        Ok(())
    }

    async fn visit(&self, url: &Url, timeout: Duration) -> RenderResult<Outcome> {
        let deadline = Instant::now() + timeout;

        // Markers are edge-triggered: leave the previous page before loading the next
        let navigation = async {
            self.driver.goto(self.blank_url.as_str()).await?;
            self.driver.goto(url.as_str()).await?;
            Ok::<_, RenderError>(())
        };
        tokio::time::timeout_at(deadline, navigation)
            .await
            .map_err(|_| timeout_error(url, timeout))??;

        await_terminal_marker(self, url, timeout, deadline, self.poll_interval).await
    }
}

#[async_trait]
impl MarkerProbe for WebDriverRenderer {
    async fn error_marker(&self) -> RenderResult<Option<String>> {
        let elements = self
            .driver
            .find_all(By::XPath(self.error_xpath.as_str()))
            .await?;

        match elements.first() {
            Some(element) => Ok(Some(element.text().await.unwrap_or_default())),
            None => Ok(None),
        }
    }

    async fn success_marker_ready(&self) -> RenderResult<bool> {
        let elements = self
            .driver
            .find_all(By::Css(self.success_selector.as_str()))
            .await?;

        for element in elements {
            // A stale or detached element just means the page is still settling
            if element.is_clickable().await.unwrap_or(false) {
                return Ok(true);
            }
        }

        Ok(false)
    }
}

#[async_trait]
impl PageRenderer for WebDriverRenderer {
    async fn render(&mut self, url: &Url, timeout: Duration) -> Outcome {
        match self.visit(url, timeout).await {
            Ok(outcome) => outcome,
            Err(e) => Outcome::Error(e.to_string()),
        }
    }

    async fn page_source(
        &mut self,
        url: &Url,
        ready_selector: &str,
        timeout: Duration,
    ) -> RenderResult<String> {
        tracing::info!("Loading listing page {}", url);

        let deadline = Instant::now() + timeout;
        tokio::time::timeout_at(deadline, self.driver.goto(url.as_str()))
            .await
            .map_err(|_| timeout_error(url, timeout))??;

        loop {
            let ready = self.driver.find_all(By::Css(ready_selector)).await?;
            if !ready.is_empty() {
                break;
            }

            if Instant::now() >= deadline {
                return Err(timeout_error(url, timeout));
            }

            tokio::time::sleep(self.poll_interval).await;
        }

        Ok(self.driver.source().await?)
    }
}
