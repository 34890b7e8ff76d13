//! Headless browser session management.
//!
//! Each conversion request owns exactly one Chromium instance for its
//! lifetime. The session must be closed on every exit path so browser
//! processes do not accumulate in the execution environment.

pub mod stealth;

use std::time::Duration;

use anyhow::{Context, Result};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures_util::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::config::Config;

/// Explicit browser session configuration, passed into the session factory.
///
/// Headless and graphics toggles live here rather than in process-wide state.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Path to Chrome/Chromium executable (None for auto-detection).
    pub chrome_path: Option<String>,
    /// Viewport width in pixels.
    pub viewport_width: u32,
    /// Viewport height in pixels.
    pub viewport_height: u32,
    /// Timeout applied to CDP requests.
    pub request_timeout: Duration,
}

impl From<&Config> for SessionConfig {
    fn from(config: &Config) -> Self {
        Self {
            chrome_path: config.chrome_path.clone(),
            viewport_width: config.viewport_width,
            viewport_height: config.viewport_height,
            request_timeout: config.nav_timeout,
        }
    }
}

/// A headless browser owned by a single request.
pub struct BrowserSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
}

impl BrowserSession {
    /// Launch a new headless Chromium instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the browser config is invalid or the browser
    /// process fails to start.
    pub async fn launch(config: &SessionConfig) -> Result<Self> {
        let mut config_builder = BrowserConfig::builder()
            .window_size(config.viewport_width, config.viewport_height)
            .request_timeout(config.request_timeout)
            .no_sandbox()
            .disable_default_args()
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-software-rasterizer")
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--disable-background-networking")
            .arg("--disable-extensions")
            .arg("--disable-sync")
            .arg("--disable-translate")
            .arg("--mute-audio")
            .arg("--hide-scrollbars")
            .arg("--force-device-scale-factor=1.25");

        if let Some(ref chrome_path) = config.chrome_path {
            config_builder = config_builder.chrome_executable(chrome_path);
        }

        let browser_config = config_builder
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build browser config: {e}"))?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .context("Failed to launch browser")?;

        // Drive CDP events until the browser goes away
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser handler error: {e}");
                }
            }
        });

        info!("Headless browser launched");

        Ok(Self {
            browser,
            handler_task,
        })
    }

    /// Open a blank page in this session.
    ///
    /// # Errors
    ///
    /// Returns an error if the browser refuses to create the page.
    pub async fn new_page(&self) -> Result<Page> {
        self.browser
            .new_page("about:blank")
            .await
            .context("Failed to create new page")
    }

    /// Shut the browser down gracefully.
    ///
    /// Errors are logged rather than propagated: by the time a session is
    /// being closed the request outcome is already decided, and the process
    /// is killed when the underlying handle drops anyway.
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            error!("Failed to close browser: {e}");
        }
        self.handler_task.abort();
        debug!("Browser session closed");
    }
}
