//! Share page loading and conversation scraping.
//!
//! The loader tries each URL variant in order with spoofed headers and a
//! bounded navigation timeout. Per-variant failures are absorbed and logged;
//! only the overall outcome (opened / turns) is reported back, so the caller
//! can decide between structured and raster rendering.

pub mod extract;
pub mod readiness;

use anyhow::{Context, Result};
use chromiumoxide::cdp::browser_protocol::network::{
    Headers, SetExtraHttpHeadersParams, SetUserAgentOverrideParams,
};
use chromiumoxide::Page;
use serde_json::json;
use tracing::{debug, warn};

use crate::config::Config;
use crate::constants::{
    ACCEPT_HEADER, ACCEPT_LANGUAGE_HEADER, REFERER_HEADER, SPOOFED_USER_AGENT,
};

pub use extract::ConversationTurn;

/// Result of trying all URL variants.
#[derive(Debug, Default)]
pub struct LoadOutcome {
    /// Whether any navigation succeeded, even if extraction then failed.
    pub opened: bool,
    /// Extracted turns from the first variant that yielded any.
    pub turns: Vec<ConversationTurn>,
}

/// Try the URL candidates in order until one yields conversation turns.
///
/// Navigation and extraction failures are recovered locally: the next variant
/// is tried, and exhausting all variants is not an error. A hard failure is
/// only possible through the returned turns being empty, which the caller
/// resolves with the raster fallback.
pub async fn load_share_page(page: &Page, candidates: &[String], config: &Config) -> LoadOutcome {
    let mut opened = false;

    for url in candidates {
        if let Err(e) = prepare_request(page).await {
            warn!(url = %url, "Failed to prepare request: {e:#}");
            continue;
        }

        match navigate(page, url, config).await {
            Ok(()) => {
                opened = true;
                debug!(url = %url, "Navigation succeeded");
            }
            Err(e) => {
                warn!(url = %url, "Navigation failed: {e:#}");
                continue;
            }
        }

        match readiness::wait_until_ready(
            page,
            config.readiness_max_iterations,
            config.readiness_poll_delay,
            config.scroll_step_px,
        )
        .await
        {
            Ok(ready) => debug!(url = %url, ready, "Readiness poll finished"),
            Err(e) => {
                warn!(url = %url, "Readiness poll failed: {e:#}");
                continue;
            }
        }

        match extract::extract_turns(page).await {
            Ok(turns) if !turns.is_empty() => {
                debug!(url = %url, count = turns.len(), "Extracted conversation turns");
                return LoadOutcome { opened, turns };
            }
            Ok(_) => debug!(url = %url, "Extraction yielded no turns"),
            Err(e) => warn!(url = %url, "Extraction failed: {e:#}"),
        }
    }

    LoadOutcome {
        opened,
        turns: Vec::new(),
    }
}

/// Best-effort navigation used before a raster capture when no variant
/// opened. Errors are absorbed; the screenshot then shows whatever the
/// browser last attempted to load.
pub async fn navigate_best_effort(page: &Page, url: &str, config: &Config) {
    if let Err(e) = navigate(page, url, config).await {
        warn!(url = %url, "Best-effort navigation failed: {e:#}");
    }
}

/// Set spoofed headers and user agent for the next navigation.
async fn prepare_request(page: &Page) -> Result<()> {
    page.execute(SetExtraHttpHeadersParams::new(Headers::new(json!({
        "Accept": ACCEPT_HEADER,
        "Accept-Language": ACCEPT_LANGUAGE_HEADER,
        "Referer": REFERER_HEADER,
    }))))
    .await
    .context("Failed to set extra headers")?;

    page.execute(SetUserAgentOverrideParams::new(
        SPOOFED_USER_AGENT.to_string(),
    ))
    .await
    .context("Failed to set user agent")?;

    Ok(())
}

/// Navigate with a bounded timeout.
async fn navigate(page: &Page, url: &str, config: &Config) -> Result<()> {
    tokio::time::timeout(config.nav_timeout, page.goto(url))
        .await
        .map_err(|_| anyhow::anyhow!("Navigation timed out after {:?}", config.nav_timeout))?
        .context("Navigation failed")?;
    Ok(())
}
