//! Request orchestration: validate, load, extract, render, respond.
//!
//! One browser per request, released on every path. All per-variant and
//! per-turn failures degrade toward the raster fallback; only whole-pipeline
//! failures (browser launch, PDF encoding) reach the caller.

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::browser::{stealth, BrowserSession, SessionConfig};
use crate::config::Config;
use crate::render::{
    PageFormat, RasterStrategy, RenderError, RenderOptions, RenderStrategy, StructuredStrategy,
};
use crate::scrape;
use crate::share_url;

/// A conversion request as posted by the caller.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertRequest {
    pub url: String,
    #[serde(default)]
    pub format: PageFormat,
    /// Page margin in millimeters.
    #[serde(default = "default_margin")]
    pub margin: f64,
    #[serde(default)]
    pub force_raster: bool,
}

fn default_margin() -> f64 {
    12.0
}

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("invalid share link (must start with https://chatgpt.com/share/…): {0}")]
    InvalidUrl(String),
    #[error("browser session failed: {0}")]
    Browser(#[source] anyhow::Error),
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Whether the raster fallback applies instead of the structured rendering.
fn use_raster(turns: &[scrape::ConversationTurn], force_raster: bool) -> bool {
    turns.is_empty() || force_raster
}

/// Convert a shared conversation into PDF bytes.
///
/// # Errors
///
/// Returns `InvalidUrl` before any browser is launched, `Browser` if the
/// session cannot be set up, and `Render` if PDF generation itself fails.
pub async fn convert_share(config: &Config, request: &ConvertRequest) -> Result<Vec<u8>, ConvertError> {
    if !share_url::is_valid_share_url(&request.url) {
        return Err(ConvertError::InvalidUrl(request.url.clone()));
    }

    let session = BrowserSession::launch(&SessionConfig::from(config))
        .await
        .map_err(ConvertError::Browser)?;

    // The session is released on every path, including errors below
    let outcome = run_pipeline(&session, config, request).await;
    session.close().await;
    outcome
}

async fn run_pipeline(
    session: &BrowserSession,
    config: &Config,
    request: &ConvertRequest,
) -> Result<Vec<u8>, ConvertError> {
    let page = session.new_page().await.map_err(ConvertError::Browser)?;
    stealth::apply(&page).await.map_err(ConvertError::Browser)?;

    let candidates = share_url::share_url_variants(&request.url);
    let outcome = scrape::load_share_page(&page, &candidates, config).await;

    let strategy: Box<dyn RenderStrategy> = if use_raster(&outcome.turns, request.force_raster) {
        // The screenshot needs something on screen; if no variant ever
        // opened, take one best-effort shot at the first candidate
        if !outcome.opened {
            scrape::navigate_best_effort(&page, &candidates[0], config).await;
        }
        Box::new(RasterStrategy)
    } else {
        Box::new(StructuredStrategy::new(outcome.turns))
    };

    info!(
        url = %request.url,
        mode = strategy.mode(),
        opened = outcome.opened,
        "Rendering PDF"
    );

    let options = RenderOptions {
        format: request.format,
        margin_mm: request.margin,
    };
    let pdf = strategy.render(&page, &options).await?;
    Ok(pdf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrape::ConversationTurn;

    fn turn(role: &str, content: &str) -> ConversationTurn {
        ConversationTurn {
            role: role.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_raster_when_no_turns() {
        assert!(use_raster(&[], false));
    }

    #[test]
    fn test_raster_when_forced_despite_turns() {
        assert!(use_raster(&[turn("user", "hi")], true));
    }

    #[test]
    fn test_structured_when_turns_and_not_forced() {
        assert!(!use_raster(&[turn("user", "hi")], false));
    }

    #[test]
    fn test_request_defaults() {
        let request: ConvertRequest =
            serde_json::from_str(r#"{"url": "https://chatgpt.com/share/abc123"}"#).unwrap();
        assert_eq!(request.format, PageFormat::A4);
        assert!((request.margin - 12.0).abs() < f64::EPSILON);
        assert!(!request.force_raster);
    }

    #[test]
    fn test_request_camel_case_force_raster() {
        let request: ConvertRequest = serde_json::from_str(
            r#"{"url": "https://chatgpt.com/share/abc123", "format": "Letter", "margin": 5, "forceRaster": true}"#,
        )
        .unwrap();
        assert_eq!(request.format, PageFormat::Letter);
        assert!((request.margin - 5.0).abs() < f64::EPSILON);
        assert!(request.force_raster);
    }

    #[test]
    fn test_request_missing_url_rejected() {
        assert!(serde_json::from_str::<ConvertRequest>(r#"{"format": "A4"}"#).is_err());
    }
}
