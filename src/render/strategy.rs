//! Two-tier render strategies.
//!
//! The orchestrator picks exactly one strategy per request at a single
//! decision point: structured text when extraction yielded turns and raster
//! was not forced, otherwise the screenshot fallback.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use tracing::debug;

use super::{
    conversation_document, render_html_to_pdf, screenshot_document, RenderError, RenderOptions,
};
use crate::scrape::ConversationTurn;

/// A way of turning whatever the page holds into a PDF.
#[async_trait]
pub trait RenderStrategy: Send + Sync {
    /// Short identifier for logging.
    fn mode(&self) -> &'static str;

    /// Produce the PDF bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if screenshot capture or the print pipeline fails.
    async fn render(&self, page: &Page, options: &RenderOptions) -> Result<Vec<u8>, RenderError>;
}

/// Styled text reconstruction from extracted conversation turns.
pub struct StructuredStrategy {
    turns: Vec<ConversationTurn>,
}

impl StructuredStrategy {
    #[must_use]
    pub fn new(turns: Vec<ConversationTurn>) -> Self {
        Self { turns }
    }
}

#[async_trait]
impl RenderStrategy for StructuredStrategy {
    fn mode(&self) -> &'static str {
        "text"
    }

    async fn render(&self, page: &Page, options: &RenderOptions) -> Result<Vec<u8>, RenderError> {
        debug!(turns = self.turns.len(), "Rendering structured conversation");
        let document = conversation_document(&self.turns, options.margin_mm);
        render_html_to_pdf(page, &document, options).await
    }
}

/// Full-page screenshot of whatever is currently loaded, embedded as an
/// image. Used when structured extraction failed or raster was forced.
pub struct RasterStrategy;

#[async_trait]
impl RenderStrategy for RasterStrategy {
    fn mode(&self) -> &'static str {
        "raster"
    }

    async fn render(&self, page: &Page, options: &RenderOptions) -> Result<Vec<u8>, RenderError> {
        let png = page
            .screenshot(ScreenshotParams::builder().full_page(true).build())
            .await?;
        debug!(size = png.len(), "Captured full-page screenshot");

        let document = screenshot_document(&BASE64.encode(&png), options.margin_mm);
        render_html_to_pdf(page, &document, options).await
    }
}
