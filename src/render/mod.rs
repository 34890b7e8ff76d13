//! PDF rendering through the browser's print pipeline.
//!
//! Both render modes produce an HTML document, load it into the already-open
//! page, and print it with background graphics enabled. Paper size comes from
//! the requested format; the page margin is driven entirely by the `@page`
//! CSS rule so the printer margins stay at zero.

pub mod strategy;

use chromiumoxide::cdp::browser_protocol::emulation::SetEmulatedMediaParams;
use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use chromiumoxide::Page;
use maud::{html, Markup, PreEscaped, DOCTYPE};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scrape::ConversationTurn;

pub use strategy::{RasterStrategy, RenderStrategy, StructuredStrategy};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("browser render call failed: {0}")]
    Cdp(#[from] chromiumoxide::error::CdpError),
}

/// Requested PDF paper format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageFormat {
    #[default]
    A4,
    Letter,
}

impl PageFormat {
    /// Paper size in inches (width, height), matching what the print
    /// pipeline expects.
    #[must_use]
    pub fn paper_size(self) -> (f64, f64) {
        match self {
            Self::A4 => (8.27, 11.7),
            Self::Letter => (8.5, 11.0),
        }
    }
}

/// Options shared by both render modes.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub format: PageFormat,
    pub margin_mm: f64,
}

/// Escape HTML special characters.
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Build the styled text reconstruction of a conversation.
///
/// Deterministic for a fixed set of turns and options: the same inputs always
/// produce byte-identical HTML.
#[must_use]
pub fn conversation_document(turns: &[ConversationTurn], margin_mm: f64) -> String {
    let css = format!(
        r"body{{font-family: system-ui, sans-serif; margin:0; padding:24px;}}
.turn{{margin:0 0 16px;}}
.bubble{{border:1px solid #e5e7eb;border-radius:16px;padding:16px;}}
.turn.user .bubble{{background:#f9fafb}}
.turn.assistant .bubble{{background:#fff}}
.role{{font-size:12px;color:#6b7280;text-transform:uppercase;margin-bottom:6px;}}
.content{{white-space:pre-wrap;word-wrap:break-word;}}
pre,code{{white-space:pre-wrap;}}
@page{{margin:{margin_mm}mm;}}"
    );

    let markup: Markup = html! {
        (DOCTYPE)
        html lang="sv" {
            head {
                meta charset="utf-8";
                style { (PreEscaped(css)) }
            }
            body {
                h1 style="margin:0 0 12px;" { "ChatGPT Share Export" }
                @for turn in turns {
                    section class=(PreEscaped(format!("turn {}", escape_html(&turn.role)))) {
                        div class="bubble" {
                            div class="role" { (PreEscaped(escape_html(&turn.role))) }
                            div class="content" { (PreEscaped(escape_html(&turn.content))) }
                        }
                    }
                }
            }
        }
    };
    markup.into_string()
}

/// Build the full-bleed wrapper around a screenshot for the raster fallback.
#[must_use]
pub fn screenshot_document(png_base64: &str, margin_mm: f64) -> String {
    let css = format!(
        r"body{{margin:0}} img{{display:block;width:100%;height:auto}} @page{{margin:{margin_mm}mm}}"
    );

    let markup: Markup = html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                style { (PreEscaped(css)) }
            }
            body {
                img src=(format!("data:image/png;base64,{png_base64}"));
            }
        }
    };
    markup.into_string()
}

/// Load an HTML document into the page and print it to PDF.
///
/// # Errors
///
/// Returns an error if the print pipeline fails; there is no fallback beyond
/// this point.
pub async fn render_html_to_pdf(
    page: &Page,
    document: &str,
    options: &RenderOptions,
) -> Result<Vec<u8>, RenderError> {
    page.set_content(document).await?;
    page.execute(SetEmulatedMediaParams {
        media: Some("screen".to_string()),
        features: None,
    })
    .await?;

    let (paper_width, paper_height) = options.format.paper_size();
    let params = PrintToPdfParams {
        print_background: Some(true),
        paper_width: Some(paper_width),
        paper_height: Some(paper_height),
        // The @page CSS margin governs; keep the printer margins at zero
        margin_top: Some(0.0),
        margin_bottom: Some(0.0),
        margin_left: Some(0.0),
        margin_right: Some(0.0),
        ..Default::default()
    };

    let pdf = page.pdf(params).await?;
    Ok(pdf)
}
