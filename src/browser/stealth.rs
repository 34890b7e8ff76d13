//! Anti-bot property overrides applied to every new document.
//!
//! Share pages sit behind bot detection that inspects `navigator` properties
//! set by automation. The overrides here make the headless session report a
//! plausible regular-browser profile. The list is data-driven so entries can
//! be added or tested without touching navigation logic.

use anyhow::{Context, Result};
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::Page;

/// A single navigator/window property override.
#[derive(Debug, Clone, Copy)]
pub struct PropertyOverride {
    /// Short identifier, used in logs and tests.
    pub name: &'static str,
    /// JavaScript applied before any page script runs.
    pub script: &'static str,
}

/// Overrides masking the automation fingerprint.
pub const PROPERTY_OVERRIDES: &[PropertyOverride] = &[
    PropertyOverride {
        name: "webdriver",
        script: "Object.defineProperty(navigator, 'webdriver', { get: () => false });",
    },
    PropertyOverride {
        name: "languages",
        script: "Object.defineProperty(navigator, 'languages', { get: () => ['sv-SE', 'sv', 'en-US', 'en'] });",
    },
    PropertyOverride {
        name: "plugins",
        script: "Object.defineProperty(navigator, 'plugins', { get: () => [{ name: 'Chrome PDF Viewer' }] });",
    },
    PropertyOverride {
        name: "chrome-runtime",
        script: "window.chrome = window.chrome || { runtime: {} };",
    },
];

/// Combine all overrides into one script.
#[must_use]
pub fn stealth_script() -> String {
    PROPERTY_OVERRIDES
        .iter()
        .map(|o| o.script)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Install the property overrides on a page.
///
/// Must run before the first navigation; the script is evaluated on every
/// new document the page loads afterwards.
///
/// # Errors
///
/// Returns an error if the CDP call fails.
pub async fn apply(page: &Page) -> Result<()> {
    page.execute(AddScriptToEvaluateOnNewDocumentParams::new(
        stealth_script(),
    ))
    .await
    .context("Failed to install stealth overrides")?;
    Ok(())
}
