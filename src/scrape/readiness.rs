//! Content readiness polling.
//!
//! Share pages render their conversation lazily; the poller scrolls the page
//! and re-checks a readiness predicate until enough content exists or the
//! iteration budget runs out. It never blocks indefinitely: an exhausted
//! budget means extraction proceeds best-effort against whatever loaded.

use std::time::Duration;

use anyhow::{Context, Result};
use chromiumoxide::Page;
use tracing::debug;

/// In-page readiness predicate: at least two conversation-turn nodes under
/// any known selector, or enough visible text to be past the loading shell.
const READINESS_JS: &str = r#"
(() => {
  const qs = (s) => document.querySelectorAll(s).length;
  const count = Math.max(
    qs('[data-testid="conversation-turn"]'),
    qs('[data-message-author-role]'),
    qs('main article'),
    qs('main .prose')
  );
  const textLen = (document.body.innerText || '').trim().length;
  return count >= 2 || textLen > 800;
})()
"#;

/// Poll until the page looks ready for extraction.
///
/// Returns whether the readiness predicate was ever satisfied. Either way the
/// caller may proceed to extraction.
///
/// # Errors
///
/// Returns an error if an in-page evaluation fails.
pub async fn wait_until_ready(
    page: &Page,
    max_iterations: u32,
    poll_delay: Duration,
    scroll_step_px: u32,
) -> Result<bool> {
    for iteration in 0..max_iterations {
        let ready: bool = page
            .evaluate(READINESS_JS)
            .await
            .context("Readiness predicate failed")?
            .into_value()
            .context("Readiness predicate returned a non-boolean")?;

        if ready {
            debug!(iteration, "Page content ready");
            return Ok(true);
        }

        page.evaluate(format!("window.scrollBy(0, {scroll_step_px})"))
            .await
            .context("Scroll failed")?;
        tokio::time::sleep(poll_delay).await;
    }

    debug!(max_iterations, "Readiness budget exhausted, proceeding best-effort");
    Ok(false)
}
