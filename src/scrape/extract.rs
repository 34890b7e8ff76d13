//! Conversation turn extraction from a loaded share page.
//!
//! The extraction runs inside the page as a single script and hands back a
//! JSON string, which keeps the CDP round trip to one evaluation. The
//! selector set is coupled to the share page's current DOM and is expected to
//! silently degrade to zero turns when that DOM changes; callers fall back to
//! the raster path in that case.

use anyhow::{Context, Result};
use chromiumoxide::Page;
use serde::{Deserialize, Serialize};

/// One message exchange unit within a shared conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// Typically "user" or "assistant", but free-form.
    pub role: String,
    /// Plain text content, code blocks preserved verbatim.
    pub content: String,
}

/// In-page extraction script.
///
/// Role resolution tries the known author attributes and defaults to
/// "assistant". Content resolution tries an ordered list of selectors and
/// falls back to the whole node. Elements containing code or preformatted
/// markup are read through `innerText` to keep visual line breaks; everything
/// else uses `textContent`. If no turns match at all, the main content
/// region's full text is emitted as a single assistant turn when it is long
/// enough not to be loading-skeleton noise.
const EXTRACT_TURNS_JS: &str = r#"
(() => {
  const textOf = (el) => {
    if (!el) return '';
    const html = el.innerHTML || '';
    if (html.includes('<code') || html.includes('<pre')) {
      return (el.innerText || '').trim();
    }
    return (el.textContent || '').trim();
  };

  const out = [];
  const turns = Array.from(document.querySelectorAll(
    '[data-testid="conversation-turn"], [data-message-author-role]'
  ));
  for (const node of turns) {
    const role = node.getAttribute('data-message-author-role')
      || node.getAttribute('data-author')
      || node.getAttribute('data-role')
      || 'assistant';

    let content = '';
    for (const sel of ['[data-message-author-role] ~ *', '[class*="prose"]', 'article', 'div']) {
      const child = node.querySelector(sel);
      if (child) {
        content = textOf(child);
        if (content) break;
      }
    }
    if (!content) content = textOf(node);
    if (content) out.push({ role, content });
  }

  if (out.length === 0) {
    const main = document.querySelector('main') || document.body;
    const txt = (main && main.textContent ? main.textContent : '').trim();
    if (txt.length > 200) out.push({ role: 'assistant', content: txt });
  }

  return JSON.stringify(out);
})()
"#;

/// Extract conversation turns from the currently loaded page, in DOM order.
///
/// Zero turns is a recognized outcome, not an error.
///
/// # Errors
///
/// Returns an error if the evaluation itself fails or produces unparseable
/// output.
pub async fn extract_turns(page: &Page) -> Result<Vec<ConversationTurn>> {
    let raw: String = page
        .evaluate(EXTRACT_TURNS_JS)
        .await
        .context("Turn extraction script failed")?
        .into_value()
        .context("Turn extraction script returned a non-string")?;

    let turns: Vec<ConversationTurn> =
        serde_json::from_str(&raw).context("Turn extraction script returned invalid JSON")?;
    Ok(turns)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_parses_from_page_json() {
        let raw = r#"[{"role":"user","content":"hi"},{"role":"assistant","content":"hello"}]"#;
        let turns: Vec<ConversationTurn> = serde_json::from_str(raw).unwrap();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].role, "user");
        assert_eq!(turns[1].content, "hello");
    }

    #[test]
    fn test_empty_page_json() {
        let turns: Vec<ConversationTurn> = serde_json::from_str("[]").unwrap();
        assert!(turns.is_empty());
    }

    #[test]
    fn test_script_covers_selector_strategies() {
        for sel in [
            "conversation-turn",
            "data-message-author-role",
            "data-author",
            "data-role",
            "prose",
            "article",
        ] {
            assert!(EXTRACT_TURNS_JS.contains(sel), "missing selector: {sel}");
        }
    }

    #[test]
    fn test_script_guards_skeleton_noise() {
        assert!(EXTRACT_TURNS_JS.contains("txt.length > 200"));
    }
}
