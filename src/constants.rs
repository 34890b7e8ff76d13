//! Shared constants used across the application.

/// Host that shared conversation links must point at.
pub const SHARE_HOST: &str = "chatgpt.com";

/// Path prefix that shared conversation links must start with.
pub const SHARE_PATH_PREFIX: &str = "/share/";

/// Filename used in the Content-Disposition header of PDF responses.
pub const ATTACHMENT_FILENAME: &str = "chatgpt-conversation.pdf";

/// User agent string sent while loading share pages.
///
/// This is a realistic browser user agent that is indistinguishable from a real browser,
/// making page loads appear as normal browser traffic.
pub const SPOOFED_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Accept header sent while loading share pages.
pub const ACCEPT_HEADER: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Accept-Language header sent while loading share pages.
pub const ACCEPT_LANGUAGE_HEADER: &str = "sv-SE,sv;q=0.9,en-US;q=0.8,en;q=0.7";

/// Referer header sent while loading share pages.
pub const REFERER_HEADER: &str = "https://chatgpt.com/";
