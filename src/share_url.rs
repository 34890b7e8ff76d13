use url::Url;

use crate::constants::{SHARE_HOST, SHARE_PATH_PREFIX};

/// Check whether a string is a valid ChatGPT share link.
///
/// Fails closed: anything that does not parse as a URL is invalid. Valid links
/// point at `chatgpt.com` (or a subdomain of it) and start with `/share/`.
#[must_use]
pub fn is_valid_share_url(s: &str) -> bool {
    let Ok(parsed) = Url::parse(s) else {
        return false;
    };

    let Some(host) = parsed.host_str() else {
        return false;
    };

    let host_ok = host == SHARE_HOST || host.ends_with(&format!(".{SHARE_HOST}"));
    host_ok && parsed.path().starts_with(SHARE_PATH_PREFIX)
}

/// Build the ordered list of URL candidates to try for a share link.
///
/// The target site's routing is inconsistent about trailing slashes, so both
/// forms are tried. The slash-appended form goes first; callers stop at the
/// first candidate that yields content.
#[must_use]
pub fn share_url_variants(s: &str) -> Vec<String> {
    let base = match Url::parse(s) {
        Ok(u) => u.to_string(),
        Err(_) => s.to_string(),
    };
    let base = base.trim_end_matches('/').to_string();
    vec![format!("{base}/"), base]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_share_link() {
        assert!(is_valid_share_url("https://chatgpt.com/share/abc123"));
    }

    #[test]
    fn test_accepts_subdomain() {
        assert!(is_valid_share_url("https://www.chatgpt.com/share/abc123"));
    }

    #[test]
    fn test_accepts_trailing_slash() {
        assert!(is_valid_share_url("https://chatgpt.com/share/abc123/"));
    }

    #[test]
    fn test_rejects_wrong_host() {
        assert!(!is_valid_share_url("https://evil.com/share/abc123"));
    }

    #[test]
    fn test_rejects_host_suffix_trick() {
        // "evilchatgpt.com" is not a subdomain of chatgpt.com
        assert!(!is_valid_share_url("https://evilchatgpt.com/share/abc123"));
    }

    #[test]
    fn test_rejects_wrong_path() {
        assert!(!is_valid_share_url("https://chatgpt.com/c/abc123"));
    }

    #[test]
    fn test_rejects_unparseable() {
        assert!(!is_valid_share_url("not a url"));
        assert!(!is_valid_share_url(""));
    }

    #[test]
    fn test_variants_order_and_count() {
        let v = share_url_variants("https://chatgpt.com/share/abc123");
        assert_eq!(
            v,
            vec![
                "https://chatgpt.com/share/abc123/".to_string(),
                "https://chatgpt.com/share/abc123".to_string(),
            ]
        );
    }

    #[test]
    fn test_variants_collapse_trailing_slashes() {
        let v = share_url_variants("https://chatgpt.com/share/abc123///");
        assert_eq!(
            v,
            vec![
                "https://chatgpt.com/share/abc123/".to_string(),
                "https://chatgpt.com/share/abc123".to_string(),
            ]
        );
    }

    #[test]
    fn test_variants_differ_only_by_slash() {
        let v = share_url_variants("https://chatgpt.com/share/xyz");
        assert_eq!(v.len(), 2);
        assert_eq!(format!("{}/", v[1]), v[0]);
    }
}
