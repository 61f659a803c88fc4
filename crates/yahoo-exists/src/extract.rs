//! Token extraction from raw bootstrap responses.
//!
//! The signup form only accepts a validation call when it carries two
//! per-visit tokens: `acrumb`, embedded in the `AS` cookie, and
//! `sessionIndex`, embedded as a hidden input in the page HTML. Both are
//! pulled out with a single first-match regex each. A missing match is
//! reported as `None`; the caller decides what that means.

use regex::Regex;
use std::sync::OnceLock;

fn acrumb_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"s=([^;]*)&d").expect("acrumb regex is valid"))
}

fn session_index_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"<input type="hidden" value="(.*)" name="sessionIndex">"#)
            .expect("sessionIndex regex is valid")
    })
}

/// Extract the `acrumb` token from a joined cookie header.
pub fn extract_acrumb(cookie_header: &str) -> Option<&str> {
    acrumb_re()
        .captures(cookie_header)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Extract the `sessionIndex` hidden input value from the signup page HTML.
pub fn extract_session_index(body: &str) -> Option<&str> {
    session_index_re()
        .captures(body)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Join `Set-Cookie` values into one cookie string.
pub fn join_cookies<'a, I>(values: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    values.into_iter().collect::<Vec<_>>().join(";")
}

#[cfg(test)]
mod tests {
    use super::*;

    const AS_COOKIE: &str = "AS=v=1&s=Zv1sQsWL&d=A6712a4b2|x3a.2Tw-; Max-Age=3600; \
                             Domain=login.yahoo.com; Path=/; Secure; HttpOnly";

    #[test]
    fn test_acrumb_from_real_cookie_shape() {
        assert_eq!(extract_acrumb(AS_COOKIE), Some("Zv1sQsWL"));
    }

    #[test]
    fn test_acrumb_from_joined_cookies() {
        let joined = join_cookies(["B=abc; Path=/", AS_COOKIE, "A1=xyz; Path=/"]);
        assert_eq!(extract_acrumb(&joined), Some("Zv1sQsWL"));
    }

    #[test]
    fn test_acrumb_exact_value() {
        for value in ["X", "abc123", "a-b_c.d", "with space"] {
            let header = format!("prefix s={value}&d=rest");
            assert_eq!(extract_acrumb(&header), Some(value));
        }
    }

    #[test]
    fn test_acrumb_absent() {
        assert_eq!(extract_acrumb(""), None);
        assert_eq!(extract_acrumb("B=abc; Path=/"), None);
        // Delimiter present but separated by a cookie boundary.
        assert_eq!(extract_acrumb("s=abc; x&d=1"), None);
    }

    #[test]
    fn test_acrumb_first_match_only() {
        let header = "s=first&d=1;s=second&d=2";
        assert_eq!(extract_acrumb(header), Some("first"));
    }

    #[test]
    fn test_session_index_present() {
        let body = r#"<html><form>
<input type="hidden" value="12" name="sessionIndex">
<input type="hidden" value="abc" name="acrumb">
</form></html>"#;
        assert_eq!(extract_session_index(body), Some("12"));
    }

    #[test]
    fn test_session_index_exact_value() {
        for value in ["Y", "0", "QQ--abc"] {
            let body = format!(r#"<input type="hidden" value="{value}" name="sessionIndex">"#);
            assert_eq!(extract_session_index(&body), Some(value));
        }
    }

    #[test]
    fn test_session_index_absent() {
        assert_eq!(extract_session_index(""), None);
        assert_eq!(
            extract_session_index(r#"<input type="hidden" value="12" name="other">"#),
            None
        );
        // Attribute order matters to the service markup we target.
        assert_eq!(
            extract_session_index(r#"<input name="sessionIndex" type="hidden" value="12">"#),
            None
        );
    }

    #[test]
    fn test_join_cookies() {
        assert_eq!(join_cookies(["a=1", "b=2"]), "a=1;b=2");
        assert_eq!(join_cookies(Vec::<&str>::new()), "");
    }
}
