//! URI sanitization
//!
//! Every inbound path goes through [`sanitize`] before any matching happens.
//! All functions are **pure**: same input, same output, no side effects.

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

/// Escapes that survive sanitization: `%2F` keeps segment boundaries intact,
/// `%25` keeps token payloads from being decoded twice, and `%3F`/`%23` keep a
/// sanitized path from growing a query string or fragment.
static PRESERVED_ESCAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)%2f|%25|%3f|%23").expect("preserved escape pattern is valid")
});

/// Checks if a path is already in canonical form
///
/// # Rules
///
/// - No percent escapes, query string or fragment
/// - No ASCII control characters
/// - No `//` runs
/// - No trailing `/` (the root is the empty string)
///
/// # Examples
///
/// ```
/// use rhtmx_router::path::is_canonical;
///
/// assert!(is_canonical(""));
/// assert!(is_canonical("/blog/list"));
///
/// assert!(!is_canonical("/"));
/// assert!(!is_canonical("/blog//list"));
/// assert!(!is_canonical("/blog/list/"));
/// assert!(!is_canonical("/blog%20post"));
/// ```
pub fn is_canonical(path: &str) -> bool {
    !path.ends_with('/')
        && !path.contains("//")
        && !path
            .chars()
            .any(|c| matches!(c, '%' | '?' | '#') || c.is_ascii_control())
}

/// Normalize a raw request path into its canonical form
///
/// Zero-copy when the input is already canonical (`Cow::Borrowed`).
///
/// # Steps
///
/// 1. Drop the query string and fragment
/// 2. Percent-decode, keeping `%2F`, `%25`, `%3F` and `%23` encoded
/// 3. Strip ASCII control characters (0x00–0x1F, 0x7F)
/// 4. Collapse runs of `/` and trim the trailing `/`
///
/// Never fails. The empty string means "root".
///
/// # Examples
///
/// ```
/// use rhtmx_router::path::sanitize;
///
/// assert_eq!(sanitize("/blog//list/"), "/blog/list");
/// assert_eq!(sanitize("/blog/hello%20world"), "/blog/hello world");
/// assert_eq!(sanitize("/a%2Fb"), "/a%2Fb");
/// assert_eq!(sanitize("/"), "");
/// ```
pub fn sanitize(raw: &str) -> Cow<'_, str> {
    if is_canonical(raw) {
        return Cow::Borrowed(raw);
    }

    let path = raw
        .split(|c| c == '?' || c == '#')
        .next()
        .unwrap_or_default();

    let decoded = decode_preserving_separators(path);
    let stripped: String = decoded.chars().filter(|c| !c.is_ascii_control()).collect();

    Cow::Owned(collapse_slashes(&stripped))
}

/// Split a canonical path into its non-empty segments
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

fn decode_preserving_separators(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut last = 0;

    for escape in PRESERVED_ESCAPE.find_iter(path) {
        out.push_str(&decode_lossy(&path[last..escape.start()]));
        out.push_str(&escape.as_str().to_ascii_uppercase());
        last = escape.end();
    }
    out.push_str(&decode_lossy(&path[last..]));

    out
}

fn decode_lossy(chunk: &str) -> Cow<'_, str> {
    if !chunk.contains('%') {
        return Cow::Borrowed(chunk);
    }
    let bytes = urlencoding::decode_binary(chunk.as_bytes());
    Cow::Owned(String::from_utf8_lossy(&bytes).into_owned())
}

fn collapse_slashes(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for c in path.chars() {
        if c == '/' && out.ends_with('/') {
            continue;
        }
        out.push(c);
    }
    if out.ends_with('/') {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_canonical() {
        assert!(is_canonical(""));
        assert!(is_canonical("/about"));
        assert!(is_canonical("/users/123"));

        assert!(!is_canonical("/"));
        assert!(!is_canonical("/about/"));
        assert!(!is_canonical("/about//page"));
        assert!(!is_canonical("/about?x=1"));
        assert!(!is_canonical("/ab\u{7f}out"));
    }

    #[test]
    fn test_sanitize_canonical_is_borrowed() {
        let path = sanitize("/blog/list");
        assert!(matches!(path, Cow::Borrowed("/blog/list")));
    }

    #[test]
    fn test_sanitize_slashes() {
        assert_eq!(sanitize("/about/"), "/about");
        assert_eq!(sanitize("/path///to////page"), "/path/to/page");
        assert_eq!(sanitize("//"), "");
        assert_eq!(sanitize("/"), "");
    }

    #[test]
    fn test_sanitize_percent_decoding() {
        assert_eq!(sanitize("/search/caf%C3%A9"), "/search/café");
        assert_eq!(sanitize("/a%2fb/c"), "/a%2Fb/c");
        assert_eq!(sanitize("/100%25"), "/100%25");
        // Encoded slashes never become separators
        assert_eq!(segments(&sanitize("/x/a%2Fb")).count(), 2);
    }

    #[test]
    fn test_sanitize_keeps_query_delimiters_encoded() {
        let once = sanitize("/blog/list/search-what%3f%20now%23x");
        assert_eq!(once, "/blog/list/search-what%3F now%23x");
        assert_eq!(sanitize(&once), once);
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        for raw in [
            "//blog///list/?x=1",
            "/a%2fb/100%25/caf%C3%A9",
            "/q/%3F%23%2F%25",
            "/blog%00/li%0Ast/",
        ] {
            let once = sanitize(raw).into_owned();
            assert_eq!(sanitize(&once), once, "raw: {raw}");
        }
    }

    #[test]
    fn test_sanitize_strips_control_characters() {
        assert_eq!(sanitize("/blog%00/li%0Ast"), "/blog/list");
        assert_eq!(sanitize("/blog/\u{1b}list"), "/blog/list");
    }

    #[test]
    fn test_sanitize_drops_query_and_fragment() {
        assert_eq!(sanitize("/blog/list?page=2"), "/blog/list");
        assert_eq!(sanitize("/blog/list/#top"), "/blog/list");
    }

    #[test]
    fn test_sanitize_invalid_utf8_is_lossy() {
        assert_eq!(sanitize("/x/%FF"), "/x/\u{FFFD}");
    }

    #[test]
    fn test_segments() {
        let segs: Vec<&str> = segments("/blog/list/42").collect();
        assert_eq!(segs, vec!["blog", "list", "42"]);
        assert_eq!(segments("").count(), 0);
    }
}
