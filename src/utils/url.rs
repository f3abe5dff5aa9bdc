// src/utils/url.rs

//! URL manipulation utilities.

use std::collections::HashSet;
use std::fmt::Write;

use url::Url;

/// Reduce a URL to the form used for origin ↔ short matching.
///
/// Scheme (defaulting to `https`), host and path are lowercased, one
/// trailing `/` is stripped from the path, and query and fragment are
/// dropped. Unparseable input is only trimmed of whitespace and trailing
/// slashes. The result is a join key, never a URL to hand out.
///
/// # Examples
/// ```
/// use affiliate_linker::utils::url::canonicalize;
///
/// assert_eq!(canonicalize("HTTP://Host.com/a/"), canonicalize("http://host.com/a"));
/// assert_eq!(
///     canonicalize("https://www.coupang.com/vp/products/1?itemId=2#top"),
///     "https://www.coupang.com/vp/products/1"
/// );
/// ```
pub fn canonicalize(raw: &str) -> String {
    let trimmed = raw.trim();
    match parse_with_default_scheme(trimmed) {
        Some(parsed) => canonical_form(&parsed),
        None => trimmed.trim_end_matches('/').to_string(),
    }
}

fn parse_with_default_scheme(s: &str) -> Option<Url> {
    if let Ok(parsed) = Url::parse(s) {
        if parsed.has_host() {
            return Some(parsed);
        }
    }
    // `host:port/path` parses with `host` as the scheme.
    if s.contains("://") {
        return None;
    }
    Url::parse(&format!("https://{s}"))
        .ok()
        .filter(|u| u.has_host())
}

fn canonical_form(parsed: &Url) -> String {
    let host = parsed.host_str().unwrap_or_default();
    let mut out = format!(
        "{}://{}",
        parsed.scheme().to_ascii_lowercase(),
        host.to_lowercase()
    );
    if let Some(port) = parsed.port() {
        let _ = write!(out, ":{port}");
    }
    let path = parsed.path();
    let path = path.strip_suffix('/').unwrap_or(path);
    out.push_str(&path.to_lowercase());
    out
}

/// Drop blank entries and exact-string duplicates, keeping first occurrences in order.
///
/// # Examples
/// ```
/// use affiliate_linker::utils::url::dedup_preserving_order;
///
/// let urls = vec!["b".to_string(), "a".to_string(), "b".to_string(), " ".to_string()];
/// assert_eq!(dedup_preserving_order(&urls), vec!["b", "a"]);
/// ```
pub fn dedup_preserving_order(urls: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    urls.iter()
        .filter(|u| !u.trim().is_empty())
        .filter(|u| seen.insert(u.as_str()))
        .cloned()
        .collect()
}
