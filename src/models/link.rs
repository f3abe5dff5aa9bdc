//! Origin → short-link mapping.

use std::collections::HashMap;

use serde::Serialize;

/// Resolved deep-links keyed by origin URL.
///
/// Keys are either the URL the partner API echoed back or the caller's own
/// input string when its canonical form matched that echo. Values are never
/// empty; a missing key means "unresolved, use the original".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DeepLinkMap {
    links: HashMap<String, String>,
}

impl DeepLinkMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a mapping. Blank keys or short-links are ignored.
    pub fn insert(&mut self, origin: impl Into<String>, short: impl Into<String>) -> bool {
        let origin = origin.into();
        let short = short.into();
        if origin.trim().is_empty() || short.trim().is_empty() {
            return false;
        }
        self.links.insert(origin, short);
        true
    }

    /// Merge another map in; later entries win on collision.
    pub fn extend(&mut self, other: DeepLinkMap) {
        self.links.extend(other.links);
    }

    pub fn get(&self, origin: &str) -> Option<&str> {
        self.links.get(origin).map(String::as_str)
    }

    /// Short-link for `origin`, or `origin` itself when unresolved.
    pub fn get_or_original<'a>(&'a self, origin: &'a str) -> &'a str {
        self.get(origin).unwrap_or(origin)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.links.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_inner(self) -> HashMap<String, String> {
        self.links
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_are_rejected() {
        let mut map = DeepLinkMap::new();
        assert!(!map.insert("https://a/1", ""));
        assert!(!map.insert("", "https://link/x"));
        assert!(map.is_empty());
    }

    #[test]
    fn unresolved_falls_back_to_original() {
        let mut map = DeepLinkMap::new();
        map.insert("https://a/1", "https://link/x");
        assert_eq!(map.get_or_original("https://a/1"), "https://link/x");
        assert_eq!(map.get_or_original("https://a/2"), "https://a/2");
    }

    #[test]
    fn extend_overwrites_on_collision() {
        let mut first = DeepLinkMap::new();
        first.insert("https://a/1", "https://link/old");
        let mut second = DeepLinkMap::new();
        second.insert("https://a/1", "https://link/new");
        first.extend(second);
        assert_eq!(first.get("https://a/1"), Some("https://link/new"));
        assert_eq!(first.len(), 1);
    }
}
