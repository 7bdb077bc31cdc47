//! Ordered key/value sets rendered into managed blocks

use super::markers::BLOCK_TAG;
use crate::error::{Error, Result};
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;

/// Ordered property set a module wants present in a file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PropertySet {
    entries: Vec<(String, String)>,
}

impl PropertySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.push((key.into(), value.into()));
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn extend(&mut self, other: PropertySet) {
        self.entries.extend(other.entries);
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reject sets that cannot be rendered unambiguously into `path`
    pub fn validate(&self, path: &Path) -> Result<()> {
        let mut seen = HashSet::new();

        for (key, value) in &self.entries {
            if !seen.insert(key.as_str()) {
                return Err(Error::reconciliation(path, format!("duplicate managed key '{key}'")));
            }
            if key.is_empty() {
                return Err(Error::reconciliation(path, "empty managed key"));
            }
            if key.starts_with(['#', '!'])
                || key.contains(['=', ':'])
                || key.chars().any(char::is_whitespace)
            {
                return Err(Error::reconciliation(
                    path,
                    format!("managed key '{key}' contains a property delimiter"),
                ));
            }
            if value.contains(['\n', '\r']) {
                return Err(Error::reconciliation(
                    path,
                    format!("value of managed key '{key}' spans multiple lines"),
                ));
            }
            if continues(value) {
                return Err(Error::reconciliation(
                    path,
                    format!("value of managed key '{key}' ends in a line continuation"),
                ));
            }
            if key.contains(BLOCK_TAG) || value.contains(BLOCK_TAG) {
                return Err(Error::reconciliation(
                    path,
                    format!("managed key '{key}' contains the block delimiter"),
                ));
            }
        }

        Ok(())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PropertySet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Key of a `key=value`, `key:value` or `key value` property line.
///
/// `None` for blank lines and comments.
pub(crate) fn property_key(line: &str) -> Option<&str> {
    let line = line.trim_start();
    if line.is_empty() || line.starts_with(['#', '!']) {
        return None;
    }

    let end = line
        .find(|c: char| c == '=' || c == ':' || c.is_whitespace())
        .unwrap_or(line.len());
    Some(&line[..end])
}

/// Whether the next physical line continues this one
pub(crate) fn continues(line: &str) -> bool {
    let trailing = line.chars().rev().take_while(|c| *c == '\\').count();
    trailing % 2 == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path() -> &'static Path {
        Path::new("application.properties")
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let props = PropertySet::new().with("b", "2").with("a", "1");
        assert_eq!(props.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(props.get("a"), Some("1"));
    }

    #[test]
    fn test_duplicate_keys_are_rejected() {
        let props: PropertySet = [("server.port", "8080"), ("server.port", "9090")].into_iter().collect();
        let err = props.validate(path()).unwrap_err();
        assert!(err.to_string().contains("duplicate managed key 'server.port'"));
    }

    #[test]
    fn test_delimiters_in_keys_are_rejected() {
        for key in ["a=b", "a:b", "a b", "#a", ""] {
            let props = PropertySet::new().with(key, "v");
            assert!(props.validate(path()).is_err(), "key {key:?} should be rejected");
        }
    }

    #[test]
    fn test_block_tag_is_rejected_in_values() {
        let props = PropertySet::new().with("a", format!("x {BLOCK_TAG} y"));
        assert!(props.validate(path()).is_err());
    }

    #[test]
    fn test_multiline_value_is_rejected() {
        let props = PropertySet::new().with("a", "line1\nline2");
        assert!(props.validate(path()).is_err());
    }

    #[test]
    fn test_value_ending_in_continuation_is_rejected() {
        let props = PropertySet::new().with("a.dir", "C:\\tmp\\").with("b", "1");
        let err = props.validate(path()).unwrap_err();
        assert!(matches!(err, Error::Reconciliation { .. }));
        assert!(err.to_string().contains("'a.dir'"));

        // an escaped backslash is a literal one
        let props = PropertySet::new().with("a.dir", "C:\\tmp\\\\");
        assert!(props.validate(path()).is_ok());
    }

    #[test]
    fn test_property_key() {
        assert_eq!(property_key("server.port=8080"), Some("server.port"));
        assert_eq!(property_key("  server.port : 8080"), Some("server.port"));
        assert_eq!(property_key("flag true"), Some("flag"));
        assert_eq!(property_key("# comment"), None);
        assert_eq!(property_key("! comment"), None);
        assert_eq!(property_key("   "), None);
    }

    #[test]
    fn test_continues() {
        assert!(continues("a=one,\\"));
        assert!(!continues("a=C:\\\\"));
        assert!(!continues("a=plain"));
    }
}
