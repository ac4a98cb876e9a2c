//! Flat key/value dictionaries for a single bundle and locale

use std::collections::HashMap;

use crate::config::BundleConfig;
use crate::error::ResourceError;

use super::node::BundleId;

/// Raw, unresolved values of one bundle plus its declared includes
///
/// The reserved include key is consumed while building the dictionary and is
/// not itself a lookup-able entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatDictionary {
    entries: HashMap<String, String>,
    includes: Vec<String>,
}

impl FlatDictionary {
    /// Build a dictionary from loaded entries
    ///
    /// Later duplicates of a key replace earlier ones. The include list is
    /// split on the configured delimiter and each name is trimmed; an empty
    /// name anywhere in the list is rejected.
    pub fn from_entries(
        id: &BundleId,
        entries: impl IntoIterator<Item = (String, String)>,
        config: &BundleConfig,
    ) -> Result<Self, ResourceError> {
        let mut map = HashMap::new();
        let mut include_value = None;

        for (key, value) in entries {
            if key == config.include_key {
                include_value = Some(value);
            } else {
                map.insert(key, value);
            }
        }

        let includes = match include_value {
            Some(value) => split_includes(id, &value, &config.include_delimiter)?,
            None => Vec::new(),
        };

        Ok(Self {
            entries: map,
            includes,
        })
    }

    /// Raw value for a key in this dictionary only
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|s| s.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Included base names, in declared order
    pub fn include_targets(&self) -> &[String] {
        &self.includes
    }

    /// All keys, in no particular order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn split_includes(
    id: &BundleId,
    value: &str,
    delimiter: &str,
) -> Result<Vec<String>, ResourceError> {
    value
        .split(delimiter)
        .map(str::trim)
        .map(|name| {
            if name.is_empty() {
                Err(ResourceError::MalformedInclude {
                    bundle: id.clone(),
                    value: value.to_string(),
                })
            } else {
                Ok(name.to_string())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn build(pairs: &[(&str, &str)]) -> Result<FlatDictionary, ResourceError> {
        FlatDictionary::from_entries(
            &BundleId::new("test", ""),
            entries(pairs),
            &BundleConfig::default(),
        )
    }

    #[test]
    fn test_get_and_len() {
        let dict = build(&[("a", "1"), ("b", "2")]).expect("Should build");
        assert_eq!(dict.get("a"), Some("1"));
        assert_eq!(dict.get("missing"), None);
        assert_eq!(dict.len(), 2);
        assert!(dict.include_targets().is_empty());
    }

    #[test]
    fn test_include_targets_in_order() {
        let dict = build(&[("@include", "common; errors ;labels"), ("a", "1")])
            .expect("Should build");
        assert_eq!(dict.include_targets(), &["common", "errors", "labels"]);
        assert!(!dict.contains_key("@include"));
        assert_eq!(dict.len(), 1);
    }

    #[test]
    fn test_later_duplicate_wins() {
        let dict = build(&[("a", "1"), ("a", "2")]).expect("Should build");
        assert_eq!(dict.get("a"), Some("2"));
    }

    #[test]
    fn test_empty_include_entry_rejected() {
        let result = build(&[("@include", "common;;errors")]);
        assert!(matches!(result, Err(ResourceError::MalformedInclude { .. })));

        let result = build(&[("@include", "common;")]);
        assert!(matches!(result, Err(ResourceError::MalformedInclude { .. })));
    }

    #[test]
    fn test_custom_include_key_and_delimiter() {
        let config = BundleConfig::new()
            .with_include_key("#import")
            .with_include_delimiter(",");
        let dict = FlatDictionary::from_entries(
            &BundleId::new("test", ""),
            entries(&[("#import", "a,b"), ("@include", "literal")]),
            &config,
        )
        .expect("Should build");
        assert_eq!(dict.include_targets(), &["a", "b"]);
        assert_eq!(dict.get("@include"), Some("literal"));
    }
}
