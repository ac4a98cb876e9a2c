//! Bundle identities and constructed bundle nodes

use std::fmt;
use std::sync::Arc;

use super::dictionary::FlatDictionary;

/// Identity of a bundle: base name plus locale (empty for the root locale)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BundleId {
    pub base_name: String,
    pub locale: String,
}

impl BundleId {
    pub fn new(base_name: impl Into<String>, locale: impl Into<String>) -> Self {
        Self {
            base_name: base_name.into(),
            locale: locale.into(),
        }
    }

    /// Identity of another bundle in the same locale
    pub fn sibling(&self, base_name: &str) -> Self {
        Self::new(base_name, self.locale.clone())
    }
}

impl fmt::Display for BundleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "baseName={}, locale={}", self.base_name, self.locale)
    }
}

/// A loaded bundle linked to the bundles it includes
///
/// Nodes are immutable once built and shared by reference; included nodes are
/// owned by the [`BundleCache`](super::BundleCache).
pub struct BundleNode {
    id: BundleId,
    dictionary: FlatDictionary,
    includes: Vec<Arc<BundleNode>>,
}

impl BundleNode {
    pub(crate) fn new(id: BundleId, dictionary: FlatDictionary, includes: Vec<Arc<BundleNode>>) -> Self {
        Self {
            id,
            dictionary,
            includes,
        }
    }

    pub fn id(&self) -> &BundleId {
        &self.id
    }

    pub fn dictionary(&self) -> &FlatDictionary {
        &self.dictionary
    }

    /// Included nodes, in declared order
    pub fn includes(&self) -> &[Arc<BundleNode>] {
        &self.includes
    }

    /// Raw value for `key` from this node or, failing that, the first
    /// include (searched depth-first, in declared order) that has it
    pub fn find(&self, key: &str) -> Option<&str> {
        self.dictionary
            .get(key)
            .or_else(|| self.includes.iter().find_map(|include| include.find(key)))
    }
}

impl fmt::Debug for BundleNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BundleNode")
            .field("id", &self.id)
            .field("keys", &self.dictionary.len())
            .field(
                "includes",
                &self.includes.iter().map(|n| &n.id.base_name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BundleConfig;

    fn node(name: &str, pairs: &[(&str, &str)], includes: Vec<Arc<BundleNode>>) -> Arc<BundleNode> {
        let id = BundleId::new(name, "");
        let entries = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string()));
        let dictionary =
            FlatDictionary::from_entries(&id, entries, &BundleConfig::default()).expect("valid");
        Arc::new(BundleNode::new(id, dictionary, includes))
    }

    #[test]
    fn test_display_id() {
        assert_eq!(BundleId::new("app", "de").to_string(), "baseName=app, locale=de");
    }

    #[test]
    fn test_sibling_keeps_locale() {
        assert_eq!(BundleId::new("app", "fr").sibling("common"), BundleId::new("common", "fr"));
    }

    #[test]
    fn test_find_own_value_first() {
        let inc = node("inc", &[("k", "included")], vec![]);
        let top = node("top", &[("k", "own")], vec![inc]);
        assert_eq!(top.find("k"), Some("own"));
    }

    #[test]
    fn test_find_first_include_wins() {
        let first = node("first", &[("k", "one")], vec![]);
        let second = node("second", &[("k", "two")], vec![]);
        let top = node("top", &[], vec![first, second]);
        assert_eq!(top.find("k"), Some("one"));
    }

    #[test]
    fn test_find_transitive() {
        let grand = node("grand", &[("deep", "found")], vec![]);
        let parent = node("parent", &[], vec![grand]);
        let top = node("top", &[], vec![parent]);
        assert_eq!(top.find("deep"), Some("found"));
        assert_eq!(top.find("absent"), None);
    }
}
