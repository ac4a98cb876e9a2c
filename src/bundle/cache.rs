//! Registry of constructed bundles, keyed by identity

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::config::BundleConfig;
use crate::error::ResourceError;

use super::dictionary::FlatDictionary;
use super::loader::DictionaryLoader;
use super::node::{BundleId, BundleNode};

/// Lazily populated registry mapping `(base_name, locale)` to bundle nodes
///
/// Each identity is loaded at most once while cached; requesting it again
/// returns the same [`Arc`]. Construction (including the recursive loading of
/// includes) is serialized by a single lock, while lookups on a returned node
/// need no locking at all.
pub struct BundleCache<L> {
    loader: L,
    config: BundleConfig,
    nodes: Mutex<HashMap<BundleId, Arc<BundleNode>>>,
}

impl<L: DictionaryLoader> BundleCache<L> {
    /// Create a cache with the default include settings
    pub fn new(loader: L) -> Self {
        Self::with_config(loader, BundleConfig::default())
    }

    pub fn with_config(loader: L, config: BundleConfig) -> Self {
        Self {
            loader,
            config,
            nodes: Mutex::new(HashMap::new()),
        }
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub fn config(&self) -> &BundleConfig {
        &self.config
    }

    /// Get the node for `(base_name, locale)`, loading and linking it on first use
    pub fn get(&self, base_name: &str, locale: &str) -> Result<Arc<BundleNode>, ResourceError> {
        self.get_by_id(&BundleId::new(base_name, locale))
    }

    pub fn get_by_id(&self, id: &BundleId) -> Result<Arc<BundleNode>, ResourceError> {
        let mut nodes = self.nodes.lock();
        let mut building = Vec::new();
        self.construct(&mut nodes, id, &mut building)
    }

    /// Drop every cached node, e.g. after the active locale changed
    pub fn clear(&self) {
        let mut nodes = self.nodes.lock();
        debug!(dropped = nodes.len(), "cleared bundle cache");
        nodes.clear();
    }

    pub fn contains(&self, id: &BundleId) -> bool {
        self.nodes.lock().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.lock().is_empty()
    }

    /// Build `id` and its includes; `building` holds the identities currently
    /// under construction, outermost first
    fn construct(
        &self,
        nodes: &mut HashMap<BundleId, Arc<BundleNode>>,
        id: &BundleId,
        building: &mut Vec<BundleId>,
    ) -> Result<Arc<BundleNode>, ResourceError> {
        if let Some(node) = nodes.get(id) {
            return Ok(Arc::clone(node));
        }

        if let Some(start) = building.iter().position(|b| b == id) {
            let mut chain: Vec<String> = building[start..]
                .iter()
                .map(|b| b.base_name.clone())
                .collect();
            chain.push(id.base_name.clone());
            return Err(ResourceError::include_cycle(chain));
        }

        let entries = self
            .loader
            .load(&id.base_name, &id.locale)
            .map_err(|source| ResourceError::Load {
                bundle: id.clone(),
                source,
            })?;
        let dictionary = FlatDictionary::from_entries(id, entries, &self.config)?;

        building.push(id.clone());
        let includes = self.link_includes(nodes, id, &dictionary, building);
        building.pop();
        let includes = includes?;

        debug!(
            bundle = %id,
            keys = dictionary.len(),
            includes = includes.len(),
            "constructed bundle"
        );

        let node = Arc::new(BundleNode::new(id.clone(), dictionary, includes));
        nodes.insert(id.clone(), Arc::clone(&node));
        Ok(node)
    }

    fn link_includes(
        &self,
        nodes: &mut HashMap<BundleId, Arc<BundleNode>>,
        parent: &BundleId,
        dictionary: &FlatDictionary,
        building: &mut Vec<BundleId>,
    ) -> Result<Vec<Arc<BundleNode>>, ResourceError> {
        dictionary
            .include_targets()
            .iter()
            .map(|target| {
                let child = parent.sibling(target);
                self.construct(nodes, &child, building)
                    .map_err(|err| err.into_include_failure(parent, &child))
            })
            .collect()
    }
}
