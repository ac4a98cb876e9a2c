//! Template resolution - lookup with include fallback and placeholder substitution

use std::collections::HashSet;

use tracing::trace;

use crate::bundle::BundleNode;
use crate::config::ResolverConfig;
use crate::error::ResourceError;
use crate::format::{validate_format, Signature};
use crate::Error;

use super::lexer::{has_placeholders, substitute, unescape};

/// Resolves keys of a bundle node into fully substituted strings
///
/// Every lookup, including the lookups of nested placeholders, starts from
/// the node that `resolve` was called on, so a value found in an included
/// bundle can reference keys of the including bundle.
#[derive(Debug, Clone, Default)]
pub struct TemplateResolver {
    config: ResolverConfig,
}

impl TemplateResolver {
    /// Create a resolver with default settings
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ResolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Raw value of `key` from `node` or its includes, without substitution
    pub fn find_value<'n>(&self, node: &'n BundleNode, key: &str) -> Result<&'n str, ResourceError> {
        node.find(key)
            .ok_or_else(|| ResourceError::missing(key, node.id()))
    }

    /// Resolve `key` to its final string
    ///
    /// Placeholders are replaced until none remain. A placeholder that
    /// (directly or transitively) refers back to itself is an error, as is a
    /// key missing from the whole include graph.
    pub fn resolve(&self, node: &BundleNode, key: &str) -> Result<String, ResourceError> {
        let mut expanding = Vec::new();
        let value = self.expand(node, key, &mut expanding)?;
        let value = self.settle(node, key, value)?;
        Ok(unescape(&value))
    }

    /// Resolve `key` and check its format specifiers against `expected`
    pub fn resolve_validated(
        &self,
        node: &BundleNode,
        key: &str,
        expected: &Signature,
    ) -> Result<String, Error> {
        let value = self.resolve(node, key)?;
        validate_format(&value, expected).map_err(|source| Error::Format {
            key: key.to_string(),
            value: value.clone(),
            source,
        })?;
        Ok(value)
    }

    /// Value of `key` with all of its placeholders expanded, depth-first
    ///
    /// `expanding` holds the keys whose expansion is in progress.
    fn expand(
        &self,
        node: &BundleNode,
        key: &str,
        expanding: &mut Vec<String>,
    ) -> Result<String, ResourceError> {
        if let Some(start) = expanding.iter().position(|k| k == key) {
            let mut chain = expanding[start..].to_vec();
            chain.push(key.to_string());
            return Err(ResourceError::placeholder_cycle(chain));
        }

        let raw = self.find_value(node, key)?;

        expanding.push(key.to_string());
        let result = substitute(raw, |sub| self.expand(node, sub, expanding));
        expanding.pop();

        let (value, count) = result?;
        if count > 0 {
            trace!(key, substitutions = count, "expanded placeholders");
        }
        Ok(value)
    }

    /// Repeat whole-string passes for placeholders formed by concatenation
    ///
    /// A pass that reproduces an earlier intermediate string can never settle.
    fn settle(&self, node: &BundleNode, key: &str, mut value: String) -> Result<String, ResourceError> {
        let passes = self.config.max_substitution_passes;
        let mut seen = HashSet::new();

        for pass in 0..passes {
            if !has_placeholders(&value) {
                return Ok(value);
            }
            if !seen.insert(value.clone()) {
                return Err(ResourceError::SubstitutionCycle {
                    key: key.to_string(),
                    value,
                });
            }
            trace!(key, pass, "substitution pass");
            let mut expanding = Vec::new();
            value = substitute(&value, |sub| self.expand(node, sub, &mut expanding))?.0;
        }

        if has_placeholders(&value) {
            Err(ResourceError::SubstitutionLimit {
                key: key.to_string(),
                passes,
            })
        } else {
            Ok(value)
        }
    }
}
