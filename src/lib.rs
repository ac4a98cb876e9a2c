//! stringz - resource bundle templates and format string validation
//!
//! This library layers flat, per-locale key/value bundles through `@include`
//! declarations, resolves `${key}` placeholders across the include graph, and
//! validates `printf`-style format strings against expected conversions.
//!
//! # Example
//!
//! ```rust
//! use stringz::{Engine, MemoryLoader, Signature};
//!
//! let loader = MemoryLoader::new()
//!     .with_bundle("app", "", [("@include", "common"), ("inbox", "${user}, you have %d mails")])
//!     .with_bundle("common", "", [("user", "Bob")]);
//! let engine = Engine::new(loader);
//!
//! let expected: Signature = "d".parse().unwrap();
//! let inbox = engine.get_validated("app", "", "inbox", &expected).unwrap();
//! assert_eq!(inbox, "Bob, you have %d mails");
//! ```

pub mod bundle;
pub mod config;
pub mod error;
pub mod format;
pub mod mapping;
pub mod template;

use std::collections::BTreeMap;
use std::sync::Arc;

pub use bundle::{
    BundleCache, BundleId, BundleNode, DictionaryLoader, DirectoryLoader, FlatDictionary,
    LoadError, MemoryLoader,
};
pub use config::{BundleConfig, ConfigError, EngineConfig, ResolverConfig};
pub use error::ResourceError;
pub use format::{parse_conversions, validate_format, FormatError, Signature};
pub use mapping::{MappingError, MessageMap, ResourceRequest, ResourceValue};
pub use template::TemplateResolver;

use thiserror::Error;

/// Errors that can occur while resolving and validating resources
#[derive(Debug, Error)]
pub enum Error {
    /// Error while building bundles or resolving values
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// A resolved value failed format validation
    #[error("invalid format in '{key}': {source}")]
    Format {
        key: String,
        value: String,
        #[source]
        source: FormatError,
    },

    /// A malformed resource request
    #[error(transparent)]
    Mapping(#[from] MappingError),
}

impl Error {
    /// Human-readable report, with source context for format errors
    pub fn report(&self) -> String {
        match self {
            Error::Format { key, value, source } => source.format(value, key),
            other => other.to_string(),
        }
    }
}

/// Bundle cache and resolver bundled together
///
/// The cache keeps every loaded bundle until [`reset`](Engine::reset) is
/// called, for example after the application switched its active locale.
pub struct Engine<L> {
    bundles: BundleCache<L>,
    resolver: TemplateResolver,
}

impl<L: DictionaryLoader> Engine<L> {
    /// Create an engine with default configuration
    pub fn new(loader: L) -> Self {
        Self::with_config(loader, EngineConfig::default())
    }

    /// Create an engine with custom configuration
    pub fn with_config(loader: L, config: EngineConfig) -> Self {
        Self {
            bundles: BundleCache::with_config(loader, config.bundles),
            resolver: TemplateResolver::with_config(config.resolver),
        }
    }

    pub fn bundles(&self) -> &BundleCache<L> {
        &self.bundles
    }

    pub fn resolver(&self) -> &TemplateResolver {
        &self.resolver
    }

    /// Get (loading on first use) the bundle node for `(base_name, locale)`
    pub fn bundle(&self, base_name: &str, locale: &str) -> Result<Arc<BundleNode>, ResourceError> {
        self.bundles.get(base_name, locale)
    }

    /// Resolve a key of the given bundle
    pub fn get(&self, base_name: &str, locale: &str, key: &str) -> Result<String, Error> {
        let node = self.bundle(base_name, locale)?;
        Ok(self.resolver.resolve(&node, key)?)
    }

    /// Resolve a key and validate its format specifiers
    pub fn get_validated(
        &self,
        base_name: &str,
        locale: &str,
        key: &str,
        expected: &Signature,
    ) -> Result<String, Error> {
        let node = self.bundle(base_name, locale)?;
        self.resolver.resolve_validated(&node, key, expected)
    }

    /// Resolve every request of a message map against the given bundle
    pub fn resolve_map(
        &self,
        base_name: &str,
        locale: &str,
        map: &MessageMap,
    ) -> Result<BTreeMap<String, ResourceValue>, Error> {
        let node = self.bundle(base_name, locale)?;
        map.resolve(&self.resolver, &node)
    }

    /// Drop all cached bundles
    pub fn reset(&self) {
        self.bundles.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> Engine<MemoryLoader> {
        Engine::new(
            MemoryLoader::new()
                .with_bundle("app", "", [("userName", "Bob"), ("prompt", "Hi ${userName}")])
                .with_bundle("app", "de", [("userName", "Bob"), ("prompt", "Hallo ${userName}")]),
        )
    }

    #[test]
    fn test_get_simple() {
        assert_eq!(engine().get("app", "", "prompt").unwrap(), "Hi Bob");
    }

    #[test]
    fn test_get_locale() {
        assert_eq!(engine().get("app", "de", "prompt").unwrap(), "Hallo Bob");
    }

    #[test]
    fn test_get_missing_key() {
        let err = engine().get("app", "", "ghost").unwrap_err();
        assert!(matches!(
            err,
            Error::Resource(ResourceError::MissingResource { ref key, .. }) if key == "ghost"
        ));
    }

    #[test]
    fn test_get_missing_bundle() {
        let err = engine().get("nope", "", "prompt").unwrap_err();
        assert!(matches!(err, Error::Resource(ResourceError::Load { .. })));
    }

    #[test]
    fn test_get_validated_reports_format_error() {
        let engine = Engine::new(MemoryLoader::new().with_bundle("app", "", [("n", "%s items")]));
        let expected: Signature = "d".parse().unwrap();
        let err = engine.get_validated("app", "", "n", &expected).unwrap_err();
        assert!(err.to_string().starts_with("invalid format in 'n'"));
        assert!(err.report().contains("'s' does not match"));
    }

    #[test]
    fn test_reset_reloads() {
        let engine = engine();
        let before = engine.bundle("app", "").unwrap();
        engine.reset();
        let after = engine.bundle("app", "").unwrap();
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(engine.bundles().loader().load_count(), 2);
    }

    #[test]
    fn test_custom_include_key() {
        let config = EngineConfig::new().with_bundles(BundleConfig::new().with_include_key("#use"));
        let engine = Engine::with_config(
            MemoryLoader::new()
                .with_bundle("app", "", [("#use", "base")])
                .with_bundle("base", "", [("k", "from base")]),
            config,
        );
        assert_eq!(engine.get("app", "", "k").unwrap(), "from base");
    }
}
