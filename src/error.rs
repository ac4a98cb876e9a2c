//! Error types for bundle construction and template resolution

use thiserror::Error;

use crate::bundle::{BundleId, LoadError};

/// Errors raised while building bundles or resolving their values
#[derive(Debug, Error)]
pub enum ResourceError {
    /// Key has no value anywhere in the reachable include graph
    #[error("missing resource '{key}' ({bundle})")]
    MissingResource { key: String, bundle: BundleId },

    /// The requested bundle itself could not be loaded
    #[error("failed to load bundle ({bundle}): {source}")]
    Load {
        bundle: BundleId,
        #[source]
        source: LoadError,
    },

    /// An include entry names a bundle that cannot be loaded
    #[error("bundle ({bundle}) includes '{target}' which cannot be loaded: {source}")]
    UnresolvableInclude {
        bundle: BundleId,
        target: String,
        #[source]
        source: LoadError,
    },

    /// Include list with an empty entry
    #[error("malformed include list '{value}' ({bundle})")]
    MalformedInclude { bundle: BundleId, value: String },

    /// Bundles that include each other
    #[error("circular include: {}", chain.join(" -> "))]
    IncludeCycle { chain: Vec<String> },

    /// Placeholders that reference each other
    #[error("circular placeholder reference: {}", chain.join(" -> "))]
    PlaceholderCycle { chain: Vec<String> },

    /// A substitution pass reproduced an earlier intermediate value
    #[error("substitution of '{key}' repeats the intermediate value '{value}'")]
    SubstitutionCycle { key: String, value: String },

    /// Substitution kept producing new placeholders
    #[error("substitution of '{key}' did not settle after {passes} passes")]
    SubstitutionLimit { key: String, passes: usize },
}

impl ResourceError {
    /// Create a missing resource error
    pub fn missing(key: impl Into<String>, bundle: &BundleId) -> Self {
        Self::MissingResource {
            key: key.into(),
            bundle: bundle.clone(),
        }
    }

    /// Create a circular include error
    pub fn include_cycle(chain: Vec<String>) -> Self {
        Self::IncludeCycle { chain }
    }

    /// Create a circular placeholder error
    pub fn placeholder_cycle(chain: Vec<String>) -> Self {
        Self::PlaceholderCycle { chain }
    }

    /// Reattribute a failed load of `child` to the bundle that included it
    pub(crate) fn into_include_failure(self, parent: &BundleId, child: &BundleId) -> Self {
        match self {
            Self::Load { bundle, source } if bundle == *child => Self::UnresolvableInclude {
                bundle: parent.clone(),
                target: child.base_name.clone(),
                source,
            },
            other => other,
        }
    }

    /// The missing key, if this is a missing resource error
    pub fn missing_key(&self) -> Option<&str> {
        match self {
            Self::MissingResource { key, .. } => Some(key),
            _ => None,
        }
    }
}
