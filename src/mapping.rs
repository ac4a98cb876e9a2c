//! Resource mapping: resolving a named set of requests in one go
//!
//! Instead of discovering fields at runtime, the host declares what it needs
//! (a single key, a collection of keys, or a delimited list stored under one
//! key), optionally with the format signature each string must satisfy, and
//! assigns the returned values itself.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::bundle::BundleNode;
use crate::config::ConfigError;
use crate::format::{validate_format, Signature};
use crate::template::TemplateResolver;
use crate::Error as CrateError;

/// Errors in the shape of a request
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MappingError {
    #[error("resource collection must name at least one key")]
    EmptyCollection,

    #[error("resource contains {values} value(s), but {signatures} signature(s)")]
    SignatureCount { values: usize, signatures: usize },

    #[error("invalid resource request: {reason}")]
    InvalidRequest { reason: String },
}

/// One value the host wants resolved
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RequestSpec")]
pub enum ResourceRequest {
    /// A single key
    Single {
        key: String,
        signature: Option<Signature>,
    },
    /// Several keys resolved into a list, one signature per key
    Collection {
        keys: Vec<String>,
        signatures: Option<Vec<Signature>>,
    },
    /// One key whose resolved value is split into a list
    Delimited {
        key: String,
        delimiter: Option<String>,
        signatures: Option<Vec<Signature>>,
    },
}

/// A resolved request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceValue {
    Single(String),
    List(Vec<String>),
}

impl ResourceRequest {
    pub fn single(key: impl Into<String>) -> Self {
        Self::Single {
            key: key.into(),
            signature: None,
        }
    }

    pub fn collection<K: Into<String>>(keys: impl IntoIterator<Item = K>) -> Self {
        Self::Collection {
            keys: keys.into_iter().map(Into::into).collect(),
            signatures: None,
        }
    }

    pub fn delimited(key: impl Into<String>) -> Self {
        Self::Delimited {
            key: key.into(),
            delimiter: None,
            signatures: None,
        }
    }

    /// Set the delimiter of a delimited request
    pub fn with_delimiter(mut self, value: impl Into<String>) -> Self {
        if let Self::Delimited { delimiter, .. } = &mut self {
            *delimiter = Some(value.into());
        }
        self
    }

    /// Expect a signature for a single-key request
    pub fn with_signature(mut self, expected: Signature) -> Self {
        if let Self::Single { signature, .. } = &mut self {
            *signature = Some(expected);
        }
        self
    }

    /// Expect one signature per element of a list request
    pub fn with_signatures(mut self, expected: Vec<Signature>) -> Self {
        match &mut self {
            Self::Collection { signatures, .. } | Self::Delimited { signatures, .. } => {
                *signatures = Some(expected);
            }
            Self::Single { .. } => {}
        }
        self
    }

    /// Resolve the request against `node`, validating where requested
    pub fn resolve(&self, resolver: &TemplateResolver, node: &BundleNode) -> Result<ResourceValue, CrateError> {
        match self {
            Self::Single { key, signature } => {
                let value = match signature {
                    Some(expected) => resolver.resolve_validated(node, key, expected)?,
                    None => resolver.resolve(node, key)?,
                };
                Ok(ResourceValue::Single(value))
            }
            Self::Collection { keys, signatures } => {
                if keys.is_empty() {
                    return Err(MappingError::EmptyCollection.into());
                }
                check_count(keys.len(), signatures.as_deref())?;

                let mut values = Vec::with_capacity(keys.len());
                for (i, key) in keys.iter().enumerate() {
                    let value = match signatures.as_ref().map(|s| &s[i]) {
                        Some(expected) => resolver.resolve_validated(node, key, expected)?,
                        None => resolver.resolve(node, key)?,
                    };
                    values.push(value);
                }
                Ok(ResourceValue::List(values))
            }
            Self::Delimited {
                key,
                delimiter,
                signatures,
            } => {
                let delimiter = delimiter
                    .as_deref()
                    .unwrap_or(&resolver.config().list_delimiter);
                let value = resolver.resolve(node, key)?;
                let parts = split_list(&value, delimiter);

                if let Some(signatures) = signatures {
                    check_count(parts.len(), Some(signatures.as_slice()))?;
                    for (i, (part, expected)) in parts.iter().zip(signatures).enumerate() {
                        validate_format(part, expected).map_err(|source| CrateError::Format {
                            key: format!("{}[{}]", key, i),
                            value: part.clone(),
                            source,
                        })?;
                    }
                }
                Ok(ResourceValue::List(parts))
            }
        }
    }
}

/// Split on a literal delimiter, dropping trailing empty elements
///
/// A value without the delimiter is a one-element list, even when empty.
fn split_list(value: &str, delimiter: &str) -> Vec<String> {
    let mut parts: Vec<String> = value.split(delimiter).map(str::to_string).collect();
    if parts.len() > 1 {
        while parts.last().is_some_and(String::is_empty) {
            parts.pop();
        }
    }
    parts
}

fn check_count(values: usize, signatures: Option<&[Signature]>) -> Result<(), MappingError> {
    match signatures {
        Some(signatures) if signatures.len() != values => Err(MappingError::SignatureCount {
            values,
            signatures: signatures.len(),
        }),
        _ => Ok(()),
    }
}

/// TOML shape of a request
///
/// ```toml
/// greeting = { key = "greeting", expect = "s" }
/// weekdays = { key = "weekdays", delimiter = "," }
/// errors = { keys = ["err.io", "err.parse"], expect = ["s", "s,d"] }
/// ```
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RequestSpec {
    key: Option<String>,
    keys: Option<Vec<String>>,
    delimiter: Option<String>,
    expect: Option<Expect>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Expect {
    One(Signature),
    Many(Vec<Signature>),
}

impl TryFrom<RequestSpec> for ResourceRequest {
    type Error = MappingError;

    fn try_from(spec: RequestSpec) -> Result<Self, Self::Error> {
        let invalid = |reason: &str| MappingError::InvalidRequest {
            reason: reason.to_string(),
        };

        match (spec.key, spec.keys, spec.delimiter, spec.expect) {
            (Some(_), Some(_), _, _) => Err(invalid("`key` and `keys` are mutually exclusive")),
            (None, None, _, _) => Err(invalid("one of `key` or `keys` is required")),
            (None, Some(_), Some(_), _) => Err(invalid("`delimiter` requires `key`")),
            (None, Some(keys), None, expect) => match expect {
                Some(Expect::One(_)) => Err(invalid("`expect` for `keys` must be a list")),
                Some(Expect::Many(signatures)) => Ok(Self::Collection {
                    keys,
                    signatures: Some(signatures),
                }),
                None => Ok(Self::Collection {
                    keys,
                    signatures: None,
                }),
            },
            (Some(key), None, Some(delimiter), expect) => match expect {
                Some(Expect::One(_)) => Err(invalid("`expect` for a delimited list must be a list")),
                Some(Expect::Many(signatures)) => Ok(Self::Delimited {
                    key,
                    delimiter: Some(delimiter),
                    signatures: Some(signatures),
                }),
                None => Ok(Self::Delimited {
                    key,
                    delimiter: Some(delimiter),
                    signatures: None,
                }),
            },
            (Some(key), None, None, expect) => match expect {
                Some(Expect::Many(_)) => Err(invalid("`expect` for `key` must be a single signature")),
                Some(Expect::One(signature)) => Ok(Self::Single {
                    key,
                    signature: Some(signature),
                }),
                None => Ok(Self::Single {
                    key,
                    signature: None,
                }),
            },
        }
    }
}

/// A named set of requests, resolved together
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MessageMap {
    #[serde(default)]
    pub requests: BTreeMap<String, ResourceRequest>,
}

impl MessageMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a mapping from a TOML file with a `[requests]` table
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load a mapping from a TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Add a named request
    pub fn with_request(mut self, name: impl Into<String>, request: ResourceRequest) -> Self {
        self.requests.insert(name.into(), request);
        self
    }

    /// Resolve every request, stopping at the first failure
    pub fn resolve(
        &self,
        resolver: &TemplateResolver,
        node: &BundleNode,
    ) -> Result<BTreeMap<String, ResourceValue>, CrateError> {
        self.requests
            .iter()
            .map(|(name, request)| {
                request
                    .resolve(resolver, node)
                    .map(|value| (name.clone(), value))
            })
            .collect()
    }

    /// Resolve every request and collect all failures by request name
    pub fn check(&self, resolver: &TemplateResolver, node: &BundleNode) -> Vec<(String, CrateError)> {
        self.requests
            .iter()
            .filter_map(|(name, request)| {
                request
                    .resolve(resolver, node)
                    .err()
                    .map(|err| (name.clone(), err))
            })
            .collect()
    }
}
