//! Configuration for bundle construction and template resolution

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading configuration files
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse configuration TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Options controlling how bundles declare their includes
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BundleConfig {
    /// Reserved key whose value lists included bundles
    pub include_key: String,

    /// Separator between included bundle names
    pub include_delimiter: String,
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            include_key: "@include".to_string(),
            include_delimiter: ";".to_string(),
        }
    }
}

impl BundleConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the reserved include key
    pub fn with_include_key(mut self, key: impl Into<String>) -> Self {
        self.include_key = key.into();
        self
    }

    /// Set the include list separator
    pub fn with_include_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.include_delimiter = delimiter.into();
        self
    }
}

/// Options for placeholder substitution and resource mapping
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Default separator for delimited list resources
    pub list_delimiter: String,

    /// Upper bound on whole-string substitution passes
    pub max_substitution_passes: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            list_delimiter: ";".to_string(),
            max_substitution_passes: 32,
        }
    }
}

impl ResolverConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default list separator
    pub fn with_list_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.list_delimiter = delimiter.into();
        self
    }

    /// Set the substitution pass limit
    pub fn with_max_substitution_passes(mut self, passes: usize) -> Self {
        self.max_substitution_passes = passes;
        self
    }
}

/// Complete engine configuration, as read from a TOML file
///
/// ```toml
/// [bundles]
/// include_key = "@include"
/// include_delimiter = ";"
///
/// [resolver]
/// list_delimiter = ","
/// max_substitution_passes = 16
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub bundles: BundleConfig,
    pub resolver: ResolverConfig,
}

impl EngineConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Set the bundle configuration
    pub fn with_bundles(mut self, config: BundleConfig) -> Self {
        self.bundles = config;
        self
    }

    /// Set the resolver configuration
    pub fn with_resolver(mut self, config: ResolverConfig) -> Self {
        self.resolver = config;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.bundles.include_key, "@include");
        assert_eq!(config.bundles.include_delimiter, ";");
        assert_eq!(config.resolver.list_delimiter, ";");
        assert_eq!(config.resolver.max_substitution_passes, 32);
    }

    #[test]
    fn test_builder_pattern() {
        let config = EngineConfig::new()
            .with_bundles(BundleConfig::new().with_include_key("#import"))
            .with_resolver(ResolverConfig::new().with_list_delimiter(","));

        assert_eq!(config.bundles.include_key, "#import");
        assert_eq!(config.bundles.include_delimiter, ";");
        assert_eq!(config.resolver.list_delimiter, ",");
    }

    #[test]
    fn test_parse_partial_toml() {
        let config = EngineConfig::from_str(
            r#"
[bundles]
include_delimiter = ","
"#,
        )
        .expect("Should parse");
        assert_eq!(config.bundles.include_key, "@include");
        assert_eq!(config.bundles.include_delimiter, ",");
        assert_eq!(config.resolver, ResolverConfig::default());
    }

    #[test]
    fn test_parse_empty_toml() {
        let config = EngineConfig::from_str("").expect("Should parse");
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_invalid_toml_error() {
        let result = EngineConfig::from_str("[resolver]\nmax_substitution_passes = \"many\"");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }
}
