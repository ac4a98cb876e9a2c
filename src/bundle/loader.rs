//! Dictionary loaders: the seam between the engine and a backing store

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use thiserror::Error;

/// Raw key/value pairs of one bundle, in load order
pub type Entries = Vec<(String, String)>;

/// Errors that can occur while loading a raw dictionary
#[derive(Debug, Error)]
pub enum LoadError {
    /// No bundle exists for the requested identity
    #[error("bundle '{base_name}' not found for locale '{locale}'")]
    NotFound { base_name: String, locale: String },

    #[error("error reading bundle file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("error parsing bundle file {path}: {source}")]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Only strings (and tables of strings) can be bundle values
    #[error("value of '{key}' in {path} is not a string")]
    InvalidValue { path: PathBuf, key: String },
}

impl LoadError {
    pub fn not_found(base_name: impl Into<String>, locale: impl Into<String>) -> Self {
        Self::NotFound {
            base_name: base_name.into(),
            locale: locale.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Loads the raw key/value pairs of one `(base_name, locale)` bundle
///
/// Implementations must report a missing bundle as [`LoadError::NotFound`].
pub trait DictionaryLoader: Send + Sync {
    fn load(&self, base_name: &str, locale: &str) -> Result<Entries, LoadError>;
}

impl<L: DictionaryLoader + ?Sized> DictionaryLoader for Arc<L> {
    fn load(&self, base_name: &str, locale: &str) -> Result<Entries, LoadError> {
        (**self).load(base_name, locale)
    }
}

impl<L: DictionaryLoader + ?Sized> DictionaryLoader for Box<L> {
    fn load(&self, base_name: &str, locale: &str) -> Result<Entries, LoadError> {
        (**self).load(base_name, locale)
    }
}

/// Loader over bundles held in memory
#[derive(Debug, Default)]
pub struct MemoryLoader {
    bundles: HashMap<(String, String), Entries>,
    loads: AtomicUsize,
}

impl MemoryLoader {
    /// Create a new empty loader
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a bundle and return the loader
    pub fn with_bundle<K, V>(
        mut self,
        base_name: &str,
        locale: &str,
        entries: impl IntoIterator<Item = (K, V)>,
    ) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.insert(base_name, locale, entries);
        self
    }

    /// Add or replace a bundle
    pub fn insert<K, V>(
        &mut self,
        base_name: &str,
        locale: &str,
        entries: impl IntoIterator<Item = (K, V)>,
    ) where
        K: Into<String>,
        V: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.bundles
            .insert((base_name.to_string(), locale.to_string()), entries);
    }

    /// Number of successful and failed `load` calls so far
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl DictionaryLoader for MemoryLoader {
    fn load(&self, base_name: &str, locale: &str) -> Result<Entries, LoadError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.bundles
            .get(&(base_name.to_string(), locale.to_string()))
            .cloned()
            .ok_or_else(|| LoadError::not_found(base_name, locale))
    }
}

/// Loader reading TOML bundle files from a directory tree
///
/// The base name `app.messages` with locale `de` maps to
/// `<root>/app/messages_de.toml`; the root locale (empty string) maps to
/// `<root>/app/messages.toml`. Nested tables become dotted keys.
#[derive(Debug, Clone)]
pub struct DirectoryLoader {
    root: PathBuf,
}

impl DirectoryLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File path for a bundle, or `None` if the base name is not a valid path
    pub fn path_for(&self, base_name: &str, locale: &str) -> Option<PathBuf> {
        let segments: Vec<&str> = base_name.split('.').collect();
        let valid = segments
            .iter()
            .all(|s| !s.is_empty() && !s.contains(['/', '\\']));
        if !valid || locale.contains(['/', '\\', '.']) {
            return None;
        }

        let (stem, dirs) = segments.split_last()?;
        let mut path = self.root.clone();
        path.extend(dirs);
        if locale.is_empty() {
            path.push(format!("{}.toml", stem));
        } else {
            path.push(format!("{}_{}.toml", stem, locale));
        }
        Some(path)
    }
}

impl DictionaryLoader for DirectoryLoader {
    fn load(&self, base_name: &str, locale: &str) -> Result<Entries, LoadError> {
        let path = self
            .path_for(base_name, locale)
            .ok_or_else(|| LoadError::not_found(base_name, locale))?;

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(LoadError::not_found(base_name, locale));
            }
            Err(source) => return Err(LoadError::Io { path, source }),
        };

        let table: toml::Table = toml::from_str(&content).map_err(|source| LoadError::Toml {
            path: path.clone(),
            source,
        })?;

        let mut entries = Entries::new();
        flatten(&path, "", table, &mut entries)?;
        Ok(entries)
    }
}

fn flatten(path: &Path, prefix: &str, table: toml::Table, out: &mut Entries) -> Result<(), LoadError> {
    for (key, value) in table {
        let key = if prefix.is_empty() {
            key
        } else {
            format!("{}.{}", prefix, key)
        };
        match value {
            toml::Value::String(s) => out.push((key, s)),
            toml::Value::Table(t) => flatten(path, &key, t, out)?,
            _ => {
                return Err(LoadError::InvalidValue {
                    path: path.to_path_buf(),
                    key,
                })
            }
        }
    }
    Ok(())
}
