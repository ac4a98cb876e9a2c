//! Bundles: per-locale dictionaries linked through include declarations
//!
//! A bundle declares its includes under a reserved key (`@include` by
//! default) as a `;`-separated list of base names. The [`BundleCache`] loads
//! each `(base_name, locale)` once through a [`DictionaryLoader`] and links
//! included bundles in the same locale, in declared order.

mod cache;
mod dictionary;
mod loader;
mod node;

pub use cache::BundleCache;
pub use dictionary::FlatDictionary;
pub use loader::{DictionaryLoader, DirectoryLoader, Entries, LoadError, MemoryLoader};
pub use node::{BundleId, BundleNode};
