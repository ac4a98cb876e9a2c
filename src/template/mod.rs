//! Template resolution for bundle values
//!
//! Values may reference other keys with `${key}` placeholders. References are
//! looked up from the requested bundle through its whole include graph and
//! replaced until the value contains no placeholders. `$${` produces a
//! literal `${`.
//!
//! # Example
//!
//! ```rust
//! use stringz::bundle::{BundleCache, MemoryLoader};
//! use stringz::template::TemplateResolver;
//!
//! let loader = MemoryLoader::new()
//!     .with_bundle("app", "", [("userName", "Bob"), ("prompt", "Hi ${userName}")]);
//! let node = BundleCache::new(loader).get("app", "").unwrap();
//!
//! let value = TemplateResolver::new().resolve(&node, "prompt").unwrap();
//! assert_eq!(value, "Hi Bob");
//! ```

pub mod lexer;
mod resolver;

pub use resolver::TemplateResolver;
