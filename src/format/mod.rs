//! Format string validation
//!
//! Parses `printf`-style conversion specifiers
//! (`%[argument_index$][flags][width][.precision][t|T]conversion`) and checks
//! the conversions bound to each argument position against an expected
//! [`Signature`].
//!
//! # Example
//!
//! ```rust
//! use stringz::format::{validate_format, Signature};
//!
//! let expected: Signature = "s,d".parse().unwrap();
//! assert!(validate_format("%2$d items for %1$s", &expected).is_ok());
//! ```

pub mod lexer;
mod parser;
mod signature;
mod validator;

pub use parser::{parse_conversions, ConversionToken, Conversions};
pub use signature::{Signature, SignatureError};
pub use validator::{validate, validate_format, FormatError};
