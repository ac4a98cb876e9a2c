//! Expected conversion signatures

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

/// Errors raised while parsing signature text
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SignatureError {
    #[error("invalid conversion '{entry}' in signature: expected a single letter")]
    InvalidEntry { entry: String },
}

/// The ordered conversion characters a format string is expected to bind
///
/// Parsed from text such as `"s,d"` or `"s d f"`. An empty signature means
/// that no format arguments are expected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Signature(Vec<char>);

impl Signature {
    /// Create a signature from conversion characters
    pub fn new(conversions: impl IntoIterator<Item = char>) -> Self {
        Self(conversions.into_iter().collect())
    }

    /// The signature that expects no arguments
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn as_slice(&self) -> &[char] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromStr for Signature {
    type Err = SignatureError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        text.split(|c: char| c == ',' || c.is_whitespace())
            .filter(|entry| !entry.is_empty())
            .map(|entry| {
                let mut chars = entry.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c.is_ascii_alphabetic() => Ok(c),
                    _ => Err(SignatureError::InvalidEntry {
                        entry: entry.to_string(),
                    }),
                }
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl TryFrom<String> for Signature {
    type Error = SignatureError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        text.parse()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, c) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}
