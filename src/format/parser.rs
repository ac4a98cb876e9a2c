//! Conversion parsing - binds format specifiers to argument positions

use super::lexer::{scan, Span};
use super::validator::FormatError;

/// A format specifier bound to an argument position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionToken {
    /// Zero-based explicit index, if the specifier named one
    pub explicit_index: Option<usize>,
    /// Conversion character as written
    pub conversion: char,
    /// Location of the specifier in the parsed string
    pub span: Span,
}

/// Conversion characters of one string, ordered by argument index
///
/// Slots skipped by an explicit index stay unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversions {
    slots: Vec<Option<ConversionToken>>,
}

impl Conversions {
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Token bound to an argument index, `None` for gaps or out-of-range indices
    pub fn get(&self, index: usize) -> Option<&ConversionToken> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// The conversion characters, `None` for unset slots
    pub fn chars(&self) -> Vec<Option<char>> {
        self.slots
            .iter()
            .map(|slot| slot.as_ref().map(|t| t.conversion))
            .collect()
    }

    fn bind(&mut self, index: usize, token: ConversionToken) -> Result<(), FormatError> {
        if self.slots.len() <= index {
            self.slots.resize(index + 1, None);
        }

        let slot = &mut self.slots[index];
        if let Some(existing) = slot {
            if !existing.conversion.eq_ignore_ascii_case(&token.conversion) {
                return Err(FormatError::ConflictingConversion {
                    index,
                    first: existing.conversion,
                    second: token.conversion,
                    span: token.span,
                });
            }
        }
        *slot = Some(token);
        Ok(())
    }
}

/// Parse all format specifiers of `input` into index-ordered conversions
///
/// Specifiers without an explicit `n$` index take the next implicit position;
/// explicit indices never advance the implicit counter. Parsing stops at the
/// first argument bound to two different conversions.
pub fn parse_conversions(input: &str) -> Result<Conversions, FormatError> {
    let mut conversions = Conversions::default();
    let mut next_implicit = 0usize;

    for (spec, span) in scan(input) {
        if !spec.consumes_argument() {
            continue;
        }

        let explicit_index = match &spec.explicit_index {
            Some(digits) => Some(explicit_position(digits, &span)?),
            None => None,
        };
        let index = match explicit_index {
            Some(index) => index,
            None => {
                next_implicit += 1;
                next_implicit - 1
            }
        };

        conversions.bind(
            index,
            ConversionToken {
                explicit_index,
                conversion: spec.conversion,
                span,
            },
        )?;
    }

    Ok(conversions)
}

/// Convert a 1-based `n$` index to a zero-based position
fn explicit_position(digits: &str, span: &Span) -> Result<usize, FormatError> {
    digits
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .ok_or_else(|| FormatError::InvalidArgumentIndex {
            index: digits.to_string(),
            span: span.clone(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_implicit_positions() {
        let parsed = parse_conversions("%s %d %f").expect("should parse");
        assert_eq!(parsed.chars(), vec![Some('s'), Some('d'), Some('f')]);
    }

    #[test]
    fn test_explicit_does_not_advance_implicit_counter() {
        let parsed = parse_conversions("%2$d %s").expect("should parse");
        assert_eq!(parsed.chars(), vec![Some('s'), Some('d')]);
        assert_eq!(parsed.get(1).and_then(|t| t.explicit_index), Some(1));
        assert_eq!(parsed.get(0).and_then(|t| t.explicit_index), None);
    }

    #[test]
    fn test_explicit_reordering() {
        let parsed = parse_conversions("%3$d %1$s %2$f").expect("should parse");
        assert_eq!(parsed.chars(), vec![Some('s'), Some('f'), Some('d')]);
    }

    #[test]
    fn test_gap_left_unset() {
        let parsed = parse_conversions("%2$s %3$d").expect("should parse");
        assert_eq!(parsed.chars(), vec![None, Some('s'), Some('d')]);
        assert!(parsed.get(0).is_none());
    }

    #[test]
    fn test_repeated_reference_same_conversion() {
        let parsed = parse_conversions("%1$s %1$s").expect("should parse");
        assert_eq!(parsed.len(), 1);
    }

    #[test]
    fn test_repeated_reference_differs_only_in_case() {
        let parsed = parse_conversions("%1$s %1$S").expect("should parse");
        assert_eq!(parsed.chars(), vec![Some('S')]);
    }

    #[test]
    fn test_conflicting_reference() {
        let err = parse_conversions("%1$s %1$d").unwrap_err();
        assert!(matches!(
            err,
            FormatError::ConflictingConversion {
                index: 0,
                first: 's',
                second: 'd',
                ..
            }
        ));
    }

    #[test]
    fn test_conflict_between_implicit_and_explicit() {
        let err = parse_conversions("%s %1$d").unwrap_err();
        assert!(matches!(err, FormatError::ConflictingConversion { index: 0, .. }));
    }

    #[test]
    fn test_zero_index_rejected() {
        let err = parse_conversions("%0$s").unwrap_err();
        assert!(matches!(err, FormatError::InvalidArgumentIndex { .. }));
    }

    #[test]
    fn test_percent_and_newline_bind_nothing() {
        let parsed = parse_conversions("%d%% done%n%s").expect("should parse");
        assert_eq!(parsed.chars(), vec![Some('d'), Some('s')]);
    }

    #[test]
    fn test_no_specifiers() {
        assert!(parse_conversions("no arguments").expect("should parse").is_empty());
    }
}
