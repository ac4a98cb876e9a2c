//! Validation of parsed conversions against an expected signature

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use thiserror::Error;

use super::lexer::Span;
use super::parser::{parse_conversions, Conversions};
use super::signature::Signature;

/// Errors produced while parsing or validating a format string
///
/// Argument indices are zero-based.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// Two specifiers bind different conversions to the same argument
    #[error(
        "argument index {index} is referenced through two different conversion characters: '{first}' and '{second}'"
    )]
    ConflictingConversion {
        index: usize,
        first: char,
        second: char,
        span: Span,
    },

    /// An explicit `n$` index that is zero or out of range
    #[error("invalid explicit argument index '{index}$'")]
    InvalidArgumentIndex { index: String, span: Span },

    /// An explicit index skipped over an argument position
    #[error("missing format specifier for argument index {index}")]
    MissingSpecifier { index: usize },

    /// Conversion differs from the expected one
    #[error(
        "argument {index} with conversion character '{actual}' does not match the expected conversion character '{expected}'"
    )]
    Mismatch {
        index: usize,
        expected: char,
        actual: char,
        span: Span,
    },

    #[error("validated string lacks {count} argument(s)")]
    MissingArguments { count: usize },

    #[error("validated string contains {count} more argument(s) than expected")]
    ExcessArguments { count: usize },
}

impl FormatError {
    /// Location of the offending specifier, if there is one
    pub fn span(&self) -> Option<&Span> {
        match self {
            Self::ConflictingConversion { span, .. } => Some(span),
            Self::InvalidArgumentIndex { span, .. } => Some(span),
            Self::Mismatch { span, .. } => Some(span),
            _ => None,
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, name: &str) -> String {
        let message = self.to_string();
        let span = match self.span() {
            Some(span) => char_offset(source, span.start)..char_offset(source, span.end),
            None => 0..source.chars().count(),
        };

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, name, span.start)
            .with_config(Config::default().with_color(false))
            .with_message(&message)
            .with_label(
                Label::new((name, span))
                    .with_message(message.clone())
                    .with_color(Color::Red),
            )
            .finish()
            .write((name, Source::from(source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => message,
        }
    }
}

/// ariadne counts characters, the lexer counts bytes
fn char_offset(source: &str, byte: usize) -> usize {
    source
        .get(..byte)
        .map_or_else(|| source.chars().count(), |prefix| prefix.chars().count())
}

/// Check parsed conversions against the expected signature
pub fn validate(conversions: &Conversions, expected: &Signature) -> Result<(), FormatError> {
    if expected.is_empty() && conversions.is_empty() {
        return Ok(());
    }

    let expected = expected.as_slice();
    let common = conversions.len().min(expected.len());

    for (index, &want) in expected.iter().enumerate().take(common) {
        let token = conversions
            .get(index)
            .ok_or(FormatError::MissingSpecifier { index })?;

        if !token.conversion.eq_ignore_ascii_case(&want) {
            return Err(FormatError::Mismatch {
                index,
                expected: want,
                actual: token.conversion,
                span: token.span.clone(),
            });
        }
    }

    if expected.len() > conversions.len() {
        Err(FormatError::MissingArguments {
            count: expected.len() - conversions.len(),
        })
    } else if conversions.len() > expected.len() {
        Err(FormatError::ExcessArguments {
            count: conversions.len() - expected.len(),
        })
    } else {
        Ok(())
    }
}

/// Parse `input` and validate its conversions in one step
pub fn validate_format(input: &str, expected: &Signature) -> Result<(), FormatError> {
    let conversions = parse_conversions(input)?;
    validate(&conversions, expected)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sig(chars: &str) -> Signature {
        chars.parse().expect("valid signature")
    }

    #[test]
    fn test_valid_signatures() {
        for (input, expected) in [
            ("%s %2$s", "s,s"),
            ("%s %d", "s,d"),
            ("%2$d %s", "s,d"),
            ("%3$d %1$s %2$f", "s,f,d"),
            ("no arguments", ""),
            ("%1$s %1$s", "s"),
            ("%S", "s"),
        ] {
            assert_eq!(validate_format(input, &sig(expected)), Ok(()), "{}", input);
        }
    }

    #[test]
    fn test_simple_mismatch() {
        let err = validate_format("%s", &sig("d")).unwrap_err();
        assert_eq!(
            err,
            FormatError::Mismatch {
                index: 0,
                expected: 'd',
                actual: 's',
                span: 0..2,
            }
        );
    }

    #[test]
    fn test_more_expected() {
        let err = validate_format("%s", &sig("s,d")).unwrap_err();
        assert_eq!(err, FormatError::MissingArguments { count: 1 });
        assert_eq!(err.to_string(), "validated string lacks 1 argument(s)");
    }

    #[test]
    fn test_fewer_expected() {
        let err = validate_format("%s %d", &sig("s")).unwrap_err();
        assert_eq!(err, FormatError::ExcessArguments { count: 1 });
        assert_eq!(
            err.to_string(),
            "validated string contains 1 more argument(s) than expected"
        );
    }

    #[test]
    fn test_gap_reported_as_missing_specifier() {
        let err = validate_format("%2$s %3$d", &sig("s,d")).unwrap_err();
        assert_eq!(err, FormatError::MissingSpecifier { index: 0 });
    }

    #[test]
    fn test_conflict_aborts_validation() {
        let err = validate_format("%1$s %1$d", &sig("d")).unwrap_err();
        assert!(matches!(err, FormatError::ConflictingConversion { .. }));
    }

    #[test]
    fn test_placeholders_without_expectation() {
        let err = validate_format("%s", &Signature::empty()).unwrap_err();
        assert_eq!(err, FormatError::ExcessArguments { count: 1 });
    }

    #[test]
    fn test_format_points_at_specifier() {
        let source = "Hello %d";
        let err = validate_format(source, &sig("s")).unwrap_err();
        let report = err.format(source, "greeting");
        assert!(report.contains("greeting"));
        assert!(report.contains("does not match the expected conversion character 's'"));
    }

    #[test]
    fn test_format_with_multibyte_source() {
        let source = "Größe äöü € %d";
        let err = validate_format(source, &sig("s")).unwrap_err();
        let report = err.format(source, "size");
        assert!(report.contains("Größe äöü € %d"));
        assert!(report.contains("%d"));
    }

    #[test]
    fn test_char_offset() {
        let source = "€ %d";
        assert_eq!(char_offset(source, 0), 0);
        assert_eq!(char_offset(source, 4), 2);
        assert_eq!(char_offset(source, source.len()), 4);
    }
}
