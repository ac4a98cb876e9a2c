//! Lexer for printf-style format specifiers using logos

use logos::Logos;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// A single `%[argument_index$][flags][width][.precision][t|T]conversion` specifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Specifier {
    /// Digits of the explicit `n$` argument index, exactly as written
    pub explicit_index: Option<String>,
    /// Whether the conversion carries the `t`/`T` date-time prefix
    pub date_time: bool,
    /// The conversion character (a letter or `%`)
    pub conversion: char,
}

impl Specifier {
    /// `%%` and `%n` are recognised but never bind an argument
    pub fn consumes_argument(&self) -> bool {
        match self.conversion {
            '%' => false,
            'n' => self.date_time,
            _ => true,
        }
    }
}

#[derive(Logos, Debug, Clone, PartialEq)]
pub enum Piece {
    #[regex(r"%([0-9]+\$)?[-#+ 0,(<]*([0-9]+)?(\.[0-9]+)?[tT]?[a-zA-Z%]", specifier)]
    Specifier(Specifier),

    #[regex(r"[^%]+")]
    Text,
}

fn specifier(lex: &mut logos::Lexer<'_, Piece>) -> Option<Specifier> {
    let body = &lex.slice()[1..];
    let digits = body.len() - body.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    let explicit_index = (digits > 0 && body[digits..].starts_with('$'))
        .then(|| body[..digits].to_string());

    let mut tail = body.chars().rev();
    let conversion = tail.next()?;
    let date_time = matches!(tail.next(), Some('t' | 'T'));

    Some(Specifier {
        explicit_index,
        date_time,
        conversion,
    })
}

/// Scan input for format specifiers, skipping literal text
///
/// A `%` that does not start a well-formed specifier is treated as text.
pub fn scan(input: &str) -> impl Iterator<Item = (Specifier, Span)> + '_ {
    Piece::lexer(input)
        .spanned()
        .filter_map(|(piece, span)| match piece {
            Ok(Piece::Specifier(spec)) => Some((spec, span)),
            _ => None,
        })
}
