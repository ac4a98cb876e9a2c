//! Lexer for `${key}` placeholders using logos

use logos::Logos;

/// Pieces of a raw bundle value
#[derive(Logos, Debug, Clone, PartialEq)]
pub enum Segment<'s> {
    /// `$${` renders as a literal `${`
    #[token("$${")]
    Escape,

    #[regex(r"\$\{[^}]+\}", |lex| {
        let s = lex.slice();
        &s[2..s.len() - 1]
    })]
    Placeholder(&'s str),

    #[regex(r"[^$]+")]
    Literal,

    #[token("$")]
    Dollar,
}

/// Replace every placeholder in `input` by `lookup(key)`, in one pass
///
/// Escapes are written back unchanged so that later passes still see them.
/// Returns the new string and the number of placeholders replaced.
pub fn substitute<E>(
    input: &str,
    mut lookup: impl FnMut(&str) -> Result<String, E>,
) -> Result<(String, usize), E> {
    let mut out = String::with_capacity(input.len());
    let mut count = 0;
    let mut lex = Segment::lexer(input);

    while let Some(segment) = lex.next() {
        match segment {
            Ok(Segment::Placeholder(key)) => {
                out.push_str(&lookup(key)?);
                count += 1;
            }
            _ => out.push_str(lex.slice()),
        }
    }

    Ok((out, count))
}

/// Whether `input` still contains a placeholder
pub fn has_placeholders(input: &str) -> bool {
    Segment::lexer(input).any(|s| matches!(s, Ok(Segment::Placeholder(_))))
}

/// Turn every `$${` escape into a literal `${`
pub fn unescape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut lex = Segment::lexer(input);

    while let Some(segment) = lex.next() {
        match segment {
            Ok(Segment::Escape) => out.push_str("${"),
            _ => out.push_str(lex.slice()),
        }
    }

    out
}
