//! Token types produced by the lexer.

use std::fmt;

use super::Span;
use crate::ast::{Conjunction, PredicateKind};
use crate::value::Value;

/// The kind of a lexed token, with its payload.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// A property, column or path element name (or an unquoted `true`/`false`).
    Identifier(String),
    /// A comparison operator, including the `like` keyword.
    Operator(PredicateKind),
    /// `and` / `or`.
    Conjunctor(Conjunction),
    /// An integer, quoted string or `null`.
    Constant(Value),
    /// `{n}`: positional argument reference.
    ParamRef(usize),
    /// `.`
    PathSeparator,
    /// `(`
    OpenGroup,
    /// `)`
    CloseGroup,
}

impl TokenKind {
    /// Classifies a scanned word, turning the reserved words `and`, `or`,
    /// `like` and `null` (any case) into their own tokens.
    #[must_use]
    pub fn from_word(word: &str) -> Self {
        if word.eq_ignore_ascii_case("and") {
            Self::Conjunctor(Conjunction::And)
        } else if word.eq_ignore_ascii_case("or") {
            Self::Conjunctor(Conjunction::Or)
        } else if word.eq_ignore_ascii_case("null") {
            Self::Constant(Value::Null)
        } else if let Some(kind) = PredicateKind::from_symbol(word) {
            Self::Operator(kind)
        } else {
            Self::Identifier(String::from(word))
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identifier(name) => write!(f, "identifier '{name}'"),
            Self::Operator(kind) => write!(f, "operator '{}'", kind.symbol()),
            Self::Conjunctor(conjunction) => write!(f, "'{}'", conjunction.keyword()),
            Self::Constant(value) => write!(f, "constant {}", value.to_literal()),
            Self::ParamRef(index) => write!(f, "parameter {{{index}}}"),
            Self::PathSeparator => write!(f, "'.'"),
            Self::OpenGroup => write!(f, "'('"),
            Self::CloseGroup => write!(f, "')'"),
        }
    }
}

/// A token with its location in the input.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The token kind and payload.
    pub kind: TokenKind,
    /// Where the token was found.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_words_any_case() {
        assert_eq!(
            TokenKind::from_word("AND"),
            TokenKind::Conjunctor(Conjunction::And)
        );
        assert_eq!(TokenKind::from_word("Or"), TokenKind::Conjunctor(Conjunction::Or));
        assert_eq!(
            TokenKind::from_word("LIKE"),
            TokenKind::Operator(PredicateKind::Like)
        );
        assert_eq!(TokenKind::from_word("Null"), TokenKind::Constant(Value::Null));
    }

    #[test]
    fn test_other_words_are_identifiers() {
        assert_eq!(
            TokenKind::from_word("android"),
            TokenKind::Identifier(String::from("android"))
        );
        assert_eq!(
            TokenKind::from_word("true"),
            TokenKind::Identifier(String::from("true"))
        );
    }
}
