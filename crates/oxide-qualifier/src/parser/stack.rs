//! The parse stack and its entries.

use std::fmt;

use crate::ast::{Conjunction, Predicate, PredicateKind, Qualifier};
use crate::error::ParseError;
use crate::lexer::{Span, Token, TokenKind};
use crate::value::Value;

/// The kind of a stack entry, used by reduction patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Identifier,
    Operator,
    Conjunctor,
    Constant,
    ParamRef,
    PathSeparator,
    OpenGroup,
    CloseGroup,
    Predicate,
    Qualifier,
    Path,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Identifier => "identifier",
            Self::Operator => "operator",
            Self::Conjunctor => "conjunction",
            Self::Constant => "constant",
            Self::ParamRef => "parameter reference",
            Self::PathSeparator => "'.'",
            Self::OpenGroup => "'('",
            Self::CloseGroup => "')'",
            Self::Predicate => "predicate",
            Self::Qualifier => "qualifier",
            Self::Path => "path",
        };
        f.write_str(name)
    }
}

/// What a stack entry holds: a shifted token or a reduced node.
#[derive(Debug)]
pub enum Node {
    Token(TokenKind),
    Predicate(Predicate),
    Qualifier(Qualifier),
    Path(Vec<String>),
}

/// A stack entry with the span of input it covers.
#[derive(Debug)]
pub struct Entry {
    pub node: Node,
    pub span: Span,
}

impl Entry {
    pub const fn new(node: Node, span: Span) -> Self {
        Self { node, span }
    }

    pub const fn kind(&self) -> EntryKind {
        match &self.node {
            Node::Token(TokenKind::Identifier(_)) => EntryKind::Identifier,
            Node::Token(TokenKind::Operator(_)) => EntryKind::Operator,
            Node::Token(TokenKind::Conjunctor(_)) => EntryKind::Conjunctor,
            Node::Token(TokenKind::Constant(_)) => EntryKind::Constant,
            Node::Token(TokenKind::ParamRef(_)) => EntryKind::ParamRef,
            Node::Token(TokenKind::PathSeparator) => EntryKind::PathSeparator,
            Node::Token(TokenKind::OpenGroup) => EntryKind::OpenGroup,
            Node::Token(TokenKind::CloseGroup) => EntryKind::CloseGroup,
            Node::Predicate(_) => EntryKind::Predicate,
            Node::Qualifier(_) => EntryKind::Qualifier,
            Node::Path(_) => EntryKind::Path,
        }
    }
}

impl From<Token> for Entry {
    fn from(token: Token) -> Self {
        Self::new(Node::Token(token.kind), token.span)
    }
}

/// Ordered, top-addressable stack of entries.
///
/// Matching only looks; entries leave the stack through the typed pops,
/// which fail if the top entry has another kind.
#[derive(Debug, Default)]
pub struct ParseStack {
    entries: Vec<Entry>,
}

impl ParseStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: Entry) {
        self.entries.push(entry);
    }

    pub fn pop(&mut self) -> Option<Entry> {
        self.entries.pop()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns the entry at `index` counted from the bottom.
    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    /// Returns true if the top entries have exactly the kinds in
    /// `pattern`, listed bottom to top.
    pub fn matches(&self, pattern: &[EntryKind]) -> bool {
        self.entries.len() >= pattern.len()
            && self.entries[self.entries.len() - pattern.len()..]
                .iter()
                .zip(pattern)
                .all(|(entry, kind)| entry.kind() == *kind)
    }

    fn pop_kind(&mut self, expected: EntryKind) -> Result<Entry, ParseError> {
        match self.entries.pop() {
            Some(entry) if entry.kind() == expected => Ok(entry),
            Some(entry) => {
                let found = entry.kind();
                let position = entry.span.start;
                self.entries.push(entry);
                Err(ParseError::syntax(position, format!("expected {expected}, found {found}")))
            }
            None => Err(ParseError::syntax(0, format!("expected {expected}, found nothing"))),
        }
    }

    /// Pops an entry of the given token kind and returns its span.
    pub fn pop_token(&mut self, expected: EntryKind) -> Result<Span, ParseError> {
        self.pop_kind(expected).map(|entry| entry.span)
    }

    pub fn pop_identifier(&mut self) -> Result<(String, Span), ParseError> {
        let entry = self.pop_kind(EntryKind::Identifier)?;
        match entry.node {
            Node::Token(TokenKind::Identifier(name)) => Ok((name, entry.span)),
            _ => Err(ParseError::syntax(entry.span.start, "expected identifier")),
        }
    }

    pub fn pop_operator(&mut self) -> Result<(PredicateKind, Span), ParseError> {
        let entry = self.pop_kind(EntryKind::Operator)?;
        match entry.node {
            Node::Token(TokenKind::Operator(kind)) => Ok((kind, entry.span)),
            _ => Err(ParseError::syntax(entry.span.start, "expected operator")),
        }
    }

    pub fn pop_conjunctor(&mut self) -> Result<(Conjunction, Span), ParseError> {
        let entry = self.pop_kind(EntryKind::Conjunctor)?;
        match entry.node {
            Node::Token(TokenKind::Conjunctor(conjunction)) => Ok((conjunction, entry.span)),
            _ => Err(ParseError::syntax(entry.span.start, "expected conjunction")),
        }
    }

    pub fn pop_constant(&mut self) -> Result<(Value, Span), ParseError> {
        let entry = self.pop_kind(EntryKind::Constant)?;
        match entry.node {
            Node::Token(TokenKind::Constant(value)) => Ok((value, entry.span)),
            _ => Err(ParseError::syntax(entry.span.start, "expected constant")),
        }
    }

    pub fn pop_param_ref(&mut self) -> Result<(usize, Span), ParseError> {
        let entry = self.pop_kind(EntryKind::ParamRef)?;
        match entry.node {
            Node::Token(TokenKind::ParamRef(index)) => Ok((index, entry.span)),
            _ => Err(ParseError::syntax(entry.span.start, "expected parameter reference")),
        }
    }

    pub fn pop_predicate(&mut self) -> Result<(Predicate, Span), ParseError> {
        let entry = self.pop_kind(EntryKind::Predicate)?;
        match entry.node {
            Node::Predicate(predicate) => Ok((predicate, entry.span)),
            _ => Err(ParseError::syntax(entry.span.start, "expected predicate")),
        }
    }

    pub fn pop_qualifier(&mut self) -> Result<(Qualifier, Span), ParseError> {
        let entry = self.pop_kind(EntryKind::Qualifier)?;
        match entry.node {
            Node::Qualifier(qualifier) => Ok((qualifier, entry.span)),
            _ => Err(ParseError::syntax(entry.span.start, "expected qualifier")),
        }
    }

    pub fn pop_path(&mut self) -> Result<(Vec<String>, Span), ParseError> {
        let entry = self.pop_kind(EntryKind::Path)?;
        match entry.node {
            Node::Path(elements) => Ok((elements, entry.span)),
            _ => Err(ParseError::syntax(entry.span.start, "expected path")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(kind: TokenKind, start: usize, end: usize) -> Entry {
        Entry::from(Token::new(kind, Span::new(start, end)))
    }

    fn stack(entries: Vec<Entry>) -> ParseStack {
        let mut stack = ParseStack::new();
        for entry in entries {
            stack.push(entry);
        }
        stack
    }

    #[test]
    fn test_matches_top_of_stack() {
        let stack = stack(vec![
            token(TokenKind::Identifier(String::from("Title")), 0, 5),
            token(TokenKind::Operator(PredicateKind::Equals), 6, 7),
            token(TokenKind::ParamRef(0), 8, 11),
        ]);
        assert!(stack.matches(&[EntryKind::Operator, EntryKind::ParamRef]));
        assert!(stack.matches(&[EntryKind::ParamRef]));
        assert!(!stack.matches(&[EntryKind::Operator, EntryKind::Constant]));
        assert!(!stack.matches(&[
            EntryKind::Path,
            EntryKind::Identifier,
            EntryKind::Operator,
            EntryKind::ParamRef,
        ]));
    }

    #[test]
    fn test_matches_does_not_mutate() {
        let stack = stack(vec![token(TokenKind::OpenGroup, 0, 1)]);
        assert!(stack.matches(&[EntryKind::OpenGroup]));
        assert!(stack.matches(&[EntryKind::OpenGroup]));
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn test_typed_pop() {
        let mut stack = stack(vec![token(TokenKind::Constant(Value::Int(3)), 4, 5)]);
        assert_eq!(stack.pop_constant().unwrap(), (Value::Int(3), Span::new(4, 5)));
        assert_eq!(stack.len(), 0);
    }

    #[test]
    fn test_typed_pop_mismatch_keeps_entry() {
        let mut stack = stack(vec![token(TokenKind::CloseGroup, 9, 10)]);
        let err = stack.pop_qualifier().unwrap_err();
        assert!(matches!(err, ParseError::Syntax { position: 9, .. }));
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.get(0).map(Entry::kind), Some(EntryKind::CloseGroup));
    }
}
