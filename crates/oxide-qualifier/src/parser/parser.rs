//! Shift-reduce parser implementation.

use tracing::{debug, trace};

use super::stack::{Entry, EntryKind, Node, ParseStack};
use crate::ast::{ClauseQualifier, Conjunction, Predicate, Qualifier};
use crate::error::ParseError;
use crate::lexer::{Lexer, TokenKind};
use crate::value::Value;

/// A reduction the parser can apply to the top of its stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    /// `( Qualifier )`
    Group,
    /// `Qualifier Conjunctor Qualifier`
    Conjoin,
    /// `Identifier Predicate`
    Property,
    /// `Operator Constant`
    ConstantPredicate,
    /// `Operator ParamRef`
    ArgumentPredicate,
    /// `Operator Identifier`, where the identifier is `true` or `false`
    BooleanPredicate,
    /// `Path Qualifier`
    PathQualifier,
    /// `Path Identifier .`
    ExtendPath,
    /// `Identifier .`
    StartPath,
}

use EntryKind as K;

/// Reduction rules in priority order. After every reduction the search
/// restarts from the first rule.
const RULES: &[(Rule, &[EntryKind])] = &[
    (Rule::Group, &[K::OpenGroup, K::Qualifier, K::CloseGroup]),
    (Rule::Conjoin, &[K::Qualifier, K::Conjunctor, K::Qualifier]),
    (Rule::Property, &[K::Identifier, K::Predicate]),
    (Rule::ConstantPredicate, &[K::Operator, K::Constant]),
    (Rule::ArgumentPredicate, &[K::Operator, K::ParamRef]),
    (Rule::BooleanPredicate, &[K::Operator, K::Identifier]),
    (Rule::PathQualifier, &[K::Path, K::Qualifier]),
    (Rule::ExtendPath, &[K::Path, K::Identifier, K::PathSeparator]),
    (Rule::StartPath, &[K::Identifier, K::PathSeparator]),
];

/// Qualifier-format parser.
///
/// Tokens are pulled from the lexer one at a time and shifted onto the
/// stack; after each shift the stack is reduced until no rule applies.
pub struct Parser<'a> {
    format: &'a str,
    lexer: Lexer<'a>,
    args: &'a [Value],
    stack: ParseStack,
}

impl<'a> Parser<'a> {
    /// Creates a parser for `format`, resolving `{n}` references against
    /// `args`.
    #[must_use]
    pub fn new(format: &'a str, args: &'a [Value]) -> Self {
        Self {
            format,
            lexer: Lexer::new(format),
            args,
            stack: ParseStack::new(),
        }
    }

    /// Parses the whole format string into a qualifier.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if the input does not lex, does not reduce
    /// to a single qualifier, uses an unquoted word other than `true` or
    /// `false` as a value, or references a missing argument.
    pub fn parse(mut self) -> Result<Qualifier, ParseError> {
        while let Some(token) = self.lexer.next_token()? {
            self.stack.push(Entry::from(token));
            self.reduce()?;
        }
        let qualifier = self.finish()?;
        debug!(
            format = %self.format,
            nodes = qualifier.node_count(),
            "parsed qualifier"
        );
        Ok(qualifier)
    }

    fn reduce(&mut self) -> Result<(), ParseError> {
        while let Some(rule) = self.matching_rule() {
            trace!(?rule, depth = self.stack.len(), "reduce");
            self.apply(rule)?;
        }
        Ok(())
    }

    fn matching_rule(&self) -> Option<Rule> {
        RULES
            .iter()
            .find(|(_, pattern)| self.stack.matches(pattern))
            .map(|(rule, _)| *rule)
    }

    fn apply(&mut self, rule: Rule) -> Result<(), ParseError> {
        let reduced = match rule {
            Rule::Group => {
                let close = self.stack.pop_token(K::CloseGroup)?;
                let (qualifier, _) = self.stack.pop_qualifier()?;
                let open = self.stack.pop_token(K::OpenGroup)?;
                Entry::new(Node::Qualifier(qualifier), open.merge(close))
            }
            Rule::Conjoin => {
                let (right, right_span) = self.stack.pop_qualifier()?;
                let (conjunction, _) = self.stack.pop_conjunctor()?;
                let (left, left_span) = self.stack.pop_qualifier()?;
                Entry::new(
                    Node::Qualifier(conjoin(conjunction, left, right)),
                    left_span.merge(right_span),
                )
            }
            Rule::Property => {
                let (predicate, predicate_span) = self.stack.pop_predicate()?;
                let (name, name_span) = self.stack.pop_identifier()?;
                Entry::new(
                    Node::Qualifier(Qualifier::property(name, predicate)),
                    name_span.merge(predicate_span),
                )
            }
            Rule::ConstantPredicate => {
                let (value, value_span) = self.stack.pop_constant()?;
                let (kind, op_span) = self.stack.pop_operator()?;
                Entry::new(
                    Node::Predicate(Predicate::new(kind, value)),
                    op_span.merge(value_span),
                )
            }
            Rule::ArgumentPredicate => {
                let (index, ref_span) = self.stack.pop_param_ref()?;
                let (kind, op_span) = self.stack.pop_operator()?;
                let value = self.argument(index, ref_span.start)?;
                Entry::new(
                    Node::Predicate(Predicate::new(kind, value)),
                    op_span.merge(ref_span),
                )
            }
            Rule::BooleanPredicate => {
                let (text, word_span) = self.stack.pop_identifier()?;
                let (kind, op_span) = self.stack.pop_operator()?;
                let value = parse_boolean(&text).ok_or(ParseError::InvalidBoolean {
                    position: word_span.start,
                    text,
                })?;
                Entry::new(
                    Node::Predicate(Predicate::new(kind, Value::Bool(value))),
                    op_span.merge(word_span),
                )
            }
            Rule::PathQualifier => {
                let (qualifier, qualifier_span) = self.stack.pop_qualifier()?;
                let (path, path_span) = self.stack.pop_path()?;
                Entry::new(
                    Node::Qualifier(Qualifier::path(path, qualifier)),
                    path_span.merge(qualifier_span),
                )
            }
            Rule::ExtendPath => {
                let separator = self.stack.pop_token(K::PathSeparator)?;
                let (element, _) = self.stack.pop_identifier()?;
                let (mut path, path_span) = self.stack.pop_path()?;
                path.push(element);
                Entry::new(Node::Path(path), path_span.merge(separator))
            }
            Rule::StartPath => {
                let separator = self.stack.pop_token(K::PathSeparator)?;
                let (element, element_span) = self.stack.pop_identifier()?;
                Entry::new(Node::Path(vec![element]), element_span.merge(separator))
            }
        };
        self.stack.push(reduced);
        Ok(())
    }

    fn argument(&self, index: usize, position: usize) -> Result<Value, ParseError> {
        self.args
            .get(index)
            .cloned()
            .ok_or(ParseError::ArgumentOutOfRange {
                position,
                index,
                count: self.args.len(),
            })
    }

    /// Checks the fully reduced stack.
    ///
    /// A lone identifier is shorthand for `identifier = {0}`.
    fn finish(&mut self) -> Result<Qualifier, ParseError> {
        if self.stack.len() > 1 {
            return Err(self.leftover_error());
        }
        let Some(entry) = self.stack.pop() else {
            return Err(ParseError::Empty);
        };
        let kind = entry.kind();
        match entry.node {
            Node::Qualifier(qualifier) => Ok(qualifier),
            Node::Token(TokenKind::Identifier(name)) => {
                let value = self.argument(0, entry.span.start)?;
                Ok(Qualifier::property(name, Predicate::equals(value)))
            }
            _ => Err(ParseError::syntax(
                entry.span.start,
                format!("expected a qualifier, found {kind}"),
            )),
        }
    }

    fn leftover_error(&self) -> ParseError {
        if let Some(first) = self.stack.get(0) {
            if first.kind() == K::OpenGroup {
                return ParseError::syntax(first.span.start, "unclosed '('");
            }
        }
        match self.stack.get(1) {
            Some(entry) => ParseError::syntax(
                entry.span.start,
                format!("unexpected {}", entry.kind()),
            ),
            None => ParseError::syntax(self.lexer.position(), "incomplete qualifier"),
        }
    }
}

/// Combines two qualifiers under `conjunction`, extending an existing
/// clause of the same conjunction instead of nesting a new one.
fn conjoin(conjunction: Conjunction, left: Qualifier, right: Qualifier) -> Qualifier {
    match (left, right) {
        (Qualifier::Clause(mut clause), right) if clause.conjunction() == conjunction => {
            clause.append(right);
            Qualifier::Clause(clause)
        }
        (left, Qualifier::Clause(mut clause)) if clause.conjunction() == conjunction => {
            clause.prepend(left);
            Qualifier::Clause(clause)
        }
        (left, right) => Qualifier::Clause(ClauseQualifier::new(conjunction, [left, right])),
    }
}

fn parse_boolean(text: &str) -> Option<bool> {
    if text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Parses `format` into a qualifier, resolving `{n}` against `args`.
///
/// # Errors
///
/// Returns a [`ParseError`] describing the first problem found.
///
/// # Example
///
/// ```
/// use oxide_qualifier::{parse, Value};
///
/// let qualifier = parse("Year > {0} and Year < {1}", &[Value::Int(1970), Value::Int(1980)])?;
/// assert_eq!(qualifier.to_string(), "(Year > 1970) and (Year < 1980)");
/// # Ok::<(), oxide_qualifier::ParseError>(())
/// ```
pub fn parse(format: &str, args: &[Value]) -> Result<Qualifier, ParseError> {
    Parser::new(format, args).parse()
}
