//! Error types for lexing, parsing, evaluation and SQL compilation.
//!
//! Every failure is local and synchronous: nothing here is retried and there
//! is no partial success. A qualifier either parses (or compiles) completely
//! or the caller receives one of these errors.

use thiserror::Error;

use crate::schema::LogicalType;

/// Errors raised while turning a qualifier-format string into tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    /// A character that cannot start any token.
    #[error("unexpected character '{character}' at position {position} in \"{input}\"")]
    UnexpectedCharacter {
        /// The offending character.
        character: char,
        /// Byte offset of the character.
        position: usize,
        /// The full input being lexed.
        input: String,
    },

    /// A quoted string with no closing quote.
    #[error("unterminated string literal starting at position {position} in \"{input}\"")]
    UnterminatedString {
        /// Byte offset of the opening quote.
        position: usize,
        /// The full input being lexed.
        input: String,
    },

    /// A `{...}` parameter reference that is not `{digits}`.
    #[error("malformed parameter reference at position {position} in \"{input}\"")]
    MalformedParameter {
        /// Byte offset of the opening brace.
        position: usize,
        /// The full input being lexed.
        input: String,
    },

    /// An integer literal that does not fit in 64 bits.
    #[error("invalid integer literal '{text}' at position {position} in \"{input}\"")]
    InvalidInteger {
        /// The literal text.
        text: String,
        /// Byte offset of the literal.
        position: usize,
        /// The full input being lexed.
        input: String,
    },
}

impl LexError {
    /// Returns the byte offset the error refers to.
    #[must_use]
    pub const fn position(&self) -> usize {
        match self {
            Self::UnexpectedCharacter { position, .. }
            | Self::UnterminatedString { position, .. }
            | Self::MalformedParameter { position, .. }
            | Self::InvalidInteger { position, .. } => *position,
        }
    }
}

/// Errors raised by the shift-reduce parser.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The lexer rejected the input.
    #[error(transparent)]
    Lex(#[from] LexError),

    /// The input contained no tokens.
    #[error("empty qualifier")]
    Empty,

    /// The stack did not reduce to a single qualifier.
    #[error("syntax error at position {position}: {rule}")]
    Syntax {
        /// Byte offset of the entry that could not be reduced.
        position: usize,
        /// Human-readable description of what was expected.
        rule: String,
    },

    /// An unquoted word used as a comparison value that is not `true`/`false`.
    #[error("invalid boolean literal '{text}' at position {position}")]
    InvalidBoolean {
        /// Byte offset of the word.
        position: usize,
        /// The offending text.
        text: String,
    },

    /// A `{n}` reference past the end of the positional arguments.
    #[error("parameter reference {{{index}}} at position {position} is out of range ({count} argument(s) supplied)")]
    ArgumentOutOfRange {
        /// Byte offset of the reference.
        position: usize,
        /// The referenced index.
        index: usize,
        /// Number of supplied arguments.
        count: usize,
    },
}

impl ParseError {
    pub(crate) fn syntax(position: usize, rule: impl Into<String>) -> Self {
        Self::Syntax {
            position,
            rule: rule.into(),
        }
    }
}

/// Errors raised while evaluating a qualifier against an object graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluationError {
    /// The subject has no member with the requested name.
    #[error("type '{type_name}' has no member named '{member}'")]
    UnknownMember {
        /// The requested member name.
        member: String,
        /// The subject's type name.
        type_name: String,
    },

    /// A string predicate was applied to a non-string value.
    #[error("like requires a string subject, found {type_name}")]
    NotAString {
        /// Type name of the subject value.
        type_name: &'static str,
    },

    /// A relational predicate was applied to values with no ordering.
    #[error("cannot order {left} against {right}")]
    NotComparable {
        /// Type name of the subject value.
        left: &'static str,
        /// Type name of the comparison value.
        right: &'static str,
    },

    /// A relationship was used where a scalar value was expected.
    #[error("member '{member}' of '{type_name}' is a relationship, not a value")]
    NotAValue {
        /// The member name.
        member: String,
        /// The subject's type name.
        type_name: String,
    },

    /// A path walked through a scalar value.
    #[error("member '{member}' of '{type_name}' is a value and cannot be traversed")]
    NotTraversable {
        /// The member name.
        member: String,
        /// The subject's type name.
        type_name: String,
    },

    /// A qualifier that cannot be evaluated against objects.
    #[error("qualifier '{qualifier}' does not support object evaluation: {reason}")]
    UnsupportedQualifier {
        /// Rendered qualifier.
        qualifier: String,
        /// Why the qualifier was rejected.
        reason: &'static str,
    },

    /// A like pattern that could not be compiled.
    #[error("invalid like pattern '{pattern}': {message}")]
    InvalidPattern {
        /// The pattern text.
        pattern: String,
        /// Error reported by the regex engine.
        message: String,
    },
}

/// Errors raised while compiling qualifiers and commands to SQL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// A column whose logical type has no native type in the dialect.
    #[error("{dialect} cannot bind column '{column}': logical type {logical_type} has no native mapping")]
    UnmappableType {
        /// Dialect name.
        dialect: &'static str,
        /// Column name.
        column: String,
        /// The unmapped logical type.
        logical_type: LogicalType,
    },

    /// Path qualifiers only evaluate in memory.
    #[error("path qualifier '{path}' cannot be compiled to SQL")]
    PathNotCompilable {
        /// The dotted path.
        path: String,
    },

    /// The dialect cannot perform the requested operation.
    #[error("{dialect} does not support {operation}")]
    Unsupported {
        /// Dialect name.
        dialect: &'static str,
        /// Description of the operation.
        operation: String,
    },

    /// A statement with nothing to write.
    #[error("{statement} on '{table}' has no columns to write")]
    EmptyCommand {
        /// Statement keyword.
        statement: &'static str,
        /// Table name.
        table: String,
    },
}

/// Any error produced by this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Lexing failed.
    #[error(transparent)]
    Lex(#[from] LexError),

    /// Parsing failed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// In-memory evaluation failed.
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),

    /// SQL compilation failed.
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// A configuration document could not be read.
    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),

    /// The external executor failed to run a statement.
    #[error("execution error: {0}")]
    Execution(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Result type alias for this crate.
pub type Result<T> = std::result::Result<T, Error>;
