//! Qualifier-format tokenizer implementation.

use tracing::trace;

use super::{Span, Token, TokenKind};
use crate::ast::PredicateKind;
use crate::error::LexError;
use crate::value::Value;

/// A lexer that tokenizes qualifier-format input on demand.
///
/// The lexer is also an iterator over `Result<Token, LexError>`; after the
/// first error it yields nothing more.
pub struct Lexer<'a> {
    /// The input format string.
    input: &'a str,
    /// The current byte position.
    pos: usize,
    /// The byte position of the start of the current token.
    start: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            start: 0,
        }
    }

    /// Returns the zero-based cursor position.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Returns the current character without advancing.
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// Advances to the next character and returns it.
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    /// Creates a token spanning from the token start to the cursor.
    const fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(kind, Span::new(self.start, self.pos))
    }

    fn input(&self) -> String {
        String::from(self.input)
    }

    /// Scans an identifier or reserved word.
    fn scan_word(&mut self) -> Token {
        while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
            self.advance();
        }
        let word = &self.input[self.start..self.pos];
        self.make_token(TokenKind::from_word(word))
    }

    /// Scans a non-negative integer literal.
    fn scan_integer(&mut self) -> Result<Token, LexError> {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        let text = &self.input[self.start..self.pos];
        let value = text.parse::<i64>().map_err(|_| LexError::InvalidInteger {
            text: String::from(text),
            position: self.start,
            input: self.input(),
        })?;
        Ok(self.make_token(TokenKind::Constant(Value::Int(value))))
    }

    /// Scans `=`, `!=`, `<`, `<=`, `>` or `>=`; the first character has
    /// already been consumed.
    fn scan_operator(&mut self, first: char) -> Result<Token, LexError> {
        if first != '=' && self.peek() == Some('=') {
            self.advance();
        }
        let symbol = &self.input[self.start..self.pos];
        let kind = PredicateKind::from_symbol(symbol).ok_or_else(|| {
            LexError::UnexpectedCharacter {
                character: first,
                position: self.start,
                input: self.input(),
            }
        })?;
        Ok(self.make_token(TokenKind::Operator(kind)))
    }

    fn unterminated(&self) -> LexError {
        LexError::UnterminatedString {
            position: self.start,
            input: self.input(),
        }
    }

    /// Scans a single-quoted string; the opening quote has been consumed.
    ///
    /// A backslash escapes the next character, so `\'` is a literal quote
    /// and `\\` a literal backslash.
    fn scan_string(&mut self) -> Result<Token, LexError> {
        let mut value = String::new();
        loop {
            match self.advance() {
                Some('\'') => break,
                Some('\\') => match self.advance() {
                    Some(escaped) => value.push(escaped),
                    None => return Err(self.unterminated()),
                },
                Some(c) => value.push(c),
                None => return Err(self.unterminated()),
            }
        }
        Ok(self.make_token(TokenKind::Constant(Value::Text(value))))
    }

    /// Scans `{digits}`; the opening brace has been consumed.
    fn scan_param_ref(&mut self) -> Result<Token, LexError> {
        let digits_start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        let digits = &self.input[digits_start..self.pos];
        let index = digits.parse::<usize>().ok();
        match (index, self.advance()) {
            (Some(index), Some('}')) => Ok(self.make_token(TokenKind::ParamRef(index))),
            _ => Err(LexError::MalformedParameter {
                position: self.start,
                input: self.input(),
            }),
        }
    }

    fn scan(&mut self) -> Result<Option<Token>, LexError> {
        self.skip_whitespace();
        self.start = self.pos;

        let Some(c) = self.advance() else {
            return Ok(None);
        };

        let token = match c {
            '(' => self.make_token(TokenKind::OpenGroup),
            ')' => self.make_token(TokenKind::CloseGroup),
            '.' => self.make_token(TokenKind::PathSeparator),
            '=' | '<' | '>' | '!' => self.scan_operator(c)?,
            '\'' => self.scan_string()?,
            '{' => self.scan_param_ref()?,
            c if c.is_ascii_digit() => self.scan_integer()?,
            c if c.is_alphabetic() || c == '_' => self.scan_word(),
            _ => {
                return Err(LexError::UnexpectedCharacter {
                    character: c,
                    position: self.start,
                    input: self.input(),
                });
            }
        };
        Ok(Some(token))
    }

    /// Scans the next token.
    ///
    /// Returns `Ok(None)` at the end of input, including when only whitespace
    /// remains.
    ///
    /// # Errors
    ///
    /// Returns a [`LexError`] for a character that cannot start a token, an
    /// unterminated string, a malformed parameter reference or an integer
    /// literal that overflows. The lexer is exhausted afterwards.
    pub fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        let result = self.scan();
        match &result {
            Ok(Some(token)) => trace!(kind = %token.kind, start = token.span.start, "lexed token"),
            Ok(None) => {}
            Err(_) => self.pos = self.input.len(),
        }
        result
    }

    /// Tokenizes the remaining input.
    ///
    /// # Errors
    ///
    /// Returns the first [`LexError`] encountered.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        self.collect()
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}
