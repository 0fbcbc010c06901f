//! Qualifier-format lexer.
//!
//! A hand-written scanner that turns a format string into a lazy sequence
//! of typed tokens. Lexical errors carry the input and cursor position.

mod span;
mod token;
mod tokenizer;

pub use span::Span;
pub use token::{Token, TokenKind};
pub use tokenizer::Lexer;
