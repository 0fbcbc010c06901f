//! Qualifier-format parser
//!
//! A shift-reduce parser: tokens are shifted onto a stack and collapsed by a
//! fixed table of reduction rules until a single qualifier remains.

mod parser;
mod stack;

pub use parser::{parse, Parser};
