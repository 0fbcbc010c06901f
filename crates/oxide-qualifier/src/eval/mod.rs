//! In-memory evaluation.
//!
//! Objects expose their members through [`Members`]; qualifiers are
//! evaluated against them and fetch results are sorted with
//! [`sort_objects`].

mod evaluate;
mod json;
mod members;
mod sort;

pub use members::{Member, Members};
pub use sort::sort_objects;
