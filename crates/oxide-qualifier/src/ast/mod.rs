//! Qualifier and predicate tree.
//!
//! A [`Qualifier`] is a tree of filter nodes whose leaves hold a
//! [`Predicate`]. Trees are built by the parser or by hand, are immutable
//! once built, and are consumed either by in-memory evaluation or by a SQL
//! dialect through [`QualifierVisitor`].

mod predicate;
mod qualifier;
mod visitor;

pub use predicate::{Predicate, PredicateKind};
pub use qualifier::{
    ClauseQualifier, ColumnQualifier, Conjunction, PathQualifier, PropertyQualifier, Qualifier,
};
pub use visitor::QualifierVisitor;
