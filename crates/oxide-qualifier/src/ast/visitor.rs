//! Visitor over qualifier trees.

use super::qualifier::{ClauseQualifier, ColumnQualifier, PathQualifier, PropertyQualifier, Qualifier};

/// A visitor with one method per qualifier node kind.
///
/// The SQL compilers implement this to render WHERE fragments; anything
/// else walking a tree can too.
pub trait QualifierVisitor {
    /// What a visited node produces.
    type Output;
    /// What a visit can fail with.
    type Error;

    fn visit_column(&mut self, qualifier: &ColumnQualifier) -> Result<Self::Output, Self::Error>;

    fn visit_property(&mut self, qualifier: &PropertyQualifier)
        -> Result<Self::Output, Self::Error>;

    fn visit_path(&mut self, qualifier: &PathQualifier) -> Result<Self::Output, Self::Error>;

    fn visit_clause(&mut self, qualifier: &ClauseQualifier) -> Result<Self::Output, Self::Error>;
}

impl Qualifier {
    /// Dispatches to the visitor method for this node's kind.
    ///
    /// # Errors
    ///
    /// Returns whatever the visitor returns.
    pub fn accept<V: QualifierVisitor + ?Sized>(&self, visitor: &mut V) -> Result<V::Output, V::Error> {
        match self {
            Self::Column(q) => visitor.visit_column(q),
            Self::Property(q) => visitor.visit_property(q),
            Self::Path(q) => visitor.visit_path(q),
            Self::Clause(q) => visitor.visit_clause(q),
        }
    }
}
