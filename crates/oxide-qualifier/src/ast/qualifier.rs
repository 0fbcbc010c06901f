//! Qualifier tree nodes.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::predicate::Predicate;

/// How a clause combines its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Conjunction {
    And,
    Or,
}

impl Conjunction {
    /// Returns the qualifier-format keyword.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
        }
    }

    /// Returns the SQL keyword.
    #[must_use]
    pub const fn sql_keyword(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

impl fmt::Display for Conjunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A filter node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Qualifier {
    /// A predicate on a raw column value.
    Column(ColumnQualifier),
    /// A predicate on a named member of an object.
    Property(PropertyQualifier),
    /// A qualifier applied at the end of a relationship path.
    Path(PathQualifier),
    /// A conjunction of child qualifiers.
    Clause(ClauseQualifier),
}

impl Qualifier {
    /// Creates a column qualifier.
    #[must_use]
    pub fn column(column: impl Into<String>, predicate: Predicate) -> Self {
        Self::Column(ColumnQualifier::new(column, predicate))
    }

    /// Creates a property qualifier.
    #[must_use]
    pub fn property(property: impl Into<String>, predicate: Predicate) -> Self {
        Self::Property(PropertyQualifier::new(property, predicate))
    }

    /// Creates a path qualifier.
    #[must_use]
    pub fn path<I, S>(elements: I, qualifier: Self) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Path(PathQualifier::new(elements, qualifier))
    }

    /// Creates an `and` clause over the given children.
    #[must_use]
    pub fn and(children: impl IntoIterator<Item = Self>) -> Self {
        Self::Clause(ClauseQualifier::new(Conjunction::And, children))
    }

    /// Creates an `or` clause over the given children.
    #[must_use]
    pub fn or(children: impl IntoIterator<Item = Self>) -> Self {
        Self::Clause(ClauseQualifier::new(Conjunction::Or, children))
    }

    /// Returns the clause if this node is one.
    #[must_use]
    pub const fn as_clause(&self) -> Option<&ClauseQualifier> {
        match self {
            Self::Clause(clause) => Some(clause),
            _ => None,
        }
    }

    /// Returns true if this node can be evaluated against an object.
    ///
    /// Column qualifiers cannot, and neither can any clause or path that
    /// contains one.
    #[must_use]
    pub fn supports_evaluation(&self) -> bool {
        match self {
            Self::Column(_) => false,
            Self::Property(_) => true,
            Self::Path(path) => path.qualifier.supports_evaluation(),
            Self::Clause(clause) => clause.children.iter().all(Self::supports_evaluation),
        }
    }

    /// Counts the nodes in this tree, including `self`.
    #[must_use]
    pub fn node_count(&self) -> usize {
        match self {
            Self::Column(_) | Self::Property(_) => 1,
            Self::Path(path) => 1 + path.qualifier.node_count(),
            Self::Clause(clause) => 1 + clause.children.iter().map(Self::node_count).sum::<usize>(),
        }
    }
}

impl fmt::Display for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Column(column) => column.fmt(f),
            Self::Property(property) => property.fmt(f),
            Self::Path(path) => path.fmt(f),
            Self::Clause(clause) => clause.fmt(f),
        }
    }
}

/// Predicate on a raw column value.
///
/// Column qualifiers only appear in SQL compilation and in
/// [`ColumnQualifier::evaluate_value`]; they cannot be evaluated against
/// objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnQualifier {
    column: String,
    predicate: Predicate,
}

impl ColumnQualifier {
    /// Creates a column qualifier.
    #[must_use]
    pub fn new(column: impl Into<String>, predicate: Predicate) -> Self {
        Self {
            column: column.into(),
            predicate,
        }
    }

    /// Returns the column name.
    #[must_use]
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Returns the predicate.
    #[must_use]
    pub const fn predicate(&self) -> &Predicate {
        &self.predicate
    }
}

impl fmt::Display for ColumnQualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.column, self.predicate)
    }
}

/// Predicate on a named member of an object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyQualifier {
    property: String,
    predicate: Predicate,
}

impl PropertyQualifier {
    /// Creates a property qualifier.
    #[must_use]
    pub fn new(property: impl Into<String>, predicate: Predicate) -> Self {
        Self {
            property: property.into(),
            predicate,
        }
    }

    /// Returns the property name.
    #[must_use]
    pub fn property(&self) -> &str {
        &self.property
    }

    /// Returns the predicate.
    #[must_use]
    pub const fn predicate(&self) -> &Predicate {
        &self.predicate
    }
}

impl fmt::Display for PropertyQualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.property, self.predicate)
    }
}

/// A qualifier evaluated on the object reached by following `path`.
///
/// Any to-many element on the way makes the qualifier existential: it holds
/// if it holds for at least one related object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathQualifier {
    path: Vec<String>,
    qualifier: Box<Qualifier>,
}

impl PathQualifier {
    /// Creates a path qualifier.
    #[must_use]
    pub fn new<I, S>(elements: I, qualifier: Qualifier) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            path: elements.into_iter().map(Into::into).collect(),
            qualifier: Box::new(qualifier),
        }
    }

    /// Returns the relationship names, outermost first.
    #[must_use]
    pub fn elements(&self) -> &[String] {
        &self.path
    }

    /// Returns the qualifier applied at the end of the path.
    #[must_use]
    pub fn qualifier(&self) -> &Qualifier {
        &self.qualifier
    }

    /// Returns the path joined with `.`.
    #[must_use]
    pub fn dotted(&self) -> String {
        self.path.join(".")
    }
}

impl fmt::Display for PathQualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.qualifier.as_ref() {
            Qualifier::Clause(clause) => write!(f, "{}.({clause})", self.dotted()),
            inner => write!(f, "{}.{inner}", self.dotted()),
        }
    }
}

/// A conjunction of child qualifiers, kept in insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClauseQualifier {
    conjunction: Conjunction,
    children: Vec<Qualifier>,
}

impl ClauseQualifier {
    /// Creates a clause over `children`.
    #[must_use]
    pub fn new(conjunction: Conjunction, children: impl IntoIterator<Item = Qualifier>) -> Self {
        Self {
            conjunction,
            children: children.into_iter().collect(),
        }
    }

    /// Returns the conjunction.
    #[must_use]
    pub const fn conjunction(&self) -> Conjunction {
        self.conjunction
    }

    /// Returns the children in order.
    #[must_use]
    pub fn children(&self) -> &[Qualifier] {
        &self.children
    }

    /// Appends a child at the end.
    pub fn append(&mut self, child: Qualifier) {
        self.children.push(child);
    }

    /// Inserts a child at the front.
    pub fn prepend(&mut self, child: Qualifier) {
        self.children.insert(0, child);
    }

    /// Returns the number of children.
    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Returns true if the clause has no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl fmt::Display for ClauseQualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, child) in self.children.iter().enumerate() {
            if i > 0 {
                write!(f, " {} ", self.conjunction.keyword())?;
            }
            write!(f, "({child})")?;
        }
        Ok(())
    }
}
