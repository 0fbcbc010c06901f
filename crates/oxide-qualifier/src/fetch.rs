//! Fetch specifications: what to select, how to filter, sort and limit it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ast::Qualifier;
use crate::error::EvaluationError;
use crate::eval::{sort_objects, Members};
use crate::schema::TableMetadata;

/// Sort direction of a [`SortOrdering`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
    /// Ascending, comparing text without regard to case.
    AscendingCaseInsensitive,
    /// Descending, comparing text without regard to case.
    DescendingCaseInsensitive,
}

impl SortDirection {
    /// Returns true for the descending directions.
    #[must_use]
    pub const fn is_descending(self) -> bool {
        matches!(self, Self::Descending | Self::DescendingCaseInsensitive)
    }

    /// Returns true for the case-insensitive directions.
    #[must_use]
    pub const fn is_case_insensitive(self) -> bool {
        matches!(
            self,
            Self::AscendingCaseInsensitive | Self::DescendingCaseInsensitive
        )
    }

    /// Returns the SQL keyword.
    #[must_use]
    pub const fn sql_keyword(self) -> &'static str {
        if self.is_descending() {
            "DESC"
        } else {
            "ASC"
        }
    }
}

/// One ORDER BY key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOrdering {
    /// Column or member name. In memory, a dotted name follows to-one
    /// relationships.
    pub column: String,
    /// Direction.
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortOrdering {
    /// Creates an ordering.
    #[must_use]
    pub fn new(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }

    /// Ascending on `column`.
    #[must_use]
    pub fn asc(column: impl Into<String>) -> Self {
        Self::new(column, SortDirection::Ascending)
    }

    /// Descending on `column`.
    #[must_use]
    pub fn desc(column: impl Into<String>) -> Self {
        Self::new(column, SortDirection::Descending)
    }
}

impl fmt::Display for SortOrdering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.column, self.direction.sql_keyword())?;
        if self.direction.is_case_insensitive() {
            write!(f, " (case-insensitive)")?;
        }
        Ok(())
    }
}

/// No row limit.
pub const UNBOUNDED: i64 = -1;

const fn unbounded() -> i64 {
    UNBOUNDED
}

/// A query: a table, an optional qualifier, sort orderings and a row limit.
///
/// A negative `fetch_limit` means no limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchSpecification {
    /// The table and the columns to select.
    pub table: TableMetadata,
    /// Row filter.
    #[serde(default)]
    pub qualifier: Option<Qualifier>,
    /// ORDER BY keys, most significant first.
    #[serde(default)]
    pub sort_orderings: Vec<SortOrdering>,
    /// Maximum number of rows; negative for no limit.
    #[serde(default = "unbounded")]
    pub fetch_limit: i64,
}

impl FetchSpecification {
    /// Creates an unqualified, unsorted, unlimited fetch of `table`.
    #[must_use]
    pub const fn new(table: TableMetadata) -> Self {
        Self {
            table,
            qualifier: None,
            sort_orderings: Vec::new(),
            fetch_limit: UNBOUNDED,
        }
    }

    /// Sets the qualifier.
    #[must_use]
    pub fn qualifier(mut self, qualifier: Qualifier) -> Self {
        self.qualifier = Some(qualifier);
        self
    }

    /// Appends a sort ordering.
    #[must_use]
    pub fn order_by(mut self, ordering: SortOrdering) -> Self {
        self.sort_orderings.push(ordering);
        self
    }

    /// Sets the row limit; negative for none.
    #[must_use]
    pub const fn fetch_limit(mut self, limit: i64) -> Self {
        self.fetch_limit = limit;
        self
    }

    /// Returns the row limit, or `None` when unbounded.
    #[must_use]
    pub fn limit(&self) -> Option<u64> {
        u64::try_from(self.fetch_limit).ok()
    }

    /// Runs the fetch against in-memory objects: filter, sort, then limit.
    ///
    /// # Errors
    ///
    /// Returns an [`EvaluationError`] if the qualifier or a sort key cannot
    /// be evaluated against one of the objects.
    pub fn apply<'a, T: Members>(&self, objects: &'a [T]) -> Result<Vec<&'a T>, EvaluationError> {
        let mut rows = match &self.qualifier {
            Some(qualifier) => qualifier.filter(objects)?,
            None => objects.iter().collect(),
        };
        sort_objects(&mut rows, &self.sort_orderings)?;
        if let Some(limit) = self.limit() {
            rows.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::ast::Predicate;
    use crate::schema::{ColumnMetadata, LogicalType};

    fn movies() -> Vec<serde_json::Value> {
        vec![
            json!({"Title": "Alien", "Year": 1979}),
            json!({"Title": "Star Wars", "Year": 1977}),
            json!({"Title": "Blade Runner", "Year": 1982}),
            json!({"Title": "Jaws", "Year": 1975}),
        ]
    }

    fn titles(rows: &[&serde_json::Value]) -> Vec<String> {
        rows.iter()
            .map(|row| row["Title"].as_str().unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn test_limit() {
        let spec = FetchSpecification::new(TableMetadata::new("Movie"));
        assert_eq!(spec.limit(), None);
        assert_eq!(spec.clone().fetch_limit(0).limit(), Some(0));
        assert_eq!(spec.fetch_limit(5).limit(), Some(5));
    }

    #[test]
    fn test_apply_filters_sorts_and_limits() {
        let spec = FetchSpecification::new(TableMetadata::new("Movie"))
            .qualifier(Qualifier::property("Year", Predicate::less_than(1980)))
            .order_by(SortOrdering::desc("Year"))
            .fetch_limit(2);
        let movies = movies();
        let rows = spec.apply(&movies).unwrap();
        assert_eq!(titles(&rows), ["Alien", "Star Wars"]);
    }

    #[test]
    fn test_apply_unbounded() {
        let spec = FetchSpecification::new(TableMetadata::new("Movie")).order_by(SortOrdering::asc("Title"));
        let movies = movies();
        let rows = spec.apply(&movies).unwrap();
        assert_eq!(titles(&rows), ["Alien", "Blade Runner", "Jaws", "Star Wars"]);
    }

    #[test]
    fn test_from_json_defaults() {
        let spec: FetchSpecification = serde_json::from_value(json!({
            "table": {
                "name": "Movie",
                "columns": [{"name": "Title", "logical_type": "string"}]
            },
            "sort_orderings": [{"column": "Title"}]
        }))
        .unwrap();
        assert_eq!(spec.fetch_limit, UNBOUNDED);
        assert!(spec.qualifier.is_none());
        assert_eq!(spec.sort_orderings, [SortOrdering::asc("Title")]);
        assert_eq!(
            spec.table.columns,
            [ColumnMetadata::new("Title", LogicalType::String)]
        );
    }
}
