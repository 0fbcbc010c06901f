//! Parameter naming and binding.

use std::collections::{HashMap, HashSet};
use std::fmt;

use super::types::NativeType;
use super::Dialect;
use crate::error::CompileError;
use crate::schema::TableMetadata;
use crate::value::Value;

/// A named parameter bound to a compiled statement.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlParameter {
    /// Name including the dialect's prefix, as it appears in the SQL text.
    pub name: String,
    /// Bound value.
    pub value: Value,
    /// Native type, or `None` for a null with no column metadata.
    pub native_type: Option<NativeType>,
    /// Declared size for strings and byte sequences.
    pub size: Option<u32>,
}

/// SQL text with its parameters in binding order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SqlCommand {
    /// The statement text.
    pub sql: String,
    /// Parameters in the order they appear in `sql`.
    pub parameters: Vec<SqlParameter>,
}

impl SqlCommand {
    /// Finds a parameter by its full name.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&SqlParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Returns the parameter values in binding order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.parameters.iter().map(|p| &p.value)
    }
}

impl fmt::Display for SqlCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

const RESERVED_NAME_CHARACTERS: &[char] = &['\\', '/', '\'', '=', '"', '-', ' '];

/// Replaces the characters that cannot appear in a parameter name with `_`.
#[must_use]
pub fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if RESERVED_NAME_CHARACTERS.contains(&c) { '_' } else { c })
        .collect()
}

/// Hands out unique parameter names within one statement.
///
/// The first parameter for a column is named after the column; later ones
/// get `_2`, `_3`, and so on.
#[derive(Debug, Default)]
pub struct ParameterNames {
    occurrences: HashMap<String, usize>,
    taken: HashSet<String>,
}

impl ParameterNames {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a fresh parameter name for `column`.
    pub fn next<D: Dialect + ?Sized>(&mut self, dialect: &D, column: &str) -> String {
        let base = sanitize(column);
        loop {
            let occurrence = self.occurrences.entry(base.clone()).or_insert(0);
            *occurrence += 1;
            let suffix = if *occurrence == 1 {
                String::new()
            } else {
                format!("_{occurrence}")
            };
            let name = dialect.parameter_name(&base, &suffix);
            if self.taken.insert(name.clone()) {
                return name;
            }
        }
    }
}

/// Binds values as parameters of one statement against a table's metadata.
pub struct Binder<'a, D: Dialect + ?Sized> {
    dialect: &'a D,
    table: &'a TableMetadata,
    names: ParameterNames,
    parameters: Vec<SqlParameter>,
}

impl<'a, D: Dialect + ?Sized> Binder<'a, D> {
    pub fn new(dialect: &'a D, table: &'a TableMetadata) -> Self {
        Self {
            dialect,
            table,
            names: ParameterNames::new(),
            parameters: Vec::new(),
        }
    }

    pub const fn dialect(&self) -> &'a D {
        self.dialect
    }

    /// Binds `value` for `column` and returns the parameter name to splice
    /// into the SQL text.
    ///
    /// The native type comes from the column's metadata when the table has
    /// that column, and from the value otherwise.
    pub fn bind(&mut self, column: &str, value: Value) -> Result<String, CompileError> {
        let metadata = self.table.find_column(column);
        let logical_type = metadata
            .map(|c| c.logical_type.clone())
            .or_else(|| value.logical_type());
        let native_type = match logical_type {
            Some(logical_type) => {
                let native = self.dialect.map_type(&logical_type);
                if !native.is_mapped() {
                    return Err(CompileError::UnmappableType {
                        dialect: self.dialect.name(),
                        column: String::from(column),
                        logical_type,
                    });
                }
                Some(native)
            }
            None => None,
        };
        let size = metadata.and_then(|c| c.max_length).or_else(|| value_size(&value));
        let name = self.names.next(self.dialect, column);
        self.parameters.push(SqlParameter {
            name: name.clone(),
            value,
            native_type,
            size,
        });
        Ok(name)
    }

    /// Binds a comparison value. Quoted text is first converted to the
    /// column's own type when the table describes the column.
    pub fn bind_comparison(&mut self, column: &str, value: Value) -> Result<String, CompileError> {
        let value = match self.table.find_column(column) {
            Some(metadata) => value.into_column_type(&metadata.logical_type),
            None => value,
        };
        self.bind(column, value)
    }

    /// Finishes the statement.
    pub fn into_command(self, sql: String) -> SqlCommand {
        SqlCommand {
            sql,
            parameters: self.parameters,
        }
    }
}

fn value_size(value: &Value) -> Option<u32> {
    match value {
        Value::Text(text) => u32::try_from(text.chars().count()).ok(),
        Value::Bytes(bytes) => u32::try_from(bytes.len()).ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{GenericDialect, OracleDialect, PostgresDialect};
    use crate::schema::{ColumnMetadata, LogicalType};

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("Release Date"), "Release_Date");
        assert_eq!(sanitize(r#"a\b/c'd=e"f-g"#), "a_b_c_d_e_f_g");
        assert_eq!(sanitize("Title"), "Title");
    }

    #[test]
    fn test_repeated_names_get_suffixes() {
        let dialect = GenericDialect::new();
        let mut names = ParameterNames::new();
        assert_eq!(names.next(&dialect, "Year"), "@Year");
        assert_eq!(names.next(&dialect, "Year"), "@Year_2");
        assert_eq!(names.next(&dialect, "Title"), "@Title");
        assert_eq!(names.next(&dialect, "Year"), "@Year_3");
    }

    #[test]
    fn test_truncation_keeps_suffix_unique() {
        let dialect = OracleDialect::new();
        let mut names = ParameterNames::new();
        let column = "AVeryLongColumnNameThatKeepsGoing";
        let first = names.next(&dialect, column);
        let second = names.next(&dialect, column);
        assert_eq!(first, ":AVeryLongColumnNameThatKeepsG");
        assert_eq!(first.len(), 30);
        assert_eq!(second, ":AVeryLongColumnNameThatKeep_2");
        assert_eq!(second.len(), 30);
    }

    #[test]
    fn test_colliding_truncations_retry() {
        let dialect = PostgresDialect::new();
        let mut names = ParameterNames::new();
        let first = names.next(&dialect, "AVeryLongColumnNameThatKeepsGoingA");
        let second = names.next(&dialect, "AVeryLongColumnNameThatKeepsGoingB");
        assert_ne!(first, second);
        assert!(second.len() <= 30);
    }

    #[test]
    fn test_bind_uses_column_metadata() {
        let table = TableMetadata::new("Movie")
            .column(ColumnMetadata::new("Title", LogicalType::String).max_length(200));
        let dialect = PostgresDialect::new();
        let mut binder = Binder::new(&dialect, &table);
        assert_eq!(binder.bind("title", Value::Int(7)).unwrap(), ":title");
        assert_eq!(binder.bind("Year", Value::Int(1977)).unwrap(), ":Year");
        assert_eq!(binder.bind("Rating", Value::Null).unwrap(), ":Rating");
        let command = binder.into_command(String::new());
        let title = &command.parameters[0];
        assert_eq!(title.native_type.map(|t| t.name()), Some("VARCHAR"));
        assert_eq!(title.size, Some(200));
        assert_eq!(command.parameters[1].native_type.map(|t| t.name()), Some("BIGINT"));
        assert_eq!(command.parameters[2].native_type, None);
    }

    #[test]
    fn test_bind_comparison_converts_text() {
        let table = TableMetadata::new("Movie")
            .column(ColumnMetadata::new("Rating", LogicalType::Double))
            .column(ColumnMetadata::new("Title", LogicalType::String));
        let dialect = GenericDialect::new();
        let mut binder = Binder::new(&dialect, &table);
        binder.bind_comparison("Rating", Value::from("8.5")).unwrap();
        binder.bind_comparison("Title", Value::from("8.5")).unwrap();
        binder.bind_comparison("Budget", Value::from("8.5")).unwrap();
        binder.bind("Rating", Value::from("8.5")).unwrap();
        let values: Vec<Value> = binder.into_command(String::new()).values().cloned().collect();
        assert_eq!(
            values,
            [
                Value::Float(8.5),
                Value::from("8.5"),
                Value::from("8.5"),
                Value::from("8.5"),
            ]
        );
    }

    #[test]
    fn test_bind_unmappable_type() {
        let table = TableMetadata::new("Movie")
            .column(ColumnMetadata::new("Length", LogicalType::Interval));
        let dialect = GenericDialect::new();
        let mut binder = Binder::new(&dialect, &table);
        assert_eq!(
            binder.bind("Length", Value::from("02:01:00")),
            Err(CompileError::UnmappableType {
                dialect: "generic",
                column: String::from("Length"),
                logical_type: LogicalType::Interval,
            })
        );
    }
}
