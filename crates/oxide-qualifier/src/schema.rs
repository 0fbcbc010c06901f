//! Table and column metadata consumed by the SQL compilers.
//!
//! This metadata is owned by the caller (usually an entity layer); the
//! compilers only read it to pick identifiers, native parameter types and
//! generated keys.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Logical (database-independent) type of a column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalType {
    Boolean,
    Int16,
    Int32,
    Int64,
    Double,
    Decimal,
    String,
    DateTime,
    Bytes,
    Guid,
    Interval,
    /// A caller-defined type no dialect knows about.
    Custom(String),
}

impl fmt::Display for LogicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean => write!(f, "boolean"),
            Self::Int16 => write!(f, "int16"),
            Self::Int32 => write!(f, "int32"),
            Self::Int64 => write!(f, "int64"),
            Self::Double => write!(f, "double"),
            Self::Decimal => write!(f, "decimal"),
            Self::String => write!(f, "string"),
            Self::DateTime => write!(f, "datetime"),
            Self::Bytes => write!(f, "bytes"),
            Self::Guid => write!(f, "guid"),
            Self::Interval => write!(f, "interval"),
            Self::Custom(name) => write!(f, "{name}"),
        }
    }
}

const fn default_nullable() -> bool {
    true
}

/// Metadata for one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMetadata {
    /// Column name.
    pub name: String,
    /// Logical type used for dialect type mapping.
    pub logical_type: LogicalType,
    /// Maximum length for strings and byte sequences.
    #[serde(default)]
    pub max_length: Option<u32>,
    /// Whether the column accepts NULL.
    #[serde(default = "default_nullable")]
    pub nullable: bool,
    /// Whether the column is part of the primary key.
    #[serde(default)]
    pub primary_key: bool,
    /// Whether the database generates the value on insert (identity,
    /// sequence default or generator trigger).
    #[serde(default)]
    pub generated: bool,
}

impl ColumnMetadata {
    /// Creates a nullable, non-key column.
    #[must_use]
    pub fn new(name: impl Into<String>, logical_type: LogicalType) -> Self {
        Self {
            name: name.into(),
            logical_type,
            max_length: None,
            nullable: true,
            primary_key: false,
            generated: false,
        }
    }

    /// Sets the maximum length.
    #[must_use]
    pub const fn max_length(mut self, length: u32) -> Self {
        self.max_length = Some(length);
        self
    }

    /// Marks the column NOT NULL.
    #[must_use]
    pub const fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Marks the column as a primary key (implies NOT NULL).
    #[must_use]
    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }

    /// Marks the column as database-generated.
    #[must_use]
    pub const fn generated(mut self) -> Self {
        self.generated = true;
        self
    }
}

/// Metadata for a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMetadata {
    /// Table name.
    pub name: String,
    /// Columns in declaration order.
    #[serde(default)]
    pub columns: Vec<ColumnMetadata>,
}

impl TableMetadata {
    /// Creates a table with no columns.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: vec![],
        }
    }

    /// Appends a column.
    #[must_use]
    pub fn column(mut self, column: ColumnMetadata) -> Self {
        self.columns.push(column);
        self
    }

    /// Finds a column by name, ignoring ASCII case.
    #[must_use]
    pub fn find_column(&self, name: &str) -> Option<&ColumnMetadata> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Returns the primary-key columns.
    pub fn primary_keys(&self) -> impl Iterator<Item = &ColumnMetadata> {
        self.columns.iter().filter(|c| c.primary_key)
    }

    /// Returns the database-generated primary-key column, if any.
    #[must_use]
    pub fn generated_key(&self) -> Option<&ColumnMetadata> {
        self.primary_keys().find(|c| c.generated)
    }
}
