//! Logical to native type mapping.
//!
//! Each dialect owns one [`TypeMap`], built on first use and shared by
//! every instance of that dialect for the rest of the process.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use crate::schema::LogicalType;

/// A dialect's native column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeType {
    name: &'static str,
    mapped: bool,
}

impl NativeType {
    /// A native type with a real mapping.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self { name, mapped: true }
    }

    /// The fallback a dialect reports for logical types it cannot map.
    /// Binding a parameter of this type is an error.
    #[must_use]
    pub const fn unmappable(name: &'static str) -> Self {
        Self {
            name,
            mapped: false,
        }
    }

    /// Returns the native type name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns false for the unmappable sentinel.
    #[must_use]
    pub const fn is_mapped(&self) -> bool {
        self.mapped
    }
}

impl fmt::Display for NativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Immutable logical type to native type table.
#[derive(Debug)]
pub struct TypeMap {
    entries: HashMap<LogicalType, NativeType>,
    unmappable: NativeType,
}

impl TypeMap {
    /// Builds a table; types without an entry map to `unmappable`.
    #[must_use]
    pub fn new(unmappable: &'static str, entries: &[(LogicalType, &'static str)]) -> Self {
        Self {
            entries: entries
                .iter()
                .map(|(logical, native)| (logical.clone(), NativeType::new(*native)))
                .collect(),
            unmappable: NativeType::unmappable(unmappable),
        }
    }

    /// Looks up the native type for `logical`.
    #[must_use]
    pub fn get(&self, logical: &LogicalType) -> NativeType {
        self.entries.get(logical).copied().unwrap_or(self.unmappable)
    }

    /// Returns the sentinel reported for unmapped types.
    #[must_use]
    pub const fn unmappable(&self) -> NativeType {
        self.unmappable
    }

    /// Returns the number of mapped logical types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is mapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub(crate) static GENERIC_TYPES: LazyLock<TypeMap> = LazyLock::new(|| {
    TypeMap::new(
        "IMAGE",
        &[
            (LogicalType::Boolean, "BIT"),
            (LogicalType::Int16, "SMALLINT"),
            (LogicalType::Int32, "INT"),
            (LogicalType::Int64, "BIGINT"),
            (LogicalType::Double, "FLOAT"),
            (LogicalType::Decimal, "DECIMAL"),
            (LogicalType::String, "NVARCHAR"),
            (LogicalType::DateTime, "DATETIME"),
            (LogicalType::Bytes, "VARBINARY"),
            (LogicalType::Guid, "UNIQUEIDENTIFIER"),
        ],
    )
});

pub(crate) static MYSQL_TYPES: LazyLock<TypeMap> = LazyLock::new(|| {
    TypeMap::new(
        "LONGBLOB",
        &[
            (LogicalType::Boolean, "TINYINT"),
            (LogicalType::Int16, "SMALLINT"),
            (LogicalType::Int32, "INT"),
            (LogicalType::Int64, "BIGINT"),
            (LogicalType::Double, "DOUBLE"),
            (LogicalType::Decimal, "DECIMAL"),
            (LogicalType::String, "VARCHAR"),
            (LogicalType::DateTime, "DATETIME"),
            (LogicalType::Bytes, "BLOB"),
            (LogicalType::Guid, "CHAR"),
        ],
    )
});

pub(crate) static POSTGRES_TYPES: LazyLock<TypeMap> = LazyLock::new(|| {
    TypeMap::new(
        "BYTEA",
        &[
            (LogicalType::Boolean, "BOOLEAN"),
            (LogicalType::Int16, "SMALLINT"),
            (LogicalType::Int32, "INTEGER"),
            (LogicalType::Int64, "BIGINT"),
            (LogicalType::Double, "DOUBLE PRECISION"),
            (LogicalType::Decimal, "NUMERIC"),
            (LogicalType::String, "VARCHAR"),
            (LogicalType::DateTime, "TIMESTAMP"),
            (LogicalType::Bytes, "BYTEA"),
            (LogicalType::Guid, "UUID"),
            (LogicalType::Interval, "INTERVAL"),
        ],
    )
});

pub(crate) static ORACLE_TYPES: LazyLock<TypeMap> = LazyLock::new(|| {
    TypeMap::new(
        "BLOB",
        &[
            (LogicalType::Boolean, "NUMBER"),
            (LogicalType::Int16, "NUMBER"),
            (LogicalType::Int32, "NUMBER"),
            (LogicalType::Int64, "NUMBER"),
            (LogicalType::Double, "BINARY_DOUBLE"),
            (LogicalType::Decimal, "NUMBER"),
            (LogicalType::String, "VARCHAR2"),
            (LogicalType::DateTime, "TIMESTAMP"),
            (LogicalType::Bytes, "RAW"),
            (LogicalType::Guid, "RAW"),
            (LogicalType::Interval, "INTERVAL DAY TO SECOND"),
        ],
    )
});

pub(crate) static FIREBIRD_TYPES: LazyLock<TypeMap> = LazyLock::new(|| {
    TypeMap::new(
        "BLOB",
        &[
            (LogicalType::Boolean, "BOOLEAN"),
            (LogicalType::Int16, "SMALLINT"),
            (LogicalType::Int32, "INTEGER"),
            (LogicalType::Int64, "BIGINT"),
            (LogicalType::Double, "DOUBLE PRECISION"),
            (LogicalType::Decimal, "DECIMAL"),
            (LogicalType::String, "VARCHAR"),
            (LogicalType::DateTime, "TIMESTAMP"),
            (LogicalType::Bytes, "BLOB"),
            (LogicalType::Guid, "CHAR"),
        ],
    )
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapped_types() {
        assert_eq!(POSTGRES_TYPES.get(&LogicalType::Int32), NativeType::new("INTEGER"));
        assert_eq!(GENERIC_TYPES.get(&LogicalType::String).name(), "NVARCHAR");
        assert!(ORACLE_TYPES.get(&LogicalType::Interval).is_mapped());
    }

    #[test]
    fn test_unmapped_types_get_sentinel() {
        let native = MYSQL_TYPES.get(&LogicalType::Interval);
        assert!(!native.is_mapped());
        assert_eq!(native, MYSQL_TYPES.unmappable());
        assert!(!FIREBIRD_TYPES
            .get(&LogicalType::Custom(String::from("geometry")))
            .is_mapped());
    }

    #[test]
    fn test_tables_built_once() {
        let first: *const TypeMap = &*GENERIC_TYPES;
        let second: *const TypeMap = &*GENERIC_TYPES;
        assert_eq!(first, second);
        assert_eq!(GENERIC_TYPES.len(), 10);
    }
}
