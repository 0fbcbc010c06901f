//! MySQL dialect.

use super::types::{TypeMap, MYSQL_TYPES};
use super::{Dialect, KeyRetrieval, RowLimit};
use crate::error::CompileError;

/// MySQL: backtick quoting, `?name` parameters and a trailing `LIMIT n`.
#[derive(Debug, Clone, Copy)]
pub struct MySqlDialect {
    delimited: bool,
}

impl Default for MySqlDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl MySqlDialect {
    /// Creates a MySQL dialect with quoted identifiers.
    #[must_use]
    pub const fn new() -> Self {
        Self { delimited: true }
    }

    /// Turns backtick quoting of identifiers on or off.
    #[must_use]
    pub const fn with_delimited_identifiers(mut self, delimited: bool) -> Self {
        self.delimited = delimited;
        self
    }
}

impl Dialect for MySqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn uses_delimited_identifiers(&self) -> bool {
        self.delimited
    }

    fn identifier_quotes(&self) -> (char, char) {
        ('`', '`')
    }

    fn parameter_prefix(&self) -> char {
        '?'
    }

    fn row_limit(&self) -> RowLimit {
        RowLimit::Limit
    }

    fn type_map(&self) -> &'static TypeMap {
        &MYSQL_TYPES
    }

    fn key_retrieval(&self, _table: &str, _column: &str) -> Result<KeyRetrieval, CompileError> {
        Ok(KeyRetrieval::LastInsertId)
    }
}
