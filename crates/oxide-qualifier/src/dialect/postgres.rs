//! PostgreSQL dialect.

use super::types::{TypeMap, POSTGRES_TYPES};
use super::{Dialect, KeyRetrieval, RowLimit};
use crate::error::CompileError;

/// Longest parameter name the dialect emits, prefix included.
const PARAMETER_NAME_LIMIT: usize = 30;

/// PostgreSQL: optional double-quote quoting, `:name` parameters capped at
/// 30 characters, `LIMIT n`, `ILIKE`, and keys read from
/// `<table>_<column>_seq`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PostgresDialect {
    delimited: bool,
}

impl PostgresDialect {
    /// Creates a PostgreSQL dialect with unquoted identifiers.
    #[must_use]
    pub const fn new() -> Self {
        Self { delimited: false }
    }

    /// Turns double-quote quoting of identifiers on or off.
    #[must_use]
    pub const fn with_delimited_identifiers(mut self, delimited: bool) -> Self {
        self.delimited = delimited;
        self
    }
}

impl Dialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgresql"
    }

    fn uses_delimited_identifiers(&self) -> bool {
        self.delimited
    }

    fn parameter_prefix(&self) -> char {
        ':'
    }

    fn parameter_name_limit(&self) -> Option<usize> {
        Some(PARAMETER_NAME_LIMIT)
    }

    fn row_limit(&self) -> RowLimit {
        RowLimit::Limit
    }

    fn render_like(&self, column: &str, parameter: &str) -> String {
        format!("{column} ILIKE {parameter}")
    }

    fn type_map(&self) -> &'static TypeMap {
        &POSTGRES_TYPES
    }

    fn key_retrieval(&self, table: &str, column: &str) -> Result<KeyRetrieval, CompileError> {
        Ok(KeyRetrieval::Sequence(format!("{table}_{column}_seq")))
    }
}
