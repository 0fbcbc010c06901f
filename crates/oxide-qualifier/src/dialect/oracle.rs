//! Oracle dialect.

use super::types::{TypeMap, ORACLE_TYPES};
use super::{Dialect, KeyRetrieval, RowLimit};
use crate::error::CompileError;

const PARAMETER_NAME_LIMIT: usize = 30;

/// Oracle: unquoted identifiers, `:name` parameters capped at 30
/// characters and `ROWNUM` row limiting. Generated keys are not supported.
#[derive(Debug, Default, Clone, Copy)]
pub struct OracleDialect;

impl OracleDialect {
    /// Creates an Oracle dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for OracleDialect {
    fn name(&self) -> &'static str {
        "oracle"
    }

    fn parameter_prefix(&self) -> char {
        ':'
    }

    fn parameter_name_limit(&self) -> Option<usize> {
        Some(PARAMETER_NAME_LIMIT)
    }

    fn row_limit(&self) -> RowLimit {
        RowLimit::RowNum
    }

    fn render_like(&self, column: &str, parameter: &str) -> String {
        format!("UPPER({column}) LIKE UPPER({parameter})")
    }

    fn type_map(&self) -> &'static TypeMap {
        &ORACLE_TYPES
    }

    fn key_retrieval(&self, table: &str, column: &str) -> Result<KeyRetrieval, CompileError> {
        Err(CompileError::Unsupported {
            dialect: self.name(),
            operation: format!("database-generated key {table}.{column}"),
        })
    }
}
