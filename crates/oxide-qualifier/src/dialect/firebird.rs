//! Firebird dialect.

use super::types::{TypeMap, FIREBIRD_TYPES};
use super::{Dialect, KeyRetrieval, RowLimit};
use crate::error::CompileError;

/// Generator read for generated keys unless another is configured.
pub const DEFAULT_GENERATOR: &str = "GEN_IDENTITY";

/// Firebird: always-quoted identifiers, `@name` parameters, `FIRST n` and
/// keys read from a single named generator.
#[derive(Debug, Clone)]
pub struct FirebirdDialect {
    generator: String,
}

impl Default for FirebirdDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl FirebirdDialect {
    /// Creates a Firebird dialect reading keys from [`DEFAULT_GENERATOR`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_generator(DEFAULT_GENERATOR)
    }

    /// Creates a Firebird dialect reading keys from `generator`.
    #[must_use]
    pub fn with_generator(generator: impl Into<String>) -> Self {
        Self {
            generator: generator.into(),
        }
    }

    /// Returns the generator name.
    #[must_use]
    pub fn generator(&self) -> &str {
        &self.generator
    }
}

impl Dialect for FirebirdDialect {
    fn name(&self) -> &'static str {
        "firebird"
    }

    fn uses_delimited_identifiers(&self) -> bool {
        true
    }

    fn row_limit(&self) -> RowLimit {
        RowLimit::First
    }

    fn render_like(&self, column: &str, parameter: &str) -> String {
        format!("UPPER({column}) LIKE UPPER({parameter})")
    }

    fn type_map(&self) -> &'static TypeMap {
        &FIREBIRD_TYPES
    }

    fn key_retrieval(&self, _table: &str, _column: &str) -> Result<KeyRetrieval, CompileError> {
        Ok(KeyRetrieval::Generator(self.generator.clone()))
    }
}
