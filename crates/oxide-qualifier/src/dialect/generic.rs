//! Generic dialect, modelled on SQL Server.

use super::types::{TypeMap, GENERIC_TYPES};
use super::{Dialect, KeyRetrieval};
use crate::error::CompileError;

/// Generic SQL with SQL Server conventions: `TOP n`, `[name]` quoting and
/// `@name` parameters.
#[derive(Debug, Default, Clone, Copy)]
pub struct GenericDialect {
    delimited: bool,
}

impl GenericDialect {
    /// Creates a generic dialect with unquoted identifiers.
    #[must_use]
    pub const fn new() -> Self {
        Self { delimited: false }
    }

    /// Turns bracket quoting of identifiers on or off.
    #[must_use]
    pub const fn with_delimited_identifiers(mut self, delimited: bool) -> Self {
        self.delimited = delimited;
        self
    }
}

impl Dialect for GenericDialect {
    fn name(&self) -> &'static str {
        "generic"
    }

    fn uses_delimited_identifiers(&self) -> bool {
        self.delimited
    }

    fn identifier_quotes(&self) -> (char, char) {
        ('[', ']')
    }

    fn type_map(&self) -> &'static TypeMap {
        &GENERIC_TYPES
    }

    fn key_retrieval(&self, _table: &str, _column: &str) -> Result<KeyRetrieval, CompileError> {
        Ok(KeyRetrieval::Identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::RowLimit;

    #[test]
    fn test_generic_dialect() {
        let dialect = GenericDialect::new();
        assert_eq!(dialect.name(), "generic");
        assert_eq!(dialect.identifier("Title"), "Title");
        assert_eq!(dialect.parameter_prefix(), '@');
        assert_eq!(dialect.parameter_name_limit(), None);
        assert_eq!(dialect.row_limit(), RowLimit::Top);
    }

    #[test]
    fn test_bracket_quoting() {
        let dialect = GenericDialect::new().with_delimited_identifiers(true);
        assert_eq!(dialect.identifier("Release Date"), "[Release Date]");
        assert_eq!(dialect.quote_identifier("odd]name"), "[odd]]name]");
    }
}
