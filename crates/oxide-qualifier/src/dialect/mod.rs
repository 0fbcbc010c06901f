//! SQL dialect support.
//!
//! A [`Dialect`] turns fetch specifications and qualifiers into SQL text
//! with named parameters. The defaults implement a generic baseline; each
//! dialect overrides identifier quoting, parameter naming, row limiting,
//! `like` rendering, type mapping and generated-key retrieval.

mod command;
mod config;
mod firebird;
mod generic;
mod keys;
mod mysql;
mod oracle;
mod params;
mod postgres;
mod types;
mod writer;

pub use config::{DialectConfig, DialectKind};
pub use firebird::FirebirdDialect;
pub use generic::GenericDialect;
pub use keys::{retrieve_generated_key, KeyRetrieval, ScalarQuery};
pub use mysql::MySqlDialect;
pub use oracle::OracleDialect;
pub use params::{sanitize, ParameterNames, SqlCommand, SqlParameter};
pub use postgres::PostgresDialect;
pub use types::{NativeType, TypeMap};

use crate::ast::Qualifier;
use crate::error::CompileError;
use crate::fetch::FetchSpecification;
use crate::schema::{LogicalType, TableMetadata};
use crate::value::Value;

/// Where a dialect puts the row limit of a SELECT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowLimit {
    /// `SELECT TOP n ...`
    Top,
    /// `SELECT FIRST n ...`
    First,
    /// `SELECT ... LIMIT n`
    Limit,
    /// `SELECT * FROM (...) WHERE ROWNUM <= n`
    RowNum,
}

/// Trait for SQL dialect-specific behavior.
///
/// Dialects are stateless apart from configuration and can be shared
/// across threads.
pub trait Dialect: Send + Sync {
    /// Returns the name of the dialect.
    fn name(&self) -> &'static str;

    /// Returns whether identifiers are quoted.
    fn uses_delimited_identifiers(&self) -> bool {
        false
    }

    /// Returns the opening and closing identifier quotes.
    fn identifier_quotes(&self) -> (char, char) {
        ('"', '"')
    }

    /// Quotes an identifier, doubling any closing quote inside it.
    fn quote_identifier(&self, name: &str) -> String {
        let (open, close) = self.identifier_quotes();
        let escaped = name.replace(close, &format!("{close}{close}"));
        format!("{open}{escaped}{close}")
    }

    /// Returns `name` as it should appear in SQL: quoted when the dialect
    /// uses delimited identifiers, verbatim otherwise.
    fn identifier(&self, name: &str) -> String {
        if self.uses_delimited_identifiers() {
            self.quote_identifier(name)
        } else {
            String::from(name)
        }
    }

    /// Returns the character that starts a parameter name.
    fn parameter_prefix(&self) -> char {
        '@'
    }

    /// Returns the maximum parameter name length, prefix included.
    fn parameter_name_limit(&self) -> Option<usize> {
        None
    }

    /// Builds a parameter name from a sanitized base and a uniqueness
    /// suffix. When the name is capped, the base is shortened so the suffix
    /// survives.
    fn parameter_name(&self, base: &str, suffix: &str) -> String {
        let mut name = format!("{}{base}", self.parameter_prefix());
        if let Some(limit) = self.parameter_name_limit() {
            let keep = limit.saturating_sub(suffix.chars().count());
            name = name.chars().take(keep).collect();
        }
        name.push_str(suffix);
        name
    }

    /// Returns how the dialect limits rows.
    fn row_limit(&self) -> RowLimit {
        RowLimit::Top
    }

    /// Renders a `like` comparison of an already rendered column and
    /// parameter.
    fn render_like(&self, column: &str, parameter: &str) -> String {
        format!("{column} LIKE {parameter}")
    }

    /// Returns the dialect's type table.
    fn type_map(&self) -> &'static TypeMap;

    /// Maps a logical type to the native type used for parameters. Types
    /// without a mapping return the dialect's unmappable sentinel.
    fn map_type(&self, logical_type: &LogicalType) -> NativeType {
        self.type_map().get(logical_type)
    }

    /// Returns how to read the key generated for `column` of `table`.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::Unsupported`] if the dialect cannot read
    /// generated keys.
    fn key_retrieval(&self, table: &str, column: &str) -> Result<KeyRetrieval, CompileError>;

    /// Compiles a SELECT for `spec`.
    ///
    /// # Errors
    ///
    /// Returns a [`CompileError`] if the qualifier contains a path or binds
    /// a column whose type the dialect cannot map.
    fn compile_select(&self, spec: &FetchSpecification) -> Result<SqlCommand, CompileError> {
        writer::compile_select(self, spec)
    }

    /// Compiles a qualifier to a WHERE fragment, without the keyword.
    ///
    /// # Errors
    ///
    /// Same as [`Dialect::compile_select`].
    fn compile_qualifier(
        &self,
        qualifier: &Qualifier,
        table: &TableMetadata,
    ) -> Result<SqlCommand, CompileError> {
        writer::compile_qualifier(self, qualifier, table)
    }

    /// Compiles an INSERT of `values` into `table`.
    ///
    /// # Errors
    ///
    /// Returns a [`CompileError`] if nothing is left to insert, a column
    /// type cannot be mapped, or the table has a generated key the dialect
    /// cannot read back.
    fn compile_insert(
        &self,
        table: &TableMetadata,
        values: &[(&str, Value)],
    ) -> Result<SqlCommand, CompileError> {
        command::compile_insert(self, table, values)
    }

    /// Compiles an UPDATE of `assignments` on the rows matching `qualifier`.
    ///
    /// # Errors
    ///
    /// Returns a [`CompileError`] if there are no assignments, or on the
    /// same conditions as [`Dialect::compile_select`].
    fn compile_update(
        &self,
        table: &TableMetadata,
        assignments: &[(&str, Value)],
        qualifier: Option<&Qualifier>,
    ) -> Result<SqlCommand, CompileError> {
        command::compile_update(self, table, assignments, qualifier)
    }

    /// Compiles a DELETE of the rows matching `qualifier`.
    ///
    /// # Errors
    ///
    /// Same as [`Dialect::compile_select`].
    fn compile_delete(
        &self,
        table: &TableMetadata,
        qualifier: Option<&Qualifier>,
    ) -> Result<SqlCommand, CompileError> {
        command::compile_delete(self, table, qualifier)
    }
}
