//! # oxide-qualifier
//!
//! A small predicate language for filtering object graphs and building
//! parameterized SQL.
//!
//! This crate provides:
//! - A lexer and a shift-reduce parser for qualifier-format strings such as
//!   `Title like 'Star%' and (Year >= {0} or Director.Name = 'Lucas')`
//! - A qualifier tree that evaluates against any type implementing
//!   [`Members`], including `serde_json::Value`
//! - SQL compilation for a generic baseline (SQL Server), MySQL,
//!   PostgreSQL, Oracle and Firebird, with per-dialect type mapping and
//!   generated-key retrieval
//!
//! ## Parsing and evaluating
//!
//! ```rust
//! use oxide_qualifier::{parse, Value};
//! use serde_json::json;
//!
//! let qualifier = parse("Title like 'star%' and Year < {0}", &[Value::Int(1980)])?;
//! let movies = [
//!     json!({"Title": "Star Wars", "Year": 1977}),
//!     json!({"Title": "Star Trek", "Year": 1979}),
//!     json!({"Title": "Alien", "Year": 1979}),
//! ];
//! assert_eq!(qualifier.filter(&movies)?.len(), 2);
//! # Ok::<(), oxide_qualifier::Error>(())
//! ```
//!
//! ## Compiling to SQL
//!
//! Values never appear in the SQL text; they are bound as named parameters:
//!
//! ```rust
//! use oxide_qualifier::{parse, ColumnMetadata, Dialect, FetchSpecification, LogicalType,
//!     PostgresDialect, TableMetadata, Value};
//!
//! let table = TableMetadata::new("Movie")
//!     .column(ColumnMetadata::new("Title", LogicalType::String))
//!     .column(ColumnMetadata::new("Year", LogicalType::Int32));
//! let spec = FetchSpecification::new(table)
//!     .qualifier(parse("Year = {0}", &[Value::Int(1977)])?)
//!     .fetch_limit(5);
//!
//! let command = PostgresDialect::new().compile_select(&spec)?;
//! assert_eq!(command.sql, "SELECT Title, Year FROM Movie WHERE Year = :Year LIMIT 5");
//! assert_eq!(command.parameters[0].value, Value::Int(1977));
//! # Ok::<(), oxide_qualifier::Error>(())
//! ```

pub mod ast;
pub mod dialect;
pub mod error;
pub mod eval;
pub mod fetch;
pub mod lexer;
pub mod parser;
pub mod schema;
pub mod value;

pub use ast::{
    ClauseQualifier, ColumnQualifier, Conjunction, PathQualifier, Predicate, PredicateKind,
    PropertyQualifier, Qualifier, QualifierVisitor,
};
pub use dialect::{
    Dialect, DialectConfig, DialectKind, FirebirdDialect, GenericDialect, KeyRetrieval,
    MySqlDialect, OracleDialect, PostgresDialect, ScalarQuery, SqlCommand, SqlParameter,
};
pub use error::{CompileError, Error, EvaluationError, LexError, ParseError, Result};
pub use eval::{sort_objects, Member, Members};
pub use fetch::{FetchSpecification, SortDirection, SortOrdering};
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::{parse, Parser};
pub use schema::{ColumnMetadata, LogicalType, TableMetadata};
pub use value::{ToValue, Value};
