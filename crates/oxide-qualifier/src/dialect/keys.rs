//! Reading database-generated primary keys after an insert.

use std::error::Error as StdError;

use tracing::debug;

use super::Dialect;
use crate::error::{Error, Result};
use crate::value::Value;

/// How a dialect reads the key generated by the last insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyRetrieval {
    /// The session's last identity value.
    Identity,
    /// The connection's last auto-increment value.
    LastInsertId,
    /// The current value of a named sequence.
    Sequence(String),
    /// The current value of a named generator.
    Generator(String),
}

impl KeyRetrieval {
    /// Returns the query that reads the key.
    #[must_use]
    pub fn sql(&self) -> String {
        match self {
            Self::Identity => String::from("SELECT @@IDENTITY"),
            Self::LastInsertId => String::from("SELECT LAST_INSERT_ID()"),
            Self::Sequence(name) => format!("SELECT currval('{name}')"),
            Self::Generator(name) => format!("SELECT GEN_ID({name}, 0) FROM RDB$DATABASE"),
        }
    }
}

/// Something that can run a query returning a single value, typically a
/// database connection owned by the caller.
pub trait ScalarQuery {
    /// Runs `sql` and returns the first column of the first row.
    ///
    /// # Errors
    ///
    /// Returns whatever the underlying driver reports.
    fn query_scalar(&mut self, sql: &str) -> std::result::Result<Value, Box<dyn StdError + Send + Sync>>;
}

/// Reads the key generated for `column` of `table` by the last insert.
///
/// # Errors
///
/// Returns [`Error::Compile`] when the dialect cannot read generated keys
/// and [`Error::Execution`] when the query fails.
pub fn retrieve_generated_key<D: Dialect + ?Sized>(
    dialect: &D,
    executor: &mut dyn ScalarQuery,
    table: &str,
    column: &str,
) -> Result<Value> {
    let sql = dialect.key_retrieval(table, column)?.sql();
    debug!(dialect = dialect.name(), sql = %sql, "retrieving generated key");
    executor.query_scalar(&sql).map_err(Error::Execution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{FirebirdDialect, GenericDialect, MySqlDialect, OracleDialect, PostgresDialect};
    use crate::error::CompileError;

    /// Records the statements it is asked to run.
    struct Recorder {
        statements: Vec<String>,
        result: Option<Value>,
    }

    impl ScalarQuery for Recorder {
        fn query_scalar(&mut self, sql: &str) -> std::result::Result<Value, Box<dyn StdError + Send + Sync>> {
            self.statements.push(String::from(sql));
            self.result.clone().ok_or_else(|| "no rows".into())
        }
    }

    fn recorder(result: Option<Value>) -> Recorder {
        Recorder {
            statements: vec![],
            result,
        }
    }

    #[test]
    fn test_retrieval_sql_per_dialect() {
        fn sql(dialect: &dyn Dialect) -> std::result::Result<String, CompileError> {
            dialect.key_retrieval("movie", "id").map(|k| k.sql())
        }
        assert_eq!(sql(&GenericDialect::new()), Ok(String::from("SELECT @@IDENTITY")));
        assert_eq!(sql(&MySqlDialect::new()), Ok(String::from("SELECT LAST_INSERT_ID()")));
        assert_eq!(
            sql(&PostgresDialect::new()),
            Ok(String::from("SELECT currval('movie_id_seq')"))
        );
        assert_eq!(
            sql(&FirebirdDialect::new()),
            Ok(String::from("SELECT GEN_ID(GEN_IDENTITY, 0) FROM RDB$DATABASE"))
        );
        assert!(matches!(
            sql(&OracleDialect::new()),
            Err(CompileError::Unsupported { dialect: "oracle", .. })
        ));
    }

    #[test]
    fn test_retrieve_runs_query() {
        let mut executor = recorder(Some(Value::Int(42)));
        let key = retrieve_generated_key(&MySqlDialect::new(), &mut executor, "Movie", "Id").unwrap();
        assert_eq!(key, Value::Int(42));
        assert_eq!(executor.statements, ["SELECT LAST_INSERT_ID()"]);
    }

    #[test]
    fn test_retrieve_reports_executor_failure() {
        let mut executor = recorder(None);
        let err = retrieve_generated_key(&GenericDialect::new(), &mut executor, "Movie", "Id").unwrap_err();
        assert!(matches!(err, Error::Execution(_)));
        assert_eq!(err.to_string(), "execution error: no rows");
    }

    #[test]
    fn test_oracle_fails_before_running_anything() {
        let mut executor = recorder(Some(Value::Int(1)));
        let err = retrieve_generated_key(&OracleDialect::new(), &mut executor, "Movie", "Id").unwrap_err();
        assert!(matches!(err, Error::Compile(CompileError::Unsupported { .. })));
        assert!(executor.statements.is_empty());
    }
}
