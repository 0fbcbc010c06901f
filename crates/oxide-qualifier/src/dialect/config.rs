//! Choosing a dialect from configuration.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::firebird::DEFAULT_GENERATOR;
use super::{Dialect, FirebirdDialect, GenericDialect, MySqlDialect, OracleDialect, PostgresDialect};
use crate::error::Result;

/// The supported dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialectKind {
    Generic,
    #[serde(alias = "my_sql")]
    Mysql,
    #[serde(alias = "postgresql")]
    Postgres,
    Oracle,
    Firebird,
}

/// Dialect selection, usually read from a JSON document.
///
/// ```
/// use oxide_qualifier::dialect::DialectConfig;
///
/// let config = DialectConfig::from_json(r#"{"dialect": "postgres", "delimited_identifiers": true}"#)?;
/// assert_eq!(config.build().identifier("Title"), "\"Title\"");
/// # Ok::<(), oxide_qualifier::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialectConfig {
    /// Which dialect to build.
    pub dialect: DialectKind,
    /// Overrides identifier quoting where the dialect allows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delimited_identifiers: Option<bool>,
    /// Firebird generator read for generated keys.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generator: Option<String>,
}

impl DialectConfig {
    /// Creates a configuration with the dialect's defaults.
    #[must_use]
    pub const fn new(dialect: DialectKind) -> Self {
        Self {
            dialect,
            delimited_identifiers: None,
            generator: None,
        }
    }

    /// Parses a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Config`] if the document is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Builds the configured dialect.
    ///
    /// Oracle never quotes and Firebird always does; a conflicting
    /// `delimited_identifiers` setting is ignored with a warning.
    #[must_use]
    pub fn build(&self) -> Box<dyn Dialect> {
        match self.dialect {
            DialectKind::Generic => Box::new(
                GenericDialect::new()
                    .with_delimited_identifiers(self.delimited_identifiers.unwrap_or(false)),
            ),
            DialectKind::Mysql => Box::new(
                MySqlDialect::new()
                    .with_delimited_identifiers(self.delimited_identifiers.unwrap_or(true)),
            ),
            DialectKind::Postgres => Box::new(
                PostgresDialect::new()
                    .with_delimited_identifiers(self.delimited_identifiers.unwrap_or(false)),
            ),
            DialectKind::Oracle => {
                if self.delimited_identifiers == Some(true) {
                    warn!("oracle identifiers are never quoted; ignoring delimited_identifiers");
                }
                Box::new(OracleDialect::new())
            }
            DialectKind::Firebird => {
                if self.delimited_identifiers == Some(false) {
                    warn!("firebird identifiers are always quoted; ignoring delimited_identifiers");
                }
                Box::new(FirebirdDialect::with_generator(
                    self.generator.as_deref().unwrap_or(DEFAULT_GENERATOR),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_defaults() {
        let mysql = DialectConfig::new(DialectKind::Mysql).build();
        assert_eq!(mysql.name(), "mysql");
        assert_eq!(mysql.identifier("Title"), "`Title`");
        let generic = DialectConfig::new(DialectKind::Generic).build();
        assert_eq!(generic.identifier("Title"), "Title");
    }

    #[test]
    fn test_from_json() {
        let config =
            DialectConfig::from_json(r#"{"dialect": "firebird", "generator": "GEN_MOVIE"}"#).unwrap();
        assert_eq!(config.dialect, DialectKind::Firebird);
        let dialect = config.build();
        assert_eq!(
            dialect.key_retrieval("Movie", "Id").map(|k| k.sql()),
            Ok(String::from("SELECT GEN_ID(GEN_MOVIE, 0) FROM RDB$DATABASE"))
        );
    }

    #[test]
    fn test_aliases() {
        let config = DialectConfig::from_json(r#"{"dialect": "postgresql"}"#).unwrap();
        assert_eq!(config.dialect, DialectKind::Postgres);
    }

    #[test]
    fn test_conflicting_quoting_is_ignored() {
        let mut config = DialectConfig::new(DialectKind::Oracle);
        config.delimited_identifiers = Some(true);
        assert_eq!(config.build().identifier("Title"), "Title");
        config.dialect = DialectKind::Firebird;
        config.delimited_identifiers = Some(false);
        assert_eq!(config.build().identifier("Title"), "\"Title\"");
    }

    #[test]
    fn test_malformed_config() {
        assert!(matches!(
            DialectConfig::from_json(r#"{"dialect": "sybase"}"#),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_serialize_skips_unset_fields() {
        let json = serde_json::to_string(&DialectConfig::new(DialectKind::Oracle)).unwrap();
        assert_eq!(json, r#"{"dialect":"oracle"}"#);
    }
}
