//! Generator configuration.

use serde::{Deserialize, Serialize};

use crate::dialect::DialectKind;

/// Settings fixed when a [`QueryGenerator`] is built.
///
/// [`QueryGenerator`]: crate::QueryGenerator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeneratorConfig {
    /// Target dialect.
    pub dialect: DialectKind,
    /// Quote every identifier. When off, plain lowercase identifiers are
    /// emitted bare.
    pub quote_identifiers: bool,
    /// Schema assumed for unscoped tables, overriding the dialect's.
    pub default_schema: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            dialect: DialectKind::default(),
            quote_identifiers: true,
            default_schema: None,
        }
    }
}

impl GeneratorConfig {
    /// Creates a configuration for a dialect with default settings.
    #[must_use]
    pub fn new(dialect: DialectKind) -> Self {
        Self {
            dialect,
            ..Self::default()
        }
    }

    /// Parses a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns the parse error for malformed JSON, unknown dialect names
    /// or mistyped fields.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Sets identifier quoting.
    #[must_use]
    pub const fn quote_identifiers(mut self, quote: bool) -> Self {
        self.quote_identifiers = quote;
        self
    }

    /// Sets the default schema.
    #[must_use]
    pub fn default_schema(mut self, schema: impl Into<String>) -> Self {
        self.default_schema = Some(schema.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GeneratorConfig::from_json("{}").unwrap();
        assert_eq!(config.dialect, DialectKind::Generic);
        assert!(config.quote_identifiers);
        assert_eq!(config.default_schema, None);
    }

    #[test]
    fn test_from_json() {
        let config = GeneratorConfig::from_json(
            r#"{"dialect": "db2", "quoteIdentifiers": false, "defaultSchema": "APP"}"#,
        )
        .unwrap();
        assert_eq!(config.dialect, DialectKind::Db2);
        assert!(!config.quote_identifiers);
        assert_eq!(config.default_schema.as_deref(), Some("APP"));
    }

    #[test]
    fn test_unknown_dialect_fails() {
        assert!(GeneratorConfig::from_json(r#"{"dialect": "mysql"}"#).is_err());
    }
}
