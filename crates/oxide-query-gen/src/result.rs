//! Generator output.

use serde::Serialize;

use crate::bind::BindCollector;
use crate::value::SqlValue;

/// SQL text, optionally with bind parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryResult {
    /// Self-contained SQL.
    Sql(String),
    /// SQL with positional bind markers.
    #[serde(rename_all = "camelCase")]
    Bound {
        /// SQL text.
        query: String,
        /// Parameters in marker order.
        bind_parameters: Vec<SqlValue>,
    },
}

impl QueryResult {
    /// Builds a result from SQL and the collector that produced it.
    #[must_use]
    pub fn from_collector(query: String, binds: BindCollector) -> Self {
        if binds.is_bound() {
            Self::Bound {
                query,
                bind_parameters: binds.into_parameters(),
            }
        } else {
            Self::Sql(query)
        }
    }

    /// Returns the SQL text.
    #[must_use]
    pub fn query(&self) -> &str {
        match self {
            Self::Sql(query) | Self::Bound { query, .. } => query,
        }
    }

    /// Returns the bind parameters, empty for inline SQL.
    #[must_use]
    pub fn bind_parameters(&self) -> &[SqlValue] {
        match self {
            Self::Sql(_) => &[],
            Self::Bound {
                bind_parameters, ..
            } => bind_parameters,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let sql = QueryResult::Sql(String::from("SELECT 1"));
        assert_eq!(sql.query(), "SELECT 1");
        assert!(sql.bind_parameters().is_empty());

        let bound = QueryResult::Bound {
            query: String::from("SELECT $1"),
            bind_parameters: vec![SqlValue::Int(1)],
        };
        assert_eq!(bound.bind_parameters(), &[SqlValue::Int(1)]);
    }

    #[test]
    fn test_bound_serializes_camel_case() {
        let bound = QueryResult::Bound {
            query: String::from("SELECT ?"),
            bind_parameters: vec![SqlValue::Int(1)],
        };
        let json = serde_json::to_value(&bound).unwrap();
        assert_eq!(json["query"], "SELECT ?");
        assert_eq!(json["bindParameters"][0]["value"], 1);
    }
}
