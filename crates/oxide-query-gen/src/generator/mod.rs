//! The query generator.
//!
//! [`QueryGenerator`] is the single entry point for every operation. Each
//! operation method follows the same two steps: reject option keys the
//! dialect does not support, then assemble the statement. Assembly uses
//! the neutral implementation in this module unless the dialect's module
//! provides an override, selected by matching on [`DialectKind`]. IBM i
//! reuses the DB2 overrides wherever its grammar agrees.

mod constraint;
mod dml;
mod index;
mod schema;
mod table;
mod transaction;

pub use dml::{ArithmeticOperator, SelectQuery};

use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use crate::bind::BindCollector;
use crate::config::GeneratorConfig;
use crate::dialect::{
    db2, ibmi, like_prefix_literal, postgres, Dialect, DialectKind, ReturningStyle,
};
use crate::column::DataType;
use crate::error::{QueryGenError, Result};
use crate::escape::Escaper;
use crate::fragment::{comma_list, join_sql_fragments};
use crate::operation::Operation;
use crate::options::{QueryOptions, Returning};
use crate::table::{TableDescriptor, TableModel};
use crate::validate::reject_unsupported_options;
use crate::value::SqlValue;

/// Generates SQL for one dialect.
///
/// The generator holds only read-only configuration, so one instance can
/// serve concurrent callers.
#[derive(Debug, Clone)]
pub struct QueryGenerator {
    dialect: &'static Dialect,
    escaper: Escaper,
    default_schema: Option<String>,
}

impl QueryGenerator {
    /// Creates a generator with default settings.
    #[must_use]
    pub fn new(kind: DialectKind) -> Self {
        Self::from_config(&GeneratorConfig::new(kind))
    }

    /// Creates a generator from a configuration.
    #[must_use]
    pub fn from_config(config: &GeneratorConfig) -> Self {
        let dialect = config.dialect.dialect();
        Self {
            dialect,
            escaper: Escaper::new(dialect, config.quote_identifiers),
            default_schema: config.default_schema.clone(),
        }
    }

    /// Returns the dialect description.
    #[must_use]
    pub const fn dialect(&self) -> &'static Dialect {
        self.dialect
    }

    /// Returns the dialect identity.
    #[must_use]
    pub const fn kind(&self) -> DialectKind {
        self.dialect.kind
    }

    /// Returns the escaper.
    #[must_use]
    pub const fn escaper(&self) -> Escaper {
        self.escaper
    }

    /// Returns the schema assumed for unscoped tables.
    #[must_use]
    pub fn default_schema(&self) -> Option<&str> {
        self.default_schema.as_deref().or(self.dialect.default_schema)
    }

    /// Quotes an identifier.
    #[must_use]
    pub fn quote_identifier(&self, name: &str) -> String {
        self.escaper.quote_identifier(name)
    }

    /// Quotes identifiers and joins them with `", "`.
    #[must_use]
    pub fn quote_identifiers<S: AsRef<str>>(&self, names: &[S]) -> String {
        self.escaper.quote_identifiers(names)
    }

    /// Quotes a table, omitting the default schema.
    #[must_use]
    pub fn quote_table(&self, table: impl Into<TableDescriptor>) -> String {
        let table = table.into();
        if table.schema.is_some() && table.schema.as_deref() == self.default_schema() {
            return self.escaper.quote_identifier(&table.table_name);
        }
        self.escaper.quote_table(&table)
    }

    /// Escapes a value into an inline literal.
    #[must_use]
    pub fn escape(&self, value: &SqlValue) -> String {
        self.escaper.escape(value)
    }

    /// Normalizes a table reference, filling in the default schema.
    #[must_use]
    pub fn extract_table_details(&self, table: impl Into<TableDescriptor>) -> TableDescriptor {
        let mut table = table.into();
        if !self.dialect.capabilities.schemas {
            table.schema = None;
        } else if table.schema.is_none() {
            table.schema = self.default_schema().map(String::from);
        }
        table
    }

    /// Parses an options object from JSON and validates its keys for
    /// `operation` in this dialect.
    ///
    /// A `null` value stands for an unset key.
    ///
    /// # Errors
    ///
    /// Keys the dialect does not accept fail with
    /// [`QueryGenError::Configuration`], whether or not any dialect
    /// documents them. Input that is not an object, and mistyped values,
    /// fail with [`QueryGenError::InvalidInput`].
    pub fn parse_options<O>(&self, operation: Operation, json: &serde_json::Value) -> Result<O>
    where
        O: QueryOptions + DeserializeOwned,
    {
        let Some(object) = json.as_object() else {
            return Err(QueryGenError::invalid(operation, "options must be a JSON object"));
        };
        let present: Vec<&str> = object
            .iter()
            .filter(|(_, value)| !value.is_null())
            .map(|(key, _)| key.as_str())
            .collect();
        reject_unsupported_options(
            operation,
            self.dialect.name,
            O::SUPPORTABLE,
            self.dialect.supported_options.get(operation),
            &present,
        )?;
        O::deserialize(json).map_err(|e| QueryGenError::invalid(operation, e.to_string()))
    }

    pub(crate) fn check_options<O: QueryOptions>(
        &self,
        operation: Operation,
        options: &O,
    ) -> Result<()> {
        reject_unsupported_options(
            operation,
            self.dialect.name,
            O::SUPPORTABLE,
            self.dialect.supported_options.get(operation),
            &options.present_keys(),
        )
    }

    pub(crate) fn unsupported(&self, operation: Operation, reason: impl Into<String>) -> QueryGenError {
        let reason = reason.into();
        debug!(%operation, dialect = self.dialect.name, %reason, "unsupported combination");
        QueryGenError::unsupported(operation, self.dialect.name, reason)
    }

    pub(crate) fn finish(&self, operation: Operation, sql: String) -> String {
        trace!(%operation, dialect = self.dialect.name, %sql, "generated statement");
        sql
    }

    pub(crate) fn escape_str(&self, s: &str) -> String {
        self.escaper.escape_string(s)
    }

    pub(crate) fn bind_collector(&self, bind_param: Option<bool>) -> BindCollector {
        if bind_param == Some(true) {
            BindCollector::positional(self.escaper, self.dialect.bind_style)
        } else {
            BindCollector::inline(self.escaper)
        }
    }

    /// Renders a catalog schema comparison value: the escaped name, or
    /// the dialect's current-schema expression when there is none.
    pub(crate) fn schema_literal(&self, schema: Option<&str>) -> String {
        match schema {
            Some(schema) => self.escape_str(schema),
            None => String::from(match self.kind() {
                DialectKind::Generic => "CURRENT_SCHEMA",
                DialectKind::Postgres => "CURRENT_SCHEMA()",
                DialectKind::Db2 | DialectKind::Ibmi => "CURRENT SCHEMA",
            }),
        }
    }

    /// Builds `column NOT IN (...) [AND column NOT LIKE ...]` from the
    /// technical schemas and the caller's extra names.
    pub(crate) fn schema_exclusion(&self, column: &str, skip: &[String]) -> String {
        let names = self
            .dialect
            .technical_schemas
            .iter()
            .copied()
            .chain(skip.iter().map(String::as_str))
            .map(|name| self.escape_str(name));
        let mut clauses = vec![format!("{column} NOT IN ({})", comma_list(names))];
        for pattern in self.dialect.technical_schema_patterns {
            let (pattern, escaped) = like_prefix_literal(pattern);
            let clause = format!("{column} NOT LIKE {}", self.escape_str(&pattern));
            clauses.push(if escaped {
                format!("{clause} ESCAPE '\\'")
            } else {
                clause
            });
        }
        clauses.join(" AND ")
    }

    /// Name under which an index on `table` is scoped, if any.
    pub(crate) fn index_schema<'a>(&self, table: &'a TableDescriptor) -> Option<&'a str> {
        table
            .schema
            .as_deref()
            .filter(|schema| Some(*schema) != self.default_schema())
    }

    pub(crate) fn sql_type(&self, data_type: &DataType) -> String {
        match self.kind() {
            DialectKind::Generic => data_type.to_sql(),
            DialectKind::Postgres => postgres::data_type(data_type),
            DialectKind::Db2 => db2::data_type(data_type),
            DialectKind::Ibmi => ibmi::data_type(data_type),
        }
    }

    /// Resolves the columns a write reads back.
    ///
    /// `None` when nothing is requested, an empty list for every column.
    pub(crate) fn returning_columns(
        returning: Option<&Returning>,
        model: Option<&TableModel>,
    ) -> Option<Vec<String>> {
        match returning? {
            Returning::All(false) => None,
            Returning::All(true) => Some(model.map(TableModel::column_names).unwrap_or_default()),
            Returning::Columns(columns) if columns.is_empty() => None,
            Returning::Columns(columns) => Some(columns.clone()),
        }
    }

    /// Applies the dialect's read-back style to a write statement.
    pub(crate) fn with_returning(
        &self,
        operation: Operation,
        statement: String,
        columns: Option<&[String]>,
    ) -> Result<String> {
        let Some(columns) = columns else {
            return Ok(statement);
        };
        let list = if columns.is_empty() {
            String::from("*")
        } else {
            self.quote_identifiers(columns)
        };
        match self.dialect.capabilities.returning {
            ReturningStyle::Clause => Ok(join_sql_fragments([statement, format!("RETURNING {list}")])),
            ReturningStyle::FinalTable => Ok(format!("SELECT {list} FROM FINAL TABLE ({statement})")),
            ReturningStyle::None => Err(self.unsupported(operation, "rows cannot be read back from writes")),
        }
    }
}
