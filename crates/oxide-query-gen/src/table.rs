//! Table references.

use serde::{Deserialize, Serialize};

use crate::column::ColumnDefinition;

/// Identifies a table within a dialect's schema namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableDescriptor {
    /// The table name. Never empty.
    pub table_name: String,
    /// The owning schema, `None` for the dialect default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
}

impl TableDescriptor {
    /// Creates an unscoped table reference.
    #[must_use]
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            schema: None,
        }
    }

    /// Creates a schema-scoped table reference.
    #[must_use]
    pub fn with_schema(schema: impl Into<String>, table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            schema: Some(schema.into()),
        }
    }
}

impl From<&str> for TableDescriptor {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for TableDescriptor {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl From<(&str, &str)> for TableDescriptor {
    fn from((schema, name): (&str, &str)) -> Self {
        Self::with_schema(schema, name)
    }
}

impl From<&TableDescriptor> for TableDescriptor {
    fn from(table: &Self) -> Self {
        table.clone()
    }
}

/// A table together with its column definitions.
///
/// Supplying a model lets writes resolve auto-increment columns and the
/// full column list for row read-back.
#[derive(Debug, Clone, PartialEq)]
pub struct TableModel {
    /// The table.
    pub table: TableDescriptor,
    /// Column definitions in declaration order.
    pub columns: Vec<ColumnDefinition>,
}

impl TableModel {
    /// Creates a model.
    #[must_use]
    pub fn new(table: impl Into<TableDescriptor>, columns: Vec<ColumnDefinition>) -> Self {
        Self {
            table: table.into(),
            columns,
        }
    }

    /// Looks up a column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Returns whether `name` is an auto-increment column.
    #[must_use]
    pub fn is_auto_increment(&self, name: &str) -> bool {
        self.column(name).is_some_and(|c| c.auto_increment)
    }

    /// Column names in declaration order.
    #[must_use]
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Primary key column names in declaration order.
    #[must_use]
    pub fn primary_key(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.primary_key)
            .map(|c| c.name.clone())
            .collect()
    }
}

impl From<&TableModel> for TableDescriptor {
    fn from(model: &TableModel) -> Self {
        model.table.clone()
    }
}
