//! Table constraints, for writing and for introspection.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::column::ForeignKeyAction;
use crate::table::TableDescriptor;

/// Kind of a table constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstraintType {
    /// `PRIMARY KEY`.
    #[serde(rename = "PRIMARY KEY")]
    PrimaryKey,
    /// `FOREIGN KEY`.
    #[serde(rename = "FOREIGN KEY")]
    ForeignKey,
    /// `UNIQUE`.
    #[serde(rename = "UNIQUE")]
    Unique,
    /// `CHECK`.
    #[serde(rename = "CHECK")]
    Check,
}

impl ConstraintType {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::PrimaryKey => "PRIMARY KEY",
            Self::ForeignKey => "FOREIGN KEY",
            Self::Unique => "UNIQUE",
            Self::Check => "CHECK",
        }
    }
}

impl fmt::Display for ConstraintType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Constraint deferral mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Deferrable {
    /// `DEFERRABLE INITIALLY DEFERRED`.
    InitiallyDeferred,
    /// `DEFERRABLE INITIALLY IMMEDIATE`.
    InitiallyImmediate,
    /// `NOT DEFERRABLE`.
    NotDeferrable,
}

impl Deferrable {
    /// Returns the SQL clause.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::InitiallyDeferred => "DEFERRABLE INITIALLY DEFERRED",
            Self::InitiallyImmediate => "DEFERRABLE INITIALLY IMMEDIATE",
            Self::NotDeferrable => "NOT DEFERRABLE",
        }
    }
}

/// A table-level constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableConstraint {
    /// PRIMARY KEY constraint.
    PrimaryKey {
        /// Optional constraint name.
        name: Option<String>,
        /// Columns in the primary key.
        columns: Vec<String>,
    },
    /// UNIQUE constraint. Unnamed ones get `<table>_<columns>_uk`.
    Unique {
        /// Optional constraint name.
        name: Option<String>,
        /// Columns in the unique constraint.
        columns: Vec<String>,
    },
    /// FOREIGN KEY constraint.
    ForeignKey {
        /// Optional constraint name.
        name: Option<String>,
        /// Local columns.
        columns: Vec<String>,
        /// Referenced table.
        references: TableDescriptor,
        /// Referenced columns.
        referenced_columns: Vec<String>,
        /// Action on delete.
        on_delete: Option<ForeignKeyAction>,
        /// Action on update.
        on_update: Option<ForeignKeyAction>,
    },
    /// CHECK constraint.
    Check {
        /// Optional constraint name.
        name: Option<String>,
        /// Check expression, inlined verbatim.
        expression: String,
    },
}

impl TableConstraint {
    /// Returns the constraint type.
    #[must_use]
    pub const fn constraint_type(&self) -> ConstraintType {
        match self {
            Self::PrimaryKey { .. } => ConstraintType::PrimaryKey,
            Self::Unique { .. } => ConstraintType::Unique,
            Self::ForeignKey { .. } => ConstraintType::ForeignKey,
            Self::Check { .. } => ConstraintType::Check,
        }
    }

    /// Returns the local columns, empty for CHECK.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        match self {
            Self::PrimaryKey { columns, .. }
            | Self::Unique { columns, .. }
            | Self::ForeignKey { columns, .. } => columns,
            Self::Check { .. } => &[],
        }
    }
}

/// One row of `show_constraints_query` output.
///
/// Every dialect aliases its catalog columns to this shape. Multi-column
/// constraints come back as one row per column, ordered by constraint
/// name and column position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintDescriptor {
    pub constraint_schema: String,
    pub constraint_name: String,
    pub constraint_type: ConstraintType,
    pub table_schema: String,
    pub table_name: String,
    #[serde(default)]
    pub column_names: Option<String>,
    #[serde(default)]
    pub referenced_table_schema: Option<String>,
    #[serde(default)]
    pub referenced_table_name: Option<String>,
    #[serde(default)]
    pub referenced_column_names: Option<String>,
    #[serde(default)]
    pub delete_action: Option<String>,
    #[serde(default)]
    pub update_action: Option<String>,
    #[serde(default)]
    pub definition: Option<String>,
    #[serde(default)]
    pub is_deferrable: Option<String>,
    #[serde(default)]
    pub initially_deferred: Option<String>,
}
