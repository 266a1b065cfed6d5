//! Column definitions.

use core::fmt;

use crate::table::TableDescriptor;
use crate::value::{SqlValue, ToSqlValue};

/// Logical column types.
///
/// [`DataType::to_sql`] gives the ANSI spelling; dialects map the types
/// they spell differently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataType {
    // Integer types
    /// Small integer (2 bytes).
    Smallint,
    /// Integer (4 bytes).
    Integer,
    /// Big integer (8 bytes).
    Bigint,

    // Floating point
    /// Real (4-byte float).
    Real,
    /// Double precision (8-byte float).
    Double,
    /// Decimal with precision and scale.
    Decimal {
        /// Total number of digits.
        precision: Option<u16>,
        /// Number of digits after decimal point.
        scale: Option<u16>,
    },

    // String types
    /// Fixed-length character string.
    Char(Option<u32>),
    /// Variable-length character string.
    Varchar(Option<u32>),
    /// Unbounded text.
    Text,

    // Binary types
    /// Binary large object.
    Blob,
    /// Fixed-length binary.
    Binary(Option<u32>),
    /// Variable-length binary.
    Varbinary(Option<u32>),

    // Date/time types
    /// Date.
    Date,
    /// Time of day.
    Time,
    /// Timestamp without time zone.
    Timestamp,
    /// Timestamp with time zone.
    TimestampTz,

    /// Boolean.
    Boolean,
    /// UUID.
    Uuid,
    /// JSON document.
    Json,
    /// Binary JSON document.
    Jsonb,

    /// Vendor type spelled verbatim.
    Custom(String),
}

impl DataType {
    /// Returns the ANSI spelling of the type.
    #[must_use]
    pub fn to_sql(&self) -> String {
        match self {
            Self::Smallint => String::from("SMALLINT"),
            Self::Integer => String::from("INTEGER"),
            Self::Bigint => String::from("BIGINT"),
            Self::Real => String::from("REAL"),
            Self::Double => String::from("DOUBLE PRECISION"),
            Self::Decimal { precision, scale } => match (precision, scale) {
                (Some(p), Some(s)) => format!("DECIMAL({p}, {s})"),
                (Some(p), None) => format!("DECIMAL({p})"),
                _ => String::from("DECIMAL"),
            },
            Self::Char(len) => with_length("CHAR", *len),
            Self::Varchar(len) => with_length("VARCHAR", Some(len.unwrap_or(255))),
            Self::Text => String::from("CLOB"),
            Self::Blob => String::from("BLOB"),
            Self::Binary(len) => with_length("BINARY", *len),
            Self::Varbinary(len) => with_length("VARBINARY", *len),
            Self::Date => String::from("DATE"),
            Self::Time => String::from("TIME"),
            Self::Timestamp => String::from("TIMESTAMP"),
            Self::TimestampTz => String::from("TIMESTAMP WITH TIME ZONE"),
            Self::Boolean => String::from("BOOLEAN"),
            Self::Uuid => String::from("CHAR(36)"),
            Self::Json | Self::Jsonb => String::from("JSON"),
            Self::Custom(name) => name.clone(),
        }
    }

    /// Returns whether the type is an integer type.
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Self::Smallint | Self::Integer | Self::Bigint)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}

/// Appends an optional length.
pub(crate) fn with_length(name: &str, len: Option<u32>) -> String {
    len.map_or_else(|| String::from(name), |n| format!("{name}({n})"))
}

/// Referential action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForeignKeyAction {
    /// No action.
    NoAction,
    /// Restrict deletion/update.
    Restrict,
    /// Cascade the operation.
    Cascade,
    /// Set to NULL.
    SetNull,
    /// Set to default value.
    SetDefault,
}

impl ForeignKeyAction {
    /// Returns the SQL representation of the action.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::NoAction => "NO ACTION",
            Self::Restrict => "RESTRICT",
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET NULL",
            Self::SetDefault => "SET DEFAULT",
        }
    }
}

/// A reference to a column of another table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyRef {
    /// The referenced table.
    pub table: TableDescriptor,
    /// The referenced column.
    pub column: String,
    /// Action on delete.
    pub on_delete: Option<ForeignKeyAction>,
    /// Action on update.
    pub on_update: Option<ForeignKeyAction>,
}

impl ForeignKeyRef {
    /// Creates a reference with no referential actions.
    #[must_use]
    pub fn new(table: impl Into<TableDescriptor>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
            on_delete: None,
            on_update: None,
        }
    }
}

/// Column placement hint for `ALTER TABLE ... ADD COLUMN`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnPosition {
    /// Place the column first.
    First,
    /// Place the column after the named one.
    After(String),
}

/// A column of a table.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition {
    /// Column name.
    pub name: String,
    /// Data type.
    pub data_type: DataType,
    /// Explicit nullability; `None` leaves the dialect default.
    pub allow_null: Option<bool>,
    /// Default value.
    pub default: Option<SqlValue>,
    /// Whether the column is part of the primary key.
    pub primary_key: bool,
    /// Whether the column auto-increments.
    pub auto_increment: bool,
    /// Whether the column is unique on its own.
    pub unique: bool,
    /// Named unique key shared with other columns.
    pub unique_key: Option<String>,
    /// Foreign key reference.
    pub references: Option<ForeignKeyRef>,
    /// Check constraint expression.
    pub check: Option<String>,
    /// Placement hint.
    pub position: Option<ColumnPosition>,
    /// Free-text comment.
    pub comment: Option<String>,
}

impl ColumnDefinition {
    /// Creates a column with no constraints.
    #[must_use]
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            allow_null: None,
            default: None,
            primary_key: false,
            auto_increment: false,
            unique: false,
            unique_key: None,
            references: None,
            check: None,
            position: None,
            comment: None,
        }
    }

    /// Marks the column as NOT NULL.
    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.allow_null = Some(false);
        self
    }

    /// Marks the column as explicitly nullable.
    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.allow_null = Some(true);
        self
    }

    /// Marks the column as part of the primary key.
    #[must_use]
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Marks the column as auto-incrementing.
    #[must_use]
    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    /// Marks the column as UNIQUE.
    #[must_use]
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Adds the column to a named composite unique key.
    #[must_use]
    pub fn unique_key(mut self, name: impl Into<String>) -> Self {
        self.unique_key = Some(name.into());
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn default_value(mut self, value: impl ToSqlValue) -> Self {
        self.default = Some(value.to_sql_value());
        self
    }

    /// Sets a foreign key reference.
    #[must_use]
    pub fn references(mut self, table: impl Into<TableDescriptor>, column: impl Into<String>) -> Self {
        self.references = Some(ForeignKeyRef::new(table, column));
        self
    }

    /// Sets the ON DELETE action of the foreign key reference.
    #[must_use]
    pub fn on_delete(mut self, action: ForeignKeyAction) -> Self {
        if let Some(fk) = self.references.as_mut() {
            fk.on_delete = Some(action);
        }
        self
    }

    /// Sets the ON UPDATE action of the foreign key reference.
    #[must_use]
    pub fn on_update(mut self, action: ForeignKeyAction) -> Self {
        if let Some(fk) = self.references.as_mut() {
            fk.on_update = Some(action);
        }
        self
    }

    /// Adds a CHECK constraint.
    #[must_use]
    pub fn check(mut self, expression: impl Into<String>) -> Self {
        self.check = Some(expression.into());
        self
    }

    /// Sets a placement hint.
    #[must_use]
    pub fn position(mut self, position: ColumnPosition) -> Self {
        self.position = Some(position);
        self
    }

    /// Sets the column comment.
    #[must_use]
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Default value change in `change_column_query`.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultChange {
    /// `SET DEFAULT value`.
    Set(SqlValue),
    /// `DROP DEFAULT`.
    Drop,
}

/// Changes applied to an existing column.
///
/// Type, nullability and default changes are column alterations; unique
/// and reference changes add constraints.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnChange {
    /// New data type.
    pub data_type: Option<DataType>,
    /// New nullability.
    pub allow_null: Option<bool>,
    /// New default.
    pub default: Option<DefaultChange>,
    /// Add a unique constraint on the column.
    pub unique: bool,
    /// Add a foreign key on the column.
    pub references: Option<ForeignKeyRef>,
    /// New comment.
    pub comment: Option<String>,
}

impl ColumnChange {
    /// Returns whether nothing would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.data_type.is_none()
            && self.allow_null.is_none()
            && self.default.is_none()
            && !self.unique
            && self.references.is_none()
            && self.comment.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_type_sql() {
        assert_eq!(DataType::Integer.to_sql(), "INTEGER");
        assert_eq!(DataType::Varchar(None).to_sql(), "VARCHAR(255)");
        assert_eq!(DataType::Char(Some(2)).to_sql(), "CHAR(2)");
        assert_eq!(
            DataType::Decimal {
                precision: Some(10),
                scale: Some(2)
            }
            .to_string(),
            "DECIMAL(10, 2)"
        );
    }

    #[test]
    fn test_column_builder() {
        let col = ColumnDefinition::new("author_id", DataType::Bigint)
            .not_null()
            .references("authors", "id")
            .on_delete(ForeignKeyAction::Cascade)
            .comment("who wrote it");
        assert_eq!(col.allow_null, Some(false));
        let fk = col.references.as_ref().unwrap();
        assert_eq!(fk.table, TableDescriptor::new("authors"));
        assert_eq!(fk.on_delete, Some(ForeignKeyAction::Cascade));
        assert_eq!(fk.on_update, None);
        assert_eq!(col.comment.as_deref(), Some("who wrote it"));
    }

    #[test]
    fn test_default_value_conversion() {
        let col = ColumnDefinition::new("active", DataType::Boolean).default_value(true);
        assert_eq!(col.default, Some(SqlValue::Bool(true)));
    }

    #[test]
    fn test_empty_change() {
        assert!(ColumnChange::default().is_empty());
        let change = ColumnChange {
            allow_null: Some(false),
            ..ColumnChange::default()
        };
        assert!(!change.is_empty());
    }
}
