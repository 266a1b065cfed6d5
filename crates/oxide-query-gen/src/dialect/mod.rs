//! SQL dialect descriptions.
//!
//! Every dialect is one static [`Dialect`] value: its quoting and literal
//! conventions, the capability flags that gate optional grammar, and the
//! option keys it accepts per operation. The generator reads this table
//! for validation and for clause assembly, and picks the dialect's
//! override functions by [`DialectKind`].
//!
//! Adding a dialect means filling one [`Dialect`] value and writing
//! overrides only for the operations whose grammar differs.

pub(crate) mod db2;
pub(crate) mod generic;
pub(crate) mod ibmi;
pub(crate) mod postgres;

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::operation::Operation;

/// The supported dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialectKind {
    /// ANSI-leaning dialect with no vendor extensions.
    #[default]
    Generic,
    /// PostgreSQL.
    Postgres,
    /// IBM Db2 for Linux, Unix and Windows.
    Db2,
    /// IBM Db2 for i.
    Ibmi,
}

impl DialectKind {
    /// Returns the static description of the dialect.
    #[must_use]
    pub fn dialect(self) -> &'static Dialect {
        match self {
            Self::Generic => &generic::DIALECT,
            Self::Postgres => &postgres::DIALECT,
            Self::Db2 => &db2::DIALECT,
            Self::Ibmi => &ibmi::DIALECT,
        }
    }

    /// Returns whether the dialect belongs to the DB2 family.
    #[must_use]
    pub const fn is_db2_family(self) -> bool {
        matches!(self, Self::Db2 | Self::Ibmi)
    }
}

impl fmt::Display for DialectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dialect().name)
    }
}

/// Error returned when parsing an unknown dialect name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown dialect: {0}")]
pub struct UnknownDialect(pub String);

impl FromStr for DialectKind {
    type Err = UnknownDialect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "generic" => Ok(Self::Generic),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "db2" => Ok(Self::Db2),
            "ibmi" => Ok(Self::Ibmi),
            _ => Err(UnknownDialect(s.to_string())),
        }
    }
}

/// Bind parameter marker style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BindStyle {
    /// Numbered markers: `$1`, `$2`, ...
    Dollar,
    /// Anonymous positional markers: `?`.
    QuestionMark,
}

/// How a dialect hands back affected rows from a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ReturningStyle {
    /// No row read-back.
    None,
    /// Trailing `RETURNING` clause.
    Clause,
    /// `SELECT ... FROM FINAL TABLE (<statement>)` wrapper.
    FinalTable,
}

/// Which indexes may carry `INCLUDE` columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum IncludeSupport {
    /// Not available.
    None,
    /// Only unique indexes.
    UniqueOnly,
    /// Any index.
    All,
}

/// How duplicate-key handling on insert is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DuplicateStrategy {
    /// Not available.
    None,
    /// `INSERT ... ON CONFLICT`.
    OnConflict,
    /// `MERGE INTO ... USING (VALUES ...)`.
    Merge,
}

/// Truth literal style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BooleanLiteral {
    /// `TRUE` / `FALSE`.
    Keyword,
    /// `1` / `0`.
    Numeric,
}

/// Array literal style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ArrayLiteral {
    /// `ARRAY[a, b]`.
    Constructor,
    /// `(a, b)`.
    List,
}

/// Rendering of NaN and the infinities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SpecialFloat {
    /// `CAST('NaN' AS DOUBLE PRECISION)`.
    CastDouble,
    /// `DECFLOAT('NaN')`.
    Decfloat,
}

/// Binary literal style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BinaryLiteral {
    /// `'\x48454C'` (bytea hex input).
    ByteaHex,
    /// `X'48454C'`.
    HexString,
    /// `BLOB(X'48454C')`.
    BlobHex,
}

/// Row limiting style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LimitStyle {
    /// `LIMIT n OFFSET m`.
    LimitOffset,
    /// `OFFSET m ROWS FETCH NEXT n ROWS ONLY`.
    FetchFirst,
}

/// What happens to `allowNull: true` on a primary key column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PrimaryKeyNullability {
    /// The nullability hint is dropped; PRIMARY KEY implies NOT NULL.
    Normalize,
    /// The column definition is rejected.
    Reject,
}

/// Index-related capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexCapabilities {
    /// `INCLUDE (...)` columns.
    pub include: IncludeSupport,
    /// Expression-valued index fields.
    pub expressions: bool,
    /// Storage method hints (`USING gin`).
    pub using: bool,
    /// Partial indexes (`WHERE ...`).
    pub partial: bool,
    /// Per-field operator classes.
    pub operator_class: bool,
    /// Index names are schema-qualified rather than table-scoped.
    pub schema_qualified_name: bool,
}

/// Insert-related capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertCapabilities {
    /// Strategy for skipping rows that hit a unique violation.
    pub ignore_duplicates: DuplicateStrategy,
    /// Strategy for updating rows that hit a unique violation.
    pub update_on_duplicate: DuplicateStrategy,
    /// Catching unique violations without aborting the transaction.
    pub exception: bool,
    /// Empty insert renders `DEFAULT VALUES` rather than `VALUES (DEFAULT)`.
    pub default_values: bool,
}

/// Static feature flags of a dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    /// Tables can live in schemas.
    pub schemas: bool,
    /// Databases can be created, dropped and listed through SQL.
    pub databases: bool,
    /// Row read-back after writes.
    pub returning: ReturningStyle,
    /// Index features.
    pub index: IndexCapabilities,
    /// Insert features.
    pub insert: InsertCapabilities,
    /// `COMMENT ON` statements.
    pub comments: bool,
    /// `FIRST` / `AFTER col` column placement.
    pub column_positioning: bool,
    /// `ALTER TABLE ... SET SCHEMA`.
    pub cross_schema_rename: bool,
    /// Several `ALTER COLUMN` sub-clauses are comma separated.
    pub comma_separated_alter: bool,
    /// Treatment of nullable primary keys.
    pub primary_key_nullability: PrimaryKeyNullability,
    /// Truth literals.
    pub boolean_literal: BooleanLiteral,
    /// Array literals.
    pub array_literal: ArrayLiteral,
    /// NaN / infinity literals.
    pub special_float: SpecialFloat,
    /// Binary literals.
    pub binary_literal: BinaryLiteral,
    /// Row limiting.
    pub limit_style: LimitStyle,
}

/// Option keys a dialect accepts, per operation.
///
/// Each list must be a subset of the operation's supportable keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct SupportedOptions {
    pub create_database: &'static [&'static str],
    pub drop_database: &'static [&'static str],
    pub list_databases: &'static [&'static str],
    pub create_schema: &'static [&'static str],
    pub drop_schema: &'static [&'static str],
    pub list_schemas: &'static [&'static str],
    pub list_tables: &'static [&'static str],
    pub create_table: &'static [&'static str],
    pub drop_table: &'static [&'static str],
    pub rename_table: &'static [&'static str],
    pub truncate_table: &'static [&'static str],
    pub add_column: &'static [&'static str],
    pub remove_column: &'static [&'static str],
    pub add_index: &'static [&'static str],
    pub remove_index: &'static [&'static str],
    pub add_constraint: &'static [&'static str],
    pub remove_constraint: &'static [&'static str],
    pub show_constraints: &'static [&'static str],
    pub insert: &'static [&'static str],
    pub update: &'static [&'static str],
    pub arithmetic: &'static [&'static str],
    pub delete: &'static [&'static str],
    pub start_transaction: &'static [&'static str],
}

impl SupportedOptions {
    /// Returns the accepted keys for an operation.
    ///
    /// Operations that take no options accept nothing.
    #[must_use]
    pub const fn get(&self, operation: Operation) -> &'static [&'static str] {
        match operation {
            Operation::CreateDatabase => self.create_database,
            Operation::DropDatabase => self.drop_database,
            Operation::ListDatabases => self.list_databases,
            Operation::CreateSchema => self.create_schema,
            Operation::DropSchema => self.drop_schema,
            Operation::ListSchemas => self.list_schemas,
            Operation::ListTables => self.list_tables,
            Operation::CreateTable => self.create_table,
            Operation::DropTable => self.drop_table,
            Operation::RenameTable => self.rename_table,
            Operation::TruncateTable => self.truncate_table,
            Operation::AddColumn => self.add_column,
            Operation::RemoveColumn => self.remove_column,
            Operation::AddIndex => self.add_index,
            Operation::RemoveIndex => self.remove_index,
            Operation::AddConstraint => self.add_constraint,
            Operation::RemoveConstraint => self.remove_constraint,
            Operation::ShowConstraints => self.show_constraints,
            Operation::Insert | Operation::BulkInsert => self.insert,
            Operation::Update => self.update,
            Operation::Arithmetic => self.arithmetic,
            Operation::Delete => self.delete,
            Operation::StartTransaction => self.start_transaction,
            _ => &[],
        }
    }
}

/// A complete dialect description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dialect {
    /// Dialect identity.
    pub kind: DialectKind,
    /// Name used in errors and logs.
    pub name: &'static str,
    /// Identifier quote character.
    pub quote_char: char,
    /// Schema used when a table names none.
    ///
    /// `None` means the session's current schema.
    pub default_schema: Option<&'static str>,
    /// Bind marker style.
    pub bind_style: BindStyle,
    /// System schemas always excluded from listings.
    pub technical_schemas: &'static [&'static str],
    /// `LIKE` patterns of system schemas always excluded from listings.
    pub technical_schema_patterns: &'static [&'static str],
    /// System databases always excluded from listings.
    pub technical_databases: &'static [&'static str],
    /// Feature flags.
    pub capabilities: Capabilities,
    /// Accepted option keys.
    pub supported_options: SupportedOptions,
}

impl Dialect {
    /// Returns whether `name` is one of the dialect's technical schemas.
    #[must_use]
    pub fn is_technical_schema(&self, name: &str) -> bool {
        self.technical_schemas
            .iter()
            .any(|s| s.eq_ignore_ascii_case(name))
            || self
                .technical_schema_patterns
                .iter()
                .any(|p| like_prefix_matches(p, name))
    }
}

/// Rewrites a `prefix%` pattern so the prefix matches literally in SQL
/// `LIKE`. The flag tells whether an `ESCAPE '\'` clause is needed.
pub(crate) fn like_prefix_literal(pattern: &str) -> (String, bool) {
    let (prefix, wildcard) = pattern
        .strip_suffix('%')
        .map_or((pattern, ""), |prefix| (prefix, "%"));
    let mut escaped = false;
    let mut out = String::with_capacity(pattern.len() + 1);
    for c in prefix.chars() {
        if matches!(c, '_' | '%' | '\\') {
            out.push('\\');
            escaped = true;
        }
        out.push(c);
    }
    out.push_str(wildcard);
    (out, escaped)
}

/// Matches the `prefix%` patterns used in the technical schema tables.
fn like_prefix_matches(pattern: &str, name: &str) -> bool {
    pattern.strip_suffix('%').map_or_else(
        || pattern.eq_ignore_ascii_case(name),
        |prefix| {
            name.get(..prefix.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{self, QueryOptions};

    const ALL: [DialectKind; 4] = [
        DialectKind::Generic,
        DialectKind::Postgres,
        DialectKind::Db2,
        DialectKind::Ibmi,
    ];

    #[test]
    fn test_dialect_from_str() {
        assert_eq!("postgres".parse::<DialectKind>(), Ok(DialectKind::Postgres));
        assert_eq!("PostgreSQL".parse::<DialectKind>(), Ok(DialectKind::Postgres));
        assert_eq!("ibmi".parse::<DialectKind>(), Ok(DialectKind::Ibmi));
        assert!("mysql".parse::<DialectKind>().is_err());
    }

    #[test]
    fn test_kind_round_trips_through_table() {
        for kind in ALL {
            assert_eq!(kind.dialect().kind, kind);
        }
    }

    fn assert_subset(op: Operation, supported: &[&str], supportable: &[&str]) {
        for key in supported {
            assert!(
                supportable.contains(key),
                "{op}: supported key {key} is not supportable"
            );
        }
    }

    #[test]
    fn test_supported_options_are_supportable() {
        for kind in ALL {
            let s = kind.dialect().supported_options;
            assert_subset(Operation::CreateDatabase, s.create_database, options::CreateDatabaseOptions::SUPPORTABLE);
            assert_subset(Operation::DropDatabase, s.drop_database, options::DropDatabaseOptions::SUPPORTABLE);
            assert_subset(Operation::ListDatabases, s.list_databases, options::ListDatabasesOptions::SUPPORTABLE);
            assert_subset(Operation::CreateSchema, s.create_schema, options::CreateSchemaOptions::SUPPORTABLE);
            assert_subset(Operation::DropSchema, s.drop_schema, options::DropSchemaOptions::SUPPORTABLE);
            assert_subset(Operation::ListSchemas, s.list_schemas, options::ListSchemasOptions::SUPPORTABLE);
            assert_subset(Operation::ListTables, s.list_tables, options::ListTablesOptions::SUPPORTABLE);
            assert_subset(Operation::CreateTable, s.create_table, options::CreateTableOptions::SUPPORTABLE);
            assert_subset(Operation::DropTable, s.drop_table, options::DropTableOptions::SUPPORTABLE);
            assert_subset(Operation::RenameTable, s.rename_table, options::RenameTableOptions::SUPPORTABLE);
            assert_subset(Operation::TruncateTable, s.truncate_table, options::TruncateTableOptions::SUPPORTABLE);
            assert_subset(Operation::AddColumn, s.add_column, options::AddColumnOptions::SUPPORTABLE);
            assert_subset(Operation::RemoveColumn, s.remove_column, options::RemoveColumnOptions::SUPPORTABLE);
            assert_subset(Operation::AddIndex, s.add_index, options::AddIndexOptions::SUPPORTABLE);
            assert_subset(Operation::RemoveIndex, s.remove_index, options::RemoveIndexOptions::SUPPORTABLE);
            assert_subset(Operation::AddConstraint, s.add_constraint, options::AddConstraintOptions::SUPPORTABLE);
            assert_subset(Operation::RemoveConstraint, s.remove_constraint, options::RemoveConstraintOptions::SUPPORTABLE);
            assert_subset(Operation::ShowConstraints, s.show_constraints, options::ShowConstraintsOptions::SUPPORTABLE);
            assert_subset(Operation::Insert, s.insert, options::InsertOptions::SUPPORTABLE);
            assert_subset(Operation::Update, s.update, options::UpdateOptions::SUPPORTABLE);
            assert_subset(Operation::Arithmetic, s.arithmetic, options::ArithmeticOptions::SUPPORTABLE);
            assert_subset(Operation::Delete, s.delete, options::DeleteOptions::SUPPORTABLE);
            assert_subset(Operation::StartTransaction, s.start_transaction, options::StartTransactionOptions::SUPPORTABLE);
        }
    }

    #[test]
    fn test_technical_schema_patterns() {
        let pg = DialectKind::Postgres.dialect();
        assert!(pg.is_technical_schema("pg_catalog"));
        assert!(pg.is_technical_schema("pg_temp_3"));
        assert!(!pg.is_technical_schema("public"));

        let db2 = DialectKind::Db2.dialect();
        assert!(db2.is_technical_schema("SYSIBM"));
        assert!(db2.is_technical_schema("NULLID"));
        assert!(!db2.is_technical_schema("APP"));
    }

    #[test]
    fn test_capabilities_serialize() {
        let json = serde_json::to_value(DialectKind::Db2.dialect().capabilities)
            .unwrap_or_default();
        assert_eq!(json["index"]["include"], "uniqueOnly");
        assert_eq!(json["returning"], "finalTable");
    }
}
