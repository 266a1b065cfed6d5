//! IBM Db2 for Linux, Unix and Windows.
//!
//! Catalog queries read the `SYSCAT` views. Writes have no `RETURNING`
//! clause; rows are read back through `SELECT ... FROM FINAL TABLE`, and
//! duplicate handling on insert is expressed as a `MERGE`.

use super::{
    ArrayLiteral, BinaryLiteral, BindStyle, BooleanLiteral, Capabilities, Dialect, DialectKind,
    DuplicateStrategy, IncludeSupport, IndexCapabilities, InsertCapabilities, LimitStyle,
    PrimaryKeyNullability, ReturningStyle, SpecialFloat, SupportedOptions,
};
use crate::column::{with_length, DataType, ForeignKeyAction};
use crate::constraint::ConstraintType;
use crate::error::Result;
use crate::fragment::{comma_list, join_sql_fragments};
use crate::generator::QueryGenerator;
use crate::operation::Operation;
use crate::options::ShowConstraintsOptions;
use crate::table::TableDescriptor;

pub(crate) static DIALECT: Dialect = Dialect {
    kind: DialectKind::Db2,
    name: "db2",
    quote_char: '"',
    default_schema: None,
    bind_style: BindStyle::QuestionMark,
    technical_schemas: &["ERRORSCHEMA", "NULLID", "SQLJ"],
    technical_schema_patterns: &["SYS%"],
    technical_databases: &[],
    capabilities: Capabilities {
        schemas: true,
        databases: false,
        returning: ReturningStyle::FinalTable,
        index: IndexCapabilities {
            include: IncludeSupport::UniqueOnly,
            expressions: true,
            using: false,
            partial: false,
            operator_class: false,
            schema_qualified_name: true,
        },
        insert: InsertCapabilities {
            ignore_duplicates: DuplicateStrategy::Merge,
            update_on_duplicate: DuplicateStrategy::Merge,
            exception: false,
            default_values: false,
        },
        comments: true,
        column_positioning: false,
        cross_schema_rename: false,
        comma_separated_alter: false,
        primary_key_nullability: PrimaryKeyNullability::Reject,
        boolean_literal: BooleanLiteral::Keyword,
        array_literal: ArrayLiteral::List,
        special_float: SpecialFloat::Decfloat,
        binary_literal: BinaryLiteral::BlobHex,
        limit_style: LimitStyle::FetchFirst,
    },
    supported_options: SupportedOptions {
        create_database: &[],
        drop_database: &[],
        list_databases: &[],
        create_schema: &["authorization"],
        drop_schema: &[],
        list_schemas: &["skip"],
        list_tables: &["schema"],
        create_table: &["comment"],
        drop_table: &[],
        rename_table: &[],
        truncate_table: &[],
        add_column: &[],
        remove_column: &["cascade"],
        add_index: &[],
        remove_index: &[],
        add_constraint: &[],
        remove_constraint: &[],
        show_constraints: &["columnName", "constraintName", "constraintType"],
        insert: &[
            "bindParam",
            "ignoreDuplicates",
            "returning",
            "updateOnDuplicate",
            "upsertKeys",
        ],
        update: &["bindParam", "returning"],
        arithmetic: &["returning"],
        delete: &["limit"],
        start_transaction: &[],
    },
};

/// Identity clause for auto-increment columns.
pub(crate) const IDENTITY: &str =
    "GENERATED BY DEFAULT AS IDENTITY (START WITH 1, INCREMENT BY 1)";

pub(crate) const VERSION_QUERY: &str =
    "SELECT service_level AS \"version\" FROM TABLE (sysproc.env_get_inst_info()) AS A";

pub(crate) fn data_type(data_type: &DataType) -> String {
    match data_type {
        DataType::Binary(len) => format!("{} FOR BIT DATA", with_length("CHAR", *len)),
        DataType::Varbinary(len) => {
            format!("{} FOR BIT DATA", with_length("VARCHAR", Some(len.unwrap_or(255))))
        }
        DataType::Uuid => String::from("CHAR(36) FOR BIT DATA"),
        DataType::Json | DataType::Jsonb => String::from("CLOB"),
        DataType::TimestampTz => String::from("TIMESTAMP"),
        other => other.to_sql(),
    }
}

pub(crate) fn regexp(column: &str, pattern: &str, negate: bool, insensitive: bool) -> String {
    let test = if insensitive {
        format!("REGEXP_LIKE({column}, {pattern}, 'i')")
    } else {
        format!("REGEXP_LIKE({column}, {pattern})")
    };
    if negate {
        format!("NOT {test}")
    } else {
        test
    }
}

/// Rejects referential actions Db2 does not implement.
///
/// `ON UPDATE` only takes `NO ACTION` or `RESTRICT`, and `ON DELETE` has
/// no `SET DEFAULT`.
pub(crate) fn check_referential_actions(
    generator: &QueryGenerator,
    operation: Operation,
    on_delete: Option<ForeignKeyAction>,
    on_update: Option<ForeignKeyAction>,
) -> Result<()> {
    if on_delete == Some(ForeignKeyAction::SetDefault) {
        return Err(generator.unsupported(operation, "ON DELETE SET DEFAULT is not available"));
    }
    match on_update {
        None | Some(ForeignKeyAction::NoAction | ForeignKeyAction::Restrict) => Ok(()),
        Some(action) => Err(generator.unsupported(
            operation,
            format!("ON UPDATE {} is not available", action.as_sql()),
        )),
    }
}

pub(crate) fn drop_schema(generator: &QueryGenerator, name: &str) -> String {
    format!("DROP SCHEMA {} RESTRICT", generator.quote_identifier(name))
}

pub(crate) fn list_schemas(generator: &QueryGenerator, skip: &[String]) -> String {
    join_sql_fragments([
        String::from("SELECT TRIM(SCHEMANAME) AS \"schema\" FROM SYSCAT.SCHEMATA"),
        format!("WHERE {}", generator.schema_exclusion("SCHEMANAME", skip)),
        String::from("ORDER BY SCHEMANAME"),
    ])
}

pub(crate) fn list_tables(generator: &QueryGenerator, schema: Option<&str>) -> String {
    let filter = schema.map_or_else(
        || generator.schema_exclusion("TABSCHEMA", &[]),
        |schema| format!("TABSCHEMA = {}", generator.escape_str(schema)),
    );
    join_sql_fragments([
        String::from(
            "SELECT TRIM(TABSCHEMA) AS \"schema\", TABNAME AS \"tableName\" FROM SYSCAT.TABLES",
        ),
        format!("WHERE TYPE = 'T' AND {filter}"),
        String::from("ORDER BY TABSCHEMA, TABNAME"),
    ])
}

/// `RENAME TABLE`, shared with IBM i. The target keeps the source schema.
pub(crate) fn rename_table(
    generator: &QueryGenerator,
    before: &TableDescriptor,
    after: &TableDescriptor,
) -> String {
    join_sql_fragments([
        String::from("RENAME TABLE"),
        generator.quote_table(before),
        String::from("TO"),
        generator.quote_identifier(&after.table_name),
    ])
}

pub(crate) fn truncate_table(generator: &QueryGenerator, table: &TableDescriptor) -> String {
    format!("TRUNCATE TABLE {} IMMEDIATE", generator.quote_table(table))
}

pub(crate) fn describe_table(generator: &QueryGenerator, table: &TableDescriptor) -> String {
    join_sql_fragments([
        String::from(
            "SELECT c.COLNAME AS \"name\", c.TYPENAME AS \"type\", c.LENGTH AS \"length\", \
             c.SCALE AS \"scale\", c.NULLS AS \"allowNull\", c.DEFAULT AS \"defaultValue\", \
             CASE WHEN c.KEYSEQ IS NULL THEN 'N' ELSE 'Y' END AS \"primaryKey\", \
             c.IDENTITY AS \"autoIncrement\", c.REMARKS AS \"comment\"",
        ),
        String::from("FROM SYSCAT.COLUMNS c"),
        format!(
            "WHERE c.TABNAME = {} AND c.TABSCHEMA = {}",
            generator.escape_str(&table.table_name),
            generator.schema_literal(table.schema.as_deref())
        ),
        String::from("ORDER BY c.COLNO"),
    ])
}

pub(crate) fn show_indexes(generator: &QueryGenerator, table: &TableDescriptor) -> String {
    join_sql_fragments([
        String::from(
            "SELECT i.INDNAME AS \"name\", TRIM(i.INDSCHEMA) AS \"indexSchema\", \
             i.TABNAME AS \"tableName\", TRIM(i.TABSCHEMA) AS \"tableSchema\", \
             i.UNIQUERULE AS \"keyType\", i.COLNAMES AS \"columnNames\", i.INDEXTYPE AS \"type\"",
        ),
        String::from("FROM SYSCAT.INDEXES i"),
        format!(
            "WHERE i.TABNAME = {} AND i.TABSCHEMA = {}",
            generator.escape_str(&table.table_name),
            generator.schema_literal(table.schema.as_deref())
        ),
        String::from("ORDER BY i.INDNAME"),
    ])
}

/// Catalog code of a constraint type in `SYSCAT.TABCONST.TYPE`.
pub(crate) const fn constraint_code(constraint_type: ConstraintType) -> &'static str {
    match constraint_type {
        ConstraintType::PrimaryKey => "P",
        ConstraintType::ForeignKey => "F",
        ConstraintType::Unique => "U",
        ConstraintType::Check => "K",
    }
}

pub(crate) fn show_constraints(
    generator: &QueryGenerator,
    table: &TableDescriptor,
    options: &ShowConstraintsOptions,
) -> String {
    let mut conditions = vec![
        format!("c.TABNAME = {}", generator.escape_str(&table.table_name)),
        format!("c.TABSCHEMA = {}", generator.schema_literal(table.schema.as_deref())),
    ];
    conditions.extend(generator.constraint_filters(
        options,
        "k.COLNAME",
        "c.CONSTNAME",
        "c.TYPE",
        constraint_code,
    ));
    join_sql_fragments([
        String::from(
            "SELECT TRIM(c.TABSCHEMA) AS \"constraintSchema\", c.CONSTNAME AS \"constraintName\", \
             CASE c.TYPE WHEN 'P' THEN 'PRIMARY KEY' WHEN 'F' THEN 'FOREIGN KEY' WHEN 'K' THEN 'CHECK' WHEN 'U' THEN 'UNIQUE' ELSE NULL END AS \"constraintType\", \
             TRIM(c.TABSCHEMA) AS \"tableSchema\", c.TABNAME AS \"tableName\", k.COLNAME AS \"columnNames\", \
             TRIM(r.REFTABSCHEMA) AS \"referencedTableSchema\", r.REFTABNAME AS \"referencedTableName\", \
             TRIM(r.PK_COLNAMES) AS \"referencedColumnNames\", \
             CASE r.DELETERULE WHEN 'A' THEN 'NO ACTION' WHEN 'C' THEN 'CASCADE' WHEN 'N' THEN 'SET NULL' WHEN 'R' THEN 'RESTRICT' ELSE NULL END AS \"deleteAction\", \
             CASE r.UPDATERULE WHEN 'A' THEN 'NO ACTION' WHEN 'R' THEN 'RESTRICT' ELSE NULL END AS \"updateAction\", \
             ck.TEXT AS \"definition\"",
        ),
        String::from("FROM SYSCAT.TABCONST c"),
        String::from(
            "LEFT JOIN SYSCAT.REFERENCES r ON c.CONSTNAME = r.CONSTNAME AND c.TABNAME = r.TABNAME AND c.TABSCHEMA = r.TABSCHEMA",
        ),
        String::from(
            "LEFT JOIN SYSCAT.KEYCOLUSE k ON c.CONSTNAME = k.CONSTNAME AND c.TABNAME = k.TABNAME AND c.TABSCHEMA = k.TABSCHEMA",
        ),
        String::from(
            "LEFT JOIN SYSCAT.CHECKS ck ON c.CONSTNAME = ck.CONSTNAME AND c.TABNAME = ck.TABNAME AND c.TABSCHEMA = ck.TABSCHEMA",
        ),
        format!("WHERE {}", conditions.join(" AND ")),
        String::from("ORDER BY c.CONSTNAME, k.COLSEQ"),
    ])
}

/// Duplicate-aware insert as a `MERGE` from a `VALUES` source.
///
/// `rows` are rendered value tuples, `keys` the match condition columns
/// and `update` the columns overwritten on a match. Rows that match and
/// have nothing to update are left alone.
pub(crate) fn merge_insert(
    generator: &QueryGenerator,
    table: &TableDescriptor,
    columns: &[String],
    rows: &[String],
    keys: &[String],
    update: &[String],
) -> String {
    let source = |column: &String| format!("\"source\".{}", generator.quote_identifier(column));
    let on = keys
        .iter()
        .map(|key| {
            format!(
                "\"target\".{} = {}",
                generator.quote_identifier(key),
                source(key)
            )
        })
        .collect::<Vec<_>>()
        .join(" AND ");
    let when_matched = if update.is_empty() {
        String::new()
    } else {
        let assignments = update
            .iter()
            .map(|column| format!("{} = {}", generator.quote_identifier(column), source(column)));
        format!("WHEN MATCHED THEN UPDATE SET {}", comma_list(assignments))
    };
    let column_list = generator.quote_identifiers(columns);
    join_sql_fragments([
        format!("MERGE INTO {} AS \"target\"", generator.quote_table(table)),
        format!("USING (VALUES {}) AS \"source\" ({column_list})", comma_list(rows)),
        format!("ON {on}"),
        when_matched,
        format!(
            "WHEN NOT MATCHED THEN INSERT ({column_list}) VALUES ({})",
            comma_list(columns.iter().map(source))
        ),
    ])
}

/// Deletes at most `limit` rows through a fullselect.
pub(crate) fn delete_with_limit(
    generator: &QueryGenerator,
    table: &TableDescriptor,
    condition: &str,
    limit: u64,
) -> String {
    let filter = if condition.is_empty() {
        String::new()
    } else {
        format!("WHERE {condition}")
    };
    let inner = join_sql_fragments([
        format!("SELECT * FROM {}", generator.quote_table(table)),
        filter,
        format!("FETCH FIRST {limit} ROWS ONLY"),
    ]);
    format!("DELETE FROM ({inner})")
}
