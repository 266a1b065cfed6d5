//! IBM Db2 for i.
//!
//! Shares most of its grammar with Db2 and falls back to the Db2
//! overrides; catalog queries read the `QSYS2` views instead of `SYSCAT`.

use super::{
    db2, ArrayLiteral, BinaryLiteral, BindStyle, BooleanLiteral, Capabilities, Dialect,
    DialectKind, DuplicateStrategy, IncludeSupport, IndexCapabilities, InsertCapabilities,
    LimitStyle, PrimaryKeyNullability, ReturningStyle, SpecialFloat, SupportedOptions,
};
use crate::column::DataType;
use crate::constraint::ConstraintType;
use crate::error::Result;
use crate::fragment::{join_sql_fragments, when_set};
use crate::generator::QueryGenerator;
use crate::operation::Operation;
use crate::options::{DropSchemaOptions, ShowConstraintsOptions, StartTransactionOptions};
use crate::table::TableDescriptor;

pub(crate) static DIALECT: Dialect = Dialect {
    kind: DialectKind::Ibmi,
    name: "ibmi",
    quote_char: '"',
    default_schema: None,
    bind_style: BindStyle::QuestionMark,
    technical_schemas: &[
        "QSYS",
        "QSYS2",
        "QSYS2924",
        "SYSIBM",
        "SYSIBMADM",
        "SYSPROC",
        "SYSTOOLS",
        "QTEMP",
    ],
    technical_schema_patterns: &["Q%", "SYS%"],
    technical_databases: &[],
    capabilities: Capabilities {
        schemas: true,
        databases: false,
        returning: ReturningStyle::FinalTable,
        index: IndexCapabilities {
            include: IncludeSupport::None,
            expressions: true,
            using: false,
            partial: true,
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
        boolean_literal: BooleanLiteral::Numeric,
        array_literal: ArrayLiteral::List,
        special_float: SpecialFloat::Decfloat,
        binary_literal: BinaryLiteral::BlobHex,
        limit_style: LimitStyle::FetchFirst,
    },
    supported_options: SupportedOptions {
        create_database: &[],
        drop_database: &[],
        list_databases: &[],
        create_schema: &[],
        drop_schema: &["cascade", "ifExists"],
        list_schemas: &["skip"],
        list_tables: &["schema"],
        create_table: &["comment"],
        drop_table: &["cascade"],
        rename_table: &[],
        truncate_table: &[],
        add_column: &[],
        remove_column: &["cascade"],
        add_index: &[],
        remove_index: &[],
        add_constraint: &[],
        remove_constraint: &["cascade"],
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
        start_transaction: &["isolationLevel"],
    },
};

pub(crate) const VERSION_QUERY: &str = "SELECT CONCAT(OS_VERSION, CONCAT('.', OS_RELEASE)) AS \"version\" FROM SYSIBMADM.ENV_SYS_INFO";

pub(crate) fn data_type(data_type: &DataType) -> String {
    match data_type {
        DataType::Boolean => String::from("SMALLINT"),
        other => db2::data_type(other),
    }
}

/// `DROP SCHEMA`, guarded by a compound statement when `ifExists` is set.
pub(crate) fn drop_schema(
    generator: &QueryGenerator,
    name: &str,
    options: &DropSchemaOptions,
) -> String {
    let drop = join_sql_fragments([
        "DROP SCHEMA",
        &generator.quote_identifier(name),
        when_set(options.cascade, "CASCADE"),
    ]);
    if options.if_exists != Some(true) {
        return drop;
    }
    format!(
        "BEGIN IF EXISTS (SELECT * FROM SYSIBM.SQLSCHEMAS WHERE TABLE_SCHEM = {}) THEN {drop}; END IF; END",
        generator.escape_str(name)
    )
}

pub(crate) fn list_schemas(generator: &QueryGenerator, skip: &[String]) -> String {
    join_sql_fragments([
        String::from("SELECT DISTINCT SCHEMA_NAME AS \"schema\" FROM QSYS2.SYSSCHEMAAUTH"),
        format!(
            "WHERE GRANTEE = CURRENT USER AND {}",
            generator.schema_exclusion("SCHEMA_NAME", skip)
        ),
        String::from("ORDER BY SCHEMA_NAME"),
    ])
}

pub(crate) fn list_tables(generator: &QueryGenerator, schema: Option<&str>) -> String {
    let filter = schema.map_or_else(
        || generator.schema_exclusion("TABLE_SCHEMA", &[]),
        |schema| format!("TABLE_SCHEMA = {}", generator.escape_str(schema)),
    );
    join_sql_fragments([
        String::from(
            "SELECT TABLE_SCHEMA AS \"schema\", TABLE_NAME AS \"tableName\" FROM QSYS2.SYSTABLES",
        ),
        format!("WHERE TABLE_TYPE = 'T' AND {filter}"),
        String::from("ORDER BY TABLE_SCHEMA, TABLE_NAME"),
    ])
}

pub(crate) fn describe_table(generator: &QueryGenerator, table: &TableDescriptor) -> String {
    join_sql_fragments([
        String::from(
            "SELECT c.COLUMN_NAME AS \"name\", c.DATA_TYPE AS \"type\", c.LENGTH AS \"length\", \
             c.NUMERIC_SCALE AS \"scale\", c.IS_NULLABLE AS \"allowNull\", c.COLUMN_DEFAULT AS \"defaultValue\", \
             CASE WHEN pk.COLUMN_NAME IS NULL THEN 'N' ELSE 'Y' END AS \"primaryKey\", \
             c.IS_IDENTITY AS \"autoIncrement\", c.LONG_COMMENT AS \"comment\"",
        ),
        String::from("FROM QSYS2.SYSCOLUMNS c"),
        String::from(
            "LEFT JOIN (SELECT k.TABLE_SCHEMA, k.TABLE_NAME, k.COLUMN_NAME FROM QSYS2.SYSKEYCST k \
             JOIN QSYS2.SYSCST t ON k.CONSTRAINT_SCHEMA = t.CONSTRAINT_SCHEMA AND k.CONSTRAINT_NAME = t.CONSTRAINT_NAME \
             WHERE t.CONSTRAINT_TYPE = 'PRIMARY KEY') pk \
             ON pk.TABLE_SCHEMA = c.TABLE_SCHEMA AND pk.TABLE_NAME = c.TABLE_NAME AND pk.COLUMN_NAME = c.COLUMN_NAME",
        ),
        format!(
            "WHERE c.TABLE_NAME = {} AND c.TABLE_SCHEMA = {}",
            generator.escape_str(&table.table_name),
            generator.schema_literal(table.schema.as_deref())
        ),
        String::from("ORDER BY c.ORDINAL_POSITION"),
    ])
}

pub(crate) fn show_indexes(generator: &QueryGenerator, table: &TableDescriptor) -> String {
    join_sql_fragments([
        String::from(
            "SELECT i.INDEX_NAME AS \"name\", i.INDEX_SCHEMA AS \"indexSchema\", \
             i.TABLE_NAME AS \"tableName\", i.TABLE_SCHEMA AS \"tableSchema\", \
             i.IS_UNIQUE AS \"keyType\", k.COLUMN_NAME AS \"columnName\", \
             k.ORDINAL_POSITION AS \"columnPosition\", k.ORDERING AS \"columnOrder\"",
        ),
        String::from("FROM QSYS2.SYSINDEXES i"),
        String::from(
            "LEFT JOIN QSYS2.SYSKEYS k ON i.INDEX_NAME = k.INDEX_NAME AND i.INDEX_SCHEMA = k.INDEX_SCHEMA",
        ),
        format!(
            "WHERE i.TABLE_NAME = {} AND i.TABLE_SCHEMA = {}",
            generator.escape_str(&table.table_name),
            generator.schema_literal(table.schema.as_deref())
        ),
        String::from("ORDER BY i.INDEX_NAME, k.ORDINAL_POSITION"),
    ])
}

pub(crate) fn show_constraints(
    generator: &QueryGenerator,
    table: &TableDescriptor,
    options: &ShowConstraintsOptions,
) -> String {
    let mut conditions = vec![
        format!("c.TABLE_NAME = {}", generator.escape_str(&table.table_name)),
        format!("c.TABLE_SCHEMA = {}", generator.schema_literal(table.schema.as_deref())),
    ];
    conditions.extend(generator.constraint_filters(
        options,
        "k.COLUMN_NAME",
        "c.CONSTRAINT_NAME",
        "c.CONSTRAINT_TYPE",
        ConstraintType::as_sql,
    ));
    join_sql_fragments([
        String::from(
            "SELECT c.CONSTRAINT_SCHEMA AS \"constraintSchema\", c.CONSTRAINT_NAME AS \"constraintName\", \
             c.CONSTRAINT_TYPE AS \"constraintType\", c.TABLE_SCHEMA AS \"tableSchema\", c.TABLE_NAME AS \"tableName\", \
             k.COLUMN_NAME AS \"columnNames\", rk.TABLE_SCHEMA AS \"referencedTableSchema\", \
             rk.TABLE_NAME AS \"referencedTableName\", rk.COLUMN_NAME AS \"referencedColumnNames\", \
             r.DELETE_RULE AS \"deleteAction\", r.UPDATE_RULE AS \"updateAction\", \
             ck.CHECK_CLAUSE AS \"definition\", c.IS_DEFERRABLE AS \"isDeferrable\", \
             c.INITIALLY_DEFERRED AS \"initiallyDeferred\"",
        ),
        String::from("FROM QSYS2.SYSCST c"),
        String::from(
            "LEFT JOIN QSYS2.SYSREFCST r ON c.CONSTRAINT_SCHEMA = r.CONSTRAINT_SCHEMA AND c.CONSTRAINT_NAME = r.CONSTRAINT_NAME",
        ),
        String::from(
            "LEFT JOIN QSYS2.SYSKEYCST k ON c.CONSTRAINT_SCHEMA = k.CONSTRAINT_SCHEMA AND c.CONSTRAINT_NAME = k.CONSTRAINT_NAME",
        ),
        String::from(
            "LEFT JOIN QSYS2.SYSKEYCST rk ON r.UNIQUE_CONSTRAINT_SCHEMA = rk.CONSTRAINT_SCHEMA \
             AND r.UNIQUE_CONSTRAINT_NAME = rk.CONSTRAINT_NAME AND k.ORDINAL_POSITION = rk.ORDINAL_POSITION",
        ),
        String::from(
            "LEFT JOIN QSYS2.SYSCHKCST ck ON c.CONSTRAINT_SCHEMA = ck.CONSTRAINT_SCHEMA AND c.CONSTRAINT_NAME = ck.CONSTRAINT_NAME",
        ),
        format!("WHERE {}", conditions.join(" AND ")),
        String::from("ORDER BY c.CONSTRAINT_NAME, k.ORDINAL_POSITION"),
    ])
}

/// Transactions start implicitly; only the isolation level can be set.
pub(crate) fn start_transaction(
    generator: &QueryGenerator,
    options: &StartTransactionOptions,
) -> Result<String> {
    options.isolation_level.map_or_else(
        || {
            Err(generator.unsupported(
                Operation::StartTransaction,
                "transactions start implicitly; only an isolation level can be set",
            ))
        },
        |level| Ok(format!("SET TRANSACTION ISOLATION LEVEL {}", level.as_sql())),
    )
}
