//! PostgreSQL dialect.

use uuid::Uuid;

use super::{
    ArrayLiteral, BinaryLiteral, BindStyle, BooleanLiteral, Capabilities, Dialect, DialectKind,
    DuplicateStrategy, IncludeSupport, IndexCapabilities, InsertCapabilities, LimitStyle,
    PrimaryKeyNullability, ReturningStyle, SpecialFloat, SupportedOptions,
};
use crate::column::DataType;
use crate::constraint::ConstraintType;
use crate::error::{QueryGenError, Result};
use crate::fragment::{comma_list, join_sql_fragments, when_set};
use crate::generator::QueryGenerator;
use crate::operation::Operation;
use crate::options::{
    CreateDatabaseOptions, DropDatabaseOptions, InsertOptions, RenameTableOptions,
    ShowConstraintsOptions, TruncateTableOptions,
};
use crate::table::TableDescriptor;

pub(crate) static DIALECT: Dialect = Dialect {
    kind: DialectKind::Postgres,
    name: "postgres",
    quote_char: '"',
    default_schema: Some("public"),
    bind_style: BindStyle::Dollar,
    technical_schemas: &["information_schema", "pg_catalog", "pg_toast"],
    technical_schema_patterns: &["pg_%"],
    technical_databases: &["postgres", "template0", "template1"],
    capabilities: Capabilities {
        schemas: true,
        databases: true,
        returning: ReturningStyle::Clause,
        index: IndexCapabilities {
            include: IncludeSupport::All,
            expressions: true,
            using: true,
            partial: true,
            operator_class: true,
            schema_qualified_name: false,
        },
        insert: InsertCapabilities {
            ignore_duplicates: DuplicateStrategy::OnConflict,
            update_on_duplicate: DuplicateStrategy::OnConflict,
            exception: true,
            default_values: true,
        },
        comments: true,
        column_positioning: false,
        cross_schema_rename: true,
        comma_separated_alter: true,
        primary_key_nullability: PrimaryKeyNullability::Normalize,
        boolean_literal: BooleanLiteral::Keyword,
        array_literal: ArrayLiteral::Constructor,
        special_float: SpecialFloat::CastDouble,
        binary_literal: BinaryLiteral::ByteaHex,
        limit_style: LimitStyle::LimitOffset,
    },
    supported_options: SupportedOptions {
        create_database: &["collate", "ctype", "encoding", "template"],
        drop_database: &["ifExists"],
        list_databases: &["skip"],
        create_schema: &["authorization", "ifNotExists"],
        drop_schema: &["cascade", "ifExists"],
        list_schemas: &["skip"],
        list_tables: &["schema"],
        create_table: &["comment", "ifNotExists"],
        drop_table: &["cascade", "ifExists"],
        rename_table: &["changeSchema"],
        truncate_table: &["cascade", "restartIdentity"],
        add_column: &["ifNotExists"],
        remove_column: &["cascade", "ifExists"],
        add_index: &["concurrently", "ifNotExists"],
        remove_index: &["cascade", "concurrently", "ifExists"],
        add_constraint: &["deferrable"],
        remove_constraint: &["cascade", "ifExists"],
        show_constraints: &["columnName", "constraintName", "constraintType"],
        insert: &[
            "bindParam",
            "exception",
            "ignoreDuplicates",
            "returning",
            "updateOnDuplicate",
            "upsertKeys",
        ],
        update: &["bindParam", "returning"],
        arithmetic: &["returning"],
        delete: &["limit", "returning"],
        start_transaction: &["isolationLevel", "readOnly"],
    },
};

pub(crate) fn data_type(data_type: &DataType) -> String {
    match data_type {
        DataType::Text => String::from("TEXT"),
        DataType::Blob | DataType::Binary(_) | DataType::Varbinary(_) => String::from("BYTEA"),
        DataType::Uuid => String::from("UUID"),
        DataType::Jsonb => String::from("JSONB"),
        other => other.to_sql(),
    }
}

/// Serial pseudo-type standing in for an auto-increment integer.
pub(crate) const fn serial_type(data_type: &DataType) -> Option<&'static str> {
    match data_type {
        DataType::Smallint => Some("SMALLSERIAL"),
        DataType::Integer => Some("SERIAL"),
        DataType::Bigint => Some("BIGSERIAL"),
        _ => None,
    }
}

pub(crate) fn regexp(column: &str, pattern: &str, negate: bool, insensitive: bool) -> String {
    let operator = match (negate, insensitive) {
        (false, false) => "~",
        (false, true) => "~*",
        (true, false) => "!~",
        (true, true) => "!~*",
    };
    format!("{column} {operator} {pattern}")
}

pub(crate) fn create_database(
    generator: &QueryGenerator,
    name: &str,
    options: &CreateDatabaseOptions,
) -> String {
    let setting = |keyword: &str, value: Option<&String>| {
        value
            .map(|v| format!("{keyword} = {}", generator.escape_str(v)))
            .unwrap_or_default()
    };
    join_sql_fragments([
        String::from("CREATE DATABASE"),
        generator.quote_identifier(name),
        setting("ENCODING", options.encoding.as_ref()),
        setting("LC_COLLATE", options.collate.as_ref()),
        setting("LC_CTYPE", options.ctype.as_ref()),
        options
            .template
            .as_ref()
            .map(|t| format!("TEMPLATE = {}", generator.quote_identifier(t)))
            .unwrap_or_default(),
    ])
}

pub(crate) fn drop_database(
    generator: &QueryGenerator,
    name: &str,
    options: &DropDatabaseOptions,
) -> String {
    join_sql_fragments([
        "DROP DATABASE",
        when_set(options.if_exists, "IF EXISTS"),
        &generator.quote_identifier(name),
    ])
}

pub(crate) fn list_databases(generator: &QueryGenerator, skip: &[String]) -> String {
    let excluded = DIALECT
        .technical_databases
        .iter()
        .copied()
        .chain(skip.iter().map(String::as_str))
        .map(|name| generator.escape_str(name));
    format!(
        "SELECT datname AS \"name\" FROM pg_database WHERE datistemplate = false AND datname NOT IN ({}) ORDER BY datname",
        comma_list(excluded)
    )
}

/// Renames a table, or moves it to another schema with `changeSchema`.
pub(crate) fn rename_table(
    generator: &QueryGenerator,
    before: &TableDescriptor,
    after: &TableDescriptor,
    options: &RenameTableOptions,
) -> Result<String> {
    if before.schema == after.schema {
        return Ok(join_sql_fragments([
            String::from("ALTER TABLE"),
            generator.quote_table(before),
            String::from("RENAME TO"),
            generator.quote_identifier(&after.table_name),
        ]));
    }
    if options.change_schema != Some(true) {
        return Err(generator.unsupported(
            Operation::RenameTable,
            "moving a table to another schema requires the changeSchema option",
        ));
    }
    if before.table_name != after.table_name {
        return Err(generator.unsupported(
            Operation::RenameTable,
            "a table cannot be renamed and moved to another schema at the same time",
        ));
    }
    let Some(schema) = after.schema.as_deref() else {
        return Err(QueryGenError::invalid(
            Operation::RenameTable,
            "the target schema is missing",
        ));
    };
    Ok(join_sql_fragments([
        String::from("ALTER TABLE"),
        generator.quote_table(before),
        String::from("SET SCHEMA"),
        generator.quote_identifier(schema),
    ]))
}

pub(crate) fn truncate_table(
    generator: &QueryGenerator,
    table: &TableDescriptor,
    options: &TruncateTableOptions,
) -> String {
    join_sql_fragments([
        "TRUNCATE",
        &generator.quote_table(table),
        when_set(options.restart_identity, "RESTART IDENTITY"),
        when_set(options.cascade, "CASCADE"),
    ])
}

pub(crate) fn describe_table(generator: &QueryGenerator, table: &TableDescriptor) -> String {
    join_sql_fragments([
        String::from(
            "SELECT c.column_name AS \"name\", c.data_type AS \"type\", \
             c.character_maximum_length AS \"length\", c.is_nullable AS \"allowNull\", \
             c.column_default AS \"defaultValue\", \
             CASE WHEN pk.column_name IS NULL THEN 'NO' ELSE 'YES' END AS \"primaryKey\", \
             col_description(format('%I.%I', c.table_schema, c.table_name)::regclass, c.ordinal_position::int) AS \"comment\", \
             (SELECT array_agg(e.enumlabel) FROM pg_catalog.pg_type t JOIN pg_catalog.pg_enum e ON t.oid = e.enumtypid WHERE t.typname = c.udt_name) AS \"special\"",
        ),
        String::from("FROM information_schema.columns c"),
        String::from(
            "LEFT JOIN (SELECT tc.table_schema, tc.table_name, kcu.column_name \
             FROM information_schema.table_constraints tc \
             JOIN information_schema.key_column_usage kcu ON tc.constraint_schema = kcu.constraint_schema AND tc.constraint_name = kcu.constraint_name \
             WHERE tc.constraint_type = 'PRIMARY KEY') pk \
             ON pk.table_schema = c.table_schema AND pk.table_name = c.table_name AND pk.column_name = c.column_name",
        ),
        format!(
            "WHERE c.table_name = {} AND c.table_schema = {}",
            generator.escape_str(&table.table_name),
            generator.schema_literal(table.schema.as_deref())
        ),
        String::from("ORDER BY c.ordinal_position"),
    ])
}

pub(crate) fn show_indexes(generator: &QueryGenerator, table: &TableDescriptor) -> String {
    join_sql_fragments([
        String::from(
            "SELECT i.relname AS \"name\", ix.indisprimary AS \"primary\", ix.indisunique AS \"unique\", \
             ix.indkey[:ix.indnkeyatts - 1] AS \"indkey\", ix.indkey[ix.indnkeyatts:] AS \"includeFields\", \
             array_agg(a.attnum) AS \"columnIndexes\", \
             array_agg(a.attname) AS \"columnNames\", pg_get_indexdef(ix.indexrelid) AS \"definition\"",
        ),
        String::from("FROM pg_class t, pg_class i, pg_index ix, pg_attribute a, pg_namespace s"),
        format!(
            "WHERE t.oid = ix.indrelid AND i.oid = ix.indexrelid AND a.attrelid = t.oid \
             AND a.attnum = ANY(ix.indkey) AND t.relkind = 'r' AND t.relname = {} AND s.oid = t.relnamespace AND s.nspname = {}",
            generator.escape_str(&table.table_name),
            generator.schema_literal(table.schema.as_deref())
        ),
        String::from("GROUP BY i.relname, ix.indexrelid, ix.indisprimary, ix.indisunique, ix.indkey, ix.indnkeyatts"),
        String::from("ORDER BY i.relname"),
    ])
}

pub(crate) fn show_constraints(
    generator: &QueryGenerator,
    table: &TableDescriptor,
    options: &ShowConstraintsOptions,
) -> String {
    let mut conditions = vec![
        format!("c.table_name = {}", generator.escape_str(&table.table_name)),
        format!("c.table_schema = {}", generator.schema_literal(table.schema.as_deref())),
    ];
    conditions.extend(generator.constraint_filters(
        options,
        "kcu.column_name",
        "c.constraint_name",
        "c.constraint_type",
        ConstraintType::as_sql,
    ));
    join_sql_fragments([
        String::from(
            "SELECT c.constraint_schema AS \"constraintSchema\", c.constraint_name AS \"constraintName\", \
             c.constraint_type AS \"constraintType\", c.table_schema AS \"tableSchema\", c.table_name AS \"tableName\", \
             kcu.column_name AS \"columnNames\", ccu.table_schema AS \"referencedTableSchema\", \
             ccu.table_name AS \"referencedTableName\", ccu.column_name AS \"referencedColumnNames\", \
             r.delete_rule AS \"deleteAction\", r.update_rule AS \"updateAction\", \
             pg_get_constraintdef(pgc.oid) AS \"definition\", c.is_deferrable AS \"isDeferrable\", \
             c.initially_deferred AS \"initiallyDeferred\"",
        ),
        String::from("FROM information_schema.table_constraints c"),
        String::from(
            "LEFT JOIN information_schema.referential_constraints r \
             ON c.constraint_catalog = r.constraint_catalog AND c.constraint_schema = r.constraint_schema AND c.constraint_name = r.constraint_name",
        ),
        String::from(
            "LEFT JOIN information_schema.key_column_usage kcu \
             ON c.constraint_catalog = kcu.constraint_catalog AND c.constraint_schema = kcu.constraint_schema AND c.constraint_name = kcu.constraint_name",
        ),
        String::from(
            "LEFT JOIN information_schema.constraint_column_usage ccu \
             ON r.constraint_catalog = ccu.constraint_catalog AND r.constraint_schema = ccu.constraint_schema AND r.constraint_name = ccu.constraint_name",
        ),
        String::from(
            "LEFT JOIN pg_constraint pgc ON c.constraint_name = pgc.conname \
             AND c.table_schema = (SELECT nspname FROM pg_namespace WHERE oid = pgc.connamespace) \
             AND c.table_name = (SELECT relname FROM pg_class WHERE oid = pgc.conrelid)",
        ),
        format!("WHERE {}", conditions.join(" AND ")),
        String::from("ORDER BY c.constraint_name, kcu.ordinal_position"),
    ])
}

/// `ON CONFLICT` clause for duplicate handling on insert.
pub(crate) fn on_conflict(
    generator: &QueryGenerator,
    options: &InsertOptions,
    upsert_keys: &[String],
) -> String {
    let target = if upsert_keys.is_empty() {
        String::new()
    } else {
        format!("({})", generator.quote_identifiers(upsert_keys))
    };
    match &options.update_on_duplicate {
        Some(columns) if !columns.is_empty() => {
            let assignments = columns.iter().map(|column| {
                let column = generator.quote_identifier(column);
                format!("{column}=EXCLUDED.{column}")
            });
            join_sql_fragments([
                String::from("ON CONFLICT"),
                target,
                format!("DO UPDATE SET {}", comma_list(assignments)),
            ])
        }
        _ if options.ignore_duplicates == Some(true) => {
            join_sql_fragments([String::from("ON CONFLICT"), target, String::from("DO NOTHING")])
        }
        _ => String::new(),
    }
}

/// Wraps an insert in a temporary plpgsql function that catches unique
/// violations, so the enclosing transaction survives a duplicate.
///
/// The batch creates the function, calls it, and drops it. The body is
/// dollar-quoted with a random tag that does not occur in `insert`.
pub(crate) fn catch_unique_violation(
    generator: &QueryGenerator,
    table: &TableDescriptor,
    insert: &str,
) -> String {
    let mut delimiter = format!("$func_{}$", Uuid::new_v4().simple());
    while insert.contains(&delimiter) {
        delimiter = format!("$func_{}$", Uuid::new_v4().simple());
    }
    let table = generator.quote_table(table);
    format!(
        "CREATE OR REPLACE FUNCTION pg_temp.testfunc(OUT response {table}, OUT caught_exception text) \
         RETURNS RECORD AS {delimiter} BEGIN {insert} RETURNING * INTO response; \
         EXCEPTION WHEN unique_violation THEN GET STACKED DIAGNOSTICS caught_exception = PG_EXCEPTION_DETAIL; \
         END {delimiter} LANGUAGE plpgsql; \
         SELECT (testfunc.response).*, testfunc.caught_exception FROM pg_temp.testfunc(); \
         DROP FUNCTION IF EXISTS pg_temp.testfunc()"
    )
}

/// Deletes at most `limit` rows through their physical row ids.
pub(crate) fn delete_with_limit(
    generator: &QueryGenerator,
    table: &TableDescriptor,
    condition: &str,
    limit: u64,
) -> String {
    let table = generator.quote_table(table);
    let filter = if condition.is_empty() {
        String::new()
    } else {
        format!("WHERE {condition}")
    };
    let inner = join_sql_fragments([
        format!("SELECT ctid FROM {table}"),
        filter,
        format!("LIMIT {limit}"),
    ]);
    format!("DELETE FROM {table} WHERE ctid IN ({inner})")
}

pub(crate) const VERSION_QUERY: &str = "SHOW SERVER_VERSION";
