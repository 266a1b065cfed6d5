//! ANSI-leaning dialect.
//!
//! Uses the neutral implementation for every operation; only the
//! capability table and the regular expression spelling live here.

use super::{
    ArrayLiteral, BinaryLiteral, BindStyle, BooleanLiteral, Capabilities, Dialect, DialectKind,
    DuplicateStrategy, IncludeSupport, IndexCapabilities, InsertCapabilities, LimitStyle,
    PrimaryKeyNullability, ReturningStyle, SpecialFloat, SupportedOptions,
};

pub(crate) static DIALECT: Dialect = Dialect {
    kind: DialectKind::Generic,
    name: "generic",
    quote_char: '"',
    default_schema: None,
    bind_style: BindStyle::QuestionMark,
    technical_schemas: &["INFORMATION_SCHEMA"],
    technical_schema_patterns: &[],
    technical_databases: &[],
    capabilities: Capabilities {
        schemas: true,
        databases: false,
        returning: ReturningStyle::None,
        index: IndexCapabilities {
            include: IncludeSupport::None,
            expressions: false,
            using: false,
            partial: false,
            operator_class: false,
            schema_qualified_name: false,
        },
        insert: InsertCapabilities {
            ignore_duplicates: DuplicateStrategy::None,
            update_on_duplicate: DuplicateStrategy::None,
            exception: false,
            default_values: true,
        },
        comments: false,
        column_positioning: false,
        cross_schema_rename: false,
        comma_separated_alter: true,
        primary_key_nullability: PrimaryKeyNullability::Normalize,
        boolean_literal: BooleanLiteral::Keyword,
        array_literal: ArrayLiteral::List,
        special_float: SpecialFloat::CastDouble,
        binary_literal: BinaryLiteral::HexString,
        limit_style: LimitStyle::FetchFirst,
    },
    supported_options: SupportedOptions {
        create_database: &[],
        drop_database: &[],
        list_databases: &[],
        create_schema: &["authorization"],
        drop_schema: &["cascade"],
        list_schemas: &["skip"],
        list_tables: &["schema"],
        create_table: &["ifNotExists"],
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
        insert: &["bindParam"],
        update: &["bindParam"],
        arithmetic: &[],
        delete: &[],
        start_transaction: &["isolationLevel", "readOnly"],
    },
};

/// SQL:2008 `LIKE_REGEX`.
pub(crate) fn regexp(column: &str, pattern: &str, negate: bool, insensitive: bool) -> String {
    let test = if insensitive {
        format!("{column} LIKE_REGEX {pattern} FLAG 'i'")
    } else {
        format!("{column} LIKE_REGEX {pattern}")
    };
    if negate {
        format!("NOT ({test})")
    } else {
        test
    }
}

/// Server version from the standard implementation-info view.
pub(crate) const VERSION_QUERY: &str = "SELECT CHARACTER_VALUE AS \"version\" FROM INFORMATION_SCHEMA.SQL_IMPLEMENTATION_INFO WHERE IMPLEMENTATION_INFO_NAME = 'DBMS VERSION'";
