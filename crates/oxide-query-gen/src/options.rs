//! Per-operation option objects.
//!
//! Each struct lists the *supportable* surface of one operation: every
//! key any dialect may implement. Which of those keys a given dialect
//! actually accepts lives in its [`SupportedOptions`] table, and the
//! validator rejects the difference before any SQL is built.
//!
//! Fields are `Option`s so that "not given" stays distinct from "given
//! as false": a dialect without `CASCADE` rejects `cascade: false` too,
//! which keeps callers portable across dialects.
//!
//! [`SupportedOptions`]: crate::dialect::SupportedOptions

use serde::{Deserialize, Serialize};

use crate::constraint::{ConstraintType, Deferrable};
use crate::transaction::IsolationLevel;

/// Common surface of the option structs.
pub trait QueryOptions {
    /// Every key this operation documents across all dialects.
    const SUPPORTABLE: &'static [&'static str];

    /// The keys set on this value, in declaration order.
    fn present_keys(&self) -> Vec<&'static str>;
}

/// Declares an options struct together with its supportable key list.
macro_rules! query_options {
    (
        $(#[$meta:meta])*
        $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field:ident : $ty:ty => $key:literal
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        #[serde(default, deny_unknown_fields)]
        pub struct $name {
            $(
                $(#[$field_meta])*
                #[serde(rename = $key, skip_serializing_if = "Option::is_none")]
                pub $field: Option<$ty>,
            )*
        }

        impl QueryOptions for $name {
            const SUPPORTABLE: &'static [&'static str] = &[$($key),*];

            fn present_keys(&self) -> Vec<&'static str> {
                let mut keys = Vec::new();
                $(
                    if self.$field.is_some() {
                        keys.push($key);
                    }
                )*
                keys
            }
        }
    };
}

query_options! {
    /// Options for `create_database_query`.
    CreateDatabaseOptions {
        charset: String => "charset",
        collate: String => "collate",
        ctype: String => "ctype",
        encoding: String => "encoding",
        /// Template database to copy.
        template: String => "template",
    }
}

query_options! {
    /// Options for `drop_database_query`.
    DropDatabaseOptions {
        if_exists: bool => "ifExists",
    }
}

query_options! {
    /// Options for `list_databases_query`.
    ListDatabasesOptions {
        /// Extra database names to exclude, merged with the technical ones.
        skip: Vec<String> => "skip",
    }
}

query_options! {
    /// Options for `create_schema_query`.
    CreateSchemaOptions {
        /// Role that will own the schema.
        authorization: String => "authorization",
        charset: String => "charset",
        collate: String => "collate",
        comment: String => "comment",
        if_not_exists: bool => "ifNotExists",
        replace: bool => "replace",
    }
}

query_options! {
    /// Options for `drop_schema_query`.
    DropSchemaOptions {
        cascade: bool => "cascade",
        if_exists: bool => "ifExists",
    }
}

query_options! {
    /// Options for `list_schemas_query`.
    ListSchemasOptions {
        /// Extra schema names to exclude, merged with the technical ones.
        skip: Vec<String> => "skip",
    }
}

query_options! {
    /// Options for `list_tables_query`.
    ListTablesOptions {
        /// Only list tables of this schema.
        schema: String => "schema",
    }
}

query_options! {
    /// Options for `create_table_query`.
    CreateTableOptions {
        comment: String => "comment",
        if_not_exists: bool => "ifNotExists",
    }
}

query_options! {
    /// Options for `drop_table_query`.
    DropTableOptions {
        cascade: bool => "cascade",
        if_exists: bool => "ifExists",
    }
}

query_options! {
    /// Options for `rename_table_query`.
    RenameTableOptions {
        /// Allow the rename to move the table to another schema.
        change_schema: bool => "changeSchema",
    }
}

query_options! {
    /// Options for `truncate_table_query`.
    TruncateTableOptions {
        cascade: bool => "cascade",
        restart_identity: bool => "restartIdentity",
    }
}

query_options! {
    /// Options for `add_column_query`.
    AddColumnOptions {
        if_not_exists: bool => "ifNotExists",
    }
}

query_options! {
    /// Options for `remove_column_query`.
    RemoveColumnOptions {
        cascade: bool => "cascade",
        if_exists: bool => "ifExists",
    }
}

query_options! {
    /// Options for `add_index_query`.
    AddIndexOptions {
        /// Build the index without blocking writes.
        concurrently: bool => "concurrently",
        if_not_exists: bool => "ifNotExists",
    }
}

query_options! {
    /// Options for `remove_index_query`.
    RemoveIndexOptions {
        cascade: bool => "cascade",
        concurrently: bool => "concurrently",
        if_exists: bool => "ifExists",
    }
}

query_options! {
    /// Options for `add_constraint_query`.
    AddConstraintOptions {
        deferrable: Deferrable => "deferrable",
    }
}

query_options! {
    /// Options for `remove_constraint_query`.
    RemoveConstraintOptions {
        cascade: bool => "cascade",
        if_exists: bool => "ifExists",
    }
}

query_options! {
    /// Filters for `show_constraints_query`.
    ShowConstraintsOptions {
        column_name: String => "columnName",
        constraint_name: String => "constraintName",
        constraint_type: ConstraintType => "constraintType",
    }
}

query_options! {
    /// Options for `insert_query` and `bulk_insert_query`.
    InsertOptions {
        /// Emit bind markers and return the values separately.
        bind_param: bool => "bindParam",
        /// Catch unique violations without aborting the transaction.
        exception: bool => "exception",
        /// Skip rows that violate a unique constraint.
        ignore_duplicates: bool => "ignoreDuplicates",
        returning: Returning => "returning",
        /// Columns to overwrite when a row violates a unique constraint.
        update_on_duplicate: Vec<String> => "updateOnDuplicate",
        /// Conflict target for duplicate handling.
        upsert_keys: Vec<String> => "upsertKeys",
    }
}

query_options! {
    /// Options for `update_query`.
    UpdateOptions {
        bind_param: bool => "bindParam",
        returning: Returning => "returning",
    }
}

query_options! {
    /// Options for `arithmetic_query`.
    ArithmeticOptions {
        returning: Returning => "returning",
    }
}

query_options! {
    /// Options for `delete_query`.
    DeleteOptions {
        /// Maximum number of rows to delete.
        limit: u64 => "limit",
        returning: Returning => "returning",
    }
}

query_options! {
    /// Options for `start_transaction_query`.
    StartTransactionOptions {
        isolation_level: IsolationLevel => "isolationLevel",
        read_only: bool => "readOnly",
    }
}

/// Which columns a write should read back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Returning {
    /// `true` reads back every column, `false` none.
    All(bool),
    /// Read back these columns.
    Columns(Vec<String>),
}

impl Returning {
    /// Returns whether anything is read back.
    #[must_use]
    pub fn is_requested(&self) -> bool {
        match self {
            Self::All(flag) => *flag,
            Self::Columns(cols) => !cols.is_empty(),
        }
    }
}

impl From<bool> for Returning {
    fn from(flag: bool) -> Self {
        Self::All(flag)
    }
}

impl From<Vec<String>> for Returning {
    fn from(cols: Vec<String>) -> Self {
        Self::Columns(cols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_present_keys_follow_declaration_order() {
        let opts = RemoveIndexOptions {
            if_exists: Some(true),
            cascade: Some(false),
            concurrently: None,
        };
        assert_eq!(opts.present_keys(), vec!["cascade", "ifExists"]);
        assert!(RemoveIndexOptions::default().present_keys().is_empty());
    }

    #[test]
    fn test_supportable_lists_every_key() {
        assert_eq!(
            InsertOptions::SUPPORTABLE,
            &[
                "bindParam",
                "exception",
                "ignoreDuplicates",
                "returning",
                "updateOnDuplicate",
                "upsertKeys"
            ]
        );
    }

    #[test]
    fn test_deserialize_camel_case_options() {
        let opts: InsertOptions = serde_json::from_str(
            r#"{"ignoreDuplicates": true, "returning": ["id"], "bindParam": false}"#,
        )
        .unwrap();
        assert_eq!(opts.ignore_duplicates, Some(true));
        assert_eq!(
            opts.returning,
            Some(Returning::Columns(vec![String::from("id")]))
        );
        assert_eq!(opts.present_keys(), vec!["bindParam", "ignoreDuplicates", "returning"]);
    }

    #[test]
    fn test_unknown_keys_fail_to_deserialize() {
        let result: std::result::Result<AddIndexOptions, _> = serde_json::from_str(r#"{"online": true}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_returning_flag() {
        assert!(Returning::All(true).is_requested());
        assert!(!Returning::All(false).is_requested());
        assert!(!Returning::Columns(vec![]).is_requested());
    }
}
