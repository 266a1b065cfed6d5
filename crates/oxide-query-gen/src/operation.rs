//! The roster of operations a generator can produce SQL for.

use core::fmt;

use serde::Serialize;

/// Identifies one generator operation.
///
/// Used to key the option tables and to name the operation in errors and
/// log records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    CreateDatabase,
    DropDatabase,
    ListDatabases,
    CreateSchema,
    DropSchema,
    ListSchemas,
    ListTables,
    DescribeTable,
    CreateTable,
    DropTable,
    RenameTable,
    TruncateTable,
    AddColumn,
    ChangeColumn,
    RenameColumn,
    RemoveColumn,
    AddIndex,
    RemoveIndex,
    ShowIndexes,
    AddConstraint,
    RemoveConstraint,
    ShowConstraints,
    Insert,
    BulkInsert,
    Update,
    Arithmetic,
    Delete,
    Select,
    StartTransaction,
    SetIsolationLevel,
    CommitTransaction,
    RollbackTransaction,
    CreateSavepoint,
    RollbackSavepoint,
    Version,
}

impl Operation {
    /// Returns the public name of the operation.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::CreateDatabase => "createDatabaseQuery",
            Self::DropDatabase => "dropDatabaseQuery",
            Self::ListDatabases => "listDatabasesQuery",
            Self::CreateSchema => "createSchemaQuery",
            Self::DropSchema => "dropSchemaQuery",
            Self::ListSchemas => "listSchemasQuery",
            Self::ListTables => "listTablesQuery",
            Self::DescribeTable => "describeTableQuery",
            Self::CreateTable => "createTableQuery",
            Self::DropTable => "dropTableQuery",
            Self::RenameTable => "renameTableQuery",
            Self::TruncateTable => "truncateTableQuery",
            Self::AddColumn => "addColumnQuery",
            Self::ChangeColumn => "changeColumnQuery",
            Self::RenameColumn => "renameColumnQuery",
            Self::RemoveColumn => "removeColumnQuery",
            Self::AddIndex => "addIndexQuery",
            Self::RemoveIndex => "removeIndexQuery",
            Self::ShowIndexes => "showIndexesQuery",
            Self::AddConstraint => "addConstraintQuery",
            Self::RemoveConstraint => "removeConstraintQuery",
            Self::ShowConstraints => "showConstraintsQuery",
            Self::Insert => "insertQuery",
            Self::BulkInsert => "bulkInsertQuery",
            Self::Update => "updateQuery",
            Self::Arithmetic => "arithmeticQuery",
            Self::Delete => "deleteQuery",
            Self::Select => "selectQuery",
            Self::StartTransaction => "startTransactionQuery",
            Self::SetIsolationLevel => "setIsolationLevelQuery",
            Self::CommitTransaction => "commitTransactionQuery",
            Self::RollbackTransaction => "rollbackTransactionQuery",
            Self::CreateSavepoint => "createSavepointQuery",
            Self::RollbackSavepoint => "rollbackSavepointQuery",
            Self::Version => "versionQuery",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
