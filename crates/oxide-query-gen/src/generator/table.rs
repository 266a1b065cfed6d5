//! Table and column DDL.

use super::QueryGenerator;
use crate::column::{ColumnChange, ColumnDefinition, DefaultChange, ForeignKeyAction};
use crate::constraint::TableConstraint;
use crate::dialect::{db2, ibmi, postgres, DialectKind, PrimaryKeyNullability};
use crate::error::{QueryGenError, Result};
use crate::fragment::{comma_list, join_sql_fragments, when, when_set};
use crate::operation::Operation;
use crate::options::{
    AddColumnOptions, CreateTableOptions, DropTableOptions, RemoveColumnOptions,
    RenameTableOptions, TruncateTableOptions,
};
use crate::table::TableDescriptor;

/// Compares column sets ignoring order and case.
fn same_columns<A: AsRef<str>, B: AsRef<str>>(a: &[A], b: &[B]) -> bool {
    fn normalized<S: AsRef<str>>(columns: &[S]) -> Vec<String> {
        let mut columns: Vec<String> = columns.iter().map(|c| c.as_ref().to_lowercase()).collect();
        columns.sort();
        columns
    }
    !a.is_empty() && normalized(a) == normalized(b)
}

impl QueryGenerator {
    /// `REFERENCES <table> (<columns>) [ON DELETE ...] [ON UPDATE ...]`.
    pub(super) fn references_clause(
        &self,
        operation: Operation,
        table: &TableDescriptor,
        columns: &[String],
        on_delete: Option<ForeignKeyAction>,
        on_update: Option<ForeignKeyAction>,
    ) -> Result<String> {
        if self.kind().is_db2_family() {
            db2::check_referential_actions(self, operation, on_delete, on_update)?;
        }
        let table = self.extract_table_details(table);
        Ok(join_sql_fragments([
            format!(
                "REFERENCES {} ({})",
                self.quote_table(&table),
                self.quote_identifiers(columns)
            ),
            on_delete
                .map(|a| format!("ON DELETE {}", a.as_sql()))
                .unwrap_or_default(),
            on_update
                .map(|a| format!("ON UPDATE {}", a.as_sql()))
                .unwrap_or_default(),
        ]))
    }

    /// Renders one column definition.
    ///
    /// The primary key is only emitted inline when `inline_primary_key`
    /// is set; `CREATE TABLE` declares it at table level instead.
    pub(super) fn column_definition(
        &self,
        operation: Operation,
        column: &ColumnDefinition,
        inline_primary_key: bool,
    ) -> Result<String> {
        let caps = &self.dialect.capabilities;
        if column.position.is_some() && !caps.column_positioning {
            return Err(self.unsupported(
                operation,
                format!("column {} cannot be positioned with FIRST or AFTER", column.name),
            ));
        }
        if column.auto_increment && column.default.is_some() {
            return Err(QueryGenError::invalid(
                operation,
                format!("auto-increment column {} cannot have a default value", column.name),
            ));
        }
        let mut not_null = column.allow_null == Some(false);
        if column.primary_key {
            match caps.primary_key_nullability {
                PrimaryKeyNullability::Reject if column.allow_null == Some(true) => {
                    return Err(self.unsupported(
                        operation,
                        format!("primary key column {} must be NOT NULL", column.name),
                    ));
                }
                PrimaryKeyNullability::Reject => not_null = true,
                PrimaryKeyNullability::Normalize => {}
            }
        }

        let serial = if column.auto_increment && self.kind() == DialectKind::Postgres {
            postgres::serial_type(&column.data_type)
        } else {
            None
        };
        let data_type = serial.map_or_else(|| self.sql_type(&column.data_type), String::from);
        let identity = match self.kind() {
            _ if !column.auto_increment || serial.is_some() => "",
            DialectKind::Db2 | DialectKind::Ibmi => db2::IDENTITY,
            DialectKind::Generic | DialectKind::Postgres => "GENERATED BY DEFAULT AS IDENTITY",
        };
        let references = match &column.references {
            Some(fk) => self.references_clause(
                operation,
                &fk.table,
                std::slice::from_ref(&fk.column),
                fk.on_delete,
                fk.on_update,
            )?,
            None => String::new(),
        };

        Ok(join_sql_fragments([
            self.quote_identifier(&column.name),
            data_type,
            String::from(when(not_null, "NOT NULL")),
            String::from(identity),
            column
                .default
                .as_ref()
                .map(|value| format!("DEFAULT {}", self.escape(value)))
                .unwrap_or_default(),
            String::from(when(column.unique && column.unique_key.is_none(), "UNIQUE")),
            String::from(when(inline_primary_key && column.primary_key, "PRIMARY KEY")),
            references,
            column
                .check
                .as_ref()
                .map(|check| format!("CHECK ({check})"))
                .unwrap_or_default(),
        ]))
    }

    fn comment_statement(
        &self,
        operation: Operation,
        target: &str,
        comment: &str,
    ) -> Result<String> {
        if !self.dialect.capabilities.comments {
            return Err(self.unsupported(operation, "comments are not available"));
        }
        Ok(format!("COMMENT ON {target} IS {}", self.escape_str(comment)))
    }

    fn column_comment(
        &self,
        operation: Operation,
        table: &str,
        column: &ColumnDefinition,
    ) -> Result<Option<String>> {
        column
            .comment
            .as_deref()
            .map(|comment| {
                let target = format!("COLUMN {table}.{}", self.quote_identifier(&column.name));
                self.comment_statement(operation, &target, comment)
            })
            .transpose()
    }

    /// Generates `CREATE TABLE`, followed by `COMMENT ON` statements for
    /// the table and column comments.
    ///
    /// The primary key is declared at table level. Unique keys come from
    /// columns sharing a `unique_key` name and from `constraints`; a
    /// unique key covering exactly the primary key columns is skipped.
    ///
    /// # Errors
    ///
    /// Fails on unsupported options, on column attributes the dialect
    /// rejects, and on a primary key declared both on columns and as a
    /// constraint.
    pub fn create_table_query(
        &self,
        table: impl Into<TableDescriptor>,
        columns: &[ColumnDefinition],
        constraints: &[TableConstraint],
        options: &CreateTableOptions,
    ) -> Result<String> {
        let operation = Operation::CreateTable;
        self.check_options(operation, options)?;
        if columns.is_empty() {
            return Err(QueryGenError::invalid(operation, "a table needs at least one column"));
        }
        let table = self.extract_table_details(table);
        let quoted = self.quote_table(&table);

        let mut primary_key: Vec<&str> = columns
            .iter()
            .filter(|c| c.primary_key)
            .map(|c| c.name.as_str())
            .collect();
        for constraint in constraints {
            if let TableConstraint::PrimaryKey { columns: pk, .. } = constraint {
                if !primary_key.is_empty() {
                    return Err(QueryGenError::invalid(
                        operation,
                        "the primary key is declared more than once",
                    ));
                }
                primary_key = pk.iter().map(String::as_str).collect();
            }
        }

        let mut definitions = Vec::with_capacity(columns.len() + constraints.len() + 1);
        for column in columns {
            let mut column = column.clone();
            if !column.primary_key && primary_key.contains(&column.name.as_str()) {
                column.primary_key = true;
            }
            definitions.push(self.column_definition(operation, &column, false)?);
        }
        if columns.iter().any(|c| c.primary_key) {
            definitions.push(format!("PRIMARY KEY ({})", self.quote_identifiers(&primary_key)));
        }

        let mut unique_keys: Vec<(&str, Vec<&str>)> = Vec::new();
        for column in columns {
            if let Some(key) = column.unique_key.as_deref() {
                match unique_keys.iter_mut().find(|(name, _)| *name == key) {
                    Some((_, key_columns)) => key_columns.push(column.name.as_str()),
                    None => unique_keys.push((key, vec![column.name.as_str()])),
                }
            }
        }
        for (name, key_columns) in &unique_keys {
            if same_columns(key_columns, &primary_key) {
                continue;
            }
            definitions.push(format!(
                "CONSTRAINT {} UNIQUE ({})",
                self.quote_identifier(name),
                self.quote_identifiers(key_columns)
            ));
        }
        for constraint in constraints {
            if let TableConstraint::Unique { columns: key_columns, .. } = constraint {
                if same_columns(key_columns, &primary_key) {
                    continue;
                }
            }
            definitions.push(self.constraint_fragment(operation, &table, constraint)?);
        }

        let create = join_sql_fragments([
            "CREATE TABLE",
            when_set(options.if_not_exists, "IF NOT EXISTS"),
            &quoted,
            &format!("({})", comma_list(&definitions)),
        ]);
        let mut statements = vec![create];
        if let Some(comment) = &options.comment {
            statements.push(self.comment_statement(
                operation,
                &format!("TABLE {quoted}"),
                comment,
            )?);
        }
        for column in columns {
            statements.extend(self.column_comment(operation, &quoted, column)?);
        }
        Ok(self.finish(operation, statements.join("; ")))
    }

    /// Generates `DROP TABLE`.
    ///
    /// # Errors
    ///
    /// Fails on unsupported options.
    pub fn drop_table_query(
        &self,
        table: impl Into<TableDescriptor>,
        options: &DropTableOptions,
    ) -> Result<String> {
        let operation = Operation::DropTable;
        self.check_options(operation, options)?;
        let table = self.extract_table_details(table);
        let sql = join_sql_fragments([
            "DROP TABLE",
            when_set(options.if_exists, "IF EXISTS"),
            &self.quote_table(&table),
            when_set(options.cascade, "CASCADE"),
        ]);
        Ok(self.finish(operation, sql))
    }

    /// Renames a table. A target without a schema stays in the source's
    /// schema.
    ///
    /// # Errors
    ///
    /// Fails on unsupported options and when the dialect cannot perform
    /// the requested move between schemas.
    pub fn rename_table_query(
        &self,
        before: impl Into<TableDescriptor>,
        after: impl Into<TableDescriptor>,
        options: &RenameTableOptions,
    ) -> Result<String> {
        let operation = Operation::RenameTable;
        self.check_options(operation, options)?;
        let before = self.extract_table_details(before);
        let mut after = after.into();
        if after.schema.is_none() {
            after.schema.clone_from(&before.schema);
        }
        let after = self.extract_table_details(after);
        if before.schema != after.schema && !self.dialect.capabilities.cross_schema_rename {
            return Err(self.unsupported(operation, "tables cannot be moved to another schema"));
        }
        let sql = match self.kind() {
            DialectKind::Postgres => postgres::rename_table(self, &before, &after, options)?,
            DialectKind::Db2 | DialectKind::Ibmi => db2::rename_table(self, &before, &after),
            DialectKind::Generic => join_sql_fragments([
                String::from("ALTER TABLE"),
                self.quote_table(&before),
                String::from("RENAME TO"),
                self.quote_identifier(&after.table_name),
            ]),
        };
        Ok(self.finish(operation, sql))
    }

    /// Removes every row of a table.
    ///
    /// # Errors
    ///
    /// Fails on unsupported options.
    pub fn truncate_table_query(
        &self,
        table: impl Into<TableDescriptor>,
        options: &TruncateTableOptions,
    ) -> Result<String> {
        let operation = Operation::TruncateTable;
        self.check_options(operation, options)?;
        let table = self.extract_table_details(table);
        let sql = match self.kind() {
            DialectKind::Postgres => postgres::truncate_table(self, &table, options),
            DialectKind::Db2 | DialectKind::Ibmi => db2::truncate_table(self, &table),
            DialectKind::Generic => format!("TRUNCATE TABLE {}", self.quote_table(&table)),
        };
        Ok(self.finish(operation, sql))
    }

    /// Reads the column metadata of a table, one row per column in
    /// declaration order.
    #[must_use]
    pub fn describe_table_query(&self, table: impl Into<TableDescriptor>) -> String {
        let table = self.extract_table_details(table);
        let sql = match self.kind() {
            DialectKind::Postgres => postgres::describe_table(self, &table),
            DialectKind::Db2 => db2::describe_table(self, &table),
            DialectKind::Ibmi => ibmi::describe_table(self, &table),
            DialectKind::Generic => join_sql_fragments([
                String::from(
                    "SELECT c.column_name AS \"name\", c.data_type AS \"type\", \
                     c.character_maximum_length AS \"length\", c.is_nullable AS \"allowNull\", \
                     c.column_default AS \"defaultValue\", \
                     CASE WHEN pk.column_name IS NULL THEN 'NO' ELSE 'YES' END AS \"primaryKey\"",
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
                    self.escape_str(&table.table_name),
                    self.schema_literal(table.schema.as_deref())
                ),
                String::from("ORDER BY c.ordinal_position"),
            ]),
        };
        self.finish(Operation::DescribeTable, sql)
    }

    /// Generates `ALTER TABLE ... ADD COLUMN`.
    ///
    /// # Errors
    ///
    /// Fails on unsupported options and on column attributes the dialect
    /// rejects.
    pub fn add_column_query(
        &self,
        table: impl Into<TableDescriptor>,
        column: &ColumnDefinition,
        options: &AddColumnOptions,
    ) -> Result<String> {
        let operation = Operation::AddColumn;
        self.check_options(operation, options)?;
        let table = self.extract_table_details(table);
        let quoted = self.quote_table(&table);
        let alter = join_sql_fragments([
            "ALTER TABLE",
            &quoted,
            "ADD COLUMN",
            when_set(options.if_not_exists, "IF NOT EXISTS"),
            &self.column_definition(operation, column, true)?,
        ]);
        let mut statements = vec![alter];
        statements.extend(self.column_comment(operation, &quoted, column)?);
        Ok(self.finish(operation, statements.join("; ")))
    }

    /// Alters one column.
    ///
    /// Type, nullability and default changes become `ALTER COLUMN`
    /// sub-clauses; uniqueness and references become `ADD` constraint
    /// sub-clauses of the same statement.
    ///
    /// # Errors
    ///
    /// Fails when the change is empty or names referential actions the
    /// dialect rejects.
    pub fn change_column_query(
        &self,
        table: impl Into<TableDescriptor>,
        column: &str,
        change: &ColumnChange,
    ) -> Result<String> {
        let operation = Operation::ChangeColumn;
        if change.is_empty() {
            return Err(QueryGenError::invalid(
                operation,
                format!("no change given for column {column}"),
            ));
        }
        let table = self.extract_table_details(table);
        let quoted = self.quote_table(&table);
        let target = format!("ALTER COLUMN {}", self.quote_identifier(column));

        let mut alterations = Vec::new();
        if let Some(data_type) = &change.data_type {
            let keyword = if self.kind() == DialectKind::Postgres {
                "TYPE"
            } else {
                "SET DATA TYPE"
            };
            alterations.push(format!("{target} {keyword} {}", self.sql_type(data_type)));
        }
        match change.allow_null {
            Some(false) => alterations.push(format!("{target} SET NOT NULL")),
            Some(true) => alterations.push(format!("{target} DROP NOT NULL")),
            None => {}
        }
        match &change.default {
            Some(DefaultChange::Set(value)) => {
                alterations.push(format!("{target} SET DEFAULT {}", self.escape(value)));
            }
            Some(DefaultChange::Drop) => alterations.push(format!("{target} DROP DEFAULT")),
            None => {}
        }

        let mut constraints = Vec::new();
        if change.unique {
            constraints.push(format!(
                "ADD CONSTRAINT {} UNIQUE ({})",
                self.quote_identifier(&format!("{}_{column}_uk", table.table_name)),
                self.quote_identifier(column)
            ));
        }
        if let Some(fk) = &change.references {
            constraints.push(format!(
                "ADD FOREIGN KEY ({}) {}",
                self.quote_identifier(column),
                self.references_clause(
                    operation,
                    &fk.table,
                    std::slice::from_ref(&fk.column),
                    fk.on_delete,
                    fk.on_update,
                )?
            ));
        }

        let mut statements = Vec::new();
        alterations.append(&mut constraints);
        if !alterations.is_empty() {
            let separator = if self.dialect.capabilities.comma_separated_alter {
                ", "
            } else {
                " "
            };
            statements.push(format!("ALTER TABLE {quoted} {}", alterations.join(separator)));
        }
        if let Some(comment) = &change.comment {
            let target = format!("COLUMN {quoted}.{}", self.quote_identifier(column));
            statements.push(self.comment_statement(operation, &target, comment)?);
        }
        Ok(self.finish(operation, statements.join("; ")))
    }

    /// Generates `ALTER TABLE ... RENAME COLUMN`.
    #[must_use]
    pub fn rename_column_query(
        &self,
        table: impl Into<TableDescriptor>,
        before: &str,
        after: &str,
    ) -> String {
        let table = self.extract_table_details(table);
        let sql = format!(
            "ALTER TABLE {} RENAME COLUMN {} TO {}",
            self.quote_table(&table),
            self.quote_identifier(before),
            self.quote_identifier(after)
        );
        self.finish(Operation::RenameColumn, sql)
    }

    /// Generates `ALTER TABLE ... DROP COLUMN`.
    ///
    /// # Errors
    ///
    /// Fails on unsupported options.
    pub fn remove_column_query(
        &self,
        table: impl Into<TableDescriptor>,
        column: &str,
        options: &RemoveColumnOptions,
    ) -> Result<String> {
        let operation = Operation::RemoveColumn;
        self.check_options(operation, options)?;
        let table = self.extract_table_details(table);
        let sql = join_sql_fragments([
            "ALTER TABLE",
            &self.quote_table(&table),
            "DROP COLUMN",
            when_set(options.if_exists, "IF EXISTS"),
            &self.quote_identifier(column),
            when_set(options.cascade, "CASCADE"),
        ]);
        Ok(self.finish(operation, sql))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::{ColumnPosition, DataType};

    fn users_columns() -> Vec<ColumnDefinition> {
        vec![
            ColumnDefinition::new("id", DataType::Integer)
                .primary_key()
                .auto_increment(),
            ColumnDefinition::new("email", DataType::Varchar(Some(255)))
                .not_null()
                .unique(),
            ColumnDefinition::new("active", DataType::Boolean).default_value(true),
        ]
    }

    #[test]
    fn test_create_table_postgres() {
        let pg = QueryGenerator::new(DialectKind::Postgres);
        let sql = pg
            .create_table_query("users", &users_columns(), &[], &CreateTableOptions::default())
            .unwrap();
        assert_eq!(
            sql,
            "CREATE TABLE \"users\" (\"id\" SERIAL, \"email\" VARCHAR(255) NOT NULL UNIQUE, \
             \"active\" BOOLEAN DEFAULT TRUE, PRIMARY KEY (\"id\"))"
        );
    }

    #[test]
    fn test_create_table_db2_identity() {
        let db2 = QueryGenerator::new(DialectKind::Db2);
        let sql = db2
            .create_table_query("users", &users_columns(), &[], &CreateTableOptions::default())
            .unwrap();
        assert_eq!(
            sql,
            "CREATE TABLE \"users\" (\"id\" INTEGER NOT NULL GENERATED BY DEFAULT AS IDENTITY (START WITH 1, INCREMENT BY 1), \
             \"email\" VARCHAR(255) NOT NULL UNIQUE, \"active\" BOOLEAN DEFAULT TRUE, PRIMARY KEY (\"id\"))"
        );
    }

    #[test]
    fn test_nullable_primary_key() {
        let columns = vec![ColumnDefinition::new("id", DataType::Integer)
            .primary_key()
            .nullable()];
        let pg = QueryGenerator::new(DialectKind::Postgres);
        assert_eq!(
            pg.create_table_query("t", &columns, &[], &CreateTableOptions::default())
                .unwrap(),
            "CREATE TABLE \"t\" (\"id\" INTEGER, PRIMARY KEY (\"id\"))"
        );
        let ibmi = QueryGenerator::new(DialectKind::Ibmi);
        let err = ibmi
            .create_table_query("t", &columns, &[], &CreateTableOptions::default())
            .unwrap_err();
        assert!(matches!(err, QueryGenError::UnsupportedOperation { .. }));
    }

    #[test]
    fn test_unique_key_matching_primary_key_is_skipped() {
        let columns = vec![
            ColumnDefinition::new("tenant", DataType::Integer)
                .primary_key()
                .unique_key("tenant_user"),
            ColumnDefinition::new("user", DataType::Integer)
                .primary_key()
                .unique_key("tenant_user"),
            ColumnDefinition::new("code", DataType::Text).unique_key("code_key"),
        ];
        let pg = QueryGenerator::new(DialectKind::Postgres);
        let constraints = [TableConstraint::Unique {
            name: None,
            columns: vec![String::from("USER"), String::from("Tenant")],
        }];
        assert_eq!(
            pg.create_table_query("m", &columns, &constraints, &CreateTableOptions::default())
                .unwrap(),
            "CREATE TABLE \"m\" (\"tenant\" INTEGER, \"user\" INTEGER, \"code\" TEXT, \
             PRIMARY KEY (\"tenant\", \"user\"), CONSTRAINT \"code_key\" UNIQUE (\"code\"))"
        );
    }

    #[test]
    fn test_create_table_with_comments() {
        let columns = vec![ColumnDefinition::new("id", DataType::Bigint).comment("row id")];
        let options = CreateTableOptions {
            comment: Some(String::from("it's a table")),
            if_not_exists: None,
        };
        let pg = QueryGenerator::new(DialectKind::Postgres);
        assert_eq!(
            pg.create_table_query(("app", "t"), &columns, &[], &options)
                .unwrap(),
            "CREATE TABLE \"app\".\"t\" (\"id\" BIGINT); \
             COMMENT ON TABLE \"app\".\"t\" IS 'it''s a table'; \
             COMMENT ON COLUMN \"app\".\"t\".\"id\" IS 'row id'"
        );
        let generic = QueryGenerator::new(DialectKind::Generic);
        assert!(generic
            .create_table_query("t", &columns, &[], &CreateTableOptions::default())
            .is_err());
    }

    #[test]
    fn test_auto_increment_with_default_is_invalid() {
        let columns = vec![ColumnDefinition::new("id", DataType::Integer)
            .auto_increment()
            .default_value(1_i64)];
        let pg = QueryGenerator::new(DialectKind::Postgres);
        let err = pg
            .create_table_query("t", &columns, &[], &CreateTableOptions::default())
            .unwrap_err();
        assert!(matches!(err, QueryGenError::InvalidInput { .. }));
    }

    #[test]
    fn test_column_position_rejected() {
        let column = ColumnDefinition::new("a", DataType::Integer).position(ColumnPosition::First);
        let pg = QueryGenerator::new(DialectKind::Postgres);
        assert!(pg
            .add_column_query("t", &column, &AddColumnOptions::default())
            .is_err());
    }

    #[test]
    fn test_add_column_with_reference() {
        let column = ColumnDefinition::new("owner_id", DataType::Integer)
            .references("users", "id")
            .on_delete(ForeignKeyAction::Cascade);
        let pg = QueryGenerator::new(DialectKind::Postgres);
        let options = AddColumnOptions {
            if_not_exists: Some(true),
        };
        assert_eq!(
            pg.add_column_query("posts", &column, &options).unwrap(),
            "ALTER TABLE \"posts\" ADD COLUMN IF NOT EXISTS \"owner_id\" INTEGER \
             REFERENCES \"users\" (\"id\") ON DELETE CASCADE"
        );
        let db2 = QueryGenerator::new(DialectKind::Db2);
        assert!(db2.add_column_query("posts", &column, &options).is_err());
    }

    #[test]
    fn test_change_column_separators() {
        let change = ColumnChange {
            data_type: Some(DataType::Bigint),
            allow_null: Some(false),
            unique: true,
            ..ColumnChange::default()
        };
        let pg = QueryGenerator::new(DialectKind::Postgres);
        assert_eq!(
            pg.change_column_query("users", "age", &change).unwrap(),
            "ALTER TABLE \"users\" ALTER COLUMN \"age\" TYPE BIGINT, \
             ALTER COLUMN \"age\" SET NOT NULL, ADD CONSTRAINT \"users_age_uk\" UNIQUE (\"age\")"
        );
        let db2 = QueryGenerator::new(DialectKind::Db2);
        assert_eq!(
            db2.change_column_query("users", "age", &change).unwrap(),
            "ALTER TABLE \"users\" ALTER COLUMN \"age\" SET DATA TYPE BIGINT \
             ALTER COLUMN \"age\" SET NOT NULL ADD CONSTRAINT \"users_age_uk\" UNIQUE (\"age\")"
        );
        assert!(pg
            .change_column_query("users", "age", &ColumnChange::default())
            .is_err());
    }

    #[test]
    fn test_rename_table_scenario_e() {
        let pg = QueryGenerator::new(DialectKind::Postgres);
        let before = TableDescriptor::with_schema("a", "t");
        let after = TableDescriptor::with_schema("b", "t");
        let err = pg
            .rename_table_query(&before, &after, &RenameTableOptions::default())
            .unwrap_err();
        assert!(matches!(err, QueryGenError::UnsupportedOperation { .. }));

        let options = RenameTableOptions {
            change_schema: Some(true),
        };
        assert_eq!(
            pg.rename_table_query(&before, &after, &options).unwrap(),
            "ALTER TABLE \"a\".\"t\" SET SCHEMA \"b\""
        );
        let renamed = TableDescriptor::with_schema("b", "u");
        assert!(pg.rename_table_query(&before, &renamed, &options).is_err());
    }

    #[test]
    fn test_cross_schema_rename_follows_capability() {
        let before = TableDescriptor::with_schema("a", "t");
        let after = TableDescriptor::with_schema("b", "t");
        for kind in [DialectKind::Generic, DialectKind::Db2, DialectKind::Ibmi] {
            let generator = QueryGenerator::new(kind);
            assert!(!generator.dialect().capabilities.cross_schema_rename);
            let err = generator
                .rename_table_query(&before, &after, &RenameTableOptions::default())
                .unwrap_err();
            assert!(err.to_string().contains("another schema"), "{kind}: {err}");
        }
        let pg = QueryGenerator::new(DialectKind::Postgres);
        assert!(pg.dialect().capabilities.cross_schema_rename);
    }

    #[test]
    fn test_rename_table_keeps_source_schema() {
        let db2 = QueryGenerator::new(DialectKind::Db2);
        assert_eq!(
            db2.rename_table_query(("APP", "old"), "new", &RenameTableOptions::default())
                .unwrap(),
            "RENAME TABLE \"APP\".\"old\" TO \"new\""
        );
    }

    #[test]
    fn test_truncate_per_dialect() {
        let pg = QueryGenerator::new(DialectKind::Postgres);
        let options = TruncateTableOptions {
            cascade: Some(true),
            restart_identity: Some(true),
        };
        assert_eq!(
            pg.truncate_table_query("t", &options).unwrap(),
            "TRUNCATE \"t\" RESTART IDENTITY CASCADE"
        );
        let ibmi = QueryGenerator::new(DialectKind::Ibmi);
        assert_eq!(
            ibmi.truncate_table_query("t", &TruncateTableOptions::default())
                .unwrap(),
            "TRUNCATE TABLE \"t\" IMMEDIATE"
        );
    }

    #[test]
    fn test_remove_column() {
        let generic = QueryGenerator::new(DialectKind::Generic);
        let options = RemoveColumnOptions {
            cascade: Some(true),
            if_exists: None,
        };
        assert_eq!(
            generic.remove_column_query("t", "c", &options).unwrap(),
            "ALTER TABLE \"t\" DROP COLUMN \"c\" CASCADE"
        );
    }
}
