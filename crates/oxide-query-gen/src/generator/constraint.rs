//! Table constraints: add, remove, introspect.

use super::QueryGenerator;
use crate::constraint::{ConstraintType, TableConstraint};
use crate::dialect::{db2, ibmi, postgres, DialectKind};
use crate::error::{QueryGenError, Result};
use crate::fragment::{join_sql_fragments, when_set};
use crate::operation::Operation;
use crate::options::{AddConstraintOptions, RemoveConstraintOptions, ShowConstraintsOptions};
use crate::table::TableDescriptor;

impl QueryGenerator {
    /// Renders a constraint as it appears in `CREATE TABLE` and after
    /// `ALTER TABLE ... ADD`.
    pub(super) fn constraint_fragment(
        &self,
        operation: Operation,
        table: &TableDescriptor,
        constraint: &TableConstraint,
    ) -> Result<String> {
        let columns = constraint.columns();
        if columns.is_empty() && constraint.constraint_type() != ConstraintType::Check {
            return Err(QueryGenError::invalid(
                operation,
                format!("{} constraint needs at least one column", constraint.constraint_type()),
            ));
        }
        let name = match constraint {
            TableConstraint::Unique { name: None, columns } => {
                Some(format!("{}_{}_uk", table.table_name, columns.join("_")))
            }
            TableConstraint::PrimaryKey { name, .. }
            | TableConstraint::Unique { name, .. }
            | TableConstraint::ForeignKey { name, .. }
            | TableConstraint::Check { name, .. } => name.clone(),
        };
        let body = match constraint {
            TableConstraint::PrimaryKey { columns, .. } => {
                format!("PRIMARY KEY ({})", self.quote_identifiers(columns))
            }
            TableConstraint::Unique { columns, .. } => {
                format!("UNIQUE ({})", self.quote_identifiers(columns))
            }
            TableConstraint::ForeignKey {
                columns,
                references,
                referenced_columns,
                on_delete,
                on_update,
                ..
            } => {
                if referenced_columns.len() != columns.len() {
                    return Err(QueryGenError::invalid(
                        operation,
                        "a foreign key must reference as many columns as it holds",
                    ));
                }
                format!(
                    "FOREIGN KEY ({}) {}",
                    self.quote_identifiers(columns),
                    self.references_clause(
                        operation,
                        references,
                        referenced_columns,
                        *on_delete,
                        *on_update
                    )?
                )
            }
            TableConstraint::Check { expression, .. } => format!("CHECK ({expression})"),
        };
        Ok(join_sql_fragments([
            name.map(|n| format!("CONSTRAINT {}", self.quote_identifier(&n)))
                .unwrap_or_default(),
            body,
        ]))
    }

    /// Filter predicates shared by the catalog queries.
    ///
    /// `type_code` maps a constraint type to the catalog's own spelling.
    pub(crate) fn constraint_filters(
        &self,
        options: &ShowConstraintsOptions,
        column_expr: &str,
        name_expr: &str,
        type_expr: &str,
        type_code: fn(ConstraintType) -> &'static str,
    ) -> Vec<String> {
        let mut filters = Vec::new();
        if let Some(column) = &options.column_name {
            filters.push(format!("{column_expr} = {}", self.escape_str(column)));
        }
        if let Some(name) = &options.constraint_name {
            filters.push(format!("{name_expr} = {}", self.escape_str(name)));
        }
        if let Some(constraint_type) = options.constraint_type {
            filters.push(format!(
                "{type_expr} = {}",
                self.escape_str(type_code(constraint_type))
            ));
        }
        filters
    }

    /// Generates `ALTER TABLE ... ADD <constraint>`.
    ///
    /// # Errors
    ///
    /// Fails on unsupported options, on malformed constraints and on a
    /// deferrable CHECK constraint.
    pub fn add_constraint_query(
        &self,
        table: impl Into<TableDescriptor>,
        constraint: &TableConstraint,
        options: &AddConstraintOptions,
    ) -> Result<String> {
        let operation = Operation::AddConstraint;
        self.check_options(operation, options)?;
        if options.deferrable.is_some() && constraint.constraint_type() == ConstraintType::Check {
            return Err(self.unsupported(operation, "CHECK constraints cannot be deferrable"));
        }
        let table = self.extract_table_details(table);
        let sql = join_sql_fragments([
            String::from("ALTER TABLE"),
            self.quote_table(&table),
            String::from("ADD"),
            self.constraint_fragment(operation, &table, constraint)?,
            String::from(options.deferrable.map_or("", |d| d.as_sql())),
        ]);
        Ok(self.finish(operation, sql))
    }

    /// Generates `ALTER TABLE ... DROP CONSTRAINT`.
    ///
    /// # Errors
    ///
    /// Fails on unsupported options.
    pub fn remove_constraint_query(
        &self,
        table: impl Into<TableDescriptor>,
        name: &str,
        options: &RemoveConstraintOptions,
    ) -> Result<String> {
        let operation = Operation::RemoveConstraint;
        self.check_options(operation, options)?;
        let table = self.extract_table_details(table);
        let sql = join_sql_fragments([
            "ALTER TABLE",
            &self.quote_table(&table),
            "DROP CONSTRAINT",
            when_set(options.if_exists, "IF EXISTS"),
            &self.quote_identifier(name),
            when_set(options.cascade, "CASCADE"),
        ]);
        Ok(self.finish(operation, sql))
    }

    /// Lists the constraints of a table in the row shape of
    /// [`ConstraintDescriptor`], one row per constrained column.
    ///
    /// [`ConstraintDescriptor`]: crate::constraint::ConstraintDescriptor
    ///
    /// # Errors
    ///
    /// Fails on unsupported options.
    pub fn show_constraints_query(
        &self,
        table: impl Into<TableDescriptor>,
        options: &ShowConstraintsOptions,
    ) -> Result<String> {
        let operation = Operation::ShowConstraints;
        self.check_options(operation, options)?;
        let table = self.extract_table_details(table);
        let sql = match self.kind() {
            DialectKind::Postgres => postgres::show_constraints(self, &table, options),
            DialectKind::Db2 => db2::show_constraints(self, &table, options),
            DialectKind::Ibmi => ibmi::show_constraints(self, &table, options),
            DialectKind::Generic => self.information_schema_constraints(&table, options),
        };
        Ok(self.finish(operation, sql))
    }

    fn information_schema_constraints(
        &self,
        table: &TableDescriptor,
        options: &ShowConstraintsOptions,
    ) -> String {
        let mut conditions = vec![
            format!("c.table_name = {}", self.escape_str(&table.table_name)),
            format!("c.table_schema = {}", self.schema_literal(table.schema.as_deref())),
        ];
        conditions.extend(self.constraint_filters(
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
                 ch.check_clause AS \"definition\", c.is_deferrable AS \"isDeferrable\", \
                 c.initially_deferred AS \"initiallyDeferred\"",
            ),
            String::from("FROM information_schema.table_constraints c"),
            String::from(
                "LEFT JOIN information_schema.referential_constraints r \
                 ON c.constraint_schema = r.constraint_schema AND c.constraint_name = r.constraint_name",
            ),
            String::from(
                "LEFT JOIN information_schema.key_column_usage kcu \
                 ON c.constraint_schema = kcu.constraint_schema AND c.constraint_name = kcu.constraint_name",
            ),
            String::from(
                "LEFT JOIN information_schema.constraint_column_usage ccu \
                 ON r.constraint_schema = ccu.constraint_schema AND r.constraint_name = ccu.constraint_name",
            ),
            String::from(
                "LEFT JOIN information_schema.check_constraints ch \
                 ON c.constraint_schema = ch.constraint_schema AND c.constraint_name = ch.constraint_name",
            ),
            format!("WHERE {}", conditions.join(" AND ")),
            String::from("ORDER BY c.constraint_name, kcu.ordinal_position"),
        ])
    }
}
