//! Row writes and reads.

use super::QueryGenerator;
use crate::dialect::{db2, postgres, DialectKind, DuplicateStrategy, LimitStyle};
use crate::error::{QueryGenError, Result};
use crate::fragment::{comma_list, join_sql_fragments};
use crate::index::SortOrder;
use crate::operation::Operation;
use crate::options::{ArithmeticOptions, DeleteOptions, InsertOptions, UpdateOptions};
use crate::predicate::Predicate;
use crate::result::QueryResult;
use crate::table::{TableDescriptor, TableModel};
use crate::value::{SqlValue, ValueMap};

/// Direction of an arithmetic update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOperator {
    /// `column = column + amount`.
    Add,
    /// `column = column - amount`.
    Subtract,
}

impl ArithmeticOperator {
    /// Returns the SQL operator.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
        }
    }
}

/// A plain single-table read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectQuery {
    /// Selected columns; empty selects every column.
    pub attributes: Vec<String>,
    /// Row filter.
    pub where_clause: Option<Predicate>,
    /// Sort keys, in priority order.
    pub order: Vec<(String, SortOrder)>,
    /// Maximum number of rows.
    pub limit: Option<u64>,
    /// Number of rows skipped.
    pub offset: Option<u64>,
}

impl SelectQuery {
    /// Creates a query selecting every column and row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects these columns.
    #[must_use]
    pub fn attributes<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Filters rows.
    #[must_use]
    pub fn where_clause(mut self, predicate: Predicate) -> Self {
        self.where_clause = Some(predicate);
        self
    }

    /// Appends a sort key.
    #[must_use]
    pub fn order_by(mut self, column: impl Into<String>, order: SortOrder) -> Self {
        self.order.push((column.into(), order));
        self
    }

    /// Limits the number of rows.
    #[must_use]
    pub const fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Skips rows.
    #[must_use]
    pub const fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }
}

fn where_fragment(condition: &str) -> String {
    if condition.is_empty() {
        String::new()
    } else {
        format!("WHERE {condition}")
    }
}

impl QueryGenerator {
    /// Generates a single-row `INSERT`.
    ///
    /// Undefined entries of `values` are skipped. An explicit NULL for a
    /// column the model marks auto-increment becomes `DEFAULT`. Without
    /// any defined value the statement inserts a row of defaults.
    ///
    /// Duplicate handling follows the dialect: `ON CONFLICT` on Postgres,
    /// a `MERGE` on the Db2 family. The conflict target is `upsertKeys`,
    /// or the model's primary key when none are given.
    ///
    /// # Errors
    ///
    /// Fails with [`QueryGenError::InvalidInput`] when both
    /// `ignoreDuplicates` and `updateOnDuplicate` are requested or the
    /// conflict target is unknown, with [`QueryGenError::Configuration`]
    /// on unsupported options, and with
    /// [`QueryGenError::UnsupportedOperation`] on combinations the dialect
    /// cannot express.
    pub fn insert_query(
        &self,
        table: impl Into<TableDescriptor>,
        values: &ValueMap,
        model: Option<&TableModel>,
        options: &InsertOptions,
    ) -> Result<QueryResult> {
        self.insert_rows(
            Operation::Insert,
            table.into(),
            std::slice::from_ref(values),
            model,
            options,
        )
    }

    /// Generates a multi-row `INSERT`.
    ///
    /// The column list is the union of the defined keys of every row, in
    /// order of first appearance; a row without a value for a column
    /// inserts `DEFAULT` there.
    ///
    /// # Errors
    ///
    /// As [`insert_query`](Self::insert_query), and additionally fails
    /// when there are no rows or no defined values, or when `exception`
    /// is requested.
    pub fn bulk_insert_query(
        &self,
        table: impl Into<TableDescriptor>,
        rows: &[ValueMap],
        model: Option<&TableModel>,
        options: &InsertOptions,
    ) -> Result<QueryResult> {
        let operation = Operation::BulkInsert;
        if rows.is_empty() {
            return Err(QueryGenError::invalid(operation, "no rows to insert"));
        }
        self.insert_rows(operation, table.into(), rows, model, options)
    }

    fn insert_rows(
        &self,
        operation: Operation,
        table: TableDescriptor,
        rows: &[ValueMap],
        model: Option<&TableModel>,
        options: &InsertOptions,
    ) -> Result<QueryResult> {
        let ignore = options.ignore_duplicates == Some(true);
        if ignore && options.update_on_duplicate.is_some() {
            return Err(QueryGenError::invalid(
                operation,
                "ignoreDuplicates and updateOnDuplicate are mutually exclusive",
            ));
        }
        self.check_options(operation, options)?;
        let table = self.extract_table_details(table);
        let caps = &self.dialect.capabilities.insert;

        let returning = Self::returning_columns(options.returning.as_ref(), model);
        let exception = options.exception == Some(true);
        if exception {
            if options.bind_param == Some(true) {
                return Err(self.unsupported(
                    operation,
                    "exception cannot be combined with bind parameters",
                ));
            }
            if returning.is_some() {
                return Err(self.unsupported(
                    operation,
                    "exception cannot be combined with returning",
                ));
            }
            if operation == Operation::BulkInsert || !caps.exception {
                return Err(self.unsupported(operation, "exception only wraps single-row inserts"));
            }
        }

        let update = options
            .update_on_duplicate
            .as_deref()
            .filter(|columns| !columns.is_empty());
        let strategy = if update.is_some() {
            caps.update_on_duplicate
        } else if ignore {
            caps.ignore_duplicates
        } else {
            DuplicateStrategy::None
        };
        if (ignore || update.is_some()) && strategy == DuplicateStrategy::None {
            return Err(self.unsupported(operation, "duplicate handling is not available"));
        }
        let upsert_keys = options
            .upsert_keys
            .clone()
            .filter(|keys| !keys.is_empty())
            .or_else(|| model.map(TableModel::primary_key))
            .unwrap_or_default();
        if update.is_some() && upsert_keys.is_empty() {
            return Err(QueryGenError::invalid(
                operation,
                "updateOnDuplicate needs upsertKeys or a model with a primary key",
            ));
        }
        let mut columns: Vec<String> = Vec::new();
        for row in rows {
            for (column, _) in row.defined() {
                if !columns.iter().any(|c| c == column) {
                    columns.push(column.to_string());
                }
            }
        }
        let is_default = |row: &ValueMap, column: &str| match row.get(column) {
            None | Some(SqlValue::Default) => true,
            Some(SqlValue::Null) => model.is_some_and(|m| m.is_auto_increment(column)),
            Some(_) => false,
        };

        // Rows whose conflict keys are all generated cannot collide, so the
        // MERGE degrades to a plain insert.
        let merge = strategy == DuplicateStrategy::Merge
            && !upsert_keys.is_empty()
            && !upsert_keys
                .iter()
                .all(|key| rows.iter().all(|row| is_default(row, key.as_str())));
        let strategy = if strategy == DuplicateStrategy::Merge && !merge {
            DuplicateStrategy::None
        } else {
            strategy
        };
        if merge {
            if returning.is_some() {
                return Err(self.unsupported(
                    operation,
                    "rows cannot be read back from a MERGE",
                ));
            }
            // Identity columns left to their default are generated by the
            // insert branch and stay out of the source rows.
            columns.retain(|c| !rows.iter().all(|row| is_default(row, c.as_str())));
            if let Some(key) = upsert_keys.iter().find(|k| !columns.contains(*k)) {
                return Err(QueryGenError::invalid(
                    operation,
                    format!("upsert key {key} has no inserted value"),
                ));
            }
        }
        if columns.is_empty() && operation == Operation::BulkInsert {
            return Err(QueryGenError::invalid(operation, "rows hold no defined values"));
        }

        let mut binds = self.bind_collector(options.bind_param);
        let mut tuples = Vec::with_capacity(rows.len());
        for row in rows {
            let mut cells = Vec::with_capacity(columns.len());
            for column in &columns {
                match row.get(column) {
                    Some(value) if !is_default(row, column) => cells.push(binds.add(value)),
                    _ if merge => {
                        return Err(self.unsupported(
                            operation,
                            format!("MERGE source rows cannot leave {column} to its default"),
                        ));
                    }
                    _ => cells.push(String::from("DEFAULT")),
                }
            }
            tuples.push(format!("({})", comma_list(&cells)));
        }

        let sql = if merge {
            db2::merge_insert(
                self,
                &table,
                &columns,
                &tuples,
                &upsert_keys,
                update.unwrap_or_default(),
            )
        } else {
            let body = if columns.is_empty() {
                String::from(if caps.default_values {
                    "DEFAULT VALUES"
                } else {
                    "VALUES (DEFAULT)"
                })
            } else {
                format!(
                    "({}) VALUES {}",
                    self.quote_identifiers(&columns),
                    comma_list(&tuples)
                )
            };
            let conflict = if strategy == DuplicateStrategy::OnConflict {
                postgres::on_conflict(self, options, &upsert_keys)
            } else {
                String::new()
            };
            join_sql_fragments([
                format!("INSERT INTO {}", self.quote_table(&table)),
                body,
                conflict,
            ])
        };
        let sql = if exception {
            postgres::catch_unique_violation(self, &table, &sql)
        } else {
            self.with_returning(operation, sql, returning.as_deref())?
        };
        Ok(QueryResult::from_collector(self.finish(operation, sql), binds))
    }

    /// Generates an `UPDATE`.
    ///
    /// Undefined entries of `values` are skipped. With `bindParam`, the
    /// values of the `SET` list bind before those of the filter.
    ///
    /// # Errors
    ///
    /// Fails on unsupported options, when no value is defined, and on
    /// malformed predicates.
    pub fn update_query(
        &self,
        table: impl Into<TableDescriptor>,
        values: &ValueMap,
        where_clause: &Predicate,
        model: Option<&TableModel>,
        options: &UpdateOptions,
    ) -> Result<QueryResult> {
        let operation = Operation::Update;
        self.check_options(operation, options)?;
        if values.is_empty() {
            return Err(QueryGenError::invalid(operation, "no values to update"));
        }
        let table = self.extract_table_details(table);
        let mut binds = self.bind_collector(options.bind_param);
        let assignments: Vec<String> = values
            .defined()
            .map(|(column, value)| format!("{}={}", self.quote_identifier(column), binds.add(value)))
            .collect();
        let condition = where_clause.to_sql(self, operation, &mut binds)?;
        let sql = join_sql_fragments([
            format!("UPDATE {}", self.quote_table(&table)),
            format!("SET {}", comma_list(&assignments)),
            where_fragment(&condition),
        ]);
        let returning = Self::returning_columns(options.returning.as_ref(), model);
        let sql = self.with_returning(operation, sql, returning.as_deref())?;
        Ok(QueryResult::from_collector(self.finish(operation, sql), binds))
    }

    /// Generates an `UPDATE` that adds to or subtracts from columns.
    ///
    /// Each entry of `amounts` becomes `"c"="c" + amount`; entries of
    /// `extra` are plain assignments in the same statement.
    ///
    /// # Errors
    ///
    /// Fails on unsupported options, when no amount is defined, and on
    /// malformed predicates.
    pub fn arithmetic_query(
        &self,
        operator: ArithmeticOperator,
        table: impl Into<TableDescriptor>,
        where_clause: &Predicate,
        amounts: &ValueMap,
        extra: &ValueMap,
        options: &ArithmeticOptions,
    ) -> Result<String> {
        let operation = Operation::Arithmetic;
        self.check_options(operation, options)?;
        if amounts.is_empty() {
            return Err(QueryGenError::invalid(operation, "no column to update"));
        }
        let table = self.extract_table_details(table);
        let mut assignments: Vec<String> = amounts
            .defined()
            .map(|(column, amount)| {
                let column = self.quote_identifier(column);
                format!("{column}={column} {} {}", operator.as_sql(), self.escape(amount))
            })
            .collect();
        assignments.extend(
            extra
                .defined()
                .map(|(column, value)| format!("{}={}", self.quote_identifier(column), self.escape(value))),
        );
        let mut binds = self.bind_collector(None);
        let condition = where_clause.to_sql(self, operation, &mut binds)?;
        let sql = join_sql_fragments([
            format!("UPDATE {}", self.quote_table(&table)),
            format!("SET {}", comma_list(&assignments)),
            where_fragment(&condition),
        ]);
        let returning = Self::returning_columns(options.returning.as_ref(), None);
        let sql = self.with_returning(operation, sql, returning.as_deref())?;
        Ok(self.finish(operation, sql))
    }

    /// Generates a `DELETE`, optionally capped at `limit` rows.
    ///
    /// # Errors
    ///
    /// Fails on unsupported options and on malformed predicates.
    pub fn delete_query(
        &self,
        table: impl Into<TableDescriptor>,
        where_clause: &Predicate,
        model: Option<&TableModel>,
        options: &DeleteOptions,
    ) -> Result<String> {
        let operation = Operation::Delete;
        self.check_options(operation, options)?;
        let table = self.extract_table_details(table);
        let mut binds = self.bind_collector(None);
        let condition = where_clause.to_sql(self, operation, &mut binds)?;
        let sql = match (options.limit, self.kind()) {
            (Some(limit), DialectKind::Postgres) => {
                postgres::delete_with_limit(self, &table, &condition, limit)
            }
            (Some(limit), DialectKind::Db2 | DialectKind::Ibmi) => {
                db2::delete_with_limit(self, &table, &condition, limit)
            }
            _ => join_sql_fragments([
                format!("DELETE FROM {}", self.quote_table(&table)),
                where_fragment(&condition),
            ]),
        };
        let returning = Self::returning_columns(options.returning.as_ref(), model);
        let sql = self.with_returning(operation, sql, returning.as_deref())?;
        Ok(self.finish(operation, sql))
    }

    /// Generates a `SELECT` with the dialect's row limiting syntax.
    ///
    /// # Errors
    ///
    /// Fails on malformed predicates.
    pub fn select_query(
        &self,
        table: impl Into<TableDescriptor>,
        query: &SelectQuery,
    ) -> Result<String> {
        let operation = Operation::Select;
        let table = self.extract_table_details(table);
        let attributes = if query.attributes.is_empty() {
            String::from("*")
        } else {
            self.quote_identifiers(&query.attributes)
        };
        let condition = match &query.where_clause {
            Some(predicate) => {
                let mut binds = self.bind_collector(None);
                predicate.to_sql(self, operation, &mut binds)?
            }
            None => String::new(),
        };
        let order = if query.order.is_empty() {
            String::new()
        } else {
            let keys = query
                .order
                .iter()
                .map(|(column, order)| format!("{} {}", self.quote_identifier(column), order.as_sql()));
            format!("ORDER BY {}", comma_list(keys))
        };
        let (first, second) = match self.dialect.capabilities.limit_style {
            LimitStyle::LimitOffset => (
                query.limit.map(|n| format!("LIMIT {n}")),
                query.offset.map(|n| format!("OFFSET {n}")),
            ),
            LimitStyle::FetchFirst => (
                query.offset.map(|n| format!("OFFSET {n} ROWS")),
                query.limit.map(|n| {
                    let word = if query.offset.is_some() { "NEXT" } else { "FIRST" };
                    format!("FETCH {word} {n} ROWS ONLY")
                }),
            ),
        };
        let sql = join_sql_fragments([
            format!("SELECT {attributes} FROM {}", self.quote_table(&table)),
            where_fragment(&condition),
            order,
            first.unwrap_or_default(),
            second.unwrap_or_default(),
        ]);
        Ok(self.finish(operation, sql))
    }
}
