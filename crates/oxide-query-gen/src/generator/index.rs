//! Index DDL and introspection.

use super::QueryGenerator;
use crate::dialect::{db2, ibmi, postgres, DialectKind, IncludeSupport};
use crate::error::{QueryGenError, Result};
use crate::fragment::{comma_list, join_sql_fragments, when, when_set};
use crate::index::{derive_index_name, IndexDescriptor, IndexField, IndexName};
use crate::operation::Operation;
use crate::options::{AddIndexOptions, RemoveIndexOptions};
use crate::table::TableDescriptor;

impl QueryGenerator {
    /// Rejects index features the dialect lacks.
    fn check_index_capabilities(&self, index: &IndexDescriptor) -> Result<()> {
        let operation = Operation::AddIndex;
        let caps = &self.dialect.capabilities.index;
        if !index.include.is_empty() {
            match caps.include {
                IncludeSupport::None => {
                    return Err(self.unsupported(operation, "INCLUDE columns are not available"));
                }
                IncludeSupport::UniqueOnly if !index.unique => {
                    return Err(self.unsupported(
                        operation,
                        "non-unique indexes cannot have INCLUDE columns",
                    ));
                }
                IncludeSupport::UniqueOnly | IncludeSupport::All => {}
            }
        }
        for field in &index.fields {
            match field {
                IndexField::Expression(_) if !caps.expressions => {
                    return Err(self.unsupported(operation, "expression fields are not available"));
                }
                IndexField::Column {
                    operator_class: Some(_),
                    ..
                } if !caps.operator_class => {
                    return Err(self.unsupported(operation, "operator classes are not available"));
                }
                _ => {}
            }
        }
        if index.using.is_some() && !caps.using {
            return Err(self.unsupported(operation, "index methods (USING) are not available"));
        }
        if index.where_clause.is_some() && !caps.partial {
            return Err(self.unsupported(operation, "partial indexes are not available"));
        }
        Ok(())
    }

    /// Quotes an index name, schema-scoped on dialects that scope index
    /// names by schema.
    fn quote_index_name(&self, table: &TableDescriptor, name: &str, scoped: bool) -> String {
        if scoped {
            self.escaper.quote_scoped(self.index_schema(table), name)
        } else {
            self.quote_identifier(name)
        }
    }

    fn index_field(&self, field: &IndexField) -> String {
        match field {
            IndexField::Column {
                name,
                order,
                operator_class,
            } => join_sql_fragments([
                self.quote_identifier(name),
                operator_class.clone().unwrap_or_default(),
                order.map(|o| String::from(o.as_sql())).unwrap_or_default(),
            ]),
            IndexField::Expression(sql) => sql.clone(),
        }
    }

    /// Generates `CREATE INDEX`.
    ///
    /// An unnamed index is named by [`derive_index_name`], the same
    /// derivation [`remove_index_query`](Self::remove_index_query) uses
    /// for a field list.
    ///
    /// # Errors
    ///
    /// Fails on unsupported options, on index features the dialect lacks
    /// and on an unnamed index with expression fields.
    pub fn add_index_query(
        &self,
        table: impl Into<TableDescriptor>,
        index: &IndexDescriptor,
        options: &AddIndexOptions,
    ) -> Result<String> {
        let operation = Operation::AddIndex;
        self.check_options(operation, options)?;
        if index.fields.is_empty() {
            return Err(QueryGenError::invalid(operation, "an index needs at least one field"));
        }
        self.check_index_capabilities(index)?;
        let table = self.extract_table_details(table);

        let name = match &index.name {
            Some(name) => name.clone(),
            None => {
                let columns = index
                    .fields
                    .iter()
                    .map(IndexField::column_name)
                    .collect::<Option<Vec<_>>>()
                    .ok_or_else(|| {
                        QueryGenError::invalid(
                            operation,
                            "an index with expression fields needs an explicit name",
                        )
                    })?;
                derive_index_name(&table.table_name, &columns)
            }
        };
        let scoped = self.dialect.capabilities.index.schema_qualified_name;

        let where_clause = match &index.where_clause {
            Some(predicate) => {
                let mut binds = self.bind_collector(None);
                let condition = predicate.to_sql(self, operation, &mut binds)?;
                if condition.is_empty() {
                    String::new()
                } else {
                    format!("WHERE {condition}")
                }
            }
            None => String::new(),
        };

        let sql = join_sql_fragments([
            String::from("CREATE"),
            String::from(when(index.unique, "UNIQUE")),
            String::from("INDEX"),
            String::from(when_set(options.concurrently, "CONCURRENTLY")),
            String::from(when_set(options.if_not_exists, "IF NOT EXISTS")),
            self.quote_index_name(&table, &name, scoped),
            format!("ON {}", self.quote_table(&table)),
            index
                .using
                .map(|method| format!("USING {}", method.as_sql()))
                .unwrap_or_default(),
            format!("({})", comma_list(index.fields.iter().map(|f| self.index_field(f)))),
            if index.include.is_empty() {
                String::new()
            } else {
                format!("INCLUDE ({})", self.quote_identifiers(&index.include))
            },
            where_clause,
        ]);
        Ok(self.finish(operation, sql))
    }

    /// Generates `DROP INDEX`, by name or by the field list the index was
    /// created with.
    ///
    /// # Errors
    ///
    /// Fails on unsupported options, on an empty field list, and on
    /// `concurrently` combined with `cascade`.
    pub fn remove_index_query(
        &self,
        table: impl Into<TableDescriptor>,
        index: impl Into<IndexName>,
        options: &RemoveIndexOptions,
    ) -> Result<String> {
        let operation = Operation::RemoveIndex;
        self.check_options(operation, options)?;
        if options.concurrently == Some(true) && options.cascade == Some(true) {
            return Err(self.unsupported(operation, "CONCURRENTLY cannot be combined with CASCADE"));
        }
        let table = self.extract_table_details(table);
        let name = match index.into() {
            IndexName::Name(name) => name,
            IndexName::Fields(fields) if fields.is_empty() => {
                return Err(QueryGenError::invalid(operation, "no index name or fields given"));
            }
            IndexName::Fields(fields) => derive_index_name(&table.table_name, &fields),
        };
        let sql = join_sql_fragments([
            "DROP INDEX",
            when_set(options.concurrently, "CONCURRENTLY"),
            when_set(options.if_exists, "IF EXISTS"),
            &self.quote_index_name(&table, &name, true),
            when_set(options.cascade, "CASCADE"),
        ]);
        Ok(self.finish(operation, sql))
    }

    /// Lists the indexes of a table.
    ///
    /// # Errors
    ///
    /// Fails on dialects without an index catalog.
    pub fn show_indexes_query(&self, table: impl Into<TableDescriptor>) -> Result<String> {
        let operation = Operation::ShowIndexes;
        let table = self.extract_table_details(table);
        let sql = match self.kind() {
            DialectKind::Postgres => postgres::show_indexes(self, &table),
            DialectKind::Db2 => db2::show_indexes(self, &table),
            DialectKind::Ibmi => ibmi::show_indexes(self, &table),
            DialectKind::Generic => {
                return Err(self.unsupported(operation, "there is no standard index catalog"));
            }
        };
        Ok(self.finish(operation, sql))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{IndexMethod, SortOrder};
    use crate::predicate::Predicate;

    #[test]
    fn test_auto_named_index_scenario_a() {
        let pg = QueryGenerator::new(DialectKind::Postgres);
        let index = IndexDescriptor::new(["first_name", "last_name"]);
        assert_eq!(
            pg.add_index_query("users", &index, &AddIndexOptions::default())
                .unwrap(),
            "CREATE INDEX \"users_first_name_last_name\" ON \"users\" (\"first_name\", \"last_name\")"
        );
        assert_eq!(
            pg.remove_index_query("users", &["first_name", "last_name"][..], &RemoveIndexOptions::default())
                .unwrap(),
            "DROP INDEX \"users_first_name_last_name\""
        );
    }

    #[test]
    fn test_non_unique_include_scenario_b() {
        let db2 = QueryGenerator::new(DialectKind::Db2);
        let index = IndexDescriptor::new(["username"])
            .name("user_username")
            .include(["first_name", "last_name"]);
        let err = db2
            .add_index_query("users", &index, &AddIndexOptions::default())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "addIndexQuery is not supported by dialect db2: non-unique indexes cannot have INCLUDE columns"
        );

        let unique = index.unique();
        assert_eq!(
            db2.add_index_query(("APP", "users"), &unique, &AddIndexOptions::default())
                .unwrap(),
            "CREATE UNIQUE INDEX \"APP\".\"user_username\" ON \"APP\".\"users\" (\"username\") INCLUDE (\"first_name\", \"last_name\")"
        );
    }

    #[test]
    fn test_postgres_index_features() {
        let pg = QueryGenerator::new(DialectKind::Postgres);
        let index = IndexDescriptor::new([
            IndexField::column("name")
                .operator_class("varchar_pattern_ops")
                .order(SortOrder::Desc),
            IndexField::expression("lower(email)"),
        ])
        .name("users_search")
        .using(IndexMethod::BTree)
        .where_clause(Predicate::eq("active", true));
        let options = AddIndexOptions {
            concurrently: Some(true),
            if_not_exists: Some(true),
        };
        assert_eq!(
            pg.add_index_query("users", &index, &options).unwrap(),
            "CREATE INDEX CONCURRENTLY IF NOT EXISTS \"users_search\" ON \"users\" USING BTREE \
             (\"name\" varchar_pattern_ops DESC, lower(email)) WHERE \"active\" = TRUE"
        );

        let generic = QueryGenerator::new(DialectKind::Generic);
        assert!(generic
            .add_index_query("users", &index, &AddIndexOptions::default())
            .is_err());
    }

    #[test]
    fn test_expression_index_needs_name() {
        let db2 = QueryGenerator::new(DialectKind::Db2);
        let index = IndexDescriptor::new([IndexField::expression("UPPER(name)")]);
        let err = db2
            .add_index_query("users", &index, &AddIndexOptions::default())
            .unwrap_err();
        assert!(matches!(err, QueryGenError::InvalidInput { .. }));
    }

    #[test]
    fn test_remove_index_by_name_scenario_d() {
        let pg = QueryGenerator::new(DialectKind::Postgres);
        let options = RemoveIndexOptions {
            if_exists: Some(true),
            ..RemoveIndexOptions::default()
        };
        assert_eq!(
            pg.remove_index_query(("app", "users"), "unique_names", &options)
                .unwrap(),
            "DROP INDEX IF EXISTS \"app\".\"unique_names\""
        );
        let both = RemoveIndexOptions {
            cascade: Some(true),
            concurrently: Some(true),
            if_exists: None,
        };
        assert!(pg.remove_index_query("users", "unique_names", &both).is_err());
    }

    #[test]
    fn test_show_indexes() {
        let ibmi = QueryGenerator::new(DialectKind::Ibmi);
        let sql = ibmi.show_indexes_query(("APP", "users")).unwrap();
        assert!(sql.starts_with("SELECT i.INDEX_NAME AS \"name\""));
        assert!(sql.contains("WHERE i.TABLE_NAME = 'users' AND i.TABLE_SCHEMA = 'APP'"));
        assert!(QueryGenerator::new(DialectKind::Generic)
            .show_indexes_query("users")
            .is_err());
    }

    #[test]
    fn test_show_indexes_separates_include_columns() {
        let pg = QueryGenerator::new(DialectKind::Postgres);
        let sql = pg.show_indexes_query("users").unwrap();
        assert!(sql.contains("ix.indkey[:ix.indnkeyatts - 1] AS \"indkey\""));
        assert!(sql.contains("ix.indkey[ix.indnkeyatts:] AS \"includeFields\""));
        assert!(sql.contains("a.attnum = ANY(ix.indkey)"));
    }
}
