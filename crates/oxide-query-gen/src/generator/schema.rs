//! Database and schema management, listings, version.

use super::QueryGenerator;
use crate::dialect::{db2, generic, ibmi, postgres, DialectKind};
use crate::error::Result;
use crate::fragment::{join_sql_fragments, when_set};
use crate::operation::Operation;
use crate::options::{
    CreateDatabaseOptions, CreateSchemaOptions, DropDatabaseOptions, DropSchemaOptions,
    ListDatabasesOptions, ListSchemasOptions, ListTablesOptions,
};

impl QueryGenerator {
    fn require_databases(&self, operation: Operation) -> Result<()> {
        if self.dialect.capabilities.databases {
            Ok(())
        } else {
            Err(self.unsupported(operation, "databases cannot be managed through SQL"))
        }
    }

    /// Generates `CREATE DATABASE`.
    ///
    /// # Errors
    ///
    /// Fails on unsupported options, or when the dialect cannot create
    /// databases.
    pub fn create_database_query(
        &self,
        name: &str,
        options: &CreateDatabaseOptions,
    ) -> Result<String> {
        let operation = Operation::CreateDatabase;
        self.check_options(operation, options)?;
        self.require_databases(operation)?;
        Ok(self.finish(operation, postgres::create_database(self, name, options)))
    }

    /// Generates `DROP DATABASE`.
    ///
    /// # Errors
    ///
    /// Fails on unsupported options, or when the dialect cannot drop
    /// databases.
    pub fn drop_database_query(&self, name: &str, options: &DropDatabaseOptions) -> Result<String> {
        let operation = Operation::DropDatabase;
        self.check_options(operation, options)?;
        self.require_databases(operation)?;
        Ok(self.finish(operation, postgres::drop_database(self, name, options)))
    }

    /// Lists user databases, excluding the technical ones.
    ///
    /// # Errors
    ///
    /// Fails on unsupported options, or when the dialect has no database
    /// catalog.
    pub fn list_databases_query(&self, options: &ListDatabasesOptions) -> Result<String> {
        let operation = Operation::ListDatabases;
        self.check_options(operation, options)?;
        self.require_databases(operation)?;
        let skip = options.skip.as_deref().unwrap_or_default();
        Ok(self.finish(operation, postgres::list_databases(self, skip)))
    }

    /// Generates `CREATE SCHEMA`.
    ///
    /// # Errors
    ///
    /// Fails on unsupported options.
    pub fn create_schema_query(&self, name: &str, options: &CreateSchemaOptions) -> Result<String> {
        let operation = Operation::CreateSchema;
        self.check_options(operation, options)?;
        let authorization = options
            .authorization
            .as_ref()
            .map(|role| format!("AUTHORIZATION {}", self.quote_identifier(role)))
            .unwrap_or_default();
        let sql = join_sql_fragments([
            "CREATE SCHEMA",
            when_set(options.if_not_exists, "IF NOT EXISTS"),
            &self.quote_identifier(name),
            &authorization,
        ]);
        Ok(self.finish(operation, sql))
    }

    /// Generates `DROP SCHEMA`.
    ///
    /// # Errors
    ///
    /// Fails on unsupported options.
    pub fn drop_schema_query(&self, name: &str, options: &DropSchemaOptions) -> Result<String> {
        let operation = Operation::DropSchema;
        self.check_options(operation, options)?;
        let sql = match self.kind() {
            DialectKind::Db2 => db2::drop_schema(self, name),
            DialectKind::Ibmi => ibmi::drop_schema(self, name, options),
            DialectKind::Generic | DialectKind::Postgres => join_sql_fragments([
                "DROP SCHEMA",
                when_set(options.if_exists, "IF EXISTS"),
                &self.quote_identifier(name),
                when_set(options.cascade, "CASCADE"),
            ]),
        };
        Ok(self.finish(operation, sql))
    }

    /// Lists user schemas, excluding the technical ones and `skip`.
    ///
    /// # Errors
    ///
    /// Fails on unsupported options.
    pub fn list_schemas_query(&self, options: &ListSchemasOptions) -> Result<String> {
        let operation = Operation::ListSchemas;
        self.check_options(operation, options)?;
        let skip = options.skip.as_deref().unwrap_or_default();
        let sql = match self.kind() {
            DialectKind::Db2 => db2::list_schemas(self, skip),
            DialectKind::Ibmi => ibmi::list_schemas(self, skip),
            DialectKind::Generic | DialectKind::Postgres => join_sql_fragments([
                String::from("SELECT schema_name AS \"schema\" FROM information_schema.schemata"),
                format!("WHERE {}", self.schema_exclusion("schema_name", skip)),
                String::from("ORDER BY schema_name"),
            ]),
        };
        Ok(self.finish(operation, sql))
    }

    /// Lists base tables, of one schema or of every user schema.
    ///
    /// # Errors
    ///
    /// Fails on unsupported options.
    pub fn list_tables_query(&self, options: &ListTablesOptions) -> Result<String> {
        let operation = Operation::ListTables;
        self.check_options(operation, options)?;
        let schema = options.schema.as_deref();
        let sql = match self.kind() {
            DialectKind::Db2 => db2::list_tables(self, schema),
            DialectKind::Ibmi => ibmi::list_tables(self, schema),
            DialectKind::Generic | DialectKind::Postgres => {
                let filter = schema.map_or_else(
                    || self.schema_exclusion("table_schema", &[]),
                    |schema| format!("table_schema = {}", self.escape_str(schema)),
                );
                join_sql_fragments([
                    String::from(
                        "SELECT table_schema AS \"schema\", table_name AS \"tableName\" FROM information_schema.tables",
                    ),
                    format!("WHERE table_type = 'BASE TABLE' AND {filter}"),
                    String::from("ORDER BY table_schema, table_name"),
                ])
            }
        };
        Ok(self.finish(operation, sql))
    }

    /// Reads the server version, aliased `version`.
    #[must_use]
    pub fn version_query(&self) -> String {
        let sql = match self.kind() {
            DialectKind::Generic => generic::VERSION_QUERY,
            DialectKind::Postgres => postgres::VERSION_QUERY,
            DialectKind::Db2 => db2::VERSION_QUERY,
            DialectKind::Ibmi => ibmi::VERSION_QUERY,
        };
        self.finish(Operation::Version, String::from(sql))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QueryGenError;

    #[test]
    fn test_create_database_postgres() {
        let pg = QueryGenerator::new(DialectKind::Postgres);
        let options = CreateDatabaseOptions {
            encoding: Some(String::from("UTF8")),
            template: Some(String::from("template0")),
            ..CreateDatabaseOptions::default()
        };
        assert_eq!(
            pg.create_database_query("shop", &options).unwrap(),
            "CREATE DATABASE \"shop\" ENCODING = 'UTF8' TEMPLATE = \"template0\""
        );
    }

    #[test]
    fn test_databases_unsupported_on_db2() {
        let db2 = QueryGenerator::new(DialectKind::Db2);
        let err = db2
            .create_database_query("shop", &CreateDatabaseOptions::default())
            .unwrap_err();
        assert!(matches!(err, QueryGenError::UnsupportedOperation { .. }));

        let options = DropDatabaseOptions {
            if_exists: Some(true),
        };
        let err = db2.drop_database_query("shop", &options).unwrap_err();
        assert!(matches!(err, QueryGenError::Configuration { .. }));
    }

    #[test]
    fn test_list_databases_skips_technical() {
        let pg = QueryGenerator::new(DialectKind::Postgres);
        let options = ListDatabasesOptions {
            skip: Some(vec![String::from("scratch")]),
        };
        assert_eq!(
            pg.list_databases_query(&options).unwrap(),
            "SELECT datname AS \"name\" FROM pg_database WHERE datistemplate = false \
             AND datname NOT IN ('postgres', 'template0', 'template1', 'scratch') ORDER BY datname"
        );
    }

    #[test]
    fn test_create_schema() {
        let pg = QueryGenerator::new(DialectKind::Postgres);
        let options = CreateSchemaOptions {
            if_not_exists: Some(true),
            authorization: Some(String::from("admin")),
            ..CreateSchemaOptions::default()
        };
        assert_eq!(
            pg.create_schema_query("app", &options).unwrap(),
            "CREATE SCHEMA IF NOT EXISTS \"app\" AUTHORIZATION \"admin\""
        );
        let ibmi = QueryGenerator::new(DialectKind::Ibmi);
        assert!(ibmi.create_schema_query("app", &options).is_err());
    }

    #[test]
    fn test_drop_schema_per_dialect() {
        let options = DropSchemaOptions {
            cascade: Some(true),
            if_exists: None,
        };
        let pg = QueryGenerator::new(DialectKind::Postgres);
        assert_eq!(
            pg.drop_schema_query("app", &options).unwrap(),
            "DROP SCHEMA \"app\" CASCADE"
        );
        let db2 = QueryGenerator::new(DialectKind::Db2);
        assert_eq!(
            db2.drop_schema_query("app", &DropSchemaOptions::default())
                .unwrap(),
            "DROP SCHEMA \"app\" RESTRICT"
        );
        assert!(db2.drop_schema_query("app", &options).is_err());
    }

    #[test]
    fn test_list_tables_of_schema() {
        let db2 = QueryGenerator::new(DialectKind::Db2);
        let options = ListTablesOptions {
            schema: Some(String::from("APP")),
        };
        assert_eq!(
            db2.list_tables_query(&options).unwrap(),
            "SELECT TRIM(TABSCHEMA) AS \"schema\", TABNAME AS \"tableName\" FROM SYSCAT.TABLES \
             WHERE TYPE = 'T' AND TABSCHEMA = 'APP' ORDER BY TABSCHEMA, TABNAME"
        );
    }

    #[test]
    fn test_version_query() {
        assert_eq!(
            QueryGenerator::new(DialectKind::Postgres).version_query(),
            "SHOW SERVER_VERSION"
        );
    }
}
