//! # oxide-query-gen
//!
//! Cross-dialect SQL generation for PostgreSQL, IBM Db2 and Db2 for i.
//!
//! One [`QueryGenerator`] per dialect turns structured requests (create
//! this table, insert these rows, list those constraints) into SQL text.
//! It never talks to a database. What it guarantees is that the text
//! fits the dialect's grammar, or fails with a typed error when the
//! dialect cannot express the request:
//!
//! - options a dialect does not support are rejected by name, never
//!   silently ignored
//! - identifiers are quoted and string literals escaped the dialect's way
//! - values can be inlined or lifted out as positional bind parameters
//!
//! ## Generating DDL
//!
//! ```rust
//! use oxide_query_gen::{DialectKind, IndexDescriptor, QueryGenerator};
//! use oxide_query_gen::options::AddIndexOptions;
//!
//! let pg = QueryGenerator::new(DialectKind::Postgres);
//! let index = IndexDescriptor::new(["first_name", "last_name"]);
//! let sql = pg
//!     .add_index_query("users", &index, &AddIndexOptions::default())
//!     .unwrap();
//! assert_eq!(
//!     sql,
//!     "CREATE INDEX \"users_first_name_last_name\" ON \"users\" (\"first_name\", \"last_name\")"
//! );
//! ```
//!
//! ## Binding values
//!
//! ```rust
//! use oxide_query_gen::{DialectKind, Predicate, QueryGenerator, ValueMap};
//! use oxide_query_gen::options::UpdateOptions;
//!
//! let db2 = QueryGenerator::new(DialectKind::Db2);
//! let options = UpdateOptions {
//!     bind_param: Some(true),
//!     ..UpdateOptions::default()
//! };
//! let result = db2
//!     .update_query(
//!         "users",
//!         &ValueMap::new().set("name", "'; DROP TABLE users; --"),
//!         &Predicate::eq("id", 1_i64),
//!         None,
//!         &options,
//!     )
//!     .unwrap();
//! assert_eq!(result.query(), "UPDATE \"users\" SET \"name\"=? WHERE \"id\" = ?");
//! assert_eq!(result.bind_parameters().len(), 2);
//! ```

pub mod bind;
pub mod column;
pub mod config;
pub mod constraint;
pub mod dialect;
pub mod error;
pub mod escape;
pub mod fragment;
pub mod generator;
pub mod index;
pub mod operation;
pub mod options;
pub mod predicate;
pub mod result;
pub mod table;
pub mod transaction;
pub mod validate;
pub mod value;

pub use column::{ColumnChange, ColumnDefinition, DataType, DefaultChange, ForeignKeyAction};
pub use config::GeneratorConfig;
pub use constraint::{ConstraintDescriptor, ConstraintType, Deferrable, TableConstraint};
pub use dialect::{Dialect, DialectKind};
pub use error::{QueryGenError, Result};
pub use generator::{ArithmeticOperator, QueryGenerator, SelectQuery};
pub use index::{IndexDescriptor, IndexField, IndexMethod, IndexName, SortOrder};
pub use operation::Operation;
pub use options::Returning;
pub use predicate::{Predicate, WhereOperator};
pub use result::QueryResult;
pub use table::{TableDescriptor, TableModel};
pub use transaction::IsolationLevel;
pub use value::{SqlValue, ToSqlValue, ValueMap};
