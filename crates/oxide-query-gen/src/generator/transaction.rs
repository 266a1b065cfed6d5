//! Transaction control.

use super::QueryGenerator;
use crate::dialect::{ibmi, DialectKind};
use crate::error::Result;
use crate::fragment::join_sql_fragments;
use crate::operation::Operation;
use crate::options::StartTransactionOptions;
use crate::transaction::IsolationLevel;

impl QueryGenerator {
    /// Generates the statement that opens a transaction.
    ///
    /// # Errors
    ///
    /// Fails on unsupported options, and on Db2, where transactions start
    /// implicitly with the first statement.
    pub fn start_transaction_query(&self, options: &StartTransactionOptions) -> Result<String> {
        let operation = Operation::StartTransaction;
        self.check_options(operation, options)?;
        let sql = match self.kind() {
            DialectKind::Db2 => {
                return Err(self.unsupported(operation, "transactions start implicitly"));
            }
            DialectKind::Ibmi => ibmi::start_transaction(self, options)?,
            DialectKind::Generic | DialectKind::Postgres => {
                let mut modes = Vec::new();
                if let Some(level) = options.isolation_level {
                    modes.push(format!("ISOLATION LEVEL {}", level.as_sql()));
                }
                if options.read_only == Some(true) {
                    modes.push(String::from("READ ONLY"));
                }
                join_sql_fragments([String::from("START TRANSACTION"), modes.join(", ")])
            }
        };
        Ok(self.finish(operation, sql))
    }

    /// Changes the isolation level of the current session or transaction.
    #[must_use]
    pub fn set_isolation_level_query(&self, level: IsolationLevel) -> String {
        let sql = if self.kind().is_db2_family() {
            format!("SET CURRENT ISOLATION = {}", level.db2_code())
        } else {
            format!("SET TRANSACTION ISOLATION LEVEL {}", level.as_sql())
        };
        self.finish(Operation::SetIsolationLevel, sql)
    }

    #[must_use]
    pub fn commit_transaction_query(&self) -> String {
        self.finish(Operation::CommitTransaction, String::from("COMMIT"))
    }

    #[must_use]
    pub fn rollback_transaction_query(&self) -> String {
        self.finish(Operation::RollbackTransaction, String::from("ROLLBACK"))
    }

    /// Generates `SAVEPOINT`. The Db2 family keeps open cursors across a
    /// rollback to the savepoint.
    #[must_use]
    pub fn create_savepoint_query(&self, name: &str) -> String {
        let mut sql = format!("SAVEPOINT {}", self.quote_identifier(name));
        if self.kind().is_db2_family() {
            sql.push_str(" ON ROLLBACK RETAIN CURSORS");
        }
        self.finish(Operation::CreateSavepoint, sql)
    }

    #[must_use]
    pub fn rollback_savepoint_query(&self, name: &str) -> String {
        let sql = format!("ROLLBACK TO SAVEPOINT {}", self.quote_identifier(name));
        self.finish(Operation::RollbackSavepoint, sql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QueryGenError;

    #[test]
    fn test_start_transaction_postgres() {
        let pg = QueryGenerator::new(DialectKind::Postgres);
        assert_eq!(
            pg.start_transaction_query(&StartTransactionOptions::default())
                .unwrap(),
            "START TRANSACTION"
        );
        let options = StartTransactionOptions {
            isolation_level: Some(IsolationLevel::Serializable),
            read_only: Some(true),
        };
        assert_eq!(
            pg.start_transaction_query(&options).unwrap(),
            "START TRANSACTION ISOLATION LEVEL SERIALIZABLE, READ ONLY"
        );
    }

    #[test]
    fn test_start_transaction_db2_family() {
        let db2 = QueryGenerator::new(DialectKind::Db2);
        let err = db2
            .start_transaction_query(&StartTransactionOptions::default())
            .unwrap_err();
        assert!(matches!(err, QueryGenError::UnsupportedOperation { .. }));

        let ibmi = QueryGenerator::new(DialectKind::Ibmi);
        let options = StartTransactionOptions {
            isolation_level: Some(IsolationLevel::ReadCommitted),
            read_only: None,
        };
        assert_eq!(
            ibmi.start_transaction_query(&options).unwrap(),
            "SET TRANSACTION ISOLATION LEVEL READ COMMITTED"
        );
        let read_only = StartTransactionOptions {
            read_only: Some(true),
            ..options
        };
        let err = ibmi.start_transaction_query(&read_only).unwrap_err();
        assert!(matches!(err, QueryGenError::Configuration { .. }));
    }

    #[test]
    fn test_isolation_level() {
        assert_eq!(
            QueryGenerator::new(DialectKind::Db2).set_isolation_level_query(IsolationLevel::RepeatableRead),
            "SET CURRENT ISOLATION = RS"
        );
        assert_eq!(
            QueryGenerator::new(DialectKind::Postgres)
                .set_isolation_level_query(IsolationLevel::RepeatableRead),
            "SET TRANSACTION ISOLATION LEVEL REPEATABLE READ"
        );
    }

    #[test]
    fn test_savepoints() {
        let ibmi = QueryGenerator::new(DialectKind::Ibmi);
        assert_eq!(
            ibmi.create_savepoint_query("sp1"),
            "SAVEPOINT \"sp1\" ON ROLLBACK RETAIN CURSORS"
        );
        let pg = QueryGenerator::new(DialectKind::Postgres);
        assert_eq!(pg.create_savepoint_query("sp1"), "SAVEPOINT \"sp1\"");
        assert_eq!(pg.rollback_savepoint_query("sp1"), "ROLLBACK TO SAVEPOINT \"sp1\"");
        assert_eq!(pg.commit_transaction_query(), "COMMIT");
        assert_eq!(pg.rollback_transaction_query(), "ROLLBACK");
    }
}
