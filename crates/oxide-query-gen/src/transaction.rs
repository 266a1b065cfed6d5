//! Transaction isolation levels.

use serde::{Deserialize, Serialize};

/// SQL transaction isolation level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IsolationLevel {
    /// Dirty reads allowed.
    ReadUncommitted,
    /// Only committed rows are visible.
    ReadCommitted,
    /// Rows read once stay stable.
    RepeatableRead,
    /// Full serializability.
    Serializable,
}

impl IsolationLevel {
    /// Returns the ANSI spelling.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::ReadUncommitted => "READ UNCOMMITTED",
            Self::ReadCommitted => "READ COMMITTED",
            Self::RepeatableRead => "REPEATABLE READ",
            Self::Serializable => "SERIALIZABLE",
        }
    }

    /// Returns the DB2 isolation code.
    ///
    /// DB2 names levels by locking behavior: ANSI repeatable read is DB2
    /// read stability, ANSI serializable is DB2 repeatable read.
    #[must_use]
    pub const fn db2_code(self) -> &'static str {
        match self {
            Self::ReadUncommitted => "UR",
            Self::ReadCommitted => "CS",
            Self::RepeatableRead => "RS",
            Self::Serializable => "RR",
        }
    }
}
