#![allow(dead_code)]

use oxide_query_gen::{DialectKind, QueryGenError, QueryGenerator};

pub const ALL_DIALECTS: [DialectKind; 4] = [
    DialectKind::Generic,
    DialectKind::Postgres,
    DialectKind::Db2,
    DialectKind::Ibmi,
];

pub fn generic() -> QueryGenerator {
    QueryGenerator::new(DialectKind::Generic)
}

pub fn postgres() -> QueryGenerator {
    QueryGenerator::new(DialectKind::Postgres)
}

pub fn db2() -> QueryGenerator {
    QueryGenerator::new(DialectKind::Db2)
}

pub fn ibmi() -> QueryGenerator {
    QueryGenerator::new(DialectKind::Ibmi)
}

/// Asserts a configuration error listing exactly `expected` keys.
pub fn assert_rejected_keys<T: std::fmt::Debug>(
    result: Result<T, QueryGenError>,
    expected: &[&str],
) {
    match result {
        Err(QueryGenError::Configuration { keys, .. }) => assert_eq!(keys, expected),
        other => panic!("Expected configuration error for {expected:?}, got {other:?}"),
    }
}

/// Asserts an unsupported-operation error whose reason contains `needle`.
pub fn assert_unsupported<T: std::fmt::Debug>(result: Result<T, QueryGenError>, needle: &str) {
    match result {
        Err(QueryGenError::UnsupportedOperation { reason, .. }) => assert!(
            reason.contains(needle),
            "Reason {reason:?} does not mention {needle:?}"
        ),
        other => panic!("Expected unsupported operation, got {other:?}"),
    }
}

pub fn assert_invalid<T: std::fmt::Debug>(result: Result<T, QueryGenError>) {
    match result {
        Err(QueryGenError::InvalidInput { .. }) => {}
        other => panic!("Expected invalid input, got {other:?}"),
    }
}
