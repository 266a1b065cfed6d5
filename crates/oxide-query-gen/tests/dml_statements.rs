//! Reads, writes and transaction control across dialects.

mod common;
use common::*;

use oxide_query_gen::options::{DeleteOptions, Returning, StartTransactionOptions, UpdateOptions};
use oxide_query_gen::{
    ArithmeticOperator, IsolationLevel, Predicate, SelectQuery, SortOrder, ValueMap, WhereOperator,
};
use pretty_assertions::assert_eq;

#[test]
fn update_with_read_back() {
    let options = UpdateOptions {
        returning: Some(Returning::All(true)),
        ..UpdateOptions::default()
    };
    let values = ValueMap::new().set("active", false);
    let filter = Predicate::compare("age", WhereOperator::Gte, 65);
    assert_eq!(
        postgres()
            .update_query("users", &values, &filter, None, &options)
            .unwrap()
            .query(),
        "UPDATE \"users\" SET \"active\"=FALSE WHERE \"age\" >= 65 RETURNING *"
    );
    assert_eq!(
        ibmi()
            .update_query("users", &values, &filter, None, &options)
            .unwrap()
            .query(),
        "SELECT * FROM FINAL TABLE (UPDATE \"users\" SET \"active\"=0 WHERE \"age\" >= 65)"
    );
    assert_rejected_keys(
        generic().update_query("users", &values, &filter, None, &options),
        &["returning"],
    );
}

#[test]
fn increment_counters() {
    let sql = postgres()
        .arithmetic_query(
            ArithmeticOperator::Add,
            "posts",
            &Predicate::eq("id", 3),
            &ValueMap::new().set("views", 1).set("score", 2.5),
            &ValueMap::new(),
            &Default::default(),
        )
        .unwrap();
    assert_eq!(
        sql,
        "UPDATE \"posts\" SET \"views\"=\"views\" + 1, \"score\"=\"score\" + 2.5 WHERE \"id\" = 3"
    );
}

#[test]
fn delete_everything_or_some() {
    assert_eq!(
        generic()
            .delete_query("logs", &Predicate::all(), None, &DeleteOptions::default())
            .unwrap(),
        "DELETE FROM \"logs\""
    );
    let options = DeleteOptions {
        limit: Some(5),
        returning: Some(Returning::Columns(vec![String::from("id")])),
    };
    assert_eq!(
        postgres()
            .delete_query("logs", &Predicate::eq("level", "debug"), None, &options)
            .unwrap(),
        "DELETE FROM \"logs\" WHERE ctid IN (SELECT ctid FROM \"logs\" WHERE \"level\" = 'debug' LIMIT 5) RETURNING \"id\""
    );
}

#[test]
fn select_page() {
    let query = SelectQuery::new()
        .where_clause(Predicate::eq("active", true))
        .order_by("id", SortOrder::Desc)
        .limit(20)
        .offset(40);
    assert_eq!(
        ibmi().select_query("users", &query).unwrap(),
        "SELECT * FROM \"users\" WHERE \"active\" = 1 ORDER BY \"id\" DESC OFFSET 40 ROWS FETCH NEXT 20 ROWS ONLY"
    );
}

#[test]
fn truth_test_on_smallint_booleans() {
    let query =
        SelectQuery::new().where_clause(Predicate::compare("active", WhereOperator::Is, true));
    assert_eq!(
        ibmi().select_query("t", &query).unwrap(),
        "SELECT * FROM \"t\" WHERE \"active\" = 1"
    );
    assert_eq!(
        db2().select_query("t", &query).unwrap(),
        "SELECT * FROM \"t\" WHERE \"active\" IS TRUE"
    );
}

#[test]
fn transaction_lifecycle() {
    let pg = postgres();
    let options = StartTransactionOptions {
        isolation_level: Some(IsolationLevel::RepeatableRead),
        read_only: None,
    };
    let statements = [
        pg.start_transaction_query(&options).unwrap(),
        pg.create_savepoint_query("before_import"),
        pg.rollback_savepoint_query("before_import"),
        pg.commit_transaction_query(),
    ];
    assert_eq!(
        statements,
        [
            String::from("START TRANSACTION ISOLATION LEVEL REPEATABLE READ"),
            String::from("SAVEPOINT \"before_import\""),
            String::from("ROLLBACK TO SAVEPOINT \"before_import\""),
            String::from("COMMIT"),
        ]
    );

    let db2 = db2();
    assert_eq!(
        db2.set_isolation_level_query(IsolationLevel::Serializable),
        "SET CURRENT ISOLATION = RR"
    );
    assert_rejected_keys(db2.start_transaction_query(&options), &["isolationLevel"]);
}
