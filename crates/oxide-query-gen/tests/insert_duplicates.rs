//! Duplicate handling on insert: ON CONFLICT, MERGE and the exception
//! wrapper.

mod common;
use common::*;

use oxide_query_gen::options::{InsertOptions, Returning};
use oxide_query_gen::{ColumnDefinition, DataType, SqlValue, TableModel, ValueMap};
use pretty_assertions::assert_eq;

fn users() -> TableModel {
    TableModel::new(
        "users",
        vec![
            ColumnDefinition::new("id", DataType::Integer)
                .primary_key()
                .auto_increment(),
            ColumnDefinition::new("email", DataType::Varchar(Some(120))).unique(),
            ColumnDefinition::new("name", DataType::Text),
        ],
    )
}

#[test]
fn ignore_and_update_are_mutually_exclusive() {
    let options = InsertOptions {
        ignore_duplicates: Some(true),
        update_on_duplicate: Some(vec![String::from("name")]),
        ..InsertOptions::default()
    };
    let values = ValueMap::new().set("id", 1).set("name", "ann");
    for generator in [postgres(), db2(), ibmi()] {
        assert_invalid(generator.insert_query("users", &values, Some(&users()), &options));
    }
}

#[test]
fn generic_has_no_duplicate_handling() {
    let options = InsertOptions {
        ignore_duplicates: Some(true),
        ..InsertOptions::default()
    };
    assert_rejected_keys(
        generic().insert_query("users", &ValueMap::new().set("id", 1), None, &options),
        &["ignoreDuplicates"],
    );
}

#[test]
fn bulk_upsert_on_postgres() {
    let rows = vec![
        ValueMap::new().set("email", "a@x.io").set("name", "ann"),
        ValueMap::new().set("email", "b@x.io").set("name", "bob"),
    ];
    let options = InsertOptions {
        bind_param: Some(true),
        update_on_duplicate: Some(vec![String::from("name")]),
        upsert_keys: Some(vec![String::from("email")]),
        returning: Some(Returning::Columns(vec![String::from("id")])),
        ..InsertOptions::default()
    };
    let result = postgres()
        .bulk_insert_query("users", &rows, Some(&users()), &options)
        .unwrap();
    assert_eq!(
        result.query(),
        "INSERT INTO \"users\" (\"email\", \"name\") VALUES ($1, $2), ($3, $4) \
         ON CONFLICT (\"email\") DO UPDATE SET \"name\"=EXCLUDED.\"name\" RETURNING \"id\""
    );
    assert_eq!(result.bind_parameters().len(), 4);
}

#[test]
fn bulk_ignore_as_merge_on_db2() {
    let rows = vec![
        ValueMap::new().set("id", 1).set("name", "ann"),
        ValueMap::new().set("id", 2).set("name", "bob"),
    ];
    let options = InsertOptions {
        ignore_duplicates: Some(true),
        ..InsertOptions::default()
    };
    assert_eq!(
        db2()
            .bulk_insert_query("users", &rows, Some(&users()), &options)
            .unwrap()
            .query(),
        "MERGE INTO \"users\" AS \"target\" USING (VALUES (1, 'ann'), (2, 'bob')) AS \"source\" (\"id\", \"name\") \
         ON \"target\".\"id\" = \"source\".\"id\" \
         WHEN NOT MATCHED THEN INSERT (\"id\", \"name\") VALUES (\"source\".\"id\", \"source\".\"name\")"
    );
}

#[test]
fn ignore_without_conflict_target_is_a_plain_insert() {
    let options = InsertOptions {
        ignore_duplicates: Some(true),
        ..InsertOptions::default()
    };
    let values = ValueMap::new().set("name", "ann");
    assert_eq!(
        ibmi()
            .insert_query("users", &values, None, &options)
            .unwrap()
            .query(),
        "INSERT INTO \"users\" (\"name\") VALUES ('ann')"
    );
}

#[test]
fn merge_needs_every_key_inserted() {
    let options = InsertOptions {
        ignore_duplicates: Some(true),
        upsert_keys: Some(vec![String::from("email"), String::from("name")]),
        ..InsertOptions::default()
    };
    let values = ValueMap::new().set("email", "a@x.io");
    assert_invalid(db2().insert_query("users", &values, None, &options));
}

#[test]
fn merge_rejects_mixed_default_cells() {
    let rows = vec![
        ValueMap::new().set("email", "a@x.io").set("name", "ann"),
        ValueMap::new().set("email", "b@x.io"),
    ];
    let options = InsertOptions {
        upsert_keys: Some(vec![String::from("email")]),
        update_on_duplicate: Some(vec![String::from("name")]),
        ..InsertOptions::default()
    };
    assert_unsupported(
        db2().bulk_insert_query("users", &rows, None, &options),
        "name",
    );
}

#[test]
fn exception_wrapper_is_self_cleaning() {
    let options = InsertOptions {
        exception: Some(true),
        ..InsertOptions::default()
    };
    let values = ValueMap::new().set("email", "$func_$").set("name", "ann");
    let sql = postgres()
        .insert_query("users", &values, Some(&users()), &options)
        .unwrap()
        .query()
        .to_string();
    let statements: Vec<&str> = sql.split("; ").collect();
    assert!(statements[0].starts_with("CREATE OR REPLACE FUNCTION pg_temp.testfunc("));
    assert!(sql.contains(
        "SELECT (testfunc.response).*, testfunc.caught_exception FROM pg_temp.testfunc()"
    ));
    assert_eq!(statements.last(), Some(&"DROP FUNCTION IF EXISTS pg_temp.testfunc()"));
    assert!(sql.contains("EXCEPTION WHEN unique_violation"));
}

#[test]
fn exception_delimiter_is_fresh_per_call() {
    let options = InsertOptions {
        exception: Some(true),
        ..InsertOptions::default()
    };
    let values = ValueMap::new().set("name", "ann");
    let delimiter = |sql: &str| -> String {
        let start = sql.find("$func_").unwrap();
        let end = sql[start + 1..].find('$').unwrap() + start + 2;
        sql[start..end].to_string()
    };
    let pg = postgres();
    let first = pg.insert_query("users", &values, None, &options).unwrap();
    let second = pg.insert_query("users", &values, None, &options).unwrap();
    let first = delimiter(first.query());
    let second = delimiter(second.query());
    assert_eq!(first.len(), "$func_$".len() + 32);
    assert_ne!(first, second);
}

#[test]
fn exception_rejects_read_back_and_bulk() {
    let options = InsertOptions {
        exception: Some(true),
        returning: Some(Returning::All(true)),
        ..InsertOptions::default()
    };
    let values = ValueMap::new().set("name", "ann");
    assert_unsupported(
        postgres().insert_query("users", &values, None, &options),
        "returning",
    );
    let plain = InsertOptions {
        exception: Some(true),
        ..InsertOptions::default()
    };
    assert_unsupported(
        postgres().bulk_insert_query("users", &[values], None, &plain),
        "single-row",
    );
}

#[test]
fn explicit_default_and_expressions_stay_inline() {
    let values = ValueMap::new()
        .set("name", SqlValue::Default)
        .set("created_at", SqlValue::function("NOW", vec![]))
        .set("email", "a@x.io");
    let options = InsertOptions {
        bind_param: Some(true),
        ..InsertOptions::default()
    };
    let result = db2().insert_query("users", &values, None, &options).unwrap();
    assert_eq!(
        result.query(),
        "INSERT INTO \"users\" (\"name\", \"created_at\", \"email\") VALUES (DEFAULT, NOW(), ?)"
    );
    assert_eq!(
        result.bind_parameters(),
        &[SqlValue::Text(String::from("a@x.io"))]
    );
}
