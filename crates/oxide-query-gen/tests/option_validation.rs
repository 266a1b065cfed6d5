//! Option keys outside a dialect's supported set are rejected by name.

mod common;
use common::*;

use oxide_query_gen::options::{
    DropTableOptions, InsertOptions, RemoveIndexOptions, TruncateTableOptions,
};
use oxide_query_gen::{Operation, ValueMap};
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn false_flags_are_still_rejected() {
    let options = DropTableOptions {
        cascade: Some(false),
        if_exists: None,
    };
    assert_rejected_keys(db2().drop_table_query("users", &options), &["cascade"]);
    assert!(ibmi().drop_table_query("users", &options).is_ok());
}

#[test]
fn every_offending_key_is_reported() {
    let options = RemoveIndexOptions {
        cascade: Some(true),
        concurrently: Some(true),
        if_exists: Some(true),
    };
    for generator in [db2(), ibmi(), generic()] {
        assert_rejected_keys(
            generator.remove_index_query("users", "users_name", &options),
            &["cascade", "concurrently", "ifExists"],
        );
    }
}

#[test]
fn rejection_message_names_operation_and_dialect() {
    let options = TruncateTableOptions {
        cascade: Some(true),
        restart_identity: None,
    };
    let err = ibmi().truncate_table_query("users", &options).unwrap_err();
    assert_eq!(
        err.to_string(),
        "truncateTableQuery does not support the following options in dialect ibmi: cascade"
    );
}

#[test]
fn validation_runs_before_input_checks() {
    let options = InsertOptions {
        exception: Some(true),
        ..InsertOptions::default()
    };
    assert_rejected_keys(
        db2().bulk_insert_query("users", &[ValueMap::new()], None, &options),
        &["exception"],
    );
}

#[test]
fn defaults_pass_everywhere() {
    for kind in ALL_DIALECTS {
        let generator = oxide_query_gen::QueryGenerator::new(kind);
        assert!(generator
            .drop_table_query("users", &DropTableOptions::default())
            .is_ok());
        assert!(generator
            .insert_query("users", &ValueMap::new().set("a", 1), None, &InsertOptions::default())
            .is_ok());
    }
}

#[test]
fn json_options_are_validated_like_typed_ones() {
    let pg = postgres();
    let parsed: DropTableOptions = pg
        .parse_options(Operation::DropTable, &json!({"cascade": true, "ifExists": null}))
        .unwrap();
    assert_eq!(parsed.cascade, Some(true));
    assert_eq!(parsed.if_exists, None);

    assert_rejected_keys(
        pg.parse_options::<DropTableOptions>(
            Operation::DropTable,
            &json!({"cascade": true, "purge": true}),
        ),
        &["purge"],
    );
    assert_rejected_keys(
        generic().parse_options::<InsertOptions>(
            Operation::Insert,
            &json!({"returning": ["id"], "upsertKeys": ["email"], "bindParam": true}),
        ),
        &["returning", "upsertKeys"],
    );
    assert_invalid(pg.parse_options::<DropTableOptions>(
        Operation::DropTable,
        &json!({"cascade": "yes"}),
    ));
    assert_invalid(pg.parse_options::<DropTableOptions>(Operation::DropTable, &json!([1])));
}
