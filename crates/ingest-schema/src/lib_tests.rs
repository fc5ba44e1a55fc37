// SPDX-License-Identifier: MIT

use super::*;
use serde_json::json;

fn app(s: &str) -> ApplicationId {
    ApplicationId::new(s).expect("valid id")
}

#[test]
fn missing_schema_is_not_found() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = SchemaStore::new(dir.path());
    let err = store.validate(&app("a"), &json!({}));
    assert!(matches!(err, Err(SchemaError::NotFound(_))));
}

#[test]
fn malformed_schema_fails_to_compile() {
    let dir = tempfile::tempdir().expect("tempdir");
    let app_id = app("a");
    write_schema(dir.path(), &app_id, &json!({"type": "not-a-real-type"}))
        .expect("write schema");
    let store = SchemaStore::new(dir.path());
    let err = store.validate(&app_id, &json!({}));
    assert!(matches!(err, Err(SchemaError::Compile { .. })));
}

#[test]
fn compiled_schema_is_cached_across_calls() {
    let dir = tempfile::tempdir().expect("tempdir");
    let app_id = app("a");
    write_schema(
        dir.path(),
        &app_id,
        &json!({"type": "object", "required": ["name"]}),
    )
    .expect("write schema");
    let store = SchemaStore::new(dir.path());
    assert!(store.validate(&app_id, &json!({"name": "x"})).is_ok());

    // Even if the file is removed, the cached validator still answers.
    std::fs::remove_file(dir.path().join("a.schema.json")).expect("remove schema");
    assert!(store.validate(&app_id, &json!({"name": "y"})).is_ok());
}

#[yare::parameterized(
    missing_required_field = { json!({}), false },
    satisfies_required_field = { json!({"name": "svc"}), true },
    wrong_type_for_field = { json!({"name": 1}), false },
)]
fn schema_validation_cases(instance: serde_json::Value, expect_valid: bool) {
    let dir = tempfile::tempdir().expect("tempdir");
    let app_id = app("a");
    write_schema(
        dir.path(),
        &app_id,
        &json!({
            "type": "object",
            "required": ["name"],
            "properties": { "name": { "type": "string" } },
        }),
    )
    .expect("write schema");
    let store = SchemaStore::new(dir.path());
    assert_eq!(store.validate(&app_id, &instance).is_ok(), expect_valid);
}

#[test]
fn precompile_surfaces_errors_without_an_instance() {
    let dir = tempfile::tempdir().expect("tempdir");
    let app_id = app("a");
    write_schema(dir.path(), &app_id, &json!({"type": "object"})).expect("write schema");
    let store = SchemaStore::new(dir.path());
    assert!(store.precompile(&app_id).is_ok());
}
