use fireipa_core::{
    document_from_json, validate, DocumentData, FieldIssue, RuntimeKind, Schema, TypeTag,
    ValidationError, Value,
};
use serde_json::json;

fn person_schema() -> Schema {
    Schema::from_json(&json!({"name": "string", "age": "number"})).unwrap()
}

fn doc(value: serde_json::Value) -> DocumentData {
    document_from_json(value).unwrap()
}

#[test]
fn result_keys_always_equal_schema_keys() {
    let schema = person_schema();
    let inputs = [
        json!({"name": "Alice", "age": 30}),
        json!({"name": "Alice", "extra": true}),
        json!({"age": 30, "nickname": "Al", "tags": ["a"]}),
    ];

    for input in inputs {
        let document = validate(&schema, &doc(input)).into_result().unwrap();
        let keys: Vec<&str> = document.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["age", "name"]);
    }
}

#[test]
fn empty_input_is_rejected_for_non_empty_schema() {
    let report = validate(&person_schema(), &DocumentData::new());

    assert_eq!(
        report.outcome.unwrap_err(),
        ValidationError::NoFieldSurvived { fields: 2 }
    );
    assert!(report
        .diagnostics
        .iter()
        .all(|diagnostic| diagnostic.issue == FieldIssue::Missing));
}

#[test]
fn matching_document_passes_through_unchanged() {
    let schema = Schema::new()
        .field("name", TypeTag::String)
        .field("age", TypeTag::Integer)
        .field("score", TypeTag::Double)
        .field("active", TypeTag::Boolean)
        .field("tags", TypeTag::Array)
        .field("profile", TypeTag::Map);
    let input = doc(json!({
        "name": "Alice",
        "age": 30,
        "score": 9.5,
        "active": true,
        "tags": ["admin"],
        "profile": {"city": "Paris"},
        "ignored": "dropped"
    }));

    let report = validate(&schema, &input);
    assert!(report.diagnostics.is_empty());

    let mut expected = input.clone();
    expected.remove("ignored");
    assert_eq!(report.into_result().unwrap().into_inner(), expected);
}

#[test]
fn truthy_mismatch_is_passed_through_without_coercion() {
    let report = validate(&person_schema(), &doc(json!({"name": "Alice", "age": "30"})));

    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.diagnostics[0].field, "age");
    assert_eq!(
        report.diagnostics[0].issue,
        FieldIssue::KindMismatch {
            expected: RuntimeKind::Number,
            actual: RuntimeKind::String,
            passed_through: true,
        }
    );

    let document = report.into_result().unwrap();
    assert_eq!(document["name"], Value::from("Alice"));
    assert_eq!(document["age"], Value::from("30"));
}

#[test]
fn falsy_mismatch_is_replaced_with_null() {
    let schema = Schema::new()
        .field("title", TypeTag::String)
        .field("count", TypeTag::String)
        .field("label", TypeTag::Number)
        .field("flag", TypeTag::String);
    let input = doc(json!({"title": "kept", "count": 0, "label": "", "flag": false}));

    let report = validate(&schema, &input);
    let document = report.outcome.clone().unwrap();
    assert_eq!(document["title"], Value::from("kept"));
    assert_eq!(document["count"], Value::Null);
    assert_eq!(document["label"], Value::Null);
    assert_eq!(document["flag"], Value::Null);
    assert_eq!(
        report
            .diagnostics
            .iter()
            .filter(|diagnostic| matches!(
                diagnostic.issue,
                FieldIssue::KindMismatch {
                    passed_through: false,
                    ..
                }
            ))
            .count(),
        3
    );
}

#[test]
fn document_of_only_falsy_mismatches_is_rejected() {
    let schema = Schema::new().field("name", TypeTag::String);
    let report = validate(&schema, &doc(json!({"name": 0})));
    assert!(!report.is_valid());
}

#[test]
fn value_spelled_tags_validate_like_short_tags() {
    let schema = Schema::from_json(&json!({
        "name": "stringValue",
        "visits": "integerValue",
        "home": "geoPointValue"
    }))
    .unwrap();
    let mut input = doc(json!({"name": "Alice", "visits": 3}));
    input.insert(
        "home".to_string(),
        Value::GeoPoint(fireipa_core::GeoPoint {
            latitude: 48.85,
            longitude: 2.35,
        }),
    );

    let report = validate(&schema, &input);
    assert!(report.diagnostics.is_empty());
    assert!(report.is_valid());
}

#[test]
fn empty_bytes_mismatch_is_treated_like_empty_string() {
    let schema = Schema::new().field("n", TypeTag::Number);

    let from_bytes = validate(
        &schema,
        &DocumentData::from([("n".to_string(), Value::Bytes(Vec::new()))]),
    );
    let from_string = validate(&schema, &doc(json!({"n": ""})));

    assert!(!from_bytes.is_valid());
    assert!(!from_string.is_valid());
    assert_eq!(
        from_bytes.diagnostics[0].issue,
        FieldIssue::KindMismatch {
            expected: RuntimeKind::Number,
            actual: RuntimeKind::String,
            passed_through: false,
        }
    );
}
