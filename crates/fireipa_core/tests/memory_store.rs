use fireipa_core::{
    document_from_json, CollectionRef, DocumentData, DocumentRef, MemoryStore, StoreError, Value,
};
use serde_json::json;

fn doc(value: serde_json::Value) -> DocumentData {
    document_from_json(value).unwrap()
}

#[tokio::test]
async fn set_replaces_and_update_merges() {
    let store = MemoryStore::new();
    let users = store.collection("users");
    let alice = users.doc("alice");

    alice
        .set(doc(json!({"name": "Alice", "age": 30})))
        .await
        .unwrap();
    alice.update(doc(json!({"age": 31}))).await.unwrap();

    let loaded = alice.get().await.unwrap().unwrap();
    assert_eq!(loaded["name"], Value::from("Alice"));
    assert_eq!(loaded["age"], Value::Integer(31));

    alice.set(doc(json!({"nickname": "Al"}))).await.unwrap();
    let replaced = alice.get().await.unwrap().unwrap();
    assert_eq!(replaced.len(), 1);
    assert_eq!(replaced["nickname"], Value::from("Al"));
}

#[tokio::test]
async fn update_of_missing_document_fails_with_path() {
    let store = MemoryStore::new();
    let err = store
        .collection("users")
        .doc("ghost")
        .update(doc(json!({"age": 1})))
        .await
        .unwrap_err();

    assert_eq!(err, StoreError::NotFound("users/ghost".to_string()));
}

#[tokio::test]
async fn get_enumerates_in_id_order() {
    let store = MemoryStore::new();
    let users = store.collection("users");
    for id in ["carol", "alice", "bob"] {
        users
            .doc(id)
            .set(doc(json!({"name": id})))
            .await
            .unwrap();
    }

    let ids: Vec<String> = users
        .get()
        .await
        .unwrap()
        .into_iter()
        .map(|snapshot| snapshot.id)
        .collect();
    assert_eq!(ids, vec!["alice", "bob", "carol"]);
}

#[tokio::test]
async fn add_generates_distinct_ids() {
    let store = MemoryStore::new();
    let logs = store.collection("logs");

    let first = logs.add(doc(json!({"line": 1}))).await.unwrap();
    let second = logs.add(doc(json!({"line": 2}))).await.unwrap();

    assert_ne!(first, second);
    assert_eq!(store.document_count("logs").await, 2);
    assert_eq!(
        store.document(&format!("logs/{first}")).await.unwrap()["line"],
        Value::Integer(1)
    );
}

#[tokio::test]
async fn sub_collections_are_addressed_under_parent_path() {
    let store = MemoryStore::new();
    let posts = store.collection("users").doc("alice").collection("posts");
    assert_eq!(posts.path(), "users/alice/posts");

    posts
        .doc("p1")
        .set(doc(json!({"title": "hello"})))
        .await
        .unwrap();

    assert!(store.document("users/alice/posts/p1").await.is_some());
    assert_eq!(store.document_count("users").await, 0);
}

#[tokio::test]
async fn invalid_segments_fail_every_operation() {
    let store = MemoryStore::new();

    let reserved = store.collection("__internal__");
    assert!(matches!(
        reserved.get().await,
        Err(StoreError::InvalidPath(_))
    ));

    let bad_doc = store.collection("users").doc("a/b");
    assert!(matches!(
        bad_doc.set(doc(json!({"x": 1}))).await,
        Err(StoreError::InvalidPath(_))
    ));
    assert!(matches!(
        bad_doc.collection("posts").add(doc(json!({"x": 1}))).await,
        Err(StoreError::InvalidPath(_))
    ));
}
