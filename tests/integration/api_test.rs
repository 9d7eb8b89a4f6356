//! Record endpoints over HTTP

use axum::http::StatusCode;
use chrono::SecondsFormat;
use pretty_assertions::assert_eq;
use serde_json::json;
use vaultkeeper::shared::{Record, RecordKind};

use crate::common::{bearer, tick, TestApp};

#[tokio::test]
async fn test_alice_scenario() {
    let app = TestApp::new().await;

    let registered = app.register("alice", "p1").await;
    let login = app.login("alice", "p1").await;
    assert_eq!(login.status_code(), StatusCode::OK);
    let token = login.json::<vaultkeeper::backend::auth::handlers::AuthResponse>().token;
    let (name, value) = bearer(&token);

    let added = app
        .server
        .post("/api/data/notes")
        .add_header(name.clone(), value.clone())
        .json(&json!({ "id": "n1", "fields": { "data": "hello" } }))
        .await;
    assert_eq!(added.status_code(), StatusCode::CREATED);

    let full = app
        .server
        .get("/api/data/notes")
        .add_header(name.clone(), value.clone())
        .await
        .json::<Vec<Record>>();
    assert_eq!(full.len(), 1);
    assert_eq!(full[0].id, "n1");
    assert_eq!(full[0].kind, RecordKind::Note);
    assert_eq!(full[0].user_id, registered.user_id);
    assert_eq!(full[0].fields["data"], "hello");
    let cursor = full[0].updated_at.to_rfc3339_opts(SecondsFormat::Nanos, true);

    tick().await;
    let deleted = app
        .server
        .delete("/api/data/notes/n1")
        .add_header(name.clone(), value.clone())
        .await;
    assert_eq!(deleted.status_code(), StatusCode::NO_CONTENT);

    let with_tombstones = app
        .server
        .get("/api/data/notes")
        .add_header(name.clone(), value.clone())
        .add_query_param("since", &cursor)
        .add_query_param("include_deleted", true)
        .await
        .json::<Vec<Record>>();
    assert_eq!(with_tombstones.len(), 1);
    assert_eq!(with_tombstones[0].id, "n1");
    assert!(with_tombstones[0].deleted);

    let live = app
        .server
        .get("/api/data/notes")
        .add_header(name, value)
        .add_query_param("since", &cursor)
        .add_query_param("include_deleted", false)
        .await
        .json::<Vec<Record>>();
    assert!(live.is_empty());
}

#[tokio::test]
async fn test_record_crud() {
    let app = TestApp::new().await;
    let auth = app.register("alice", "p1").await;
    let (name, value) = bearer(&auth.token);

    app.server
        .post("/api/data/credential")
        .add_header(name.clone(), value.clone())
        .json(&json!({
            "id": "site",
            "fields": { "login": "alice", "password": "s3cret", "meta_info": "bank" }
        }))
        .await
        .assert_status(StatusCode::CREATED);

    let duplicate = app
        .server
        .post("/api/data/credential")
        .add_header(name.clone(), value.clone())
        .json(&json!({ "id": "site", "fields": {} }))
        .await;
    assert_eq!(duplicate.status_code(), StatusCode::CONFLICT);

    app.server
        .put("/api/data/credential/site")
        .add_header(name.clone(), value.clone())
        .json(&json!({ "fields": { "password": "n3w" } }))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let record = app
        .server
        .get("/api/data/credential/site")
        .add_header(name.clone(), value.clone())
        .await
        .json::<Record>();
    assert_eq!(record.fields["login"], "alice");
    assert_eq!(record.fields["password"], "n3w");
    assert_eq!(record.meta_info, "bank");

    app.server
        .delete("/api/data/credential")
        .add_header(name.clone(), value.clone())
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let gone = app
        .server
        .get("/api/data/credential/site")
        .add_header(name, value)
        .await;
    assert_eq!(gone.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_bad_requests() {
    let app = TestApp::new().await;
    let auth = app.register("alice", "p1").await;
    let (name, value) = bearer(&auth.token);

    let unknown_kind = app
        .server
        .get("/api/data/users")
        .add_header(name.clone(), value.clone())
        .await;
    assert_eq!(unknown_kind.status_code(), StatusCode::BAD_REQUEST);

    let unknown_field = app
        .server
        .post("/api/data/notes")
        .add_header(name.clone(), value.clone())
        .json(&json!({ "id": "n1", "fields": { "data": "x", "owner": "bob" } }))
        .await;
    assert_eq!(unknown_field.status_code(), StatusCode::BAD_REQUEST);

    let reserved_field = app
        .server
        .put("/api/data/notes/n1")
        .add_header(name.clone(), value.clone())
        .json(&json!({ "fields": { "user_id": "someone" } }))
        .await;
    assert_eq!(reserved_field.status_code(), StatusCode::BAD_REQUEST);

    let missing_id = app
        .server
        .post("/api/data/notes")
        .add_header(name.clone(), value.clone())
        .json(&json!({ "fields": { "data": "x" } }))
        .await;
    assert_eq!(missing_id.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(missing_id.json::<serde_json::Value>()["status"], 400);

    // An unencoded `+` in the offset decodes to a space
    let bad_cursor = app
        .server
        .get("/api/data/notes")
        .add_raw_query_param("since=2024-01-01T00:00:00+00:00")
        .add_header(name.clone(), value.clone())
        .await;
    assert_eq!(bad_cursor.status_code(), StatusCode::BAD_REQUEST);
    let body = bad_cursor.json::<serde_json::Value>();
    assert_eq!(body["status"], 400);
    assert!(body["error"].is_string());

    let missing = app
        .server
        .delete("/api/data/notes/nothing")
        .add_header(name, value)
        .await;
    assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(missing.json::<serde_json::Value>()["status"], 404);
}

#[tokio::test]
async fn test_users_only_see_their_own_records() {
    let app = TestApp::new().await;
    let alice = app.register("alice", "p1").await;
    let bob = app.register("bob", "p2").await;
    let (alice_h, alice_v) = bearer(&alice.token);
    let (bob_h, bob_v) = bearer(&bob.token);

    app.server
        .post("/api/data/cards")
        .add_header(alice_h.clone(), alice_v.clone())
        .json(&json!({ "id": "c1", "fields": { "holder": "ALICE" } }))
        .await
        .assert_status(StatusCode::CREATED);

    let bob_list = app
        .server
        .get("/api/data/cards")
        .add_header(bob_h.clone(), bob_v.clone())
        .add_query_param("include_deleted", true)
        .await
        .json::<Vec<Record>>();
    assert!(bob_list.is_empty());

    let bob_get = app
        .server
        .get("/api/data/cards/c1")
        .add_header(bob_h.clone(), bob_v.clone())
        .await;
    assert_eq!(bob_get.status_code(), StatusCode::NOT_FOUND);

    let bob_delete = app
        .server
        .delete("/api/data/cards/c1")
        .add_header(bob_h, bob_v)
        .await;
    assert_eq!(bob_delete.status_code(), StatusCode::NOT_FOUND);

    let alice_list = app
        .server
        .get("/api/data/cards")
        .add_header(alice_h, alice_v)
        .await
        .json::<Vec<Record>>();
    assert_eq!(alice_list.len(), 1);
    assert!(!alice_list[0].deleted);
}

#[tokio::test]
async fn test_health_and_fallback() {
    let app = TestApp::new().await;

    let health = app.server.get("/health").await;
    assert_eq!(health.status_code(), StatusCode::OK);
    assert_eq!(health.json::<serde_json::Value>()["status"], "ok");

    let unknown = app.server.get("/nowhere").await;
    assert_eq!(unknown.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_reports_unavailable_store() {
    let app = TestApp::new().await;
    app.state.store.pool().close().await;

    let health = app.server.get("/health").await;
    assert_eq!(health.status_code(), StatusCode::SERVICE_UNAVAILABLE);
}
