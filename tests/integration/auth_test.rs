//! Registration, login and the authentication gate over HTTP

use axum::http::{header::AUTHORIZATION, HeaderValue, StatusCode};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::json;
use vaultkeeper::backend::auth::credentials::{classify, StoredPassword};
use vaultkeeper::backend::auth::handlers::AuthResponse;
use vaultkeeper::backend::auth::sessions::{Claims, TokenIssuer};
use vaultkeeper::backend::auth::users::{create_legacy_user, get_user_by_id};
use vaultkeeper::shared::UserId;

use crate::common::{bearer, TestApp, TEST_SIGNING_KEY};

#[tokio::test]
async fn test_register_returns_usable_token() {
    let app = TestApp::new().await;
    let auth = app.register("alice", "p1").await;

    assert_eq!(app.state.tokens.verify(&auth.token).unwrap(), auth.user_id);

    let (name, value) = bearer(&auth.token);
    let response = app.server.get("/api/data/notes").add_header(name, value).await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_register_duplicate_user() {
    let app = TestApp::new().await;
    let first = app.register("alice", "p1").await;

    let response = app
        .server
        .post("/api/auth/register")
        .json(&json!({ "username": "alice", "password": "other" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);

    // The first account still logs in with its own password
    let login = app.login("alice", "p1").await;
    assert_eq!(login.status_code(), StatusCode::OK);
    assert_eq!(login.json::<AuthResponse>().user_id, first.user_id);
    assert_eq!(app.login("alice", "other").await.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_empty_input() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/api/auth/register")
        .json(&json!({ "username": "", "password": "p1" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = app
        .server
        .post("/api/auth/register")
        .json(&json!({ "username": "alice", "password": "" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_failures_look_the_same() {
    let app = TestApp::new().await;
    app.register("alice", "p1").await;

    let wrong_password = app.login("alice", "nope").await;
    let unknown_user = app.login("mallory", "p1").await;

    assert_eq!(wrong_password.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.text(), unknown_user.text());
}

#[tokio::test]
async fn test_legacy_login_upgrades_password() {
    let app = TestApp::new().await;
    let pool = app.state.store.pool();
    let legacy = create_legacy_user(pool, "bob", "hunter2").await.unwrap();

    let response = app.login("bob", "hunter2").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<AuthResponse>().user_id, legacy.id);

    let stored = get_user_by_id(pool, legacy.id).await.unwrap().unwrap();
    assert_eq!(classify(&stored.password), StoredPassword::Hashed);
    assert!(bcrypt::verify("hunter2", &stored.password).unwrap());

    // Second login goes through the hashed path
    assert_eq!(app.login("bob", "hunter2").await.status_code(), StatusCode::OK);
    assert_eq!(app.login("bob", "hunter3").await.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_gate_rejects_missing_and_bad_tokens_uniformly() {
    let app = TestApp::new().await;

    let missing = app.server.get("/api/data/notes").await;
    assert_eq!(missing.status_code(), StatusCode::UNAUTHORIZED);

    let (name, value) = bearer("not.a.token");
    let garbage = app.server.get("/api/data/notes").add_header(name, value).await;
    assert_eq!(garbage.status_code(), StatusCode::UNAUTHORIZED);

    let basic = app
        .server
        .get("/api/data/notes")
        .add_header(AUTHORIZATION, HeaderValue::from_static("Basic YWxpY2U6cDE="))
        .await;
    assert_eq!(basic.status_code(), StatusCode::UNAUTHORIZED);

    assert_eq!(missing.text(), garbage.text());
    assert_eq!(missing.text(), basic.text());
}

#[tokio::test]
async fn test_gate_rejects_other_algorithm() {
    let app = TestApp::new().await;
    let auth = app.register("alice", "p1").await;

    let now = chrono::Utc::now().timestamp();
    let claims = Claims { sub: auth.user_id, iat: now, exp: Some(now + 600) };
    // Well-formed and signed with the server key, but not HS256
    let token = encode(
        &Header::new(Algorithm::HS512),
        &claims,
        &EncodingKey::from_secret(TEST_SIGNING_KEY.as_bytes()),
    )
    .unwrap();

    let (name, value) = bearer(&token);
    let response = app.server.get("/api/data/notes").add_header(name, value).await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_gate_rejects_foreign_key() {
    let app = TestApp::new().await;
    let foreign = TokenIssuer::from_secret(b"someone-elses-key", None);
    let token = foreign.issue(UserId::new()).unwrap();

    let (name, value) = bearer(&token);
    let response = app.server.get("/api/data/notes").add_header(name, value).await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_gate_rejects_expired_token() {
    let app = TestApp::new().await;
    let auth = app.register("alice", "p1").await;

    let now = chrono::Utc::now().timestamp();
    let expired = app
        .state
        .tokens
        .sign(&Claims { sub: auth.user_id, iat: now - 120, exp: Some(now - 60) })
        .unwrap();

    let (name, value) = bearer(&expired);
    let response = app.server.get("/api/data/notes").add_header(name, value).await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_user_lookups() {
    let app = TestApp::new().await;
    let auth = app.register("alice", "p1").await;

    let exists = app.server.get("/api/users/alice/exists").await;
    assert_eq!(exists.status_code(), StatusCode::OK);
    assert_eq!(exists.json::<serde_json::Value>()["exists"], true);

    let missing = app.server.get("/api/users/bob/exists").await;
    assert_eq!(missing.json::<serde_json::Value>()["exists"], false);

    let id = app.server.get("/api/users/alice/id").await;
    assert_eq!(id.status_code(), StatusCode::OK);
    assert_eq!(
        id.json::<serde_json::Value>()["user_id"],
        json!(auth.user_id.to_string())
    );

    let unknown = app.server.get("/api/users/bob/id").await;
    assert_eq!(unknown.status_code(), StatusCode::NOT_FOUND);
}
