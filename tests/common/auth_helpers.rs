//! Authentication and HTTP test helpers

use axum::http::{header::AUTHORIZATION, HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::json;
use vaultkeeper::backend::auth::handlers::AuthResponse;
use vaultkeeper::backend::routes::create_router;
use vaultkeeper::backend::server::config::connect_in_memory;
use vaultkeeper::backend::server::{AppState, ServerConfig};

pub const TEST_SIGNING_KEY: &str = "integration-test-signing-key";

/// Config for tests: in-memory database, cheapest bcrypt cost
pub fn test_config() -> ServerConfig {
    ServerConfig::builder()
        .database_url("sqlite::memory:")
        .jwt_signing_key(TEST_SIGNING_KEY)
        .bcrypt_cost(4)
        .build()
        .expect("Failed to build test config")
}

/// A running router plus direct access to its state
pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
}

impl TestApp {
    pub async fn new() -> Self {
        let config = test_config();
        let pool = connect_in_memory()
            .await
            .expect("Failed to create in-memory database");
        let state = AppState::new(&config, pool);
        let server =
            TestServer::new(create_router(state.clone())).expect("Failed to start test server");
        Self { server, state }
    }

    /// Register a user and return the token response
    pub async fn register(&self, username: &str, password: &str) -> AuthResponse {
        let response = self
            .server
            .post("/api/auth/register")
            .json(&json!({ "username": username, "password": password }))
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
        response.json::<AuthResponse>()
    }

    pub async fn login(&self, username: &str, password: &str) -> axum_test::TestResponse {
        self.server
            .post("/api/auth/login")
            .json(&json!({ "username": username, "password": password }))
            .await
    }
}

/// `Authorization` header for a bearer token
pub fn bearer(token: &str) -> (HeaderName, HeaderValue) {
    (
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", token)).expect("Invalid header value"),
    )
}
