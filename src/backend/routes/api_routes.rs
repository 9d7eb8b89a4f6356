/**
 * API Route Handlers
 *
 * # Routes
 *
 * ## Public
 * - `POST /api/auth/register` - User registration
 * - `POST /api/auth/login` - User login
 * - `GET /api/users/{username}/exists` - Username lookup
 * - `GET /api/users/{username}/id` - User id lookup
 * - `GET /health` - Store connectivity check
 *
 * ## Protected (bearer token)
 * - `POST|GET|DELETE /api/data/{kind}`
 * - `GET|PUT|DELETE /api/data/{kind}/{id}`
 */

use axum::{
    extract::State,
    middleware::from_fn_with_state,
    routing::{get, post},
    Json, Router,
};

use crate::backend::auth::{login, register, user_exists, user_id};
use crate::backend::error::BackendError;
use crate::backend::middleware::auth_middleware;
use crate::backend::records::{
    add_record, clear_records, delete_record, get_record, list_records, update_record,
};
use crate::backend::server::state::AppState;
use crate::backend::store::RecordStore;

/// Configure routes that need no token
pub fn configure_public_routes(router: Router<AppState>) -> Router<AppState> {
    router
        // Authentication endpoints
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        // Login helpers
        .route("/api/users/{username}/exists", get(user_exists))
        .route("/api/users/{username}/id", get(user_id))
        .route("/health", get(health))
}

/// Configure the record routes, all behind the authentication gate
///
/// The gate is applied with `route_layer`, so it only runs for requests that
/// matched one of these routes.
pub fn configure_data_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/api/data/{kind}",
            post(add_record).get(list_records).delete(clear_records),
        )
        .route(
            "/api/data/{kind}/{id}",
            get(get_record).put(update_record).delete(delete_record),
        )
        .route_layer(from_fn_with_state(app_state, auth_middleware))
}

/// Report whether the record store is reachable
pub async fn health(
    State(store): State<RecordStore>,
) -> Result<Json<serde_json::Value>, BackendError> {
    store.ping().await?;
    Ok(Json(serde_json::json!({ "status": "ok" })))
}
