/**
 * Register Handler
 *
 * `POST /api/auth/register`
 *
 * # Registration Process
 *
 * 1. Reject empty username or password
 * 2. Refuse a username that is already taken
 * 3. Hash the password with bcrypt and create the user
 * 4. Issue a session token
 */

use axum::{extract::State, http::StatusCode, response::Json};
use std::sync::Arc;

use crate::backend::auth::credentials::CredentialVerifier;
use crate::backend::auth::handlers::types::{AuthResponse, RegisterRequest};
use crate::backend::auth::sessions::TokenIssuer;
use crate::backend::error::{ApiJson, BackendError};

/// Register handler
///
/// # Errors
///
/// * `400 Bad Request` - Empty username or password
/// * `409 Conflict` - Username already registered
/// * `503 Service Unavailable` - Database unreachable
/// * `500 Internal Server Error` - Hashing or token signing failed
///
/// # Example Request
///
/// ```http
/// POST /api/auth/register HTTP/1.1
/// Content-Type: application/json
///
/// {"username": "alice", "password": "p1"}
/// ```
pub async fn register(
    State(verifier): State<CredentialVerifier>,
    State(tokens): State<Arc<TokenIssuer>>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), BackendError> {
    tracing::info!("Register request for username: {}", request.username);

    let user_id = verifier
        .register(&request.username, &request.password)
        .await
        .inspect_err(|e| tracing::warn!("Registration of {} failed: {}", request.username, e))?;

    let token = tokens.issue(user_id)?;

    tracing::info!("User registered: {} ({})", request.username, user_id);
    Ok((StatusCode::CREATED, Json(AuthResponse { token, user_id })))
}
