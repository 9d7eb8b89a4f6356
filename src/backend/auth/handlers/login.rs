/**
 * Login Handler
 *
 * `POST /api/auth/login`
 *
 * # Authentication Process
 *
 * 1. Verify the password against the stored value (bcrypt or legacy plaintext)
 * 2. If the stored value was plaintext, replace it with a bcrypt hash
 * 3. Issue a session token
 *
 * Unknown users and wrong passwords produce the same 401.
 */

use axum::{extract::State, response::Json};
use std::sync::Arc;

use crate::backend::auth::credentials::CredentialVerifier;
use crate::backend::auth::handlers::types::{AuthResponse, LoginRequest};
use crate::backend::auth::sessions::TokenIssuer;
use crate::backend::error::{ApiJson, BackendError};

/// Login handler
///
/// A failed password upgrade is logged and does not fail the login; the
/// upgrade is retried on the next successful login.
///
/// # Errors
///
/// * `400 Bad Request` - Empty username or password
/// * `401 Unauthorized` - Unknown user or wrong password
/// * `503 Service Unavailable` - Database unreachable
pub async fn login(
    State(verifier): State<CredentialVerifier>,
    State(tokens): State<Arc<TokenIssuer>>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<AuthResponse>, BackendError> {
    tracing::info!("Login request for: {}", request.username);

    let outcome = verifier
        .verify(&request.username, &request.password)
        .await
        .inspect_err(|e| tracing::warn!("Login failed for {}: {}", request.username, e))?;
    let user_id = outcome.user_id();

    if outcome.needs_upgrade() {
        match verifier.upgrade_password(user_id, &request.password).await {
            Ok(()) => tracing::info!("Upgraded legacy password for {}", request.username),
            Err(e) => tracing::error!(
                "Failed to upgrade legacy password for {}: {}",
                request.username,
                e
            ),
        }
    }

    let token = tokens.issue(user_id)?;

    tracing::info!("User logged in: {} ({})", request.username, user_id);
    Ok(Json(AuthResponse { token, user_id }))
}
