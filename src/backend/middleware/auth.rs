/**
 * Authentication Middleware
 *
 * Protects the `/api/data` routes. The middleware reads a bearer token from
 * the `Authorization` header, verifies it with the server's `TokenIssuer`
 * and attaches the token subject to the request as `AuthenticatedUser`.
 * Handlers learn the caller only through that extension.
 *
 * Every failure, whether the header is missing, malformed, or the token is
 * invalid, expired or signed differently, produces the same 401. The reason
 * is logged once; the token itself never is.
 */

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderValue},
    middleware::Next,
    response::Response,
};
use thiserror::Error;

use crate::backend::auth::sessions::{TokenError, TokenIssuer};
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;
use crate::shared::UserId;

/// Caller identity resolved from a verified token
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
}

/// Why a request was not authenticated
#[derive(Debug, Error)]
pub enum GateFailure {
    #[error("missing Authorization header")]
    MissingHeader,
    #[error("Authorization header is not a bearer token")]
    MalformedHeader,
    #[error(transparent)]
    Token(#[from] TokenError),
}

/// Resolve the caller from an `Authorization` header value
pub fn authenticate(
    tokens: &TokenIssuer,
    header: Option<&HeaderValue>,
) -> Result<AuthenticatedUser, GateFailure> {
    let header = header.ok_or(GateFailure::MissingHeader)?;
    let value = header.to_str().map_err(|_| GateFailure::MalformedHeader)?;

    let token = value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(GateFailure::MalformedHeader)?;

    let user_id = tokens.verify(token)?;
    Ok(AuthenticatedUser { user_id })
}

/// Authentication middleware
///
/// Returns 401 Unauthorized if the token is missing or invalid.
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, BackendError> {
    let user = authenticate(&app_state.tokens, request.headers().get(AUTHORIZATION))
        .map_err(|reason| {
            tracing::warn!(
                method = %request.method(),
                path = %request.uri().path(),
                "Rejected request: {}",
                reason
            );
            BackendError::Unauthenticated
        })?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Axum extractor for the authenticated user
///
/// Only valid on routes behind `auth_middleware`.
#[derive(Clone, Copy, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl AuthUser {
    pub fn user_id(&self) -> UserId {
        self.0.user_id
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .copied()
            .ok_or_else(|| {
                tracing::warn!("AuthenticatedUser not found in request extensions");
                BackendError::Unauthenticated
            })?;

        Ok(AuthUser(user))
    }
}
