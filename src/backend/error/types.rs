/**
 * Backend Error Types
 *
 * `BackendError` is the error every HTTP handler returns. Lower layers keep
 * their own typed errors (`StoreError`, `AuthError`, `TokenError`,
 * `SharedError`); the `From` impls below decide which HTTP class each one
 * falls into.
 *
 * # Error Categories
 *
 * | Variant            | Status |
 * |--------------------|--------|
 * | `Validation`       | 400    |
 * | `Unauthenticated`  | 401    |
 * | `NotFound`         | 404    |
 * | `DuplicateUser`    | 409    |
 * | `Conflict`         | 409    |
 * | `StoreUnavailable` | 503    |
 * | `Internal`         | 500    |
 */

use axum::http::StatusCode;
use thiserror::Error;

use crate::backend::auth::credentials::AuthError;
use crate::backend::auth::sessions::TokenError;
use crate::backend::store::StoreError;
use crate::shared::SharedError;

/// Backend-specific error types
#[derive(Debug, Error)]
pub enum BackendError {
    /// Caller input was rejected before reaching storage
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Duplicate user: {message}")]
    DuplicateUser { message: String },

    /// A live record already uses the entry id
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// Missing, invalid or expired token, or bad credentials
    ///
    /// Carries no detail. Every authentication failure looks the same to the
    /// client.
    #[error("Unauthenticated")]
    Unauthenticated,

    /// The backing store could not be reached; the request may be retried
    #[error("Store unavailable: {message}")]
    StoreUnavailable { message: String },

    /// Hashing, signing or unexpected database failures
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl BackendError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::DuplicateUser { .. } | Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::StoreUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message sent to the client
    ///
    /// Internal and store failures are reported generically; their detail
    /// only goes to the log.
    pub fn message(&self) -> String {
        match self {
            Self::Validation { message }
            | Self::NotFound { message }
            | Self::DuplicateUser { message }
            | Self::Conflict { message } => message.clone(),
            Self::Unauthenticated => "unauthenticated".to_string(),
            Self::StoreUnavailable { .. } => "store unavailable, retry later".to_string(),
            Self::Internal { .. } => "internal server error".to_string(),
        }
    }
}

impl From<SharedError> for BackendError {
    fn from(err: SharedError) -> Self {
        Self::validation(err.to_string())
    }
}

impl From<StoreError> for BackendError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(message) => Self::Validation { message },
            StoreError::NotFound(message) => Self::NotFound { message },
            StoreError::Duplicate(message) => Self::Conflict { message },
            StoreError::Unavailable(err) => Self::StoreUnavailable {
                message: err.to_string(),
            },
            StoreError::Backend(err) => Self::internal(err.to_string()),
        }
    }
}

impl From<AuthError> for BackendError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidInput(message) => Self::validation(message),
            AuthError::DuplicateUser(name) => Self::DuplicateUser {
                message: format!("user '{}' already exists", name),
            },
            AuthError::InvalidCredentials => Self::Unauthenticated,
            AuthError::Hashing(err) => Self::internal(err.to_string()),
            AuthError::Store(err) => err.into(),
        }
    }
}

impl From<TokenError> for BackendError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Signing(err) => Self::internal(err.to_string()),
            _ => Self::Unauthenticated,
        }
    }
}
