/**
 * Authentication Handler Types
 *
 * Request and response bodies for the auth and user-lookup endpoints.
 */

use serde::{Deserialize, Serialize};

use crate::shared::UserId;

/// Registration request
#[derive(Deserialize, Serialize, Debug)]
pub struct RegisterRequest {
    pub username: String,
    /// Plain password; hashed before storage
    pub password: String,
}

/// Login request
#[derive(Deserialize, Serialize, Debug)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Auth response
///
/// Returned by register and login. The token goes into the
/// `Authorization: Bearer` header of every `/api/data` request.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AuthResponse {
    pub token: String,
    pub user_id: UserId,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExistsResponse {
    pub exists: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserIdResponse {
    pub user_id: UserId,
}
