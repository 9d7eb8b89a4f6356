/**
 * User Lookup Handlers
 *
 * Public helpers used by clients before login:
 * - `GET /api/users/{username}/exists`
 * - `GET /api/users/{username}/id`
 */

use axum::{
    extract::{Path, State},
    response::Json,
};

use crate::backend::auth::handlers::types::{ExistsResponse, UserIdResponse};
use crate::backend::error::BackendError;
use crate::backend::store::RecordStore;

/// Whether a username is registered
pub async fn user_exists(
    State(store): State<RecordStore>,
    Path(username): Path<String>,
) -> Result<Json<ExistsResponse>, BackendError> {
    let exists = store.exists(&username).await?;
    Ok(Json(ExistsResponse { exists }))
}

/// Id of an active user
///
/// # Errors
///
/// * `404 Not Found` - No active user with this name
pub async fn user_id(
    State(store): State<RecordStore>,
    Path(username): Path<String>,
) -> Result<Json<UserIdResponse>, BackendError> {
    let user_id = store.get_user_id(&username).await?;
    Ok(Json(UserIdResponse { user_id }))
}
