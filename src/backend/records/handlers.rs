//! Record HTTP Handlers
//!
//! Every handler here runs behind `auth_middleware`. The owner of every
//! record touched is the `AuthUser` resolved from the token; no handler reads
//! a user from the path or body. The `{kind}` path segment is parsed into a
//! `RecordKind` before the store is called.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::types::{AddRecordRequest, SyncParams, UpdateRecordRequest};
use crate::backend::error::{ApiJson, ApiQuery, BackendError};
use crate::backend::middleware::AuthUser;
use crate::backend::store::RecordStore;
use crate::shared::{Record, RecordKind};

fn parse_kind(kind: &str) -> Result<RecordKind, BackendError> {
    Ok(kind.parse::<RecordKind>()?)
}

/// Add a record
pub async fn add_record(
    State(store): State<RecordStore>,
    user: AuthUser,
    Path(kind): Path<String>,
    ApiJson(request): ApiJson<AddRecordRequest>,
) -> Result<StatusCode, BackendError> {
    let kind = parse_kind(&kind)?;
    store
        .add(kind, user.user_id(), &request.id, &request.fields)
        .await?;
    Ok(StatusCode::CREATED)
}

/// Update fields of a live record
pub async fn update_record(
    State(store): State<RecordStore>,
    user: AuthUser,
    Path((kind, id)): Path<(String, String)>,
    ApiJson(request): ApiJson<UpdateRecordRequest>,
) -> Result<StatusCode, BackendError> {
    let kind = parse_kind(&kind)?;
    store
        .update(kind, user.user_id(), &id, &request.fields)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Soft-delete a record
pub async fn delete_record(
    State(store): State<RecordStore>,
    user: AuthUser,
    Path((kind, id)): Path<(String, String)>,
) -> Result<StatusCode, BackendError> {
    let kind = parse_kind(&kind)?;
    store.delete(kind, user.user_id(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Fetch one record, including a tombstone
pub async fn get_record(
    State(store): State<RecordStore>,
    user: AuthUser,
    Path((kind, id)): Path<(String, String)>,
) -> Result<Json<Record>, BackendError> {
    let kind = parse_kind(&kind)?;
    let record = store.get(kind, user.user_id(), &id).await?;
    Ok(Json(record))
}

/// List records changed since the cursor
pub async fn list_records(
    State(store): State<RecordStore>,
    user: AuthUser,
    Path(kind): Path<String>,
    ApiQuery(params): ApiQuery<SyncParams>,
) -> Result<Json<Vec<Record>>, BackendError> {
    let kind = parse_kind(&kind)?;
    let records = store
        .get_all(kind, user.user_id(), params.since, params.include_deleted)
        .await?;
    Ok(Json(records))
}

/// Hard-delete all of the caller's records of one kind
pub async fn clear_records(
    State(store): State<RecordStore>,
    user: AuthUser,
    Path(kind): Path<String>,
) -> Result<StatusCode, BackendError> {
    let kind = parse_kind(&kind)?;
    let removed = store.clear(kind, user.user_id()).await?;
    tracing::info!("Cleared {} {} records for {}", removed, kind, user.user_id());
    Ok(StatusCode::NO_CONTENT)
}
