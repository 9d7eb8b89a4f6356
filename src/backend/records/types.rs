/**
 * Record Endpoint Types
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Body of `POST /api/data/{kind}`
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct AddRecordRequest {
    /// Client-chosen entry id, unique per user within the kind
    pub id: String,
    /// Payload columns and `meta_info`; omitted columns are stored empty
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

/// Body of `PUT /api/data/{kind}/{id}`
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct UpdateRecordRequest {
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

/// Query parameters for listing records
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct SyncParams {
    /// Sync cursor; only records changed strictly after it are returned
    pub since: Option<DateTime<Utc>>,
    /// Include tombstones of deleted records
    #[serde(default)]
    pub include_deleted: bool,
}
