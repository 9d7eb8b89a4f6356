//! Vault Record Endpoints
//!
//! HTTP surface of the record store:
//!
//! - `POST   /api/data/{kind}` - add
//! - `GET    /api/data/{kind}?since=&include_deleted=` - sync listing
//! - `DELETE /api/data/{kind}` - clear
//! - `GET    /api/data/{kind}/{id}` - single record
//! - `PUT    /api/data/{kind}/{id}` - update
//! - `DELETE /api/data/{kind}/{id}` - soft delete

pub mod handlers;

pub mod types;

pub use handlers::{
    add_record, clear_records, delete_record, get_record, list_records, update_record,
};
pub use types::{AddRecordRequest, SyncParams, UpdateRecordRequest};
