//! Shared Module
//!
//! Types used by every layer of the vault: the typed user identity, the
//! closed set of record kinds, and the record shape returned to sync clients.
//! These types carry no I/O and are serialized as-is over HTTP.

pub mod error;

pub mod identity;

pub mod record;

pub use error::SharedError;
pub use identity::UserId;
pub use record::{Record, RecordKind};
