//! Vault Record Types
//!
//! This module defines the closed set of record kinds stored in the vault and
//! the shape of a record as it is returned to sync clients.
//!
//! # Record Kinds
//!
//! Each kind maps to its own table. All tables share the same structure:
//!
//! - `id` - Entry identifier, unique per owning user
//! - `user_id` - Owning user
//! - payload columns, specific to the kind
//! - `meta_info` - Opaque client metadata
//! - `deleted` - Tombstone flag
//! - `updated_at` - Last modification time, used as the sync cursor
//!
//! The payload column lists below are the only column names ever used to
//! build a statement. A caller-supplied field name is matched against them and
//! the matching `&'static str` is used in its place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::shared::error::SharedError;
use crate::shared::identity::UserId;

/// Columns every record table has and that clients may not write directly
pub const RESERVED_COLUMNS: [&str; 4] = ["id", "user_id", "deleted", "updated_at"];

/// Opaque metadata column, writable by clients
pub const META_COLUMN: &str = "meta_info";

/// Maximum length of an entry identifier
pub const MAX_ENTRY_ID_LEN: usize = 256;

/// The kinds of records a vault holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// Login/password pairs
    Credential,
    /// Payment cards
    Card,
    /// Free-text notes
    Note,
    /// Metadata about files stored by the client
    File,
}

impl RecordKind {
    pub const ALL: [RecordKind; 4] = [
        RecordKind::Credential,
        RecordKind::Card,
        RecordKind::Note,
        RecordKind::File,
    ];

    /// Table backing this kind
    pub fn table(self) -> &'static str {
        match self {
            RecordKind::Credential => "credentials",
            RecordKind::Card => "cards",
            RecordKind::Note => "notes",
            RecordKind::File => "files",
        }
    }

    /// Kind-specific payload columns
    pub fn payload_columns(self) -> &'static [&'static str] {
        match self {
            RecordKind::Credential => &["login", "password"],
            RecordKind::Card => &["card_number", "expiration_date", "cvv", "holder"],
            RecordKind::Note => &["data"],
            RecordKind::File => &["file_name", "file_path", "size"],
        }
    }

    /// Columns a client may set: the payload plus `meta_info`
    pub fn writable_columns(self) -> impl Iterator<Item = &'static str> {
        self.payload_columns()
            .iter()
            .copied()
            .chain(std::iter::once(META_COLUMN))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RecordKind::Credential => "credential",
            RecordKind::Card => "card",
            RecordKind::Note => "note",
            RecordKind::File => "file",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = SharedError;

    /// Accepts either the singular kind name or the table name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(SharedError::validation("kind", "record kind cannot be empty"));
        }

        RecordKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s || kind.table() == s)
            .ok_or_else(|| SharedError::unknown_kind(s))
    }
}

/// Validate an entry identifier supplied by a client
pub fn validate_entry_id(id: &str) -> Result<(), SharedError> {
    if id.trim().is_empty() {
        return Err(SharedError::validation("id", "entry id cannot be empty"));
    }
    if id.len() > MAX_ENTRY_ID_LEN {
        return Err(SharedError::validation(
            "id",
            format!("entry id exceeds {} bytes", MAX_ENTRY_ID_LEN),
        ));
    }
    Ok(())
}

/// A record as stored in the vault
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub kind: RecordKind,
    pub id: String,
    pub user_id: UserId,
    /// Payload columns by name; absent values are returned as empty strings
    pub fields: BTreeMap<String, String>,
    pub meta_info: String,
    pub deleted: bool,
    pub updated_at: DateTime<Utc>,
}
