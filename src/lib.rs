//! Vaultkeeper - Secrets Vault Server
//!
//! Server side of a personal secrets manager. It stores per-user
//! credentials, payment cards, notes and file metadata, and lets several
//! client devices stay in sync through change cursors and tombstones.
//!
//! # Module Structure
//!
//! - **`shared`** - Types with no I/O: `UserId`, `RecordKind`, `Record`,
//!   `SharedError`
//! - **`backend`** - Axum server, authentication, and the SQLite record store
//!
//! # Sync Model
//!
//! Every record carries `updated_at` and a `deleted` flag. Deleting a record
//! keeps it as a tombstone with a fresh `updated_at`. A client lists a kind
//! with `since` set to the newest `updated_at` it has seen and gets back only
//! what changed, tombstones included when it asks for them. Concurrent writes
//! to one record are last-write-wins.

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
pub mod backend;
