//! Record Store
//!
//! The generic keyed CRUD engine behind every vault record kind. One code
//! path serves all kinds: each operation takes a `RecordKind` (a closed enum,
//! parsed at the HTTP boundary) and the caller's `UserId` (resolved by the
//! authentication gate), and builds its statement from the kind's discovered
//! `KindSchema`.
//!
//! # Invariants
//!
//! - Every statement filters on `user_id`. A caller cannot address another
//!   user's rows, whatever entry id it supplies.
//! - Table names come from `RecordKind::table`, column names from
//!   `KindSchema`. Values are always bound parameters.
//! - `update` and `delete` always set `updated_at` to the time of the write.
//! - `delete` is a soft delete. The row stays as a tombstone so that sync
//!   clients see it.
//!
//! # Concurrency
//!
//! There is no in-process locking. Writes run in a `BEGIN IMMEDIATE`
//! transaction and read the clock only once SQLite has granted the write
//! lock, so commit order and `updated_at` order agree. A sync cursor taken
//! from a committed row therefore never skips a later commit. Concurrent
//! updates to one record resolve as last-write-wins. Dropping the future of
//! an in-flight call rolls the transaction back.
//!
//! # Sync
//!
//! `get_all` is the sync primitive. A client passes the `updated_at` of the
//! newest record it has seen as `since` and receives only rows changed after
//! it, plus tombstones when `include_deleted` is set.

pub mod error;

pub mod schema;

use chrono::{DateTime, Utc};
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::collections::BTreeMap;

use crate::backend::auth::users::{get_user_by_username, username_exists};
use crate::shared::record::validate_entry_id;
use crate::shared::{Record, RecordKind, UserId};

pub use error::StoreError;
pub use schema::KindSchema;

/// SQLite-backed vault record store
#[derive(Debug, Clone)]
pub struct RecordStore {
    pool: SqlitePool,
}

impl RecordStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Check connectivity to the backing store
    pub async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Whether a user with this name has ever registered
    pub async fn exists(&self, username: &str) -> Result<bool, StoreError> {
        check_username(username)?;
        Ok(username_exists(&self.pool, username).await?)
    }

    /// Resolve a username to the id of an active user
    pub async fn get_user_id(&self, username: &str) -> Result<UserId, StoreError> {
        check_username(username)?;
        match get_user_by_username(&self.pool, username).await? {
            Some(user) if !user.deleted => Ok(user.id),
            _ => Err(StoreError::not_found(format!("user '{}'", username))),
        }
    }

    /// Insert a new record.
    ///
    /// Columns not present in `fields` are stored as NULL. Adding an id whose
    /// only row is a tombstone replaces the tombstone with the new record.
    pub async fn add(
        &self,
        kind: RecordKind,
        user_id: UserId,
        entry_id: &str,
        fields: &BTreeMap<String, String>,
    ) -> Result<(), StoreError> {
        check_identity(user_id)?;
        validate_entry_id(entry_id)?;

        let schema = KindSchema::discover(&self.pool, kind).await?;
        let bound = schema.bind_fields(fields)?;
        let columns = schema.writable();

        let mut insert_columns = vec!["user_id", "id", "deleted", "updated_at"];
        insert_columns.extend(columns.iter().copied());
        let placeholders = vec!["?"; insert_columns.len()].join(", ");

        let mut revive = vec![
            "deleted = 0".to_string(),
            "updated_at = excluded.updated_at".to_string(),
        ];
        revive.extend(columns.iter().map(|c| format!("{c} = excluded.{c}")));

        let sql = format!(
            "INSERT INTO {table} ({columns}) VALUES ({placeholders}) \
             ON CONFLICT (user_id, id) DO UPDATE SET {revive} WHERE {table}.deleted = 1",
            table = kind.table(),
            columns = insert_columns.join(", "),
            placeholders = placeholders,
            revive = revive.join(", "),
        );

        let mut tx = self.begin_write().await?;
        let mut query = sqlx::query(&sql)
            .bind(user_id)
            .bind(entry_id)
            .bind(false)
            .bind(Utc::now());
        for column in columns {
            query = query.bind(bound.get(column).copied());
        }

        let result = query.execute(&mut *tx).await?;
        tx.commit().await?;
        if result.rows_affected() == 0 {
            tracing::debug!(%kind, entry_id, "add rejected: live record exists");
            return Err(StoreError::Duplicate(format!("{} '{}'", kind, entry_id)));
        }

        tracing::debug!(%kind, entry_id, "record added");
        Ok(())
    }

    /// Overwrite the supplied fields of a live record.
    ///
    /// `updated_at` is refreshed even when `fields` is empty or equal to the
    /// stored values.
    pub async fn update(
        &self,
        kind: RecordKind,
        user_id: UserId,
        entry_id: &str,
        fields: &BTreeMap<String, String>,
    ) -> Result<(), StoreError> {
        check_identity(user_id)?;
        validate_entry_id(entry_id)?;

        let schema = KindSchema::discover(&self.pool, kind).await?;
        let bound = schema.bind_fields(fields)?;

        let mut assignments = vec!["updated_at = ?".to_string()];
        assignments.extend(bound.keys().map(|c| format!("{c} = ?")));

        let sql = format!(
            "UPDATE {table} SET {assignments} WHERE user_id = ? AND id = ? AND deleted = 0",
            table = kind.table(),
            assignments = assignments.join(", "),
        );

        let mut tx = self.begin_write().await?;
        let mut query = sqlx::query(&sql).bind(Utc::now());
        for value in bound.values() {
            query = query.bind(*value);
        }
        let result = query.bind(user_id).bind(entry_id).execute(&mut *tx).await?;
        tx.commit().await?;

        expect_single_row(result.rows_affected(), kind, entry_id)?;
        tracing::debug!(%kind, entry_id, "record updated");
        Ok(())
    }

    /// Soft-delete a live record, leaving a tombstone
    pub async fn delete(
        &self,
        kind: RecordKind,
        user_id: UserId,
        entry_id: &str,
    ) -> Result<(), StoreError> {
        check_identity(user_id)?;
        validate_entry_id(entry_id)?;

        let sql = format!(
            "UPDATE {} SET deleted = 1, updated_at = ? WHERE user_id = ? AND id = ? AND deleted = 0",
            kind.table()
        );
        let mut tx = self.begin_write().await?;
        let result = sqlx::query(&sql)
            .bind(Utc::now())
            .bind(user_id)
            .bind(entry_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        expect_single_row(result.rows_affected(), kind, entry_id)?;
        tracing::debug!(%kind, entry_id, "record deleted");
        Ok(())
    }

    /// Fetch one record, tombstones included
    pub async fn get(
        &self,
        kind: RecordKind,
        user_id: UserId,
        entry_id: &str,
    ) -> Result<Record, StoreError> {
        check_identity(user_id)?;
        validate_entry_id(entry_id)?;

        let schema = KindSchema::discover(&self.pool, kind).await?;
        let sql = format!(
            "SELECT {} FROM {} WHERE user_id = ? AND id = ?",
            schema.select_list(),
            kind.table()
        );
        let row = sqlx::query(&sql)
            .bind(user_id)
            .bind(entry_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::not_found(format!("{} '{}'", kind, entry_id)))?;

        schema.decode(&row)
    }

    /// Records changed after `since`, oldest change first.
    ///
    /// `None` or a cursor at or before the Unix epoch means a full sync.
    pub async fn get_all(
        &self,
        kind: RecordKind,
        user_id: UserId,
        since: Option<DateTime<Utc>>,
        include_deleted: bool,
    ) -> Result<Vec<Record>, StoreError> {
        check_identity(user_id)?;

        let schema = KindSchema::discover(&self.pool, kind).await?;
        let cursor = since.filter(|t| *t > DateTime::UNIX_EPOCH);

        let mut sql = format!(
            "SELECT {} FROM {} WHERE user_id = ?",
            schema.select_list(),
            kind.table()
        );
        if !include_deleted {
            sql.push_str(" AND deleted = 0");
        }
        if cursor.is_some() {
            sql.push_str(" AND updated_at > ?");
        }
        sql.push_str(" ORDER BY updated_at, id");

        let mut query = sqlx::query(&sql).bind(user_id);
        if let Some(cursor) = cursor {
            query = query.bind(cursor);
        }
        let rows = query.fetch_all(&self.pool).await?;

        let records = rows
            .iter()
            .map(|row| schema.decode(row))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(%kind, count = records.len(), include_deleted, "records listed");
        Ok(records)
    }

    /// Hard-delete all of a user's records of one kind
    ///
    /// # Returns
    /// Number of rows removed
    pub async fn clear(&self, kind: RecordKind, user_id: UserId) -> Result<u64, StoreError> {
        check_identity(user_id)?;

        let sql = format!("DELETE FROM {} WHERE user_id = ?", kind.table());
        let result = sqlx::query(&sql).bind(user_id).execute(&self.pool).await?;

        tracing::info!(%kind, removed = result.rows_affected(), "records cleared");
        Ok(result.rows_affected())
    }

    /// Start a transaction that already holds the database write lock.
    ///
    /// Timestamps for `updated_at` must be read after this returns.
    async fn begin_write(&self) -> Result<Transaction<'static, Sqlite>, StoreError> {
        Ok(self.pool.begin_with("BEGIN IMMEDIATE").await?)
    }
}

fn check_identity(user_id: UserId) -> Result<(), StoreError> {
    if user_id.is_nil() {
        return Err(StoreError::validation("user identity is required"));
    }
    Ok(())
}

fn check_username(username: &str) -> Result<(), StoreError> {
    if username.is_empty() {
        return Err(StoreError::validation("username cannot be empty"));
    }
    Ok(())
}

fn expect_single_row(affected: u64, kind: RecordKind, entry_id: &str) -> Result<(), StoreError> {
    if affected != 1 {
        return Err(StoreError::not_found(format!("{} '{}'", kind, entry_id)));
    }
    Ok(())
}
