/**
 * Record Kind Schema
 *
 * A `KindSchema` is the set of columns a statement for one record kind may
 * name. It is built at call time from the schema catalog
 * (`pragma_table_info`) intersected with the kind's compile-time column list,
 * so a column only takes part in a query when both the code and the live
 * table know about it.
 *
 * Caller-supplied field names are never placed in SQL. `resolve` looks the
 * name up in the schema and hands back the schema's own `&'static str`.
 */

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use std::collections::BTreeMap;

use crate::backend::store::error::StoreError;
use crate::shared::record::{META_COLUMN, RESERVED_COLUMNS};
use crate::shared::{Record, RecordKind, UserId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindSchema {
    kind: RecordKind,
    writable: Vec<&'static str>,
}

impl KindSchema {
    /// Read the live column set of the kind's table
    pub async fn discover(pool: &SqlitePool, kind: RecordKind) -> Result<Self, StoreError> {
        let columns: Vec<String> = sqlx::query_scalar("SELECT name FROM pragma_table_info(?1)")
            .bind(kind.table())
            .fetch_all(pool)
            .await?;

        Self::from_columns(kind, &columns)
    }

    /// Build a schema from a discovered column list
    pub fn from_columns(kind: RecordKind, columns: &[String]) -> Result<Self, StoreError> {
        let present = |name: &str| columns.iter().any(|c| c == name);

        if let Some(missing) = RESERVED_COLUMNS.into_iter().find(|c| !present(c)) {
            return Err(StoreError::Backend(sqlx::Error::Configuration(
                format!("table '{}' is missing column '{}'", kind.table(), missing).into(),
            )));
        }

        let writable = kind.writable_columns().filter(|c| present(c)).collect();
        Ok(Self { kind, writable })
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    /// Writable columns in a stable order
    pub fn writable(&self) -> &[&'static str] {
        &self.writable
    }

    fn payload(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.writable.iter().copied().filter(|c| *c != META_COLUMN)
    }

    fn has_meta(&self) -> bool {
        self.writable.contains(&META_COLUMN)
    }

    /// Map a caller field name onto a schema column
    pub fn resolve(&self, field: &str) -> Result<&'static str, StoreError> {
        if RESERVED_COLUMNS.contains(&field) {
            return Err(StoreError::validation(format!(
                "field '{}' cannot be written directly",
                field
            )));
        }

        self.writable
            .iter()
            .copied()
            .find(|column| *column == field)
            .ok_or_else(|| {
                StoreError::validation(format!("unknown field '{}' for {} records", field, self.kind))
            })
    }

    /// Resolve every field of a write, keyed by schema column
    pub fn bind_fields<'a>(
        &self,
        fields: &'a BTreeMap<String, String>,
    ) -> Result<BTreeMap<&'static str, &'a str>, StoreError> {
        fields
            .iter()
            .map(|(name, value)| self.resolve(name).map(|column| (column, value.as_str())))
            .collect()
    }

    /// Column list for SELECT statements
    pub fn select_list(&self) -> String {
        let mut columns = vec!["id", "user_id", "deleted", "updated_at"];
        columns.extend(self.writable.iter().copied());
        columns.join(", ")
    }

    /// Decode a row selected with `select_list`
    pub fn decode(&self, row: &SqliteRow) -> Result<Record, StoreError> {
        let mut fields = BTreeMap::new();
        for column in self.payload() {
            let value: Option<String> = row.try_get(column)?;
            fields.insert(column.to_string(), value.unwrap_or_default());
        }

        let meta_info: Option<String> = if self.has_meta() {
            row.try_get(META_COLUMN)?
        } else {
            None
        };

        let id: String = row.try_get("id")?;
        let user_id: UserId = row.try_get("user_id")?;
        let deleted: bool = row.try_get("deleted")?;
        let updated_at: DateTime<Utc> = row.try_get("updated_at")?;

        Ok(Record {
            kind: self.kind,
            id,
            user_id,
            fields,
            meta_info: meta_info.unwrap_or_default(),
            deleted,
            updated_at,
        })
    }
}
