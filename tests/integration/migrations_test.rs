//! Schema tests against the migrated database

use vaultkeeper::backend::store::KindSchema;
use vaultkeeper::shared::RecordKind;

use crate::common::TestDatabase;

#[tokio::test]
async fn test_every_kind_schema_matches_table() {
    let db = TestDatabase::new().await;

    for kind in RecordKind::ALL {
        let schema = KindSchema::discover(db.pool(), kind).await.unwrap();
        let expected: Vec<&str> = kind.writable_columns().collect();
        assert_eq!(schema.writable(), expected.as_slice(), "kind {}", kind);
    }
}

#[tokio::test]
async fn test_entry_ids_are_scoped_per_user() {
    let db = TestDatabase::new().await;
    let alice = db.create_user("alice").await;
    let bob = db.create_user("bob").await;

    for user in [alice, bob] {
        sqlx::query(
            "INSERT INTO notes (user_id, id, data, deleted, updated_at) VALUES (?, 'n1', 'x', 0, ?)",
        )
        .bind(user)
        .bind(chrono::Utc::now())
        .execute(db.pool())
        .await
        .unwrap();
    }

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM notes WHERE id = 'n1'")
        .fetch_one(db.pool())
        .await
        .unwrap();
    assert_eq!(count, 2);
}
