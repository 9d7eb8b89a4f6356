/**
 * User Model and Database Operations
 *
 * This module handles the `users` table. The stored `password` column holds
 * either a bcrypt hash or, for accounts created before hashing was introduced,
 * the plaintext password. Users are never hard-deleted.
 */

use serde::Serialize;
use sqlx::SqlitePool;

use crate::shared::UserId;

/// User struct representing a row of the `users` table
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID
    pub id: UserId,
    /// Username (unique)
    pub username: String,
    /// Stored password: bcrypt hash or legacy plaintext
    #[serde(skip_serializing)]
    pub password: String,
    /// Soft-delete flag
    pub deleted: bool,
}

/// Create a new user
///
/// # Arguments
/// * `pool` - Database connection pool
/// * `username` - User's chosen username
/// * `password_hash` - Hashed password
///
/// # Returns
/// Created user or error. A taken username surfaces as a unique violation.
pub async fn create_user(
    pool: &SqlitePool,
    username: &str,
    password_hash: &str,
) -> Result<User, sqlx::Error> {
    let id = UserId::new();

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, username, password, deleted)
        VALUES (?1, ?2, ?3, 0)
        RETURNING id, username, password, deleted
        "#
    )
    .bind(id)
    .bind(username)
    .bind(password_hash)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

/// Get user by username, including soft-deleted users
pub async fn get_user_by_username(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<User>, sqlx::Error> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, password, deleted
        FROM users
        WHERE username = ?1
        "#
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Get user by ID, including soft-deleted users
pub async fn get_user_by_id(
    pool: &SqlitePool,
    id: UserId,
) -> Result<Option<User>, sqlx::Error> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, password, deleted
        FROM users
        WHERE id = ?1
        "#
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Check whether any user, deleted or not, holds the username
pub async fn username_exists(pool: &SqlitePool, username: &str) -> Result<bool, sqlx::Error> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = ?1")
        .bind(username)
        .fetch_one(pool)
        .await?;

    Ok(count > 0)
}

/// Replace a user's stored password
///
/// # Returns
/// Number of rows changed (0 when the user does not exist)
pub async fn update_password(
    pool: &SqlitePool,
    id: UserId,
    password_hash: &str,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("UPDATE users SET password = ?1 WHERE id = ?2")
        .bind(password_hash)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Insert a user whose password is stored verbatim.
///
/// Accounts created before password hashing exist in this form; new
/// registrations never use it.
pub async fn create_legacy_user(
    pool: &SqlitePool,
    username: &str,
    plaintext_password: &str,
) -> Result<User, sqlx::Error> {
    create_user(pool, username, plaintext_password).await
}
