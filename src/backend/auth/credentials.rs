/**
 * Credential Verification
 *
 * Stored passwords come in two shapes. Accounts registered by this server
 * hold a bcrypt hash; accounts carried over from before hashing was
 * introduced hold the password itself. `classify` tells the two apart and
 * `CredentialVerifier::verify` compares accordingly.
 *
 * A successful plaintext match yields `Verification::NeedsUpgrade`. The
 * verifier never writes storage during verification; the login handler acts
 * on the signal by calling `upgrade_password`.
 */

use sqlx::SqlitePool;
use thiserror::Error;

use crate::backend::auth::users::{create_user, get_user_by_username, update_password};
use crate::backend::store::StoreError;
use crate::shared::UserId;

/// Errors from registration and verification
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    #[error("user '{0}' already exists")]
    DuplicateUser(String),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("password hashing failed: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        Self::Store(err.into())
    }
}

/// Shape of a stored password value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoredPassword {
    Hashed,
    Plaintext,
}

/// Classify a stored password value.
///
/// A value is a hash only when it has the modular-crypt bcrypt shape:
/// `$2a$`, `$2b$` or `$2y$`, a two-digit cost, `$`, then 53 characters of
/// salt and digest in bcrypt's base64 alphabet. Anything else is treated as
/// legacy plaintext.
pub fn classify(stored: &str) -> StoredPassword {
    if looks_like_bcrypt(stored) {
        StoredPassword::Hashed
    } else {
        StoredPassword::Plaintext
    }
}

fn looks_like_bcrypt(stored: &str) -> bool {
    let bytes = stored.as_bytes();
    if bytes.len() != 60 || !["$2a$", "$2b$", "$2y$"].iter().any(|p| stored.starts_with(p)) {
        return false;
    }
    if !(bytes[4].is_ascii_digit() && bytes[5].is_ascii_digit() && bytes[6] == b'$') {
        return false;
    }
    let cost = u32::from(bytes[4] - b'0') * 10 + u32::from(bytes[5] - b'0');
    (4..=31).contains(&cost)
        && bytes[7..]
            .iter()
            .all(|b| b.is_ascii_alphanumeric() || *b == b'.' || *b == b'/')
}

/// Outcome of a successful verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    /// Password matched a bcrypt hash
    Verified(UserId),
    /// Password matched legacy plaintext; the stored value must be re-hashed
    NeedsUpgrade(UserId),
}

impl Verification {
    pub fn user_id(&self) -> UserId {
        match self {
            Self::Verified(id) | Self::NeedsUpgrade(id) => *id,
        }
    }

    pub fn needs_upgrade(&self) -> bool {
        matches!(self, Self::NeedsUpgrade(_))
    }
}

/// Password verification and registration against the `users` table
#[derive(Debug, Clone)]
pub struct CredentialVerifier {
    pool: SqlitePool,
    bcrypt_cost: u32,
}

impl CredentialVerifier {
    pub fn new(pool: SqlitePool, bcrypt_cost: u32) -> Self {
        Self { pool, bcrypt_cost }
    }

    /// Check a supplied password against the stored one
    ///
    /// # Returns
    /// The user's id with an upgrade signal, or `InvalidCredentials` when the
    /// user is unknown, deleted, or the password does not match.
    pub async fn verify(&self, username: &str, password: &str) -> Result<Verification, AuthError> {
        check_input(username, password)?;

        let user = match get_user_by_username(&self.pool, username).await? {
            Some(user) if !user.deleted => user,
            _ => return Err(AuthError::InvalidCredentials),
        };

        match classify(&user.password) {
            StoredPassword::Hashed => {
                if bcrypt::verify(password, &user.password)? {
                    Ok(Verification::Verified(user.id))
                } else {
                    Err(AuthError::InvalidCredentials)
                }
            }
            StoredPassword::Plaintext => {
                if constant_time_eq(password.as_bytes(), user.password.as_bytes()) {
                    Ok(Verification::NeedsUpgrade(user.id))
                } else {
                    Err(AuthError::InvalidCredentials)
                }
            }
        }
    }

    /// Create a user with a hashed password
    pub async fn register(&self, username: &str, password: &str) -> Result<UserId, AuthError> {
        check_input(username, password)?;

        if get_user_by_username(&self.pool, username).await?.is_some() {
            return Err(AuthError::DuplicateUser(username.to_string()));
        }

        let hashed = self.hash(password)?;
        match create_user(&self.pool, username, &hashed).await {
            Ok(user) => Ok(user.id),
            // Lost a race with a concurrent registration
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(AuthError::DuplicateUser(username.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Replace a legacy stored password with its hash
    pub async fn upgrade_password(&self, user_id: UserId, password: &str) -> Result<(), AuthError> {
        let hashed = self.hash(password)?;
        let changed = update_password(&self.pool, user_id, &hashed).await?;
        if changed != 1 {
            return Err(StoreError::not_found(format!("user {}", user_id)).into());
        }
        Ok(())
    }

    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        Ok(bcrypt::hash(password, self.bcrypt_cost)?)
    }
}

fn check_input(username: &str, password: &str) -> Result<(), AuthError> {
    if username.is_empty() {
        return Err(AuthError::InvalidInput("username cannot be empty"));
    }
    if password.is_empty() {
        return Err(AuthError::InvalidInput("password cannot be empty"));
    }
    Ok(())
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
