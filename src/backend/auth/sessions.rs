/**
 * Session Tokens
 *
 * Stateless JWT session tokens. The issuer holds one symmetric key, set at
 * startup from `ServerConfig`, and always signs with HS256. Verification pins
 * the algorithm: a token whose header names any other algorithm is refused
 * before its signature is looked at.
 *
 * There is no server-side session record. A token stays valid until its
 * `exp` claim passes, or forever when the server runs with no token TTL.
 */

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

use crate::backend::server::config::ServerConfig;
use crate::shared::UserId;

pub const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: UserId,
    /// Issued at time (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp), absent when tokens do not expire
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

/// Why a token was refused
///
/// Callers outside this module collapse every variant into one
/// unauthenticated response; the variants exist for logging.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("malformed token")]
    InvalidToken,
    #[error("token expired")]
    ExpiredToken,
    #[error("signature or algorithm mismatch")]
    SignatureMismatch,
    #[error("failed to sign token: {0}")]
    Signing(jsonwebtoken::errors::Error),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => Self::ExpiredToken,
            ErrorKind::InvalidSignature
            | ErrorKind::InvalidAlgorithm
            | ErrorKind::MissingAlgorithm => Self::SignatureMismatch,
            _ => Self::InvalidToken,
        }
    }
}

/// Issues and verifies session tokens with one symmetric key
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Option<Duration>,
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("algorithm", &SIGNING_ALGORITHM)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self::from_secret(config.jwt_signing_key.as_bytes(), config.token_ttl)
    }

    pub fn from_secret(secret: &[u8], ttl: Option<Duration>) -> Self {
        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.leeway = 0;
        if ttl.is_some() {
            validation.set_required_spec_claims(&["sub", "exp"]);
        } else {
            validation.set_required_spec_claims(&["sub"]);
        }

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    /// Create a token whose subject is `user_id`
    ///
    /// An expiry past the end of the `i64` timestamp range saturates.
    pub fn issue(&self, user_id: UserId) -> Result<String, TokenError> {
        let iat = chrono::Utc::now().timestamp();
        let exp = self.ttl.map(|ttl| {
            let secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
            iat.saturating_add(secs)
        });

        self.sign(&Claims { sub: user_id, iat, exp })
    }

    /// Sign an explicit claim set
    pub fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(SIGNING_ALGORITHM), claims, &self.encoding).map_err(TokenError::Signing)
    }

    /// Verify a token and return its subject
    pub fn verify(&self, token: &str) -> Result<UserId, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)?;
        if data.claims.sub.is_nil() {
            return Err(TokenError::InvalidToken);
        }
        Ok(data.claims.sub)
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }
}
