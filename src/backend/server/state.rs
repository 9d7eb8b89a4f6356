/**
 * Application State Management
 *
 * `AppState` holds the three services a request can touch: the record
 * store, the credential verifier and the token issuer. All three are cheap to
 * clone; the store and verifier share one SQLite pool and the issuer is
 * behind an `Arc`.
 *
 * The `FromRef` implementations let handlers extract only the service they
 * need, e.g. `State(store): State<RecordStore>`.
 */

use axum::extract::FromRef;
use std::sync::Arc;

use crate::backend::auth::credentials::CredentialVerifier;
use crate::backend::auth::sessions::TokenIssuer;
use crate::backend::server::config::ServerConfig;
use crate::backend::store::RecordStore;
use sqlx::SqlitePool;

/// Application state shared by every handler
#[derive(Clone, Debug)]
pub struct AppState {
    /// Vault record store
    pub store: RecordStore,

    /// Password verification and registration
    pub verifier: CredentialVerifier,

    /// Session token issuer, keyed once at startup
    pub tokens: Arc<TokenIssuer>,
}

impl AppState {
    /// Build every service from the config and an open pool
    pub fn new(config: &ServerConfig, pool: SqlitePool) -> Self {
        Self {
            store: RecordStore::new(pool.clone()),
            verifier: CredentialVerifier::new(pool, config.bcrypt_cost),
            tokens: Arc::new(TokenIssuer::from_config(config)),
        }
    }
}

impl FromRef<AppState> for RecordStore {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.store.clone()
    }
}

impl FromRef<AppState> for CredentialVerifier {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.verifier.clone()
    }
}

impl FromRef<AppState> for Arc<TokenIssuer> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.tokens.clone()
    }
}
