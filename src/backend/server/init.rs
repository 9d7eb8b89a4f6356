/**
 * Server Initialization
 *
 * Turns a `ServerConfig` into a ready `Router`:
 * 1. Open the SQLite pool and run migrations
 * 2. Build `AppState` (store, verifier, token issuer)
 * 3. Assemble routes and middleware
 *
 * Unlike optional services elsewhere, the database is required. A pool that
 * cannot be opened or migrated aborts startup.
 */

use axum::Router;

use crate::backend::routes::router::create_router;
use crate::backend::server::config::{load_database, ServerConfig};
use crate::backend::server::state::AppState;

/// Create and configure the Axum application
pub async fn create_app(config: &ServerConfig) -> Result<Router<()>, sqlx::Error> {
    tracing::info!("Initializing vaultkeeper backend server");

    let app_state = build_state(config).await?;
    let app = create_router(app_state);

    tracing::info!("Router configured");
    Ok(app)
}

/// Open the database and construct shared state
pub async fn build_state(config: &ServerConfig) -> Result<AppState, sqlx::Error> {
    let pool = load_database(config).await?;
    Ok(AppState::new(config, pool))
}
