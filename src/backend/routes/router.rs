/**
 * Router Configuration
 *
 * Combines the public and protected route sets into one Axum router and adds
 * request tracing.
 */

use axum::{http::Uri, Router};
use tower_http::trace::TraceLayer;

use crate::backend::error::BackendError;
use crate::backend::routes::api_routes::{configure_data_routes, configure_public_routes};
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured
///
/// # Arguments
///
/// * `app_state` - Store, verifier and token issuer shared by all handlers
///
/// # Returns
///
/// Router with state applied, ready for `axum::serve`
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = configure_public_routes(Router::new())
        .merge(configure_data_routes(app_state.clone()))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http());

    router.with_state(app_state)
}

async fn not_found(uri: Uri) -> BackendError {
    BackendError::not_found(format!("no route for {}", uri.path()))
}
