//! Backend Module
//!
//! Server-side code for the vault: an Axum HTTP server over a SQLite record
//! store, with bcrypt credentials and stateless JWT sessions.
//!
//! # Architecture
//!
//! - **`server`** - Configuration, application state, app construction
//! - **`routes`** - Route assembly (public and protected sets)
//! - **`auth`** - Users, credential verification, session tokens, auth handlers
//! - **`middleware`** - Authentication gate for protected routes
//! - **`store`** - Generic record store with soft delete and sync cursors
//! - **`records`** - HTTP handlers over the record store
//! - **`error`** - `BackendError` and its HTTP mapping
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── main.rs         - vaultkeeper-server binary
//! ├── server/         - Server initialization and state
//! ├── routes/         - Route configuration
//! ├── auth/           - Authentication
//! ├── middleware/     - Request middleware
//! ├── store/          - Record store
//! ├── records/        - Record handlers
//! └── error/          - Error types
//! ```
//!
//! # Request Flow
//!
//! A request to `/api/data/...` passes `auth_middleware`, which turns the
//! bearer token into an `AuthenticatedUser`. The record handler parses the
//! kind, then calls `RecordStore` with that user's id. Every statement the
//! store issues is scoped to that id.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Authentication and user management
pub mod auth;

/// Middleware for request processing
pub mod middleware;

/// Vault record store
pub mod store;

/// Record endpoints
pub mod records;

/// Backend error types
pub mod error;

pub use error::BackendError;
pub use server::{create_app, AppState, ServerConfig};
pub use store::{RecordStore, StoreError};
