//! Server Module
//!
//! Server-side setup: configuration, shared state and app construction.
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs          - Module exports and documentation
//! ├── state.rs        - AppState and FromRef implementations
//! ├── config.rs       - ServerConfig, database pool and migrations
//! └── init.rs         - Server initialization and app creation
//! ```
//!
//! # Initialization Flow
//!
//! 1. **Configuration Loading**: `ServerConfig::from_env` (file, then environment)
//! 2. **Database**: `load_database` opens the pool and runs migrations
//! 3. **State Creation**: `AppState::new` builds store, verifier and token issuer
//! 4. **Router Creation**: `create_router` wires public and protected routes

/// Application state management
pub mod state;

/// Server configuration loading
pub mod config;

/// Server initialization
pub mod init;

pub use config::{ConfigError, ServerConfig};
pub use init::create_app;
pub use state::AppState;
