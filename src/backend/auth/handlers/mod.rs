//! Authentication Handlers Module
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs       - Module exports and documentation
//! ├── types.rs     - Request and response types
//! ├── register.rs  - User registration handler
//! ├── login.rs     - User authentication handler
//! └── lookup.rs    - Public username lookups
//! ```
//!
//! # Handlers
//!
//! - **`register`** - POST /api/auth/register
//! - **`login`** - POST /api/auth/login
//! - **`user_exists`** - GET /api/users/{username}/exists
//! - **`user_id`** - GET /api/users/{username}/id

/// Request and response types
pub mod types;

/// Register handler
pub mod register;

/// Login handler
pub mod login;

/// Username lookup handlers
pub mod lookup;

pub use types::{AuthResponse, ExistsResponse, LoginRequest, RegisterRequest, UserIdResponse};

pub use login::login;
pub use lookup::{user_exists, user_id};
pub use register::register;
