//! Authentication Module
//!
//! User registration, password verification and stateless session tokens.
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs          - Module exports and documentation
//! ├── users.rs        - User model and database operations
//! ├── credentials.rs  - Password classification, verification, registration
//! ├── sessions.rs     - JWT token issuance and verification
//! └── handlers/       - HTTP handlers
//! ```
//!
//! # Authentication Flow
//!
//! 1. **Register**: username and password → bcrypt hash stored → token returned
//! 2. **Login**: username and password → verified (legacy plaintext is
//!    upgraded to a hash) → token returned
//! 3. **Protected requests**: `Authorization: Bearer <token>` is checked by
//!    `middleware::auth_middleware`, which attaches the caller's `UserId`
//!
//! # Security
//!
//! - New passwords are always bcrypt-hashed
//! - Tokens are HS256 JWTs; other algorithms are refused
//! - Unknown users and wrong passwords both return 401

/// User data model and database operations
pub mod users;

/// Password verification and registration
pub mod credentials;

/// JWT token issuance and validation
pub mod sessions;

/// HTTP handlers for authentication endpoints
pub mod handlers;

pub use credentials::{AuthError, CredentialVerifier, Verification};
pub use handlers::{login, register, user_exists, user_id};
pub use sessions::{TokenError, TokenIssuer};
