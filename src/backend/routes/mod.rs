//! Route Configuration Module
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs          - Module exports and documentation
//! ├── router.rs       - Main router creation
//! └── api_routes.rs   - Public and protected route sets
//! ```
//!
//! # Route Organization
//!
//! 1. **Public Routes** - Registration, login, username lookups, health
//! 2. **Data Routes** - Record CRUD and sync, wrapped in `auth_middleware`
//! 3. **Fallback** - JSON 404 for unknown paths

/// Main router creation
pub mod router;

/// API route sets
pub mod api_routes;

pub use router::create_router;
