//! Common test utilities and helpers
//!
//! - Database test fixtures
//! - Authentication and HTTP test helpers

pub mod auth_helpers;

pub use auth_helpers::*;
pub use database::*;
