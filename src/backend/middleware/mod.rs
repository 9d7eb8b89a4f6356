//! Middleware Module
//!
//! HTTP middleware for the backend server.
//!
//! - **`auth`** - Bearer-token authentication gate for protected routes

pub mod auth;

pub use auth::{auth_middleware, authenticate, AuthUser, AuthenticatedUser, GateFailure};
