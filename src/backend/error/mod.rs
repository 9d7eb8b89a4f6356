//! Backend Error Module
//!
//! HTTP-facing error type for the backend server.
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - BackendError and conversions from lower layers
//! ├── conversion.rs - IntoResponse implementation
//! └── rejection.rs  - ApiJson/ApiQuery extractors with JSON rejections
//! ```
//!
//! Handlers return `Result<_, BackendError>`. Errors from the store, the
//! credential verifier and the token issuer convert with `?`.

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

/// Extractor rejection handling
pub mod rejection;

pub use rejection::{ApiJson, ApiQuery};
pub use types::BackendError;
