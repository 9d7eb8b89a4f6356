//! Shared Error Types
//!
//! This module defines validation errors for the types in `shared`. They are
//! raised when caller-supplied values (record kinds, entry identifiers, field
//! names) are rejected before any store access.
//!
//! # Error Categories
//!
//! - `ValidationError` - A field failed validation
//! - `UnknownKind` - A record kind selector is not in the allow-list
//!
//! # Usage
//!
//! ```rust
//! use vaultkeeper::shared::error::SharedError;
//!
//! let error = SharedError::validation("id", "entry id cannot be empty");
//! ```
use thiserror::Error;

/// Errors raised while validating shared types
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// Validation error for a named field
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        field: String,
        message: String,
    },

    /// The record kind is not one of the known kinds
    #[error("Unknown record kind: '{kind}'")]
    UnknownKind {
        kind: String,
    },
}

impl SharedError {
    /// Create a validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an unknown kind error
    pub fn unknown_kind(kind: impl Into<String>) -> Self {
        Self::UnknownKind {
            kind: kind.into(),
        }
    }
}
