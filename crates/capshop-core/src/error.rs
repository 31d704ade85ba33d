//! # Error Types
//!
//! Validation errors for capshop-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  capshop-core (this file)                                              │
//! │  └── ValidationError  - Input rule failures (email, password, price)   │
//! │                                                                         │
//! │  capshop-store                                                         │
//! │  ├── AuthError        - Session simulator outcomes                     │
//! │  ├── StorageError     - Remembered-token storage failures              │
//! │  └── ConfigError      - Configuration loading                          │
//! │                                                                         │
//! │  Flow: ValidationError → AuthError::InvalidInput → AuthResponse → UI   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The cart itself has no error conditions; every cart input is accepted and
//! normalized.

use thiserror::Error;

/// Input validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g. an email without a domain).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooShort { field, .. }
            | ValidationError::TooLong { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::InvalidFormat { field, .. } => field,
        }
    }
}
