//! # Store Error Types
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Store Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────────┐  ┌─────────────────┐  ┌────────────────────┐  │
//! │  │     AuthError       │  │  StorageError   │  │   ConfigError      │  │
//! │  │                     │  │                 │  │                    │  │
//! │  │  DuplicateUser      │  │  Io             │  │  Io                │  │
//! │  │  InvalidCredentials │  │  Corrupt        │  │  Parse             │  │
//! │  │  NotAuthenticated   │  │                 │  │  Serialize         │  │
//! │  │  InvalidInput       │  │        │        │  │  InvalidValue      │  │
//! │  │  Unexpected ◄───────┼──┼────────┘        │  │                    │  │
//! │  └─────────────────────┘  └─────────────────┘  └────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Auth failures are values. Callers check the error before trusting data;
//! nothing in the session simulator panics across its boundary.

use capshop_core::ValidationError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for session simulator operations.
pub type AuthResult<T> = Result<T, AuthError>;

// =============================================================================
// Auth Error
// =============================================================================

/// Outcome of a failed session simulator operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// `sign_up` with an email that is already registered.
    #[error("User already registered")]
    DuplicateUser,

    /// Unknown email or wrong password. The two cases are indistinguishable.
    #[error("Invalid login credentials")]
    InvalidCredentials,

    /// Operation needs a live session and there is none.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Email or password rejected by the input rules.
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    /// Anything else: storage or hashing failures.
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Stable, machine-usable error kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthErrorKind {
    DuplicateUser,
    InvalidCredentials,
    NotAuthenticated,
    InvalidInput,
    Unexpected,
}

impl AuthError {
    pub fn kind(&self) -> AuthErrorKind {
        match self {
            AuthError::DuplicateUser => AuthErrorKind::DuplicateUser,
            AuthError::InvalidCredentials => AuthErrorKind::InvalidCredentials,
            AuthError::NotAuthenticated => AuthErrorKind::NotAuthenticated,
            AuthError::InvalidInput(_) => AuthErrorKind::InvalidInput,
            AuthError::Unexpected(_) => AuthErrorKind::Unexpected,
        }
    }

    /// HTTP-like status the hosted auth backend would have answered with.
    pub fn status(&self) -> u16 {
        match self {
            AuthError::DuplicateUser
            | AuthError::InvalidCredentials
            | AuthError::InvalidInput(_) => 400,
            AuthError::NotAuthenticated => 401,
            AuthError::Unexpected(_) => 500,
        }
    }
}

impl From<StorageError> for AuthError {
    fn from(err: StorageError) -> Self {
        AuthError::Unexpected(err.to_string())
    }
}

impl From<argon2::password_hash::Error> for AuthError {
    fn from(err: argon2::password_hash::Error) -> Self {
        AuthError::Unexpected(format!("password hashing failed: {}", err))
    }
}

/// Serialized form of an [`AuthError`]: a kind/message pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthErrorBody {
    pub kind: AuthErrorKind,
    pub message: String,
    pub status: u16,
}

impl From<&AuthError> for AuthErrorBody {
    fn from(err: &AuthError) -> Self {
        AuthErrorBody {
            kind: err.kind(),
            message: err.to_string(),
            status: err.status(),
        }
    }
}

// =============================================================================
// Storage Error
// =============================================================================

/// Failures of the remembered-token storage.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("No data directory available for token storage")]
    NoDataDir,
}

// =============================================================================
// Config Error
// =============================================================================

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("No config path available")]
    NoConfigPath,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_and_messages() {
        assert_eq!(AuthError::DuplicateUser.kind(), AuthErrorKind::DuplicateUser);
        assert_eq!(
            AuthError::InvalidCredentials.to_string(),
            "Invalid login credentials"
        );
        assert_eq!(AuthError::NotAuthenticated.status(), 401);
    }

    #[test]
    fn test_validation_converts_to_invalid_input() {
        let err: AuthError = ValidationError::Required {
            field: "email".to_string(),
        }
        .into();
        assert_eq!(err.kind(), AuthErrorKind::InvalidInput);
        assert_eq!(err.to_string(), "Invalid input: email is required");
    }

    #[test]
    fn test_storage_error_is_unexpected() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: AuthError = StorageError::from(io).into();
        assert_eq!(err.kind(), AuthErrorKind::Unexpected);
    }

    #[test]
    fn test_error_body_serializes_kind() {
        let body = AuthErrorBody::from(&AuthError::DuplicateUser);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["kind"], "duplicate_user");
        assert_eq!(json["message"], "User already registered");
        assert_eq!(json["status"], 400);
    }
}
