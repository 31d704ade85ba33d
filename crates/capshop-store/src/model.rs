//! # Auth Data Model
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Auth Types                                          │
//! │                                                                         │
//! │  UserRecord (private to the directory)   User (handed to callers)      │
//! │  ───────────────────────────────────     ───────────────────────────   │
//! │  user: User ─────────────────────────►   id, email, role               │
//! │  password_hash ($argon2id$…)             created_at, last_sign_in_at   │
//! │                                                                         │
//! │  Session (session table)                 SessionInfo (handed out)      │
//! │  ───────────────────────                 ───────────────────────────   │
//! │  token, user, expires_at ────────────►   token, user, expires_at       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AuthErrorBody, AuthResult};

/// Role every signed-up user gets.
pub const AUTHENTICATED_ROLE: &str = "authenticated";

/// A user identity as seen by the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub last_sign_in_at: Option<DateTime<Utc>>,
}

impl User {
    pub(crate) fn new(email: String, now: DateTime<Utc>) -> Self {
        User {
            id: Uuid::new_v4(),
            email,
            role: AUTHENTICATED_ROLE.to_string(),
            created_at: now,
            last_sign_in_at: None,
        }
    }
}

/// A registered account: identity plus credential hash.
#[derive(Debug, Clone)]
pub(crate) struct UserRecord {
    pub user: User,
    pub password_hash: String,
}

/// An entry in the session table.
#[derive(Debug, Clone)]
pub(crate) struct Session {
    /// Directory key of the owning user.
    pub user_key: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Valid strictly before `expires_at`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// A live session as reported to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    /// Opaque token; the same string the client remembers.
    pub token: String,
    pub user: User,
    pub expires_at: DateTime<Utc>,
}

/// Successful `sign_in`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignInOutput {
    pub user: User,
    pub session: SessionInfo,
}

/// Successful `reset_password`. Sent whether or not the email exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordResetAck {
    pub email: String,
}

// =============================================================================
// Response envelope
// =============================================================================

/// `{ data, error }` envelope for UI collaborators.
///
/// Exactly one side is populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse<T> {
    pub data: Option<T>,
    pub error: Option<AuthErrorBody>,
}

impl<T> AuthResponse<T> {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

impl<T> From<AuthResult<T>> for AuthResponse<T> {
    fn from(result: AuthResult<T>) -> Self {
        match result {
            Ok(data) => AuthResponse {
                data: Some(data),
                error: None,
            },
            Err(err) => AuthResponse {
                data: None,
                error: Some(AuthErrorBody::from(&err)),
            },
        }
    }
}
