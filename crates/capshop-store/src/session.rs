//! # Session Simulator
//!
//! A stand-in authentication backend. Users live in an in-memory directory,
//! sessions in an in-memory table, and the client remembers its current
//! session token through a [`TokenStorage`].
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  sign_in(email, pw)                                                     │
//! │       │                                                                 │
//! │       ├── issued_at = clock.now()                                       │
//! │       ├── sleep(latency)              ◄── no lock held                  │
//! │       ├── read lock: look up credential hash                            │
//! │       ├── verify (blocking pool)                                        │
//! │       ├── write lock: stamp last_sign_in_at, insert session             │
//! │       ├── storage.set("mockAuthSession", token)                         │
//! │       └── publish SignedIn                                              │
//! │                                                                         │
//! │  current_user() / session()                                             │
//! │       │                                                                 │
//! │       ├── storage.get(...) ── none ──► None                             │
//! │       ├── session valid?   ── yes  ──► Some(..)                         │
//! │       └── expired / unknown ──► purge entry + remembered token ──► None │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A call whose future is dropped during the simulated latency changes
//! nothing: all mutation happens after the sleep.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use capshop_core::validation::{validate_email, validate_password};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::clock::{Clock, SystemClock};
use crate::config::SessionConfig;
use crate::error::{AuthError, AuthResult};
use crate::events::{AuthEvent, AuthEventBus, AuthSubscription};
use crate::model::{PasswordResetAck, Session, SessionInfo, SignInOutput, User, UserRecord};
use crate::password::PasswordHasher;
use crate::storage::{MemoryTokenStorage, TokenStorage};

/// User directory and session table, guarded together.
#[derive(Debug, Default)]
struct AuthState {
    /// Keyed by normalized email.
    users: HashMap<String, UserRecord>,
    /// Keyed by token.
    sessions: HashMap<String, Session>,
}

/// Mock authentication backend.
///
/// Share it behind an `Arc`; every method takes `&self`.
pub struct SessionSimulator {
    config: SessionConfig,
    hasher: PasswordHasher,
    storage: Arc<dyn TokenStorage>,
    clock: Arc<dyn Clock>,
    state: RwLock<AuthState>,
    events: AuthEventBus,
}

impl std::fmt::Debug for SessionSimulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionSimulator")
            .field("config", &self.config)
            .field("hasher", &self.hasher)
            .finish_non_exhaustive()
    }
}

impl SessionSimulator {
    pub fn new(
        config: SessionConfig,
        storage: Arc<dyn TokenStorage>,
        clock: Arc<dyn Clock>,
    ) -> AuthResult<Self> {
        config
            .validate()
            .map_err(|e| AuthError::Unexpected(format!("invalid session config: {}", e)))?;
        let hasher = PasswordHasher::from_config(&config)?;
        info!(
            lifetime_secs = config.session_lifetime_secs,
            latency_ms = config.latency_ms,
            storage_key = %config.storage_key,
            "Session simulator ready"
        );
        Ok(SessionSimulator {
            config,
            hasher,
            storage,
            clock,
            state: RwLock::new(AuthState::default()),
            events: AuthEventBus::new(),
        })
    }

    /// In-memory token storage and the system clock.
    pub fn in_memory(config: SessionConfig) -> AuthResult<Self> {
        Self::new(
            config,
            Arc::new(MemoryTokenStorage::new()),
            Arc::new(SystemClock),
        )
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Registers a new account. Does not sign it in.
    ///
    /// A malformed email is rejected first, then an already registered one,
    /// then a password outside the policy.
    pub async fn sign_up(&self, email: &str, password: &str) -> AuthResult<User> {
        simulate_latency(self.config.latency()).await;

        validate_email(email)?;

        let key = self.email_key(email);
        if self.state.read().await.users.contains_key(&key) {
            warn!(email = %email, "Sign-up rejected: already registered");
            return Err(AuthError::DuplicateUser);
        }

        validate_password(password, self.config.min_password_length)?;

        let password_hash = self.hash_password(password).await?;

        let mut state = self.state.write().await;
        // Another sign-up for the same email may have finished while hashing.
        if state.users.contains_key(&key) {
            warn!(email = %email, "Sign-up rejected: already registered");
            return Err(AuthError::DuplicateUser);
        }

        let user = User::new(email.to_string(), self.clock.now());
        state.users.insert(
            key,
            UserRecord {
                user: user.clone(),
                password_hash,
            },
        );

        info!(email = %email, user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Checks credentials and starts a new session.
    ///
    /// The expiry counts from when the call was made, not from when the
    /// simulated latency ended.
    pub async fn sign_in(&self, email: &str, password: &str) -> AuthResult<SignInOutput> {
        let issued_at = self.clock.now();
        simulate_latency(self.config.latency()).await;

        let key = self.email_key(email);
        let stored_hash = {
            let state = self.state.read().await;
            state.users.get(&key).map(|r| r.password_hash.clone())
        };

        let Some(stored_hash) = stored_hash else {
            warn!(email = %email, "Sign-in failed: unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        if !self.verify_password(password, stored_hash).await? {
            warn!(email = %email, "Sign-in failed: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let token = Uuid::new_v4().to_string();
        let expires_at = issued_at
            .checked_add_signed(self.config.session_lifetime())
            .ok_or_else(|| AuthError::Unexpected("session expiry out of range".into()))?;

        let user = {
            let mut state = self.state.write().await;
            let record = state
                .users
                .get_mut(&key)
                .ok_or(AuthError::InvalidCredentials)?;
            record.user.last_sign_in_at = Some(issued_at);
            let user = record.user.clone();

            state.sessions.insert(
                token.clone(),
                Session {
                    user_key: key,
                    expires_at,
                },
            );
            user
        };

        if let Err(e) = self.storage.set(&self.config.storage_key, &token) {
            self.state.write().await.sessions.remove(&token);
            return Err(e.into());
        }

        info!(email = %email, user_id = %user.id, %expires_at, "User signed in");
        self.events.publish(AuthEvent::SignedIn { user: user.clone() });

        Ok(SignInOutput {
            user: user.clone(),
            session: SessionInfo {
                token,
                user,
                expires_at,
            },
        })
    }

    /// Ends the current session. Succeeds when nobody is signed in.
    pub async fn sign_out(&self) -> AuthResult<()> {
        simulate_latency(self.config.sign_out_latency()).await;

        let Some(token) = self.storage.get(&self.config.storage_key)? else {
            debug!("Sign-out with no remembered session");
            return Ok(());
        };

        let ended = self.state.write().await.sessions.remove(&token);
        self.storage.remove(&self.config.storage_key)?;

        match ended {
            Some(session) => {
                info!(email = %session.user_key, "User signed out");
                self.events.publish(AuthEvent::SignedOut);
            }
            None => debug!("Sign-out cleared a token with no live session"),
        }
        Ok(())
    }

    /// The signed-in user, if any.
    ///
    /// Storage failures are logged and reported as signed out.
    pub async fn current_user(&self) -> Option<User> {
        self.session().await.map(|s| s.user)
    }

    /// The live session, if any.
    ///
    /// An expired or unknown remembered token is cleared as a side effect.
    pub async fn session(&self) -> Option<SessionInfo> {
        match self.live_session().await {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, "Session lookup failed, treating as signed out");
                None
            }
        }
    }

    /// Requests a password reset email.
    ///
    /// Always acknowledges, so callers cannot probe which emails exist.
    pub async fn reset_password(&self, email: &str) -> AuthResult<PasswordResetAck> {
        simulate_latency(self.config.latency()).await;

        let known = self
            .state
            .read()
            .await
            .users
            .contains_key(&self.email_key(email));
        if known {
            debug!(email = %email, "Password reset link would be sent");
        } else {
            debug!(email = %email, "Password reset for unknown email acknowledged");
        }

        Ok(PasswordResetAck {
            email: email.to_string(),
        })
    }

    /// Replaces the signed-in user's password.
    pub async fn update_password(&self, new_password: &str) -> AuthResult<User> {
        simulate_latency(self.config.latency()).await;

        let session = self
            .live_session()
            .await?
            .ok_or(AuthError::NotAuthenticated)?;
        validate_password(new_password, self.config.min_password_length)?;

        let password_hash = self.hash_password(new_password).await?;
        let key = self.email_key(&session.user.email);

        let user = {
            let mut state = self.state.write().await;
            let record = state
                .users
                .get_mut(&key)
                .ok_or(AuthError::NotAuthenticated)?;
            record.password_hash = password_hash;
            record.user.clone()
        };

        info!(email = %user.email, user_id = %user.id, "Password updated");
        self.events
            .publish(AuthEvent::PasswordUpdated { user: user.clone() });
        Ok(user)
    }

    /// Listens for auth state changes from now on.
    pub fn subscribe(&self) -> AuthSubscription {
        self.events.subscribe()
    }

    /// Number of registered accounts.
    pub async fn user_count(&self) -> usize {
        self.state.read().await.users.len()
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn email_key(&self, email: &str) -> String {
        if self.config.case_insensitive_emails {
            email.to_lowercase()
        } else {
            email.to_string()
        }
    }

    async fn live_session(&self) -> AuthResult<Option<SessionInfo>> {
        let key = &self.config.storage_key;
        let Some(token) = self.storage.get(key)? else {
            return Ok(None);
        };
        let now = self.clock.now();

        {
            let state = self.state.read().await;
            if let Some(session) = state.sessions.get(&token) {
                if session.is_valid_at(now) {
                    if let Some(record) = state.users.get(&session.user_key) {
                        return Ok(Some(SessionInfo {
                            token,
                            user: record.user.clone(),
                            expires_at: session.expires_at,
                        }));
                    }
                }
            }
        }

        let expired = {
            let mut state = self.state.write().await;
            match state.sessions.get(&token) {
                Some(session) if session.is_valid_at(now) => false,
                Some(_) => {
                    state.sessions.remove(&token);
                    true
                }
                None => false,
            }
        };

        // Leave a token written by a concurrent sign-in alone.
        if self.storage.get(key)?.as_deref() == Some(token.as_str()) {
            self.storage.remove(key)?;
        }

        if expired {
            info!("Session expired");
            self.events.publish(AuthEvent::SessionExpired);
        } else {
            debug!("Remembered token has no live session, cleared");
        }
        Ok(None)
    }

    async fn hash_password(&self, password: &str) -> AuthResult<String> {
        let hasher = self.hasher.clone();
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::Unexpected(format!("hashing task failed: {}", e)))?
    }

    async fn verify_password(&self, password: &str, stored_hash: String) -> AuthResult<bool> {
        let hasher = self.hasher.clone();
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &stored_hash))
            .await
            .map_err(|e| AuthError::Unexpected(format!("verify task failed: {}", e)))?
    }
}

async fn simulate_latency(latency: Duration) {
    if !latency.is_zero() {
        tokio::time::sleep(latency).await;
    }
}
