//! # capshop-store: Shared State for the Capshop Storefront
//!
//! Owns the two pieces of state the storefront views share: the cart and
//! the (mock) authentication session.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 Presentation (out of tree)                              │
//! │        subscribe()            read                 mutate               │
//! │            │                   │                     │                  │
//! │  ┌─────────▼───────────────────▼─────────────────────▼──────────────┐   │
//! │  │              ★ capshop-store (THIS CRATE) ★                       │   │
//! │  │                                                                   │   │
//! │  │   CartStore ─────────► capshop-core::Cart                        │   │
//! │  │     └─ watch<CartTotals>                                          │   │
//! │  │                                                                   │   │
//! │  │   SessionSimulator ──► users / sessions (RwLock)                  │   │
//! │  │     ├─ TokenStorage   remembered token ("mockAuthSession")        │   │
//! │  │     ├─ Clock          absolute expiry                             │   │
//! │  │     ├─ PasswordHasher Argon2id                                    │   │
//! │  │     └─ broadcast<AuthEvent>                                       │   │
//! │  └───────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`cart_store`] - Shared cart with change notifications
//! - [`session`] - Mock authentication backend
//! - [`config`] - Session configuration (file, env, defaults)
//! - [`storage`] - Remembered-token storage
//! - [`clock`] - Time source for expiry
//! - [`password`] - Argon2 password hashing
//! - [`events`] - Auth state change broadcast
//! - [`model`] - Users, sessions, response envelope
//! - [`error`] - Error types
//! - [`telemetry`] - Tracing setup
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use capshop_store::{SessionConfig, SessionSimulator};
//!
//! # async fn demo() -> Result<(), capshop_store::AuthError> {
//! let auth = SessionSimulator::in_memory(SessionConfig::load_or_default(None))?;
//! auth.sign_up("fan@capshop.test", "hunter22").await?;
//! let signed_in = auth.sign_in("fan@capshop.test", "hunter22").await?;
//! assert_eq!(auth.current_user().await, Some(signed_in.user));
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart_store;
pub mod clock;
pub mod config;
pub mod error;
pub mod events;
pub mod model;
pub mod password;
pub mod session;
pub mod storage;
pub mod telemetry;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart_store::CartStore;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::SessionConfig;
pub use error::{AuthError, AuthErrorKind, AuthResult, ConfigError, StorageError};
pub use events::{AuthEvent, AuthSubscription};
pub use model::{AuthResponse, PasswordResetAck, SessionInfo, SignInOutput, User};
pub use session::SessionSimulator;
pub use storage::{FileTokenStorage, MemoryTokenStorage, TokenStorage};
pub use telemetry::init_tracing;
