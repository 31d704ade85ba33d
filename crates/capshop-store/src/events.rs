//! # Auth State Events
//!
//! Listeners learn about sign-in/sign-out through a broadcast channel
//! instead of registered callbacks.
//!
//! ## Subscription Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  let mut sub = simulator.subscribe();    ◄── receives events from now   │
//! │       │                                                                 │
//! │       ├── sub.recv().await  → Some(AuthEvent::SignedIn { .. })          │
//! │       ├── sub.try_recv()    → None (nothing pending)                    │
//! │       │                                                                 │
//! │  sub.unsubscribe();  /  drop(sub);       ◄── detached, nothing buffered │
//! │                                                                         │
//! │  Publishing with zero subscribers is not an error; the event is        │
//! │  simply dropped.                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{trace, warn};

use crate::model::User;

/// Events buffered per subscriber before the slowest one starts lagging.
const EVENT_BUFFER: usize = 64;

/// A change in authentication state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthEvent {
    SignedIn { user: User },
    SignedOut,
    /// A lookup found the remembered session past its expiry.
    SessionExpired,
    PasswordUpdated { user: User },
}

/// Fan-out of [`AuthEvent`]s to any number of subscribers.
#[derive(Debug, Clone)]
pub struct AuthEventBus {
    tx: broadcast::Sender<AuthEvent>,
}

impl AuthEventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_BUFFER);
        AuthEventBus { tx }
    }

    /// Publishes an event. Returns how many subscribers got it.
    pub fn publish(&self, event: AuthEvent) -> usize {
        match self.tx.send(event) {
            Ok(n) => n,
            Err(broadcast::error::SendError(event)) => {
                trace!(?event, "No auth listeners");
                0
            }
        }
    }

    pub fn subscribe(&self) -> AuthSubscription {
        AuthSubscription {
            rx: self.tx.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for AuthEventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// A live subscription. Dropping it unsubscribes.
#[derive(Debug)]
pub struct AuthSubscription {
    rx: broadcast::Receiver<AuthEvent>,
}

impl AuthSubscription {
    /// Waits for the next event.
    ///
    /// Returns `None` once the bus is gone. If this subscriber fell behind,
    /// the missed events are skipped and the next available one returned.
    pub async fn recv(&mut self) -> Option<AuthEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Auth subscriber lagged, events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Returns a pending event without waiting.
    pub fn try_recv(&mut self) -> Option<AuthEvent> {
        loop {
            match self.rx.try_recv() {
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "Auth subscriber lagged, events dropped");
                }
                Err(_) => return None,
            }
        }
    }

    /// Detaches from the bus. Same as dropping the subscription.
    pub fn unsubscribe(self) {}
}
