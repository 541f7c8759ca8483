//! # Cross-Context Channel
//!
//! Carries cart changes between store instances that share one storage
//! medium, the way a browser `storage` event reaches other tabs.
//!
//! ## Event Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cross-Context Sync                                   │
//! │                                                                         │
//! │  Context A (origin a1)                 Context B (origin b2)           │
//! │  ─────────────────────                 ─────────────────────           │
//! │  store.add_item(sofa, 1)                                               │
//! │       │ write storage["cart"]                                          │
//! │       │ notify A's listeners                                           │
//! │       ▼                                                                 │
//! │  channel.publish(CartEvent { origin: a1, key: "cart", .. })            │
//! │       │                                                                 │
//! │       └──────────────────────────────► watch_remote task               │
//! │                                            │ origin ≠ b2, key matches  │
//! │                                            ▼                            │
//! │                                        reload storage["cart"]          │
//! │                                        notify B's listeners            │
//! │                                                                         │
//! │  Events for another key, or from the same origin, are ignored.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Without a channel, two contexts sharing storage follow last-writer-wins
//! and only see each other's writes the next time they read.

use muebleria_core::CartChange;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::trace;
use uuid::Uuid;

/// Events buffered per receiver before a slow watcher starts lagging.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// A change published by one store instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEvent {
    /// Store instance that made the change.
    pub origin: Uuid,

    /// Storage slot that changed.
    pub key: String,

    pub change: CartChange,
}

/// Shared broadcast channel. Clone it into every store that should hear
/// the others.
#[derive(Debug, Clone)]
pub struct CartChannel {
    sender: broadcast::Sender<CartEvent>,
}

impl CartChannel {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        CartChannel { sender }
    }

    /// Sends an event to every current receiver. Having no receivers is
    /// normal (no other context is watching) and not an error.
    pub fn publish(&self, event: CartEvent) {
        match self.sender.send(event) {
            Ok(receivers) => trace!(receivers, "Cart event published"),
            Err(_) => trace!("Cart event dropped, no receivers"),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CartEvent> {
        self.sender.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for CartChannel {
    fn default() -> Self {
        CartChannel::new(DEFAULT_CHANNEL_CAPACITY)
    }
}
