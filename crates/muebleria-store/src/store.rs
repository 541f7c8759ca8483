//! # Cart Store
//!
//! The authoritative, persisted cart for one context.
//!
//! ## Mutation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    One Mutation                                         │
//! │                                                                         │
//! │  add_item(product, qty)                                                │
//! │       │                                                                 │
//! │       ├── 1. lock state                                                 │
//! │       ├── 2. read storage[key]  ──► sanitize ──► working copy          │
//! │       ├── 3. apply Cart rule to the copy  ──► Err? return, no write    │
//! │       ├── 4. write storage[key]           ──► Err? return, no commit   │
//! │       ├── 5. commit copy to memory, health = Ready                      │
//! │       ├── 6. unlock                                                     │
//! │       ├── 7. notify local listeners                                     │
//! │       └── 8. publish CartEvent (when a channel is attached)            │
//! │                                                                         │
//! │  Reads follow steps 1, 2 and 6. They never fail: a corrupt payload     │
//! │  reads as empty and unavailable storage falls back to the last         │
//! │  in-memory snapshot. Both mark the store Degraded.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use muebleria_core::validation::validate_storage_key;
use muebleria_core::{
    Cart, CartChange, CartLineItem, CartTotals, CheckoutLine, CoreResult, Money, Product,
    ProductId, DEFAULT_CART_KEY,
};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use ts_rs::TS;
use uuid::Uuid;

use crate::channel::{CartChannel, CartEvent};
use crate::error::{StorageError, StorageResult, StoreResult};
use crate::storage::CartStorage;
use crate::subscription::{ListenerRegistry, SharedRegistry, Subscription};

// =============================================================================
// Health
// =============================================================================

/// Whether the store last managed to talk to its storage medium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StoreHealth {
    Ready,

    /// The last read found a corrupt payload or unavailable storage, or the
    /// last write failed. Cleared by the next successful read or write.
    Degraded,
}

// =============================================================================
// Outcome
// =============================================================================

/// Serializable result of a mutation, for UI code.
///
/// ```json
/// { "success": false, "message": "Only 3 units of Sofá available" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartOutcome {
    pub success: bool,
    pub message: String,
}

impl From<&StoreResult<CartChange>> for CartOutcome {
    fn from(result: &StoreResult<CartChange>) -> Self {
        match result {
            Ok(change) => CartOutcome {
                success: true,
                message: change.to_string(),
            },
            Err(err) => CartOutcome {
                success: false,
                message: err.user_message(),
            },
        }
    }
}

impl From<StoreResult<CartChange>> for CartOutcome {
    fn from(result: StoreResult<CartChange>) -> Self {
        CartOutcome::from(&result)
    }
}

// =============================================================================
// Cart Store
// =============================================================================

struct StoreState {
    /// Last cart read from or written to storage.
    cache: Cart,
    health: StoreHealth,
}

/// Persisted, observable cart.
///
/// Share it as `Arc<CartStore>`. Every method takes `&self` and is safe to
/// call from any thread.
///
/// ## Example
/// ```rust
/// use std::sync::Arc;
/// use muebleria_core::{Money, Product, ProductId};
/// use muebleria_store::{CartStore, MemoryStorage};
///
/// let store = CartStore::new(Arc::new(MemoryStorage::new()));
/// let sofa = Product::new(ProductId::Int(1), "Sofá", Money::from_minor(150_000), "", 3).unwrap();
///
/// store.add_item(&sofa, 2).unwrap();
/// assert_eq!(store.get_item_count(), 2);
/// assert_eq!(store.get_total(), Money::from_minor(300_000));
/// ```
pub struct CartStore {
    key: String,
    origin: Uuid,
    storage: Arc<dyn CartStorage>,
    state: Mutex<StoreState>,
    listeners: SharedRegistry,
    channel: Option<CartChannel>,
}

impl CartStore {
    /// Creates a store on the default `"cart"` slot and loads it.
    pub fn new(storage: Arc<dyn CartStorage>) -> Self {
        let store = CartStore::new_unloaded(storage);
        store.load_initial();
        store
    }

    /// Creates a store on a named slot and loads it.
    pub fn open(storage: Arc<dyn CartStorage>, key: &str) -> StoreResult<Self> {
        validate_storage_key(key).map_err(StorageError::from)?;

        let mut store = CartStore::new_unloaded(storage);
        store.key = key.to_string();
        store.load_initial();
        Ok(store)
    }

    /// Attaches a cross-context channel. Successful mutations are published
    /// on it; call [`CartStore::watch_remote`] to also listen.
    pub fn with_channel(mut self, channel: CartChannel) -> Self {
        self.channel = Some(channel);
        self
    }

    fn new_unloaded(storage: Arc<dyn CartStorage>) -> Self {
        CartStore {
            key: DEFAULT_CART_KEY.to_string(),
            origin: Uuid::new_v4(),
            storage,
            state: Mutex::new(StoreState {
                cache: Cart::new(),
                health: StoreHealth::Ready,
            }),
            listeners: SharedRegistry::default(),
            channel: None,
        }
    }

    fn load_initial(&self) {
        let mut state = self.lock_state();
        let cart = self.load_locked(&mut state);
        info!(
            key = %self.key,
            lines = cart.line_count(),
            health = ?state.health,
            "Cart store initialized"
        );
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Current lines in insertion order. Never fails.
    pub fn get_items(&self) -> Vec<CartLineItem> {
        self.read(Cart::into_items)
    }

    pub fn get_item(&self, product_id: &ProductId) -> Option<CartLineItem> {
        self.read(|cart| cart.get(product_id).cloned())
    }

    /// Sum of quantities.
    pub fn get_item_count(&self) -> i64 {
        self.read(|cart| cart.item_count())
    }

    /// Sum of `quantity × unit_price`.
    pub fn get_total(&self) -> Money {
        self.read(|cart| cart.total())
    }

    pub fn totals(&self) -> CartTotals {
        self.read(|cart| cart.totals())
    }

    /// Lines as the checkout collaborator consumes them.
    pub fn checkout_lines(&self) -> Vec<CheckoutLine> {
        self.read(|cart| cart.checkout_lines())
    }

    pub fn health(&self) -> StoreHealth {
        self.lock_state().health
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Identity of this store on the event channel.
    pub fn origin(&self) -> Uuid {
        self.origin
    }

    pub fn listener_count(&self) -> usize {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds `quantity` units, merging into an existing line.
    pub fn add_item(&self, product: &Product, quantity: i64) -> StoreResult<CartChange> {
        debug!(product_id = %product.id, quantity, key = %self.key, "add_item");
        self.mutate("add_item", |cart| cart.add_item(product, quantity))
    }

    /// Sets a line's quantity. Zero or less removes the line.
    pub fn update_quantity(&self, product_id: &ProductId, quantity: i64) -> StoreResult<CartChange> {
        debug!(%product_id, quantity, key = %self.key, "update_quantity");
        self.mutate("update_quantity", |cart| cart.update_quantity(product_id, quantity))
    }

    pub fn remove_item(&self, product_id: &ProductId) -> StoreResult<CartChange> {
        debug!(%product_id, key = %self.key, "remove_item");
        self.mutate("remove_item", |cart| cart.remove_item(product_id))
    }

    /// Empties the cart. Always succeeds.
    ///
    /// If storage refuses the write the in-memory cart is still emptied and
    /// the store runs degraded until storage accepts a write again.
    pub fn clear_cart(&self) {
        debug!(key = %self.key, "clear_cart");

        let change = {
            let mut state = self.lock_state();
            let mut cart = Cart::new();
            let change = cart.clear();

            match self.persist(&cart) {
                Ok(()) => self.set_health(&mut state, StoreHealth::Ready),
                Err(e) => {
                    error!(key = %self.key, error = %e, "Failed to persist cleared cart, keeping it in memory");
                    self.set_health(&mut state, StoreHealth::Degraded);
                }
            }
            state.cache = cart;
            change
        };

        self.announce(change);
    }

    /// Registers a change listener. It runs once after every successful
    /// mutation, including ones from other contexts picked up by
    /// [`CartStore::watch_remote`].
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        ListenerRegistry::register(&self.listeners, Arc::new(listener))
    }

    // =========================================================================
    // Cross-Context Sync
    // =========================================================================

    /// Spawns a task that follows changes other contexts publish on the
    /// store's channel.
    ///
    /// For each event on this store's key from another origin the task
    /// re-reads storage and notifies local listeners. It holds only a weak
    /// reference, so it stops once the store is dropped (on the next event)
    /// or when the channel closes.
    ///
    /// Returns `None` when no channel is attached or when called outside a
    /// Tokio runtime.
    pub fn watch_remote(self: &Arc<Self>) -> Option<JoinHandle<()>> {
        let channel = self.channel.as_ref()?;
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                warn!(key = %self.key, error = %e, "No async runtime, remote changes will not be followed");
                return None;
            }
        };

        let mut events = channel.subscribe();
        let weak = Arc::downgrade(self);
        let key = self.key.clone();

        Some(runtime.spawn(async move {
            debug!(%key, "Watching remote cart changes");
            loop {
                let lagged = match events.recv().await {
                    Ok(event) => {
                        let Some(store) = weak.upgrade() else { break };
                        if !store.is_remote(&event) {
                            continue;
                        }
                        debug!(%key, origin = %event.origin, change = ?event.change, "Remote cart change");
                        store.refresh_from_remote();
                        continue;
                    }
                    Err(RecvError::Lagged(skipped)) => skipped,
                    Err(RecvError::Closed) => break,
                };

                // Missed events may include ours; reload once to catch up
                warn!(%key, skipped = lagged, "Cart watcher lagged, reloading");
                let Some(store) = weak.upgrade() else { break };
                store.refresh_from_remote();
            }
            debug!(%key, "Stopped watching remote cart changes");
        }))
    }

    fn is_remote(&self, event: &CartEvent) -> bool {
        event.origin != self.origin && event.key == self.key
    }

    fn refresh_from_remote(&self) {
        {
            let mut state = self.lock_state();
            self.load_locked(&mut state);
        }
        ListenerRegistry::notify(&self.listeners);
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn lock_state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn read<T>(&self, f: impl FnOnce(Cart) -> T) -> T {
        let cart = {
            let mut state = self.lock_state();
            self.load_locked(&mut state)
        };
        f(cart)
    }

    /// Reads the slot into `state.cache` and returns a copy of it.
    fn load_locked(&self, state: &mut StoreState) -> Cart {
        match self.storage.get(&self.key) {
            Ok(None) => {
                state.cache = Cart::new();
                self.set_health(state, StoreHealth::Ready);
            }
            Ok(Some(raw)) => match serde_json::from_str::<Vec<CartLineItem>>(&raw) {
                Ok(items) => {
                    let (cart, report) = Cart::from_persisted(items);
                    if !report.is_clean() {
                        warn!(
                            key = %self.key,
                            non_positive = ?report.non_positive,
                            duplicates = ?report.duplicates,
                            invalid_price = ?report.invalid_price,
                            "Discarded invalid persisted cart lines"
                        );
                    }
                    state.cache = cart;
                    self.set_health(state, StoreHealth::Ready);
                }
                Err(e) => {
                    warn!(key = %self.key, error = %e, "Corrupt cart payload, treating cart as empty");
                    state.cache = Cart::new();
                    self.set_health(state, StoreHealth::Degraded);
                }
            },
            Err(e) => {
                warn!(key = %self.key, error = %e, "Cart storage unavailable, using in-memory cart");
                self.set_health(state, StoreHealth::Degraded);
            }
        }
        state.cache.clone()
    }

    fn persist(&self, cart: &Cart) -> StorageResult<()> {
        let raw = serde_json::to_string(cart.items())?;
        self.storage.set(&self.key, &raw)
    }

    fn set_health(&self, state: &mut StoreState, health: StoreHealth) {
        if state.health == health {
            return;
        }
        match health {
            StoreHealth::Ready => info!(key = %self.key, "Cart storage recovered"),
            StoreHealth::Degraded => warn!(key = %self.key, "Cart store degraded"),
        }
        state.health = health;
    }

    fn mutate<F>(&self, operation: &'static str, apply: F) -> StoreResult<CartChange>
    where
        F: FnOnce(&mut Cart) -> CoreResult<CartChange>,
    {
        let change = {
            let mut state = self.lock_state();
            let mut cart = self.load_locked(&mut state);

            let change = apply(&mut cart).map_err(|e| {
                debug!(key = %self.key, operation, error = %e, "Cart rule rejected change");
                e
            })?;

            if let Err(e) = self.persist(&cart) {
                error!(key = %self.key, operation, error = %e, "Failed to persist cart");
                self.set_health(&mut state, StoreHealth::Degraded);
                return Err(e.into());
            }

            state.cache = cart;
            self.set_health(&mut state, StoreHealth::Ready);
            change
        };

        self.announce(change.clone());
        Ok(change)
    }

    /// Runs after the state lock is released.
    fn announce(&self, change: CartChange) {
        ListenerRegistry::notify(&self.listeners);

        if let Some(channel) = &self.channel {
            channel.publish(CartEvent {
                origin: self.origin,
                key: self.key.clone(),
                change,
            });
        }
    }
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("key", &self.key)
            .field("origin", &self.origin)
            .field("health", &self.health())
            .field("listeners", &self.listener_count())
            .field("channel", &self.channel.is_some())
            .finish()
    }
}
