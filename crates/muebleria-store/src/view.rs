//! # Cart View-Model
//!
//! Keeps a render-ready snapshot of a [`CartStore`] up to date.
//!
//! ```text
//! CartStore ──notify──► CartView listener ──► snapshot = {items, total, itemCount}
//!     ▲                                                │
//!     └──────── add_item / update_quantity ◄───────────┘  (actions → CartOutcome)
//! ```
//!
//! The view holds the store weakly and owns its subscription, so dropping
//! the view detaches it and neither side keeps the other alive.

use std::sync::{Arc, PoisonError, RwLock, Weak};

use muebleria_core::{CartChange, CartLineItem, Money, Product, ProductId};
use serde::Serialize;
use ts_rs::TS;

use crate::error::StoreResult;
use crate::store::{CartOutcome, CartStore};
use crate::subscription::Subscription;

const STORE_GONE_MESSAGE: &str = "The cart is no longer available";

/// What rendering code reads.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    pub items: Vec<CartLineItem>,
    pub total: Money,
    pub item_count: i64,

    /// True until the first load from the store completes.
    pub is_loading: bool,
}

impl CartSnapshot {
    fn loading() -> Self {
        CartSnapshot {
            items: Vec::new(),
            total: Money::zero(),
            item_count: 0,
            is_loading: true,
        }
    }

    fn read(store: &CartStore) -> Self {
        let items = store.get_items();
        let total = items.iter().map(CartLineItem::line_total).sum();
        let item_count = items
            .iter()
            .fold(0_i64, |count, line| count.saturating_add(line.quantity));
        CartSnapshot {
            items,
            total,
            item_count,
            is_loading: false,
        }
    }
}

type SharedSnapshot = Arc<RwLock<CartSnapshot>>;

fn refresh(store: &Weak<CartStore>, snapshot: &SharedSnapshot) {
    if let Some(store) = store.upgrade() {
        let fresh = CartSnapshot::read(&store);
        *snapshot.write().unwrap_or_else(PoisonError::into_inner) = fresh;
    }
}

/// Reactive adapter over a shared store.
#[derive(Debug)]
pub struct CartView {
    store: Weak<CartStore>,
    snapshot: SharedSnapshot,
    _subscription: Subscription,
}

impl CartView {
    /// Subscribes to `store` without reading it yet. The snapshot reports
    /// `is_loading` until [`CartView::load`] runs or the store changes.
    pub fn new(store: &Arc<CartStore>) -> Self {
        let weak = Arc::downgrade(store);
        let snapshot: SharedSnapshot = Arc::new(RwLock::new(CartSnapshot::loading()));

        let subscription = {
            let weak = weak.clone();
            let snapshot = Arc::clone(&snapshot);
            store.subscribe(move || refresh(&weak, &snapshot))
        };

        CartView {
            store: weak,
            snapshot,
            _subscription: subscription,
        }
    }

    /// Subscribes and performs the first load.
    pub fn attach(store: &Arc<CartStore>) -> Self {
        let view = CartView::new(store);
        view.load();
        view
    }

    pub fn load(&self) {
        refresh(&self.store, &self.snapshot);
    }

    pub fn snapshot(&self) -> CartSnapshot {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_loading(&self) -> bool {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_loading
    }

    // =========================================================================
    // Actions
    // =========================================================================

    pub fn add_item(&self, product: &Product, quantity: i64) -> CartOutcome {
        self.act(|store| store.add_item(product, quantity))
    }

    pub fn update_quantity(&self, product_id: &ProductId, quantity: i64) -> CartOutcome {
        self.act(|store| store.update_quantity(product_id, quantity))
    }

    pub fn remove_item(&self, product_id: &ProductId) -> CartOutcome {
        self.act(|store| store.remove_item(product_id))
    }

    pub fn clear_cart(&self) -> CartOutcome {
        self.act(|store| {
            store.clear_cart();
            Ok(CartChange::Cleared)
        })
    }

    fn act(&self, f: impl FnOnce(&CartStore) -> StoreResult<CartChange>) -> CartOutcome {
        match self.store.upgrade() {
            Some(store) => CartOutcome::from(f(&store)),
            None => CartOutcome {
                success: false,
                message: STORE_GONE_MESSAGE.to_string(),
            },
        }
    }
}
