//! # Subscriptions
//!
//! Observer registry owned by each [`crate::CartStore`].
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Subscription Lifecycle                               │
//! │                                                                         │
//! │  store.subscribe(f) ──► registry.push((id, f)) ──► Subscription { id } │
//! │                                                                         │
//! │  mutation succeeds ──► registry.snapshot() ──► lock released ──► f()   │
//! │                                                                         │
//! │  sub.unsubscribe() ─┐                                                   │
//! │  drop(sub) ─────────┴──► registry.remove(id)   (other ids untouched)   │
//! │                                                                         │
//! │  sub.detach() ─────────► listener lives as long as the store           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Listeners take no arguments. After being called they read whatever they
//! need from the store.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, Weak};

/// A change callback.
pub type Listener = Arc<dyn Fn() + Send + Sync>;

pub(crate) type SharedRegistry = Arc<Mutex<ListenerRegistry>>;

#[derive(Default)]
pub(crate) struct ListenerRegistry {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

impl ListenerRegistry {
    pub(crate) fn register(registry: &SharedRegistry, listener: Listener) -> Subscription {
        let id = {
            let mut guard = registry.lock().unwrap_or_else(PoisonError::into_inner);
            let id = guard.next_id;
            guard.next_id += 1;
            guard.listeners.push((id, listener));
            id
        };

        Subscription {
            id,
            registry: Arc::downgrade(registry),
            active: true,
        }
    }

    /// Calls every listener registered at the time of the call. The
    /// registry lock is not held while listeners run, so a listener may
    /// subscribe, unsubscribe or read the store.
    pub(crate) fn notify(registry: &SharedRegistry) {
        let listeners: Vec<Listener> = {
            let guard = registry.lock().unwrap_or_else(PoisonError::into_inner);
            guard.listeners.iter().map(|(_, l)| Arc::clone(l)).collect()
        };

        for listener in listeners {
            listener();
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.len()
    }

    fn remove(&mut self, id: u64) {
        self.listeners.retain(|(existing, _)| *existing != id);
    }
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("next_id", &self.next_id)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Handle for one registered listener.
///
/// Dropping it unsubscribes. Call [`Subscription::detach`] to keep the
/// listener registered for the store's whole lifetime instead.
#[must_use = "dropping a Subscription unsubscribes its listener"]
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<ListenerRegistry>>,
    active: bool,
}

impl Subscription {
    /// Removes this listener. Other listeners are unaffected.
    pub fn unsubscribe(mut self) {
        self.release();
    }

    /// Leaves the listener registered and discards the handle.
    pub fn detach(mut self) {
        self.active = false;
    }

    fn release(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;

        if let Some(registry) = self.registry.upgrade() {
            registry
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> (Arc<AtomicUsize>, Listener) {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        (count, Arc::new(move || {
            c.fetch_add(1, Ordering::SeqCst);
        }))
    }

    #[test]
    fn test_unsubscribe_only_removes_own_listener() {
        let registry: SharedRegistry = Arc::default();
        let (a_count, a) = counter();
        let (b_count, b) = counter();

        let sub_a = ListenerRegistry::register(&registry, a);
        let _sub_b = ListenerRegistry::register(&registry, b);

        ListenerRegistry::notify(&registry);
        sub_a.unsubscribe();
        ListenerRegistry::notify(&registry);

        assert_eq!(a_count.load(Ordering::SeqCst), 1);
        assert_eq!(b_count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_drop_unsubscribes_and_detach_does_not() {
        let registry: SharedRegistry = Arc::default();
        let (dropped_count, dropped) = counter();
        let (kept_count, kept) = counter();

        drop(ListenerRegistry::register(&registry, dropped));
        ListenerRegistry::register(&registry, kept).detach();

        ListenerRegistry::notify(&registry);
        assert_eq!(dropped_count.load(Ordering::SeqCst), 0);
        assert_eq!(kept_count.load(Ordering::SeqCst), 1);
        assert_eq!(registry.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_subscription_outliving_registry_is_harmless() {
        let registry: SharedRegistry = Arc::default();
        let (_, listener) = counter();
        let sub = ListenerRegistry::register(&registry, listener);

        drop(registry);
        sub.unsubscribe();
    }
}
