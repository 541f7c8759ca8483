//! # muebleria-store: Persisted, Observable Cart Store
//!
//! Wraps the pure cart rules from `muebleria-core` with persistence,
//! change notification and cross-context sync.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cart Store Architecture                          │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                 CartView (render-ready snapshot)                 │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │ subscribe / actions                     │
//! │  ┌────────────────────────────▼─────────────────────────────────────┐  │
//! │  │                         CartStore                                │  │
//! │  │  read storage ──► Cart rule ──► write storage ──► notify         │  │
//! │  └──────┬──────────────────────┬──────────────────────────┬────────┘  │
//! │         ▼                      ▼                          ▼            │
//! │  ┌──────────────┐   ┌────────────────────┐   ┌────────────────────┐   │
//! │  │ CartStorage  │   │  ListenerRegistry  │   │    CartChannel     │   │
//! │  │ File / Memory│   │  Subscription RAII │   │ broadcast events   │   │
//! │  └──────────────┘   └────────────────────┘   └────────────────────┘   │
//! │                                                                         │
//! │  CartConfig picks the backend, slot key and currency.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`store`] - `CartStore`, health and `CartOutcome`
//! - [`storage`] - Storage port and its backends
//! - [`subscription`] - Listener handles
//! - [`channel`] - Cross-context change events
//! - [`view`] - Reactive view-model over a store
//! - [`config`] - TOML + environment configuration
//! - [`error`] - Storage, store and config errors

pub mod channel;
pub mod config;
pub mod error;
pub mod storage;
pub mod store;
pub mod subscription;
pub mod view;

pub use channel::{CartChannel, CartEvent};
pub use config::{CartConfig, StorageBackend, StorageSettings};
pub use error::{ConfigError, StorageError, StoreError, StoreResult};
pub use storage::{CartStorage, FileStorage, MemoryStorage};
pub use store::{CartOutcome, CartStore, StoreHealth};
pub use subscription::Subscription;
pub use view::{CartSnapshot, CartView};
