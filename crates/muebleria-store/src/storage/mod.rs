//! # Storage Module
//!
//! The persistence port the cart store writes through, and its backends.
//!
//! ## Port Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Storage Port Explained                               │
//! │                                                                         │
//! │  CartStore                                                             │
//! │       │                                                                 │
//! │       │  storage.get("cart") / storage.set("cart", json)               │
//! │       ▼                                                                 │
//! │  dyn CartStorage                                                       │
//! │  ├── get(&self, key)    -> Option<String>                              │
//! │  ├── set(&self, key, v)                                                │
//! │  └── remove(&self, key)                                                │
//! │       │                                                                 │
//! │       ├──► MemoryStorage  (tests, headless, quota/disabled simulation) │
//! │       └──► FileStorage    (one JSON file per key on local disk)        │
//! │                                                                         │
//! │  The store never asks "is there a browser?": a medium that is missing  │
//! │  or turned off simply answers StorageError::Unavailable.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Backends
//!
//! - [`MemoryStorage`] - In-process map with optional quota and kill switch
//! - [`FileStorage`] - Files under a data directory, written atomically

pub mod file;
pub mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::error::StorageResult;

/// A named-slot string store: the shape of browser `localStorage`.
///
/// Implementations must be safe to share between threads; the store holds
/// them behind an `Arc`.
pub trait CartStorage: Send + Sync {
    /// Reads a slot. `Ok(None)` means the slot was never written or was
    /// removed.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Replaces the slot's contents.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Deletes the slot. Removing a missing slot is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;
}
