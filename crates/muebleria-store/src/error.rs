//! # Store Error Types
//!
//! Error types for storage and cart store operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  Storage medium (io::Error, quota, disabled)                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StorageError ← Adds context and categorization                        │
//! │       │                                                                 │
//! │       ▼                     CoreError (stock, not found)               │
//! │  StoreError ◄──────────────────┘                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CartOutcome { success, message } ← Serialized for the UI              │
//! │                                                                         │
//! │  Nothing here panics or escapes as an unhandled failure: reads degrade │
//! │  to an empty or in-memory cart, writes degrade to a failed outcome.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use muebleria_core::{CoreError, ValidationError};
use thiserror::Error;

/// Message shown to shoppers when the cart could not be saved.
pub const SAVE_FAILED_MESSAGE: &str = "Could not save the cart. Please try again.";

// =============================================================================
// Storage Error
// =============================================================================

/// Failures of the persistence medium.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Storage is turned off or not present in this environment.
    ///
    /// ## When This Occurs
    /// - Browser storage disabled (private mode, policy)
    /// - Headless environment with no storage medium
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Writing would exceed the medium's capacity.
    #[error("Storage quota exceeded: {needed} bytes needed, {limit} allowed")]
    QuotaExceeded { needed: usize, limit: usize },

    /// File system failure in the file backend.
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The cart could not be encoded.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The slot name is not usable by the backend.
    #[error("Invalid storage key: {0}")]
    InvalidKey(#[from] ValidationError),
}

pub type StorageResult<T> = Result<T, StorageError>;

// =============================================================================
// Store Error
// =============================================================================

/// What a failed cart store operation returns.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A cart rule rejected the change (stock, not found, bad quantity).
    #[error(transparent)]
    Cart(#[from] CoreError),

    /// The change was valid but could not be persisted.
    #[error("Failed to persist cart: {0}")]
    Storage(#[from] StorageError),
}

impl StoreError {
    /// Text safe to show to a shopper.
    ///
    /// Business failures keep their message. Storage details stay in the
    /// logs and the shopper sees a generic message.
    pub fn user_message(&self) -> String {
        match self {
            StoreError::Cart(err) => err.to_string(),
            StoreError::Storage(_) => SAVE_FAILED_MESSAGE.to_string(),
        }
    }

    /// Returns true for persistence failures.
    pub fn is_storage(&self) -> bool {
        matches!(self, StoreError::Storage(_))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Config Error
// =============================================================================

/// Configuration loading and validation failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid cart configuration: {0}")]
    Invalid(String),

    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to encode config: {0}")]
    Encode(#[from] toml::ser::Error),

    #[error("No config path available")]
    NoPath,
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Unit Tests
// =============================================================================
