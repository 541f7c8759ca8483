//! In-memory storage backend.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::error::{StorageError, StorageResult};
use crate::storage::CartStorage;

/// Browser-storage stand-in kept in process memory.
///
/// Besides plain get/set it can model the two ways real browser storage
/// fails: a byte quota across all slots, and storage being switched off.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: Mutex<HashMap<String, String>>,
    quota_bytes: Option<usize>,
    disabled: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limits the total size of all slots (keys plus values, in bytes).
    pub fn with_quota(quota_bytes: usize) -> Self {
        MemoryStorage {
            quota_bytes: Some(quota_bytes),
            ..Self::default()
        }
    }

    /// Turns the medium off (or back on). While disabled every call
    /// returns [`StorageError::Unavailable`]; contents are kept.
    pub fn set_disabled(&self, disabled: bool) {
        self.disabled.store(disabled, Ordering::SeqCst);
    }

    /// Writes a slot directly, bypassing quota. For seeding test fixtures
    /// such as corrupt payloads.
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.lock().insert(key.to_string(), value.to_string());
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_enabled(&self) -> StorageResult<()> {
        if self.disabled.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(
                "memory storage is disabled".to_string(),
            ));
        }
        Ok(())
    }
}

impl CartStorage for MemoryStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.check_enabled()?;
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.check_enabled()?;
        let mut slots = self.lock();

        if let Some(limit) = self.quota_bytes {
            let others: usize = slots
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = others + key.len() + value.len();
            if needed > limit {
                return Err(StorageError::QuotaExceeded { needed, limit });
            }
        }

        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.check_enabled()?;
        self.lock().remove(key);
        Ok(())
    }
}
