//! File-backed storage: one JSON file per slot.
//!
//! ## Layout
//! ```text
//! <data_dir>/
//! ├── cart.json        ◄─── slot "cart"
//! └── cart.json.tmp    ◄─── only exists mid-write
//! ```
//!
//! Writes go to the `.tmp` file first and are renamed over the slot file,
//! so a crash mid-write leaves the previous cart intact.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use muebleria_core::validation::validate_storage_key;
use tracing::{debug, warn};

use crate::error::StorageResult;
use crate::storage::CartStorage;

#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Creates a backend rooted at `dir`. The directory is created on the
    /// first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStorage { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> StorageResult<PathBuf> {
        validate_storage_key(key)?;
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl CartStorage for FileStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.path_for(key)?;
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        // Bad UTF-8 is a damaged payload, not an unreadable medium. Hand it
        // on lossily so the store's parser rejects it as corrupt.
        match String::from_utf8(bytes) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) => {
                warn!(?path, "Slot is not valid UTF-8");
                Ok(Some(String::from_utf8_lossy(e.as_bytes()).into_owned()))
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;

        let tmp = path.with_extension("json.tmp");
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(value.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &path)?;

        debug!(?path, bytes = value.len(), "Slot written");
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;

    #[test]
    fn test_round_trip_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested"));

        assert_eq!(storage.get("cart").unwrap(), None);

        storage.set("cart", r#"[{"productId":1}]"#).unwrap();
        assert_eq!(
            storage.get("cart").unwrap().as_deref(),
            Some(r#"[{"productId":1}]"#)
        );
        assert!(dir.path().join("nested/cart.json").exists());
        assert!(!dir.path().join("nested/cart.json.tmp").exists());

        storage.remove("cart").unwrap();
        storage.remove("cart").unwrap();
        assert_eq!(storage.get("cart").unwrap(), None);
    }

    #[test]
    fn test_overwrite_replaces_contents() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());

        storage.set("cart", "[1,2,3]").unwrap();
        storage.set("cart", "[]").unwrap();
        assert_eq!(storage.get("cart").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_invalid_utf8_slot_is_returned_not_failed() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        fs::write(dir.path().join("cart.json"), [b'[', 0xff, 0xfe, b']']).unwrap();

        let raw = storage.get("cart").unwrap().unwrap();
        assert!(raw.starts_with('['));
        assert!(raw.contains('\u{fffd}'));
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());

        assert!(matches!(
            storage.set("../escape", "[]"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(
            storage.get("a/b"),
            Err(StorageError::InvalidKey(_))
        ));
    }
}
