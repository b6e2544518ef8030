//! # Local Storage
//!
//! String key/value storage with the same shape as the browser's
//! `localStorage`: values are raw strings and serialization is the caller's
//! job. Methods take `&self` because the browser object does; backends that
//! need mutation use interior mutability.
//!
//! Implementations:
//! - [`MemoryStorage`]: in-process map (tests, embedding)
//! - [`FileStorage`]: one file per key under a directory (CLI)
//! - `shop_wasm::WebStorage`: `window.localStorage`

use crate::error::{ShopError, ShopResult};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Key holding the cart snapshot
pub const CART_KEY: &str = "cart";

/// Key holding the session token
pub const TOKEN_KEY: &str = "token";

/// Key/value string storage
pub trait LocalStorage {
    /// Read the value under `key`; `Ok(None)` if absent
    fn get(&self, key: &str) -> ShopResult<Option<String>>;

    /// Write `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> ShopResult<()>;

    /// Delete `key`; deleting an absent key is not an error
    fn remove(&self, key: &str) -> ShopResult<()>;
}

impl<S: LocalStorage + ?Sized> LocalStorage for &S {
    fn get(&self, key: &str) -> ShopResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> ShopResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> ShopResult<()> {
        (**self).remove(key)
    }
}

impl<S: LocalStorage + ?Sized> LocalStorage for Rc<S> {
    fn get(&self, key: &str) -> ShopResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> ShopResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> ShopResult<()> {
        (**self).remove(key)
    }
}

/// In-memory storage. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MemoryStorage {
    /// Create empty storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Check if nothing is stored
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl LocalStorage for MemoryStorage {
    fn get(&self, key: &str) -> ShopResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> ShopResult<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> ShopResult<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// File-backed storage: each key is `<dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open storage rooted at `dir`, creating the directory if needed
    pub fn open(dir: impl Into<PathBuf>) -> ShopResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| {
            ShopError::Configuration(format!("cannot create data dir {}: {e}", dir.display()))
        })?;
        Ok(Self { dir })
    }

    /// Storage directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> ShopResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(ShopError::storage(key, "invalid key"));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl LocalStorage for FileStorage {
    fn get(&self, key: &str) -> ShopResult<Option<String>> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ShopError::storage(key, e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> ShopResult<()> {
        let path = self.path_for(key)?;
        // Readers never observe a partially written value
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value).map_err(|e| ShopError::storage(key, e))?;
        std::fs::rename(&tmp, &path).map_err(|e| ShopError::storage(key, e))
    }

    fn remove(&self, key: &str) -> ShopResult<()> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ShopError::storage(key, e)),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Storage whose every call fails, like a browser over quota
    #[derive(Debug, Default)]
    pub(crate) struct FailingStorage;

    impl LocalStorage for FailingStorage {
        fn get(&self, key: &str) -> ShopResult<Option<String>> {
            Err(ShopError::storage(key, "storage unavailable"))
        }

        fn set(&self, key: &str, _value: &str) -> ShopResult<()> {
            Err(ShopError::storage(key, "quota exceeded"))
        }

        fn remove(&self, key: &str) -> ShopResult<()> {
            Err(ShopError::storage(key, "storage unavailable"))
        }
    }

    pub(crate) fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("shop-core-test-{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_memory_storage_roundtrip() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get(CART_KEY).unwrap(), None);

        storage.set(CART_KEY, "[]").unwrap();
        assert_eq!(storage.get(CART_KEY).unwrap().as_deref(), Some("[]"));

        storage.remove(CART_KEY).unwrap();
        storage.remove(CART_KEY).unwrap();
        assert!(storage.is_empty());
    }

    #[test]
    fn test_memory_storage_clones_share_entries() {
        let storage = MemoryStorage::new();
        let handle = storage.clone();

        handle.set(TOKEN_KEY, "abc").unwrap();
        assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("abc"));
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn test_file_storage_roundtrip() {
        let dir = temp_dir();
        let storage = FileStorage::open(&dir).unwrap();

        assert_eq!(storage.get(CART_KEY).unwrap(), None);
        storage.set(CART_KEY, r#"[{"id":1}]"#).unwrap();
        storage.set(CART_KEY, "[]").unwrap();

        let reopened = FileStorage::open(&dir).unwrap();
        assert_eq!(reopened.get(CART_KEY).unwrap().as_deref(), Some("[]"));

        reopened.remove(CART_KEY).unwrap();
        reopened.remove(CART_KEY).unwrap();
        assert_eq!(storage.get(CART_KEY).unwrap(), None);

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_file_storage_rejects_path_keys() {
        let dir = temp_dir();
        let storage = FileStorage::open(&dir).unwrap();

        assert!(storage.set("../escape", "x").unwrap_err().is_storage());
        assert!(storage.get("").is_err());

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_rc_storage_delegates() {
        let storage = Rc::new(MemoryStorage::new());
        let shared = Rc::clone(&storage);

        shared.set(TOKEN_KEY, "t").unwrap();
        assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("t"));
    }
}
