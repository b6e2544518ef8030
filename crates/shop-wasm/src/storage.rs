//! Browser storage backends

use shop_core::{LocalStorage, MemoryStorage, ShopError, ShopResult};
use wasm_bindgen::JsValue;

fn js_error(key: &str, err: JsValue) -> ShopError {
    ShopError::storage(key, err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

/// `window.localStorage`
#[derive(Debug, Clone)]
pub struct WebStorage {
    inner: web_sys::Storage,
}

impl WebStorage {
    /// The current window's local storage, if the browser allows it
    pub fn from_window() -> Option<Self> {
        let window = web_sys::window()?;
        let inner = window.local_storage().ok().flatten()?;
        Some(Self { inner })
    }
}

impl LocalStorage for WebStorage {
    fn get(&self, key: &str) -> ShopResult<Option<String>> {
        self.inner.get_item(key).map_err(|e| js_error(key, e))
    }

    fn set(&self, key: &str, value: &str) -> ShopResult<()> {
        self.inner.set_item(key, value).map_err(|e| js_error(key, e))
    }

    fn remove(&self, key: &str) -> ShopResult<()> {
        self.inner.remove_item(key).map_err(|e| js_error(key, e))
    }
}

/// Local storage when available, otherwise an in-memory map that lasts
/// for the page's lifetime (private browsing, sandboxed iframes)
#[derive(Debug, Clone)]
pub enum BrowserStorage {
    Web(WebStorage),
    Memory(MemoryStorage),
}

impl BrowserStorage {
    pub fn detect() -> Self {
        match WebStorage::from_window() {
            Some(web) => BrowserStorage::Web(web),
            None => {
                crate::log("localStorage unavailable; cart will not survive a reload");
                BrowserStorage::Memory(MemoryStorage::new())
            }
        }
    }

    /// Whether the cart survives a page reload
    pub fn is_persistent(&self) -> bool {
        matches!(self, BrowserStorage::Web(_))
    }
}

impl LocalStorage for BrowserStorage {
    fn get(&self, key: &str) -> ShopResult<Option<String>> {
        match self {
            BrowserStorage::Web(s) => s.get(key),
            BrowserStorage::Memory(s) => s.get(key),
        }
    }

    fn set(&self, key: &str, value: &str) -> ShopResult<()> {
        match self {
            BrowserStorage::Web(s) => s.set(key, value),
            BrowserStorage::Memory(s) => s.set(key, value),
        }
    }

    fn remove(&self, key: &str) -> ShopResult<()> {
        match self {
            BrowserStorage::Web(s) => s.remove(key),
            BrowserStorage::Memory(s) => s.remove(key),
        }
    }
}
