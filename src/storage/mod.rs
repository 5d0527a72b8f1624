//! Local persistent key-value store
//!
//! Plays the role of browser local storage for the portal: recent searches,
//! the selected language and the sidebar layout live here and survive restarts.
//! Values are plain strings; callers encode structured values as JSON.

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::StoreError;

pub mod file_store;

pub use file_store::FileStore;

/// Well-known keys
pub mod keys {
    pub const RECENT_SEARCHES: &str = "recentSearches";
    pub const LANGUAGE: &str = "language";
    pub const SIDEBAR_EXPANDED: &str = "sidebarExpanded";
    pub const SIDEBAR_COLLAPSED: &str = "sidebarCollapsed";
}

/// Key-value store interface (primitive operations only)
pub trait KeyValueStore: Send + Sync {
    /// Read raw value
    fn get(&self, key: &str) -> Option<String>;

    /// Write raw value
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove key, no-op if missing
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Read and decode a JSON value.
///
/// A missing key and an undecodable value both yield `None`; the latter is
/// logged so corrupt entries can be spotted.
pub fn get_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = store.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("Ignoring malformed local store value for {}: {}", key, e);
            None
        }
    }
}

/// Encode and write a JSON value
pub fn set_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}

/// In-memory store, lost on restart
#[derive(Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.values.write().remove(key);
        Ok(())
    }
}

/// One user's slice of a shared store: every key is prefixed with `<scope>/`
pub struct ScopedStore {
    inner: Arc<dyn KeyValueStore>,
    prefix: String,
}

impl ScopedStore {
    pub fn new(inner: Arc<dyn KeyValueStore>, scope: &str) -> Self {
        Self {
            inner,
            prefix: format!("{}/", scope),
        }
    }

    fn key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }
}

impl KeyValueStore for ScopedStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(&self.key(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.inner.set(&self.key(key), value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.inner.remove(&self.key(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_helpers() {
        let store = MemoryStore::new();
        set_json(&store, "list", &vec!["a", "b"]).unwrap();
        let list: Option<Vec<String>> = get_json(&store, "list");
        assert_eq!(list, Some(vec!["a".to_string(), "b".to_string()]));

        store.set("broken", "{not json").unwrap();
        let broken: Option<Vec<String>> = get_json(&store, "broken");
        assert!(broken.is_none());

        store.remove("list").unwrap();
        assert!(store.get("list").is_none());
    }

    #[test]
    fn test_scopes_do_not_share_keys() {
        let shared: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let admin = ScopedStore::new(shared.clone(), "user:u-admin");
        let guest = ScopedStore::new(shared.clone(), "guest");

        admin.set(keys::LANGUAGE, "en").unwrap();
        assert_eq!(admin.get(keys::LANGUAGE).as_deref(), Some("en"));
        assert!(guest.get(keys::LANGUAGE).is_none());
        assert_eq!(shared.get("user:u-admin/language").as_deref(), Some("en"));

        admin.remove(keys::LANGUAGE).unwrap();
        assert!(shared.get("user:u-admin/language").is_none());
    }
}
