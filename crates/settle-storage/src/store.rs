//! The key-value seam every collection is read and written through.
//!
//! The marketplace keeps each logical collection (users, listings, the
//! operator mailbox, per-user chat history and flags) as one JSON value under
//! a well-known key. Components receive an `Arc<dyn KeyValueStore>` instead of
//! reaching for global state, so tests can swap in [`MemoryStore`].

use std::collections::HashMap;
use std::sync::Mutex;

use settle_core::error::SettleError;

/// Raw string get/set/remove per key.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, SettleError>;

    /// Insert or replace the value stored under `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), SettleError>;

    /// Delete `key`. Returns `true` if it existed.
    fn remove(&self, key: &str) -> Result<bool, SettleError>;
}

// =============================================================================
// MemoryStore
// =============================================================================

/// In-memory [`KeyValueStore`] for tests and throwaway runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, SettleError> {
        self.entries
            .lock()
            .map_err(|e| SettleError::Storage(format!("memory store lock poisoned: {}", e)))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, SettleError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SettleError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool, SettleError> {
        Ok(self.lock()?.remove(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::SqliteStore;

    fn exercise(store: &dyn KeyValueStore) {
        assert_eq!(store.get("missing").unwrap(), None);

        store.set("greeting", "hello").unwrap();
        assert_eq!(store.get("greeting").unwrap().as_deref(), Some("hello"));

        store.set("greeting", "namaste").unwrap();
        assert_eq!(store.get("greeting").unwrap().as_deref(), Some("namaste"));

        assert!(store.remove("greeting").unwrap());
        assert!(!store.remove("greeting").unwrap());
        assert_eq!(store.get("greeting").unwrap(), None);
    }

    #[test]
    fn test_sqlite_store_get_set_remove() {
        exercise(&SqliteStore::in_memory().unwrap());
    }

    #[test]
    fn test_memory_store_get_set_remove() {
        exercise(&MemoryStore::new());
    }
}
