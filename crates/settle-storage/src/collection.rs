//! Typed views over a single key of a [`KeyValueStore`].

use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use settle_core::error::SettleError;

use crate::store::KeyValueStore;

/// One JSON-encoded value stored under a fixed key.
pub struct JsonDocument<T> {
    store: Arc<dyn KeyValueStore>,
    key: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Serialize + DeserializeOwned> JsonDocument<T> {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            _marker: PhantomData,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read and decode the value. A missing key is `Ok(None)`.
    pub fn get(&self) -> Result<Option<T>, SettleError> {
        match self.store.get(&self.key)? {
            Some(raw) => {
                let value = serde_json::from_str(&raw).map_err(|e| {
                    SettleError::Serialization(format!("'{}' is not valid: {}", self.key, e))
                })?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    pub fn set(&self, value: &T) -> Result<(), SettleError> {
        let raw = serde_json::to_string(value)?;
        self.store.set(&self.key, &raw)
    }

    pub fn clear(&self) -> Result<bool, SettleError> {
        self.store.remove(&self.key)
    }
}

/// An ordered JSON array of records stored under a fixed key.
pub struct Collection<T> {
    doc: JsonDocument<Vec<T>>,
}

impl<T: Serialize + DeserializeOwned> Collection<T> {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            doc: JsonDocument::new(store, key),
        }
    }

    /// All records in insertion order. A missing key reads as empty.
    pub fn load(&self) -> Result<Vec<T>, SettleError> {
        Ok(self.doc.get()?.unwrap_or_default())
    }

    pub fn save(&self, items: &[T]) -> Result<(), SettleError> {
        let raw = serde_json::to_string(items)?;
        self.doc.store.set(&self.doc.key, &raw)
    }

    pub fn push(&self, item: T) -> Result<(), SettleError> {
        let mut items = self.load()?;
        items.push(item);
        self.save(&items)
    }

    /// Load, mutate and write back. The closure's result is returned after
    /// the write succeeds; if the closure fails nothing is written.
    pub fn update<F, R, E>(&self, f: F) -> Result<R, E>
    where
        F: FnOnce(&mut Vec<T>) -> Result<R, E>,
        E: From<SettleError>,
    {
        let mut items = self.load()?;
        let result = f(&mut items)?;
        self.save(&items)?;
        Ok(result)
    }
}

/// A boolean flag stored as the strings `"true"` / `"false"`.
pub struct Flag {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl Flag {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// A missing key reads as `false`.
    pub fn is_set(&self) -> Result<bool, SettleError> {
        Ok(self.store.get(&self.key)?.as_deref() == Some("true"))
    }

    pub fn set(&self, value: bool) -> Result<(), SettleError> {
        self.store
            .set(&self.key, if value { "true" } else { "false" })
    }
}
