//! [`KeyValueStore`] persisted in a single SQLite file.
//!
//! Every collection is one row of the `kv_store` table. The store owns its
//! connection; clones share it.

use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::{Connection, OptionalExtension};
use tracing::info;

use settle_core::error::SettleError;

use crate::migrations;
use crate::store::KeyValueStore;

fn storage_err(context: &str, e: impl std::fmt::Display) -> SettleError {
    SettleError::Storage(format!("{}: {}", context, e))
}

#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (or create) the store file at `path` and bring its schema up to
    /// date. Parent directories are created as needed.
    pub fn open(path: &Path) -> Result<Self, SettleError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path).map_err(|e| storage_err("Failed to open store", e))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA busy_timeout = 5000;",
        )
        .map_err(|e| storage_err("Failed to set pragmas", e))?;

        let store = Self::from_connection(conn)?;
        info!(path = %path.display(), keys = store.len()?, "Key-value store opened");
        Ok(store)
    }

    /// A throwaway store that lives as long as the value.
    pub fn in_memory() -> Result<Self, SettleError> {
        let conn =
            Connection::open_in_memory().map_err(|e| storage_err("Failed to open store", e))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, SettleError> {
        migrations::run_migrations(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Number of stored keys.
    pub fn len(&self) -> Result<usize, SettleError> {
        self.with_conn(|conn| {
            conn.query_row("SELECT COUNT(*) FROM kv_store", [], |row| row.get::<_, i64>(0))
                .map(|n| n as usize)
                .map_err(|e| storage_err("Failed to count keys", e))
        })
    }

    pub fn is_empty(&self) -> Result<bool, SettleError> {
        Ok(self.len()? == 0)
    }

    fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, SettleError>,
    ) -> Result<T, SettleError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| storage_err("Store lock poisoned", e))?;
        f(&conn)
    }
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore").finish_non_exhaustive()
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, SettleError> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                rusqlite::params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .map_err(|e| storage_err(&format!("Failed to read '{}'", key), e))
        })
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SettleError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO kv_store (key, value, updated_at)
                 VALUES (?1, ?2, strftime('%s', 'now'))
                 ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at",
                rusqlite::params![key, value],
            )
            .map_err(|e| storage_err(&format!("Failed to write '{}'", key), e))?;
            Ok(())
        })
    }

    fn remove(&self, key: &str) -> Result<bool, SettleError> {
        self.with_conn(|conn| {
            let affected = conn
                .execute("DELETE FROM kv_store WHERE key = ?1", rusqlite::params![key])
                .map_err(|e| storage_err(&format!("Failed to delete '{}'", key), e))?;
            Ok(affected > 0)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_store_starts_empty() {
        let store = SqliteStore::in_memory().unwrap();
        assert!(store.is_empty().unwrap());
        assert_eq!(store.get("settlespace_users").unwrap(), None);
    }

    #[test]
    fn test_keys_are_independent() {
        let store = SqliteStore::in_memory().unwrap();
        store.set("admin_chat_buyer-1", "true").unwrap();
        store.set("admin_chat_seller-1", "false").unwrap();
        assert_eq!(
            store.get("admin_chat_buyer-1").unwrap().as_deref(),
            Some("true")
        );
        assert_eq!(
            store.get("admin_chat_seller-1").unwrap().as_deref(),
            Some("false")
        );
        assert_eq!(store.len().unwrap(), 2);
    }

    #[test]
    fn test_clones_share_connection() {
        let a = SqliteStore::in_memory().unwrap();
        let b = a.clone();
        a.set("k", "v").unwrap();
        assert_eq!(b.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_file_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("settlespace.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            store.set("settlespace_chat_buyer-1", "[]").unwrap();
        }

        let reopened = SqliteStore::open(&path).unwrap();
        assert_eq!(
            reopened.get("settlespace_chat_buyer-1").unwrap().as_deref(),
            Some("[]")
        );
        assert_eq!(reopened.len().unwrap(), 1);
    }

    #[test]
    fn test_debug_hides_connection() {
        let store = SqliteStore::in_memory().unwrap();
        assert_eq!(format!("{:?}", store), "SqliteStore { .. }");
    }
}
