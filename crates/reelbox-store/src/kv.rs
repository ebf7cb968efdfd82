use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection, OptionalExtension};

use reelbox_core::error::ReelboxError;

/// A store of named text blobs.
pub trait KvStore: Send + Sync {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, ReelboxError>;

    /// Replace the value stored under `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), ReelboxError>;
}

/// SQLite-backed store using the `kv` table.
pub struct SqliteKvStore {
    conn: Mutex<Connection>,
}

impl SqliteKvStore {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Open the database at `path`, creating and migrating it when needed.
    pub fn open(path: &Path) -> Result<Self, ReelboxError> {
        let conn = crate::open_db(path).map_err(|e| ReelboxError::Storage(e.to_string()))?;
        Ok(Self::new(conn))
    }

    pub fn open_in_memory() -> Result<Self, ReelboxError> {
        let conn = crate::open_memory_db().map_err(|e| ReelboxError::Storage(e.to_string()))?;
        Ok(Self::new(conn))
    }

    fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> rusqlite::Result<T>,
    ) -> Result<T, ReelboxError> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| ReelboxError::Storage("connection lock poisoned".into()))?;
        f(&conn).map_err(|e| ReelboxError::Storage(e.to_string()))
    }
}

impl KvStore for SqliteKvStore {
    fn get(&self, key: &str) -> Result<Option<String>, ReelboxError> {
        self.with_conn(|conn| {
            conn.query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()
        })
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ReelboxError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, value],
            )
        })?;
        tracing::debug!(key, bytes = value.len(), "kv write");
        Ok(())
    }
}

/// In-memory store for testing.
pub struct MemoryKvStore {
    store: Mutex<HashMap<String, String>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self {
            store: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MemoryKvStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KvStore for MemoryKvStore {
    fn get(&self, key: &str) -> Result<Option<String>, ReelboxError> {
        let store = self
            .store
            .lock()
            .map_err(|_| ReelboxError::Storage("store lock poisoned".into()))?;
        Ok(store.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ReelboxError> {
        let mut store = self
            .store
            .lock()
            .map_err(|_| ReelboxError::Storage("store lock poisoned".into()))?;
        store.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl<T: KvStore + ?Sized> KvStore for std::sync::Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, ReelboxError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ReelboxError> {
        (**self).set(key, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_get_set() {
        let store = MemoryKvStore::new();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v1").unwrap();
        store.set("k", "v2").unwrap();
        assert_eq!(store.get("k").unwrap(), Some("v2".to_string()));
    }

    #[test]
    fn test_sqlite_store_upsert() {
        let store = SqliteKvStore::open_in_memory().unwrap();
        assert_eq!(store.get("movieCollections").unwrap(), None);
        store.set("movieCollections", "[]").unwrap();
        store.set("movieCollections", "[1]").unwrap();
        assert_eq!(
            store.get("movieCollections").unwrap(),
            Some("[1]".to_string())
        );
    }

    #[test]
    fn test_sqlite_store_persists_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("reelbox.db");
        {
            let store = SqliteKvStore::open(&path).unwrap();
            store.set("a", "hello").unwrap();
        }
        let reopened = SqliteKvStore::open(&path).unwrap();
        assert_eq!(reopened.get("a").unwrap(), Some("hello".to_string()));
    }
}
