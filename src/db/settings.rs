use std::collections::HashMap;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

/// Minimal string key-value persistence. The favorites store only ever needs
/// to read and overwrite a single serialized value.
pub trait KeyValueStore {
    /// Fetch the value stored under `key`, or `None` when nothing was saved.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Key-value store backed by the `settings` table.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Wrap a connection whose schema was prepared by `ensure_schema` or
    /// `open_in_memory`.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .with_context(|| format!("failed to read setting `{key}`"))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO settings (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )
            .with_context(|| format!("failed to write setting `{key}`"))?;
        Ok(())
    }
}

/// Volatile store used by tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store with a single value.
    pub fn with_value(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.values.insert(key.to_string(), value.to_string());
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;

    #[test]
    fn test_sqlite_store_get_missing_key() {
        let store = SqliteStore::new(open_in_memory().unwrap());
        assert_eq!(store.get("favorites").unwrap(), None);
    }

    #[test]
    fn test_sqlite_store_overwrites_value() {
        let mut store = SqliteStore::new(open_in_memory().unwrap());
        store.set("favorites", "[1]").unwrap();
        store.set("favorites", "[1,2]").unwrap();
        assert_eq!(store.get("favorites").unwrap().as_deref(), Some("[1,2]"));
        assert_eq!(store.get("other").unwrap(), None);
    }

    #[test]
    fn test_sqlite_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.sqlite");

        let mut store = SqliteStore::new(crate::db::ensure_schema(&path).unwrap());
        store.set("favorites", "[3]").unwrap();
        drop(store);

        let reopened = SqliteStore::new(crate::db::ensure_schema(&path).unwrap());
        assert_eq!(reopened.get("favorites").unwrap().as_deref(), Some("[3]"));
    }

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryStore::with_value("favorites", "[]");
        assert_eq!(store.get("favorites").unwrap().as_deref(), Some("[]"));
        store.set("favorites", "[4]").unwrap();
        assert_eq!(store.get("favorites").unwrap().as_deref(), Some("[4]"));
    }
}
