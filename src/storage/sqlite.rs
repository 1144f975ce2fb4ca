//! SQLite storage implementation.
//!
//! A single `kv` table holds every persisted value. Multi-key writes go
//! through one transaction so a commit of history plus `updatedAt` is
//! never observed half-applied.

use crate::error::Result;
use crate::storage::KvStore;
use crate::storage::schema::apply_schema;
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;
use std::time::Duration;

/// SQLite-based storage backend.
#[derive(Debug)]
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Open a database at the given path.
    ///
    /// Creates the database and applies schema if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or schema fails.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_timeout(path, None)
    }

    /// Open a database with an optional busy timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or schema fails.
    pub fn open_with_timeout(path: &Path, timeout_ms: Option<u64>) -> Result<Self> {
        let conn = Connection::open(path)?;

        if let Some(timeout) = timeout_ms {
            conn.busy_timeout(Duration::from_millis(timeout))?;
        } else {
            // Default 5 second timeout
            conn.busy_timeout(Duration::from_secs(5))?;
        }

        apply_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        apply_schema(&conn)?;
        Ok(Self { conn })
    }
}

impl KvStore for SqliteStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.set_many(&[(key, value)])
    }

    fn clear(&mut self, key: &str) -> Result<()> {
        self.conn.execute("DELETE FROM kv WHERE key = ?1", [key])?;
        Ok(())
    }

    fn set_many(&mut self, pairs: &[(&str, &str)]) -> Result<()> {
        let now = chrono::Utc::now().timestamp_millis();
        let tx = self.conn.transaction()?;
        for (key, value) in pairs {
            tx.execute(
                "INSERT INTO kv (key, value, updated_at)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET
                   value = excluded.value,
                   updated_at = excluded.updated_at",
                rusqlite::params![key, value, now],
            )?;
        }
        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn stored_keys(storage: &SqliteStorage) -> Vec<String> {
        let mut stmt = storage.conn.prepare("SELECT key FROM kv ORDER BY key").unwrap();
        let keys = stmt
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<rusqlite::Result<Vec<String>>>()
            .unwrap();
        keys
    }

    #[test]
    fn test_open_memory() {
        let storage = SqliteStorage::open_memory();
        assert!(storage.is_ok());
    }

    #[test]
    fn test_get_missing_key_is_none() {
        let storage = SqliteStorage::open_memory().unwrap();
        assert_eq!(storage.get("nope").unwrap(), None);
    }

    #[test]
    fn test_set_get_clear() {
        let mut storage = SqliteStorage::open_memory().unwrap();

        storage.set("wt_auth_token", "\"abc\"").unwrap();
        assert_eq!(storage.get("wt_auth_token").unwrap().as_deref(), Some("\"abc\""));

        // Overwrite
        storage.set("wt_auth_token", "\"def\"").unwrap();
        assert_eq!(storage.get("wt_auth_token").unwrap().as_deref(), Some("\"def\""));

        storage.clear("wt_auth_token").unwrap();
        assert_eq!(storage.get("wt_auth_token").unwrap(), None);

        // Clearing again is fine
        storage.clear("wt_auth_token").unwrap();
    }

    #[test]
    fn test_set_many_writes_all_keys() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        storage
            .set_many(&[("wt_history", "{}"), ("wt_updated_at", "42")])
            .unwrap();

        assert_eq!(stored_keys(&storage), vec!["wt_history", "wt_updated_at"]);
        assert_eq!(storage.get("wt_updated_at").unwrap().as_deref(), Some("42"));
    }

    #[test]
    fn test_values_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("wt.db");

        {
            let mut storage = SqliteStorage::open(&db_path).unwrap();
            storage.set("wt_templates", "{\"push\":[]}").unwrap();
        }

        let storage = SqliteStorage::open(&db_path).unwrap();
        assert_eq!(
            storage.get("wt_templates").unwrap().as_deref(),
            Some("{\"push\":[]}")
        );
    }
}
