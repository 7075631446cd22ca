//! SQLite-backed store.

use std::{
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
    time::Duration,
};

use jiff::Timestamp;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};

use super::Store;
use crate::{
    error::{SessionError, StorageResultExt},
    Result,
};

/// A [`Store`] persisted in a single SQLite table.
///
/// Several processes may open the same file; SQLite serializes their writes
/// and each write replaces a whole document.
pub struct SqliteStore {
    connection: Mutex<Connection>,
    path: PathBuf,
}

impl SqliteStore {
    /// Opens (creating if needed) the store at `path` and initializes the
    /// schema. Parent directories are created as required.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| SessionError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let connection =
            Connection::open(&path).storage_context("Failed to open store connection")?;
        connection
            .busy_timeout(Duration::from_secs(2))
            .storage_context("Failed to configure busy timeout")?;
        connection
            .execute_batch(include_str!("../../assets/schema.sql"))
            .storage_context("Failed to initialize store schema")?;

        debug!("Opened store at {}", path.display());

        Ok(Self {
            connection: Mutex::new(connection),
            path,
        })
    }

    /// Opens the store at the default location following the XDG Base
    /// Directory specification: `$XDG_DATA_HOME/cadence/cadence.db`.
    pub fn open_default() -> Result<Self> {
        Self::open(Self::default_path()?)
    }

    /// Returns the default store path.
    pub fn default_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("cadence")
            .place_data_file("cadence.db")
            .map_err(|e| SessionError::XdgDirectory(e.to_string()))
    }

    /// Location of the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.connection
            .lock()
            .map_err(|_| SessionError::StorageUnavailable {
                message: "store connection lock poisoned".to_string(),
            })
    }
}

impl Store for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.conn()?
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()
            .storage_context("Failed to read key")
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let now = Timestamp::now().to_string();
        self.conn()?
            .execute(
                "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3) \
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, value, now],
            )
            .storage_context("Failed to write key")?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.conn()?
            .execute("DELETE FROM kv WHERE key = ?1", params![key])
            .storage_context("Failed to delete key")?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.conn()?
            .execute("DELETE FROM kv", [])
            .storage_context("Failed to clear store")?;
        Ok(())
    }

    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare("SELECT key FROM kv WHERE substr(key, 1, length(?1)) = ?1 ORDER BY key")
            .storage_context("Failed to prepare key listing")?;
        let keys = stmt
            .query_map(params![prefix], |row| row.get::<_, String>(0))
            .storage_context("Failed to list keys")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .storage_context("Failed to read key listing")?;
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (TempDir, SqliteStore) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = SqliteStore::open(temp_dir.path().join("nested/test.db"))
            .expect("Failed to open store");
        (temp_dir, store)
    }

    #[test]
    fn test_set_overwrites_previous_value() {
        let (_temp_dir, store) = create_test_store();
        store.set("k", "1").unwrap();
        store.set("k", "2").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_missing_key_is_none() {
        let (_temp_dir, store) = create_test_store();
        assert_eq!(store.get("missing").unwrap(), None);
        store.delete("missing").unwrap();
    }

    #[test]
    fn test_prefix_listing_ignores_like_wildcards() {
        let (_temp_dir, store) = create_test_store();
        store.set("a_b:1", "x").unwrap();
        store.set("axb:1", "x").unwrap();
        assert_eq!(store.keys_with_prefix("a_b:").unwrap(), vec!["a_b:1"]);
    }
}
