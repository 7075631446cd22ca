//! Persistent key-value storage.
//!
//! The session and the settings treat the store as a local-storage analogue:
//! string keys mapping to whole JSON documents, read and written
//! synchronously. Two processes pointing at the same SQLite file share the
//! same documents, which is what the facilitator/participant sync relies on.
//! Every write replaces the previous document, so the last writer wins.

mod memory;
mod sqlite;

use serde::{de::DeserializeOwned, Serialize};

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::Result;

/// String-keyed document store.
pub trait Store: Send + Sync {
    /// Read the raw JSON document stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the document stored under `key`.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`; removing a missing key is not an error.
    fn delete(&self, key: &str) -> Result<()>;

    /// Remove every key.
    fn clear(&self) -> Result<()>;

    /// List keys starting with `prefix`, sorted.
    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>>;
}

/// Typed JSON access on top of any [`Store`].
pub trait StoreExt: Store {
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.set(key, &raw)
    }
}

impl<S: Store + ?Sized> StoreExt for S {}

/// Well-known store keys.
pub mod keys {
    pub const TEAM_MEMBERS: &str = "teamMembers";
    pub const OVERTIME_REASONS: &str = "overtimeReasons";
    pub const AGENDA_TEMPLATES: &str = "agendaTemplates";
    pub const CURRENT_THEME: &str = "currentTheme";
    pub const CURRENT_FONT_SIZE: &str = "currentFontSize";
    pub const SESSION_BACKUP: &str = "sessionBackup";

    /// Key of the snapshot a facilitator publishes for `meeting_id`.
    pub fn shared_session(meeting_id: &str) -> String {
        format!("sharedSession:{meeting_id}")
    }

    /// Prefix of every participant heartbeat for `meeting_id`.
    pub fn presence_prefix(meeting_id: &str) -> String {
        format!("sharedPresence:{meeting_id}:")
    }

    /// Key of one participant's heartbeat.
    pub fn presence(meeting_id: &str, participant_id: &str) -> String {
        format!("{}{participant_id}", presence_prefix(meeting_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_helpers_round_trip_values() {
        let store = MemoryStore::new();
        store
            .set_json(keys::TEAM_MEMBERS, &vec!["Ada", "Grace"])
            .unwrap();
        let members: Vec<String> = store.get_json(keys::TEAM_MEMBERS).unwrap().unwrap();
        assert_eq!(members, vec!["Ada", "Grace"]);
    }

    #[test]
    fn test_get_json_reports_corrupt_documents() {
        let store = MemoryStore::new();
        store.set(keys::TEAM_MEMBERS, "{not json").unwrap();
        assert!(store.get_json::<Vec<String>>(keys::TEAM_MEMBERS).is_err());
    }

    #[test]
    fn test_presence_keys_share_prefix() {
        let key = keys::presence("m1", "p1");
        assert!(key.starts_with(&keys::presence_prefix("m1")));
        assert!(!key.starts_with(&keys::presence_prefix("m")));
    }
}
