#![allow(dead_code)]

use cadence_core::{
    params::NewAgendaItem,
    session::{Command, MeetingSession, SessionBuilder},
    store::{MemoryStore, SqliteStore},
    ManualClock,
};
use tempfile::TempDir;

/// Helper function to create a facilitator session over an in-memory store
pub fn create_test_session() -> (MemoryStore, ManualClock, MeetingSession) {
    let store = MemoryStore::new();
    let clock = ManualClock::default();
    let session = SessionBuilder::new()
        .with_store(store.clone())
        .with_clock(clock.clone())
        .build()
        .expect("Failed to create session");
    (store, clock, session)
}

/// Helper function to open a SQLite store in a temporary directory
pub fn create_test_store() -> (TempDir, SqliteStore) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = SqliteStore::open(temp_dir.path().join("test.db")).expect("Failed to open store");
    (temp_dir, store)
}

/// Add `items` and confirm the agenda
pub fn start_meeting(session: &mut MeetingSession, items: &[(&str, i64)]) {
    for (title, minutes) in items {
        session
            .dispatch(Command::AddItem(NewAgendaItem::new(*title, *minutes)))
            .expect("Failed to add item");
    }
    session
        .dispatch(Command::ConfirmAgenda)
        .expect("Failed to confirm agenda");
}

/// Dispatch `count` ticks
pub fn tick(session: &mut MeetingSession, count: usize) {
    for _ in 0..count {
        session.dispatch(Command::Tick).expect("Failed to tick");
    }
}
