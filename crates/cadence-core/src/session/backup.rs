//! Auto-save and crash recovery.
//!
//! While a meeting runs, the full session state is written to the store
//! under [`keys::SESSION_BACKUP`]. On the next start, a backup younger than
//! the recovery window that still has agenda items can be restored or
//! discarded. Restored meetings always come back paused; a break that was
//! open when the backup was written is closed at the save instant and its
//! length added to the break total.

use jiff::Timestamp;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::{Event, MeetingSession};
use crate::{
    clock::elapsed_secs,
    error::SessionError,
    models::{AgendaItem, Phase, TimerState, View},
    store::{keys, Store, StoreExt},
    Result,
};

/// Everything needed to resume a meeting in a new process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionBackup {
    pub meeting_id: String,
    pub agenda_items: Vec<AgendaItem>,
    pub current_item_index: usize,
    pub completed_items: Vec<AgendaItem>,
    pub current_view: View,
    pub phase: Phase,
    pub current_item_time: i64,
    pub current_item_estimated: i64,
    pub total_break_secs: u64,
    /// Start of the break in progress when the backup was written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break_started_at: Option<Timestamp>,
    pub saved_at: Timestamp,
}

impl SessionBackup {
    /// Seconds since the backup was written.
    pub fn age_secs(&self, now: Timestamp) -> u64 {
        elapsed_secs(self.saved_at, now)
    }

    /// Break total including the break still open at save time.
    pub fn break_secs_at_save(&self) -> u64 {
        let open = self
            .break_started_at
            .map_or(0, |started_at| elapsed_secs(started_at, self.saved_at));
        self.total_break_secs.saturating_add(open)
    }
}

impl MeetingSession {
    /// Capture the current state.
    pub fn backup(&self) -> SessionBackup {
        let break_started_at = match self.timer_state {
            TimerState::OnBreak { started_at } => Some(started_at),
            _ => None,
        };
        SessionBackup {
            meeting_id: self.meeting_id.clone(),
            agenda_items: self.agenda_items.clone(),
            current_item_index: self.current_item_index,
            completed_items: self.completed_items.clone(),
            current_view: self.current_view,
            phase: self.phase,
            current_item_time: self.current_item_time,
            current_item_estimated: self.current_item_estimated,
            total_break_secs: self.total_break_secs,
            break_started_at,
            saved_at: self.now(),
        }
    }

    /// Write the backup now.
    pub fn save_backup(&self) -> Result<()> {
        self.store.set_json(keys::SESSION_BACKUP, &self.backup())?;
        debug!("Saved session backup");
        Ok(())
    }

    /// Periodic auto-save; only a running facilitator session is saved.
    pub fn autosave(&self) -> Vec<Event> {
        if self.role.is_participant() || self.phase != Phase::Running {
            return Vec::new();
        }
        match self.save_backup() {
            Ok(()) => Vec::new(),
            Err(e) => vec![Self::storage_failed("auto-saving", &e)],
        }
    }

    pub(super) fn clear_backup(&self) -> Vec<Event> {
        match self.store.delete(keys::SESSION_BACKUP) {
            Ok(()) => Vec::new(),
            Err(e) => vec![Self::storage_failed("clearing the session backup", &e)],
        }
    }

    /// A backup eligible for recovery: present, inside the recovery window
    /// and with at least one agenda item.
    pub fn recovery_offer(&self) -> Option<SessionBackup> {
        if self.role.is_participant() {
            return None;
        }
        let backup = match self.store.get_json::<SessionBackup>(keys::SESSION_BACKUP) {
            Ok(Some(backup)) => backup,
            Ok(None) => return None,
            Err(e) => {
                warn!("Ignoring unreadable session backup: {e}");
                return None;
            }
        };

        let window = self.config.recovery_window.as_secs();
        let fresh = backup.saved_at <= self.now() && backup.age_secs(self.now()) <= window;
        (fresh && !backup.agenda_items.is_empty()).then_some(backup)
    }

    /// Replace the in-memory state with the offered backup.
    ///
    /// # Errors
    ///
    /// * `SessionError::PermissionDenied` - Participants cannot restore
    /// * `SessionError::Validation` - No eligible backup exists
    pub fn restore_backup(&mut self) -> Result<Vec<Event>> {
        if self.role.is_participant() {
            return Err(SessionError::permission_denied("restore a session"));
        }
        let backup = self.recovery_offer().ok_or_else(|| {
            SessionError::validation("sessionBackup").with_reason("No recent session to restore")
        })?;
        self.apply_backup(backup);
        info!(
            "Restored meeting {} at item {}",
            self.meeting_id,
            self.current_item_index + 1
        );
        Ok(vec![Event::BackupRestored {
            items: self.agenda_items.len(),
        }])
    }

    fn apply_backup(&mut self, backup: SessionBackup) {
        // An index past the agenda means the meeting had finished.
        let finished = backup.current_item_index >= backup.agenda_items.len();
        let phase = match backup.phase {
            Phase::Running if finished => Phase::Summary,
            phase => phase,
        };

        let break_secs = backup.break_secs_at_save();

        self.meeting_id = backup.meeting_id;
        self.agenda_items = backup.agenda_items;
        self.current_item_index = backup.current_item_index.min(self.agenda_items.len());
        self.completed_items = backup.completed_items;
        self.phase = phase;
        self.current_view = match (phase, backup.current_view) {
            (_, View::Settings) => View::Settings,
            (Phase::Setup, _) => View::Setup,
            (Phase::Running, _) => View::Timer,
            (Phase::Summary, _) => View::Summary,
        };
        self.timer_state = TimerState::Paused;
        self.total_break_secs = break_secs;

        if phase == Phase::Running {
            let estimated = self.agenda_items[self.current_item_index].estimated_seconds();
            self.current_item_estimated = estimated;
            self.current_item_time = if backup.current_item_estimated == estimated {
                backup.current_item_time
            } else {
                estimated
            };
        } else {
            self.current_item_time = 0;
            self.current_item_estimated = 0;
        }
        self.overtime_alerted = self.current_item_time < 0;
        self.wrap_up_alerted = false;
    }

    /// Drop the stored backup without restoring it.
    pub fn discard_backup(&mut self) -> Vec<Event> {
        let mut events = self.clear_backup();
        if events.is_empty() {
            info!("Discarded session backup");
            events.push(Event::BackupDiscarded);
        }
        events
    }

    /// Orderly shutdown: keep an unfinished meeting recoverable, stop
    /// sharing it, and withdraw a participant's heartbeat.
    pub fn shutdown(&mut self) -> Vec<Event> {
        if self.role.is_participant() {
            return self.leave();
        }
        let mut events = self.withdraw_snapshot();
        if self.agenda_items.is_empty() || self.phase == Phase::Summary {
            return events;
        }
        if let Err(e) = self.save_backup() {
            events.push(Self::storage_failed("saving the session backup", &e));
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        clock::ManualClock,
        params::NewAgendaItem,
        session::{Command, SessionBuilder},
        store::MemoryStore,
    };

    fn session(store: &MemoryStore, clock: &ManualClock) -> MeetingSession {
        SessionBuilder::new()
            .with_store(store.clone())
            .with_clock(clock.clone())
            .build()
            .unwrap()
    }

    fn running(store: &MemoryStore, clock: &ManualClock) -> MeetingSession {
        let mut session = session(store, clock);
        session
            .dispatch(Command::AddItem(NewAgendaItem::new("Standup", 5)))
            .unwrap();
        session
            .dispatch(Command::AddItem(NewAgendaItem::new("Review", 10)))
            .unwrap();
        session.dispatch(Command::ConfirmAgenda).unwrap();
        session
    }

    #[test]
    fn test_autosave_only_while_running() {
        let store = MemoryStore::new();
        let clock = ManualClock::default();
        let setup = session(&store, &clock);
        assert!(setup.autosave().is_empty());
        assert_eq!(store.get(keys::SESSION_BACKUP).unwrap(), None);

        let running = running(&store, &clock);
        assert!(running.autosave().is_empty());
        assert!(store.get(keys::SESSION_BACKUP).unwrap().is_some());
    }

    #[test]
    fn test_recovery_window() {
        let store = MemoryStore::new();
        let clock = ManualClock::default();
        running(&store, &clock).save_backup().unwrap();

        clock.advance_secs(30 * 60);
        assert!(session(&store, &clock).recovery_offer().is_some());

        clock.advance_secs(1);
        assert!(session(&store, &clock).recovery_offer().is_none());
    }

    #[test]
    fn test_backup_from_the_future_not_offered() {
        let store = MemoryStore::new();
        let clock = ManualClock::new(Timestamp::from_second(1_700_000_000).unwrap());
        running(&store, &clock).save_backup().unwrap();

        clock.set(Timestamp::from_second(1_699_999_000).unwrap());
        assert!(session(&store, &clock).recovery_offer().is_none());

        clock.set(Timestamp::from_second(1_700_000_060).unwrap());
        assert!(session(&store, &clock).recovery_offer().is_some());
    }

    #[test]
    fn test_empty_backup_not_offered() {
        let store = MemoryStore::new();
        let clock = ManualClock::default();
        session(&store, &clock).save_backup().unwrap();
        assert!(session(&store, &clock).recovery_offer().is_none());
    }

    #[test]
    fn test_restore_resumes_paused() {
        let store = MemoryStore::new();
        let clock = ManualClock::default();
        let mut original = running(&store, &clock);
        original.dispatch(Command::Advance).unwrap();
        original.dispatch(Command::Start).unwrap();
        for _ in 0..42 {
            original.dispatch(Command::Tick).unwrap();
        }
        original.save_backup().unwrap();

        let mut restored = session(&store, &clock);
        restored.restore_backup().unwrap();
        assert_eq!(restored.meeting_id(), original.meeting_id());
        assert_eq!(restored.phase(), Phase::Running);
        assert_eq!(restored.current_view(), View::Timer);
        assert_eq!(restored.timer_state(), TimerState::Paused);
        assert_eq!(restored.current_item_index(), 1);
        assert_eq!(restored.current_item_time(), 558);
        assert_eq!(restored.completed_items().len(), 1);
    }

    #[test]
    fn test_open_break_is_kept_across_restore() {
        let store = MemoryStore::new();
        let clock = ManualClock::default();
        let mut original = running(&store, &clock);
        original.dispatch(Command::StartBreak).unwrap();
        clock.advance_secs(600);
        assert!(original.autosave().is_empty());

        clock.advance_secs(120);
        let mut restored = session(&store, &clock);
        restored.restore_backup().unwrap();
        assert_eq!(restored.total_break_secs(), 600);
        assert_eq!(restored.timer_state(), TimerState::Paused);
        assert_eq!(restored.break_elapsed_secs(), None);
    }

    #[test]
    fn test_closed_break_not_saved_as_open() {
        let store = MemoryStore::new();
        let clock = ManualClock::default();
        let mut original = running(&store, &clock);
        original.dispatch(Command::StartBreak).unwrap();
        clock.advance_secs(30);
        original.dispatch(Command::EndBreak).unwrap();
        original.save_backup().unwrap();

        let json = store.get(keys::SESSION_BACKUP).unwrap().unwrap();
        assert!(!json.contains("breakStartedAt"));
        let backup: SessionBackup = serde_json::from_str(&json).unwrap();
        assert_eq!(backup.break_secs_at_save(), 30);
    }

    #[test]
    fn test_discard_removes_backup() {
        let store = MemoryStore::new();
        let clock = ManualClock::default();
        running(&store, &clock).save_backup().unwrap();

        let mut fresh = session(&store, &clock);
        assert_eq!(fresh.discard_backup(), vec![Event::BackupDiscarded]);
        assert!(fresh.recovery_offer().is_none());
        assert!(fresh.restore_backup().is_err());
    }

    #[test]
    fn test_finishing_clears_backup() {
        let store = MemoryStore::new();
        let clock = ManualClock::default();
        let mut session = running(&store, &clock);
        session.save_backup().unwrap();
        session.dispatch(Command::Advance).unwrap();
        session.dispatch(Command::Advance).unwrap();
        assert_eq!(store.get(keys::SESSION_BACKUP).unwrap(), None);
    }

    #[test]
    fn test_shutdown_saves_unfinished_meeting() {
        let store = MemoryStore::new();
        let clock = ManualClock::default();
        let mut empty = session(&store, &clock);
        assert!(empty.shutdown().is_empty());
        assert_eq!(store.get(keys::SESSION_BACKUP).unwrap(), None);

        let mut session = running(&store, &clock);
        session.shutdown();
        assert!(store.get(keys::SESSION_BACKUP).unwrap().is_some());
    }

    #[test]
    fn test_storage_failure_is_reported_not_fatal() {
        let store = MemoryStore::new();
        let clock = ManualClock::default();
        let session = running(&store, &clock);
        store.set_fail_writes(true);
        let events = session.autosave();
        assert!(matches!(events[0], Event::StorageFailed { .. }));
        assert_eq!(session.phase(), Phase::Running);
    }
}
