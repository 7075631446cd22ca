//! The meeting session state machine.
//!
//! A [`MeetingSession`] owns everything one running process knows about the
//! current meeting: the agenda, the pointer into it, the countdown, break
//! accounting and the results of completed items. Every transition goes
//! through [`MeetingSession::dispatch`], which takes a typed [`Command`] and
//! returns the [`Event`]s the front-end should surface.
//!
//! ```text
//! ┌─────────┐  confirm   ┌───────────────────────────┐  advance past  ┌─────────┐
//! │  Setup  │──────────▶│ Running                   │──────────────▶│ Summary │
//! │         │            │  Paused ⇄ Counting        │   last item    │         │
//! └─────────┘            │     ⇅ break               │                └─────────┘
//!      ▲                 │  OnBreak                  │                     │
//!      │                 └───────────────────────────┘                     │
//!      └──────────────────────── start new meeting ────────────────────────┘
//! ```
//!
//! ## Submodules
//!
//! - [`builder`]: Factory wiring the store, clock and configuration
//! - [`commands`]: The [`Command`] and [`Event`] types and the dispatcher
//! - `agenda_ops`: Setup-phase operations (add, remove, templates, import)
//! - `timer_ops`: Running-phase operations (countdown, breaks, advance)
//! - [`backup`]: Auto-save and crash recovery
//! - [`sync`]: Facilitator/participant sharing over the store
//!
//! Storage failures never abort a transition: the in-memory state stays
//! authoritative and an [`Event::StorageFailed`] is returned instead.
//!
//! # Example
//!
//! ```rust
//! use cadence_core::{
//!     params::NewAgendaItem,
//!     session::{Command, SessionBuilder},
//!     store::MemoryStore,
//!     Phase,
//! };
//!
//! let mut session = SessionBuilder::new().with_store(MemoryStore::new()).build()?;
//! session.dispatch(Command::AddItem(NewAgendaItem::new("Standup", 5)))?;
//! session.dispatch(Command::ConfirmAgenda)?;
//! assert_eq!(session.phase(), Phase::Running);
//! assert_eq!(session.current_item_time(), 300);
//! # cadence_core::Result::<()>::Ok(())
//! ```

mod agenda_ops;
pub mod backup;
pub mod builder;
pub mod commands;
pub mod sync;
mod timer_ops;

use std::sync::Arc;

use jiff::Timestamp;
use log::warn;

pub use backup::SessionBackup;
pub use builder::SessionBuilder;
pub use commands::{Command, Event};
pub use sync::{ConnectionStatus, MeetingLink, Role, SharedSnapshot};

use crate::{
    clock::{elapsed_secs, Clock},
    config::SessionConfig,
    models::{AgendaItem, Phase, TimerState, TimerStatus, View},
    settings::Settings,
    store::Store,
    summary::MeetingSummary,
    Result,
};

/// One meeting, from agenda setup to summary.
pub struct MeetingSession {
    store: Arc<dyn Store>,
    clock: Arc<dyn Clock>,
    config: SessionConfig,
    settings: Settings,

    role: Role,
    meeting_id: String,
    sharing: bool,
    participant_count: usize,
    connection: Option<ConnectionStatus>,

    agenda_items: Vec<AgendaItem>,
    current_item_index: usize,
    completed_items: Vec<AgendaItem>,
    current_view: View,
    phase: Phase,
    timer_state: TimerState,
    current_item_time: i64,
    current_item_estimated: i64,
    total_break_secs: u64,

    overtime_alerted: bool,
    wrap_up_alerted: bool,
}

impl MeetingSession {
    pub fn agenda_items(&self) -> &[AgendaItem] {
        &self.agenda_items
    }

    pub fn current_item_index(&self) -> usize {
        self.current_item_index
    }

    /// The item the countdown belongs to, if the meeting is running.
    pub fn current_item(&self) -> Option<&AgendaItem> {
        match self.phase {
            Phase::Running => self.agenda_items.get(self.current_item_index),
            _ => None,
        }
    }

    pub fn completed_items(&self) -> &[AgendaItem] {
        &self.completed_items
    }

    pub fn current_view(&self) -> View {
        self.current_view
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn timer_state(&self) -> TimerState {
        self.timer_state
    }

    /// Signed seconds left on the active item; negative while in overtime.
    pub fn current_item_time(&self) -> i64 {
        self.current_item_time
    }

    pub fn current_item_estimated(&self) -> i64 {
        self.current_item_estimated
    }

    /// Completed break time, excluding a break still in progress.
    pub fn total_break_secs(&self) -> u64 {
        self.total_break_secs
    }

    /// Seconds spent in the break currently in progress.
    pub fn break_elapsed_secs(&self) -> Option<u64> {
        match self.timer_state {
            TimerState::OnBreak { started_at } => Some(elapsed_secs(started_at, self.now())),
            _ => None,
        }
    }

    /// Countdown classification of the active item.
    pub fn timer_status(&self) -> Option<TimerStatus> {
        self.current_item().map(|_| {
            TimerStatus::classify(
                self.current_item_time,
                self.current_item_estimated,
                self.config.wrap_up_percent,
            )
        })
    }

    pub fn total_estimated_minutes(&self) -> u32 {
        self.agenda_items
            .iter()
            .map(|item| item.estimated_minutes)
            .fold(0, u32::saturating_add)
    }

    pub fn meeting_id(&self) -> &str {
        &self.meeting_id
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    pub fn is_sharing(&self) -> bool {
        self.sharing
    }

    /// Participants with a fresh heartbeat, as of the last publish (or as
    /// reported by the facilitator, for participants).
    pub fn participant_count(&self) -> usize {
        self.participant_count
    }

    /// Participant connection status; `None` before the first poll and for
    /// facilitators.
    pub fn connection_status(&self) -> Option<ConnectionStatus> {
        self.connection
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Mutable access to the settings; call [`Self::save_settings`] to
    /// persist changes.
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn save_settings(&self) -> Result<()> {
        self.settings.save(self.store.as_ref())
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Summary of the items completed so far.
    pub fn summary(&self) -> MeetingSummary {
        MeetingSummary::from_completed(&self.completed_items, self.total_break_secs)
    }

    /// Human-readable description of the current state, used in
    /// invalid-transition errors.
    fn state_label(&self) -> String {
        match self.phase {
            Phase::Setup => "in setup".to_string(),
            Phase::Summary => "the meeting is finished".to_string(),
            Phase::Running => self.timer_state.as_str().to_string(),
        }
    }

    /// Convert a failed store operation into an event.
    fn storage_failed(operation: &str, error: &crate::error::SessionError) -> Event {
        warn!("Storage failure during {operation}: {error}");
        Event::StorageFailed {
            operation: operation.to_string(),
            message: error.to_string(),
        }
    }

    /// Reset every meeting field; the meeting id and sharing state survive.
    fn reset_meeting(&mut self) {
        self.agenda_items.clear();
        self.current_item_index = 0;
        self.completed_items.clear();
        self.current_view = View::Setup;
        self.phase = Phase::Setup;
        self.timer_state = TimerState::Paused;
        self.current_item_time = 0;
        self.current_item_estimated = 0;
        self.total_break_secs = 0;
        self.overtime_alerted = false;
        self.wrap_up_alerted = false;
    }
}
