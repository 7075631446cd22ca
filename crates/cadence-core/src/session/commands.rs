//! Typed commands, emitted events and the dispatcher.

use log::debug;

use super::{ConnectionStatus, MeetingLink, MeetingSession};
use crate::{
    error::SessionError,
    models::{AgendaItem, ItemId, Phase, TemplateItem, View},
    params::{NewAgendaItem, OvertimeNotes, SaveTemplate, StartNewMeeting},
    summary::MeetingSummary,
    Result,
};

/// Every state transition a front-end can request.
#[derive(Debug, Clone)]
pub enum Command {
    /// Append an item to the agenda (setup only)
    AddItem(NewAgendaItem),
    /// Remove an agenda item by id (setup only)
    RemoveItem(ItemId),
    /// Replace the agenda with a saved template (setup only)
    LoadTemplate(String),
    /// Append already-parsed items (setup only)
    ImportAgenda(Vec<TemplateItem>),
    /// Save the current agenda as a template
    SaveTemplate(SaveTemplate),
    /// Freeze the agenda and load the first item
    ConfirmAgenda,
    Start,
    Pause,
    /// Start if paused, pause if counting
    Toggle,
    /// Reset the active item to its full estimate
    Stop,
    /// Complete the active item and load the next one
    Advance,
    /// One second of countdown
    Tick,
    StartBreak,
    EndBreak,
    /// Start a break, or end the one in progress
    ToggleBreak,
    /// Attach overtime notes to the active item
    SaveOvertimeNotes(OvertimeNotes),
    ShowView(View),
    /// Discard everything and return to setup
    StartNewMeeting(StartNewMeeting),
    /// Begin publishing snapshots for participants
    EnableSharing,
}

impl Command {
    /// Short description used in error messages.
    pub fn action(&self) -> &'static str {
        match self {
            Command::AddItem(_) => "add an agenda item",
            Command::RemoveItem(_) => "remove an agenda item",
            Command::LoadTemplate(_) => "load a template",
            Command::ImportAgenda(_) => "import an agenda",
            Command::SaveTemplate(_) => "save a template",
            Command::ConfirmAgenda => "confirm the agenda",
            Command::Start => "start the timer",
            Command::Pause => "pause the timer",
            Command::Toggle => "toggle the timer",
            Command::Stop => "stop the timer",
            Command::Advance => "advance to the next item",
            Command::Tick => "count down",
            Command::StartBreak => "take a break",
            Command::EndBreak => "end the break",
            Command::ToggleBreak => "toggle the break",
            Command::SaveOvertimeNotes(_) => "save overtime notes",
            Command::ShowView(_) => "change the view",
            Command::StartNewMeeting(_) => "start a new meeting",
            Command::EnableSharing => "share the meeting",
        }
    }

    /// Whether the command changes meeting state. Participants may only run
    /// commands that do not.
    pub fn is_mutating(&self) -> bool {
        !matches!(self, Command::ShowView(_))
    }
}

/// Something the front-end should know about after a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    ItemAdded {
        item: AgendaItem,
        total_minutes: u32,
    },
    ItemRemoved {
        title: String,
        total_minutes: u32,
    },
    AgendaLoaded {
        source: String,
        count: usize,
    },
    TemplateSaved {
        name: String,
    },
    /// The agenda was frozen and the first item loaded
    AgendaConfirmed {
        total_items: usize,
    },
    /// A new active item was loaded (paused)
    ItemStarted {
        index: usize,
        title: String,
        estimated_minutes: u32,
    },
    TimerStarted,
    TimerPaused,
    TimerStopped {
        remaining: i64,
    },
    Ticked {
        remaining: i64,
    },
    /// Remaining time dropped to the wrap-up threshold
    WrappingUp {
        title: String,
        remaining: i64,
    },
    /// The countdown crossed zero
    OvertimeStarted {
        title: String,
    },
    BreakStarted,
    BreakEnded {
        duration_secs: u64,
        total_break_secs: u64,
    },
    ItemCompleted {
        item: AgendaItem,
    },
    MeetingFinished {
        summary: MeetingSummary,
    },
    OvertimeNotesSaved {
        title: String,
    },
    ViewChanged {
        view: View,
    },
    MeetingReset,
    SharingEnabled {
        link: MeetingLink,
    },
    BackupRestored {
        items: usize,
    },
    BackupDiscarded,
    /// A participant applied the facilitator's latest snapshot
    SnapshotApplied,
    ConnectionChanged {
        status: ConnectionStatus,
    },
    /// A store operation failed; in-memory state is unaffected
    StorageFailed {
        operation: String,
        message: String,
    },
}

impl MeetingSession {
    /// Apply a command and return the resulting events.
    ///
    /// # Errors
    ///
    /// * `SessionError::PermissionDenied` - A participant issued a mutating command
    /// * `SessionError::InvalidTransition` - The command does not apply to the current state
    /// * `SessionError::Validation` - The command's parameters were rejected
    /// * `SessionError::ConfirmationRequired` - A destructive command was not confirmed
    ///
    /// A rejected command leaves the session untouched.
    pub fn dispatch(&mut self, command: Command) -> Result<Vec<Event>> {
        if self.role.is_participant() && command.is_mutating() {
            return Err(SessionError::permission_denied(command.action()));
        }
        if !matches!(command, Command::Tick) {
            debug!("Dispatching {:?} while {}", command, self.state_label());
        }

        let action = command.action();
        let mut events = match command {
            Command::AddItem(params) => self.add_item(&params)?,
            Command::RemoveItem(id) => self.remove_item(&id)?,
            Command::LoadTemplate(name) => self.load_template(&name)?,
            Command::ImportAgenda(items) => self.import_items(items)?,
            Command::SaveTemplate(params) => self.save_template(&params)?,
            Command::ConfirmAgenda => self.confirm_agenda()?,
            Command::Start => self.start(action)?,
            Command::Pause => self.pause(action)?,
            Command::Toggle => {
                if self.timer_state.is_counting() {
                    self.pause(action)?
                } else {
                    self.start(action)?
                }
            }
            Command::Stop => self.stop(action)?,
            Command::Advance => self.advance(action)?,
            Command::Tick => self.tick(action)?,
            Command::StartBreak => self.start_break(action)?,
            Command::EndBreak => self.end_break(action)?,
            Command::ToggleBreak => {
                if self.timer_state.is_on_break() {
                    self.end_break(action)?
                } else {
                    self.start_break(action)?
                }
            }
            Command::SaveOvertimeNotes(notes) => self.save_overtime_notes(notes)?,
            Command::ShowView(view) => self.show_view(view)?,
            Command::StartNewMeeting(params) => self.start_new_meeting(&params)?,
            Command::EnableSharing => self.enable_sharing(),
        };

        if publishes_after(&events) {
            events.extend(self.publish());
        }
        Ok(events)
    }

    fn show_view(&mut self, view: View) -> Result<Vec<Event>> {
        let allowed = match view {
            View::Settings => true,
            View::Setup => self.phase == Phase::Setup,
            View::Timer => self.phase == Phase::Running,
            View::Summary => self.phase == Phase::Summary,
        };
        if !allowed {
            return Err(SessionError::invalid_transition(
                format!("show the {view} view"),
                self.state_label(),
            ));
        }
        self.current_view = view;
        Ok(vec![Event::ViewChanged { view }])
    }

    fn start_new_meeting(&mut self, params: &StartNewMeeting) -> Result<Vec<Event>> {
        if !params.confirmed {
            return Err(SessionError::ConfirmationRequired {
                action: "starting a new meeting discards the current agenda and results"
                    .to_string(),
            });
        }
        self.reset_meeting();
        let mut events = vec![Event::MeetingReset];
        events.extend(self.clear_backup());
        Ok(events)
    }
}

/// Transitions participants need to see right away.
fn publishes_after(events: &[Event]) -> bool {
    events.iter().any(|event| {
        matches!(
            event,
            Event::AgendaConfirmed { .. }
                | Event::ItemStarted { .. }
                | Event::TimerStarted
                | Event::TimerPaused
                | Event::TimerStopped { .. }
                | Event::Ticked { .. }
                | Event::BreakStarted
                | Event::BreakEnded { .. }
                | Event::MeetingFinished { .. }
                | Event::MeetingReset
                | Event::SharingEnabled { .. }
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::TimerState,
        session::SessionBuilder,
        store::MemoryStore,
    };

    fn session() -> MeetingSession {
        SessionBuilder::new()
            .with_store(MemoryStore::new())
            .build()
            .unwrap()
    }

    #[test]
    fn test_show_view_follows_phase() {
        let mut session = session();
        assert!(session.dispatch(Command::ShowView(View::Timer)).is_err());
        assert!(session.dispatch(Command::ShowView(View::Summary)).is_err());
        session.dispatch(Command::ShowView(View::Settings)).unwrap();
        assert_eq!(session.current_view(), View::Settings);
        session.dispatch(Command::ShowView(View::Setup)).unwrap();
        assert_eq!(session.current_view(), View::Setup);
    }

    #[test]
    fn test_new_meeting_requires_confirmation() {
        let mut session = session();
        session
            .dispatch(Command::AddItem(NewAgendaItem::new("Standup", 5)))
            .unwrap();
        let err = session
            .dispatch(Command::StartNewMeeting(StartNewMeeting::default()))
            .unwrap_err();
        assert!(matches!(err, SessionError::ConfirmationRequired { .. }));
        assert_eq!(session.agenda_items().len(), 1);

        let events = session
            .dispatch(Command::StartNewMeeting(StartNewMeeting { confirmed: true }))
            .unwrap();
        assert!(events.contains(&Event::MeetingReset));
        assert!(session.agenda_items().is_empty());
    }

    #[test]
    fn test_new_meeting_from_running_resets_everything() {
        let mut session = session();
        session
            .dispatch(Command::AddItem(NewAgendaItem::new("Standup", 5)))
            .unwrap();
        session.dispatch(Command::ConfirmAgenda).unwrap();
        session.dispatch(Command::Start).unwrap();
        session.dispatch(Command::Tick).unwrap();

        session
            .dispatch(Command::StartNewMeeting(StartNewMeeting { confirmed: true }))
            .unwrap();
        assert_eq!(session.phase(), Phase::Setup);
        assert_eq!(session.timer_state(), TimerState::Paused);
        assert_eq!(session.current_item_time(), 0);
        assert_eq!(session.current_view(), View::Setup);
    }

    #[test]
    fn test_only_show_view_is_read_only() {
        assert!(!Command::ShowView(View::Setup).is_mutating());
        assert!(Command::Tick.is_mutating());
        assert!(Command::EnableSharing.is_mutating());
    }
}
