//! Running-phase operations: countdown, breaks, stop and advance.

use log::{debug, info};

use super::{Event, MeetingSession};
use crate::{
    clock::elapsed_secs,
    error::SessionError,
    models::{Phase, TimerState, TimerStatus, View},
    params::OvertimeNotes,
    Result,
};

impl MeetingSession {
    /// Running and not on a break.
    fn require_running(&self, action: &str) -> Result<()> {
        if self.phase != Phase::Running || self.timer_state.is_on_break() {
            return Err(SessionError::invalid_transition(action, self.state_label()));
        }
        Ok(())
    }

    /// Load the item at the current index, paused at its full estimate.
    pub(super) fn load_current_item(&mut self) -> Event {
        let item = &self.agenda_items[self.current_item_index];
        let started = Event::ItemStarted {
            index: self.current_item_index,
            title: item.title.clone(),
            estimated_minutes: item.estimated_minutes,
        };
        self.current_item_estimated = item.estimated_seconds();
        self.current_item_time = self.current_item_estimated;
        self.timer_state = TimerState::Paused;
        self.overtime_alerted = false;
        self.wrap_up_alerted = false;
        started
    }

    pub(super) fn start(&mut self, action: &str) -> Result<Vec<Event>> {
        self.require_running(action)?;
        if self.timer_state.is_counting() {
            return Err(SessionError::invalid_transition(action, self.state_label()));
        }
        self.timer_state = TimerState::Counting;
        Ok(vec![Event::TimerStarted])
    }

    pub(super) fn pause(&mut self, action: &str) -> Result<Vec<Event>> {
        self.require_running(action)?;
        if !self.timer_state.is_counting() {
            return Err(SessionError::invalid_transition(action, self.state_label()));
        }
        self.timer_state = TimerState::Paused;
        Ok(vec![Event::TimerPaused])
    }

    pub(super) fn stop(&mut self, action: &str) -> Result<Vec<Event>> {
        self.require_running(action)?;
        self.timer_state = TimerState::Paused;
        self.current_item_time = self.current_item_estimated;
        self.overtime_alerted = false;
        self.wrap_up_alerted = false;
        Ok(vec![Event::TimerStopped {
            remaining: self.current_item_time,
        }])
    }

    pub(super) fn tick(&mut self, action: &str) -> Result<Vec<Event>> {
        if self.phase != Phase::Running || !self.timer_state.is_counting() {
            return Err(SessionError::invalid_transition(action, self.state_label()));
        }

        let previous = self.current_item_time;
        self.current_item_time -= 1;
        let mut events = vec![Event::Ticked {
            remaining: self.current_item_time,
        }];

        let title = self.agenda_items[self.current_item_index].title.clone();
        let status = TimerStatus::classify(
            self.current_item_time,
            self.current_item_estimated,
            self.config.wrap_up_percent,
        );
        if status == TimerStatus::WrappingUp && !self.wrap_up_alerted {
            self.wrap_up_alerted = true;
            events.push(Event::WrappingUp {
                title: title.clone(),
                remaining: self.current_item_time,
            });
        }
        if previous >= 0 && self.current_item_time < 0 && !self.overtime_alerted {
            self.overtime_alerted = true;
            info!("'{title}' exceeded its estimate");
            events.push(Event::OvertimeStarted { title });
        }
        Ok(events)
    }

    pub(super) fn advance(&mut self, action: &str) -> Result<Vec<Event>> {
        self.require_running(action)?;

        let index = self.current_item_index;
        self.agenda_items[index].complete(self.current_item_time);
        let item = self.agenda_items[index].clone();
        debug!(
            "Completed '{}': {} min (estimated {})",
            item.title, item.actual_minutes, item.estimated_minutes
        );
        self.completed_items.push(item.clone());
        self.current_item_index += 1;

        let mut events = vec![Event::ItemCompleted { item }];
        if self.current_item_index < self.agenda_items.len() {
            events.push(self.load_current_item());
        } else {
            events.extend(self.finish());
        }
        Ok(events)
    }

    fn finish(&mut self) -> Vec<Event> {
        self.phase = Phase::Summary;
        self.current_view = View::Summary;
        self.timer_state = TimerState::Paused;
        self.current_item_time = 0;
        self.current_item_estimated = 0;
        info!(
            "Meeting {} finished after {} items",
            self.meeting_id,
            self.completed_items.len()
        );

        let mut events = vec![Event::MeetingFinished {
            summary: self.summary(),
        }];
        events.extend(self.clear_backup());
        events
    }

    pub(super) fn start_break(&mut self, action: &str) -> Result<Vec<Event>> {
        self.require_running(action)?;
        self.timer_state = TimerState::OnBreak {
            started_at: self.now(),
        };
        Ok(vec![Event::BreakStarted])
    }

    pub(super) fn end_break(&mut self, action: &str) -> Result<Vec<Event>> {
        let TimerState::OnBreak { started_at } = self.timer_state else {
            return Err(SessionError::invalid_transition(action, self.state_label()));
        };
        let duration_secs = elapsed_secs(started_at, self.now());
        self.total_break_secs += duration_secs;
        self.timer_state = TimerState::Paused;
        Ok(vec![Event::BreakEnded {
            duration_secs,
            total_break_secs: self.total_break_secs,
        }])
    }

    pub(super) fn save_overtime_notes(&mut self, notes: OvertimeNotes) -> Result<Vec<Event>> {
        let action = "save overtime notes";
        if self.phase != Phase::Running {
            return Err(SessionError::invalid_transition(action, self.state_label()));
        }
        if self.current_item_time >= 0 {
            return Err(SessionError::invalid_transition(
                action,
                "the item is within its estimate",
            ));
        }

        let reason = notes.reason.trim();
        if !reason.is_empty() && !self.settings.is_overtime_reason(reason) {
            return Err(SessionError::validation("reason")
                .with_reason(format!("'{reason}' is not a configured overtime reason")));
        }

        let mut participants: Vec<String> = Vec::new();
        for name in notes.participants.iter().map(|n| n.trim()) {
            if !self.settings.is_team_member(name) {
                return Err(SessionError::validation("participants")
                    .with_reason(format!("'{name}' is not a team member")));
            }
            if !participants.iter().any(|existing| existing == name) {
                participants.push(name.to_string());
            }
        }

        let item = &mut self.agenda_items[self.current_item_index];
        item.overtime_notes = notes.notes.trim().to_string();
        item.overtime_reason = reason.to_string();
        item.follow_up_participants = participants;
        Ok(vec![Event::OvertimeNotesSaved {
            title: item.title.clone(),
        }])
    }
}
