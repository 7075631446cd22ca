//! Facilitator/participant sharing over the store.
//!
//! The facilitator publishes a [`SharedSnapshot`] under
//! `sharedSession:<meetingId>` after every visible transition. Participants
//! poll that key and replace their own agenda, pointer, timer and break
//! fields with whatever they read; there is no versioning, so the last
//! write wins. Participants also keep a presence heartbeat fresh so the
//! facilitator can report how many people are following along.

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::{Event, MeetingSession};
use crate::{
    clock::elapsed_secs,
    error::SessionError,
    models::{AgendaItem, Phase, TimerState, View},
    store::{keys, Store, StoreExt},
    Result,
};

const LINK_PREFIX: &str = "cadence://meeting#meeting=";

/// Who owns the session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    /// Authoritative owner; the only role allowed to mutate the meeting
    Facilitator,
    /// Read-only mirror of a facilitator's meeting
    Participant { participant_id: String },
}

impl Role {
    pub fn is_participant(&self) -> bool {
        matches!(self, Role::Participant { .. })
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Facilitator => write!(f, "facilitator"),
            Role::Participant { .. } => write!(f, "participant"),
        }
    }
}

/// A participant's view of the link to the facilitator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    /// A recent snapshot was applied
    Connected,
    /// The last snapshot is older than the stale threshold; it is still applied
    Stale,
    /// No snapshot exists for the meeting
    Disconnected,
}

impl ConnectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionStatus::Connected => "connected",
            ConnectionStatus::Stale => "stale",
            ConnectionStatus::Disconnected => "disconnected",
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The projection of a meeting that participants mirror.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedSnapshot {
    pub meeting_id: String,
    pub phase: Phase,
    pub agenda_items: Vec<AgendaItem>,
    pub current_item_index: usize,
    pub current_item_time: i64,
    pub current_item_estimated: i64,
    pub timer_running: bool,
    pub break_mode: bool,
    #[serde(default)]
    pub break_started_at: Option<Timestamp>,
    pub total_break_time: u64,
    #[serde(default)]
    pub completed_items: Vec<AgendaItem>,
    pub participant_count: usize,
    pub last_update: Timestamp,
}

/// A participant heartbeat.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Presence {
    participant_id: String,
    last_seen: Timestamp,
}

/// A shareable reference to a meeting.
///
/// # Examples
///
/// ```rust
/// use cadence_core::session::MeetingLink;
///
/// let link: MeetingLink = "https://example.com/timer#meeting=4f2a".parse()?;
/// assert_eq!(link.meeting_id(), "4f2a");
/// assert_eq!(link.to_string(), "cadence://meeting#meeting=4f2a");
///
/// let bare: MeetingLink = "4f2a".parse()?;
/// assert_eq!(bare, link);
/// # cadence_core::Result::<()>::Ok(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingLink {
    meeting_id: String,
}

impl MeetingLink {
    pub fn new(meeting_id: impl Into<String>) -> Self {
        Self {
            meeting_id: meeting_id.into(),
        }
    }

    pub fn meeting_id(&self) -> &str {
        &self.meeting_id
    }
}

impl FromStr for MeetingLink {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let id = match s.find("meeting=") {
            Some(start) => s[start + "meeting=".len()..]
                .split(['&', '#'])
                .next()
                .unwrap_or_default(),
            None if !s.contains(['/', '#', '?', ' ']) => s,
            None => "",
        };

        if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(SessionError::validation("link")
                .with_reason(format!("'{s}' does not contain a meeting id")));
        }
        Ok(Self::new(id))
    }
}

impl fmt::Display for MeetingLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{LINK_PREFIX}{}", self.meeting_id)
    }
}

impl MeetingSession {
    /// The link participants use to join, once sharing is enabled.
    pub fn share_link(&self) -> Option<MeetingLink> {
        match (&self.role, self.sharing) {
            (Role::Facilitator, true) => Some(MeetingLink::new(self.meeting_id.clone())),
            _ => None,
        }
    }

    pub(super) fn enable_sharing(&mut self) -> Vec<Event> {
        if !self.sharing {
            self.sharing = true;
            info!("Sharing meeting {}", self.meeting_id);
        }
        vec![Event::SharingEnabled {
            link: MeetingLink::new(self.meeting_id.clone()),
        }]
    }

    /// Project the current state for participants.
    pub fn snapshot(&self) -> SharedSnapshot {
        let break_started_at = match self.timer_state {
            TimerState::OnBreak { started_at } => Some(started_at),
            _ => None,
        };
        SharedSnapshot {
            meeting_id: self.meeting_id.clone(),
            phase: self.phase,
            agenda_items: self.agenda_items.clone(),
            current_item_index: self.current_item_index,
            current_item_time: self.current_item_time,
            current_item_estimated: self.current_item_estimated,
            timer_running: self.timer_state.is_counting(),
            break_mode: break_started_at.is_some(),
            break_started_at,
            total_break_time: self.total_break_secs,
            completed_items: self.completed_items.clone(),
            participant_count: self.participant_count,
            last_update: self.now(),
        }
    }

    /// Write the snapshot for participants. A no-op unless this is a
    /// sharing facilitator.
    pub fn publish(&mut self) -> Vec<Event> {
        if self.role.is_participant() || !self.sharing {
            return Vec::new();
        }
        let mut events = Vec::new();
        match self.count_participants() {
            Ok(count) => self.participant_count = count,
            Err(e) => events.push(Self::storage_failed("counting participants", &e)),
        }
        let key = keys::shared_session(&self.meeting_id);
        if let Err(e) = self.store.set_json(&key, &self.snapshot()) {
            events.push(Self::storage_failed("publishing the shared session", &e));
        }
        events
    }

    /// Count fresh heartbeats and drop expired ones.
    fn count_participants(&self) -> Result<usize> {
        let now = self.now();
        let timeout = self.config.presence_timeout().as_secs();
        let mut count = 0;
        for key in self
            .store
            .keys_with_prefix(&keys::presence_prefix(&self.meeting_id))?
        {
            let fresh = match self.store.get_json::<Presence>(&key) {
                Ok(Some(presence)) => elapsed_secs(presence.last_seen, now) <= timeout,
                Ok(None) => continue,
                Err(_) => false,
            };
            if fresh {
                count += 1;
            } else {
                debug!("Dropping expired heartbeat {key}");
                self.store.delete(&key)?;
            }
        }
        Ok(count)
    }

    /// Read the facilitator's latest snapshot and mirror it.
    ///
    /// With no snapshot the local state is left untouched and the
    /// connection is reported as disconnected.
    pub fn poll(&mut self) -> Vec<Event> {
        if !self.role.is_participant() {
            return Vec::new();
        }
        let key = keys::shared_session(&self.meeting_id);
        let snapshot = match self.store.get_json::<SharedSnapshot>(&key) {
            Ok(snapshot) => snapshot,
            Err(e) => return vec![Self::storage_failed("reading the shared session", &e)],
        };

        let mut events = Vec::new();
        let status = match snapshot {
            None => ConnectionStatus::Disconnected,
            Some(snapshot) => {
                let age = elapsed_secs(snapshot.last_update, self.now());
                self.apply_snapshot(snapshot);
                events.push(Event::SnapshotApplied);
                if age > self.config.stale_after.as_secs() {
                    ConnectionStatus::Stale
                } else {
                    ConnectionStatus::Connected
                }
            }
        };
        if self.connection != Some(status) {
            self.connection = Some(status);
            events.insert(0, Event::ConnectionChanged { status });
        }
        events
    }

    fn apply_snapshot(&mut self, snapshot: SharedSnapshot) {
        self.phase = snapshot.phase;
        self.agenda_items = snapshot.agenda_items;
        self.current_item_index = snapshot.current_item_index.min(self.agenda_items.len());
        self.current_item_time = snapshot.current_item_time;
        self.current_item_estimated = snapshot.current_item_estimated;
        self.total_break_secs = snapshot.total_break_time;
        self.completed_items = snapshot.completed_items;
        self.participant_count = snapshot.participant_count;
        self.timer_state = match (snapshot.break_mode, snapshot.timer_running) {
            (true, _) => TimerState::OnBreak {
                started_at: snapshot.break_started_at.unwrap_or(snapshot.last_update),
            },
            (false, true) => TimerState::Counting,
            (false, false) => TimerState::Paused,
        };
        if self.current_view != View::Settings {
            self.current_view = match self.phase {
                Phase::Setup => View::Setup,
                Phase::Running => View::Timer,
                Phase::Summary => View::Summary,
            };
        }
    }

    /// Refresh this participant's presence heartbeat.
    pub fn heartbeat(&self) -> Vec<Event> {
        let Role::Participant { participant_id } = &self.role else {
            return Vec::new();
        };
        let presence = Presence {
            participant_id: participant_id.clone(),
            last_seen: self.now(),
        };
        let key = keys::presence(&self.meeting_id, participant_id);
        match self.store.set_json(&key, &presence) {
            Ok(()) => Vec::new(),
            Err(e) => vec![Self::storage_failed("sending a heartbeat", &e)],
        }
    }

    /// Remove the published snapshot so late joiners see the meeting as
    /// gone rather than stale.
    pub(super) fn withdraw_snapshot(&self) -> Vec<Event> {
        if self.role.is_participant() || !self.sharing {
            return Vec::new();
        }
        match self.store.delete(&keys::shared_session(&self.meeting_id)) {
            Ok(()) => {
                info!("Stopped sharing meeting {}", self.meeting_id);
                Vec::new()
            }
            Err(e) => vec![Self::storage_failed("withdrawing the shared session", &e)],
        }
    }

    /// Withdraw this participant's heartbeat.
    pub(super) fn leave(&self) -> Vec<Event> {
        let Role::Participant { participant_id } = &self.role else {
            return Vec::new();
        };
        let key = keys::presence(&self.meeting_id, participant_id);
        match self.store.delete(&key) {
            Ok(()) => Vec::new(),
            Err(e) => vec![Self::storage_failed("leaving the meeting", &e)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_parsing() {
        let link: MeetingLink = "cadence://meeting#meeting=abc-123".parse().unwrap();
        assert_eq!(link.meeting_id(), "abc-123");

        let link: MeetingLink = "https://host/app?x=1#meeting=f00&view=timer"
            .parse()
            .unwrap();
        assert_eq!(link.meeting_id(), "f00");

        assert!("".parse::<MeetingLink>().is_err());
        assert!("https://host/app".parse::<MeetingLink>().is_err());
        assert!("#meeting=".parse::<MeetingLink>().is_err());
    }

    #[test]
    fn test_link_round_trips_through_display() {
        let link = MeetingLink::new("0a1b");
        assert_eq!(link.to_string().parse::<MeetingLink>().unwrap(), link);
    }
}
