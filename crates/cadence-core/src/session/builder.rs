//! Builder for creating and configuring MeetingSession instances.

use std::sync::Arc;

use log::{debug, info};
use uuid::Uuid;

use super::{MeetingLink, MeetingSession, Role};
use crate::{
    clock::{Clock, SystemClock},
    config::SessionConfig,
    models::{Phase, TimerState, View},
    settings::Settings,
    store::{SqliteStore, Store},
    Result,
};

/// Builder for creating and configuring [`MeetingSession`] instances.
#[derive(Default)]
pub struct SessionBuilder {
    store: Option<Arc<dyn Store>>,
    clock: Option<Arc<dyn Clock>>,
    config: SessionConfig,
    join: Option<MeetingLink>,
}

impl SessionBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the backing store.
    ///
    /// If not specified, the SQLite store at the XDG default location is
    /// used: `$XDG_DATA_HOME/cadence/cadence.db`.
    pub fn with_store<S: Store + 'static>(self, store: S) -> Self {
        self.with_shared_store(Arc::new(store))
    }

    /// Sets a backing store that is already shared with other owners.
    pub fn with_shared_store(mut self, store: Arc<dyn Store>) -> Self {
        self.store = Some(store);
        self
    }

    /// Sets the time source. Defaults to [`SystemClock`].
    pub fn with_clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Some(Arc::new(clock));
        self
    }

    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Join an existing shared meeting as a read-only participant.
    pub fn joining(mut self, link: MeetingLink) -> Self {
        self.join = Some(link);
        self
    }

    /// Builds the configured session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Configuration` if the configuration is invalid
    /// Returns `SessionError::Storage` if the default store cannot be opened
    pub fn build(self) -> Result<MeetingSession> {
        self.config.validate()?;

        let store: Arc<dyn Store> = match self.store {
            Some(store) => store,
            None => Arc::new(SqliteStore::open_default()?),
        };
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let settings = Settings::load(store.as_ref());

        let (role, meeting_id) = match self.join {
            Some(link) => {
                let participant_id = Uuid::new_v4().simple().to_string();
                info!(
                    "Joining meeting {} as participant {participant_id}",
                    link.meeting_id()
                );
                (
                    Role::Participant { participant_id },
                    link.meeting_id().to_string(),
                )
            }
            None => {
                let meeting_id = Uuid::new_v4().simple().to_string();
                debug!("Created meeting {meeting_id}");
                (Role::Facilitator, meeting_id)
            }
        };

        Ok(MeetingSession {
            store,
            clock,
            config: self.config,
            settings,
            role,
            meeting_id,
            sharing: false,
            participant_count: 0,
            connection: None,
            agenda_items: Vec::new(),
            current_item_index: 0,
            completed_items: Vec::new(),
            current_view: View::Setup,
            phase: Phase::Setup,
            timer_state: TimerState::Paused,
            current_item_time: 0,
            current_item_estimated: 0,
            total_break_secs: 0,
            overtime_alerted: false,
            wrap_up_alerted: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{error::SessionError, store::MemoryStore};

    #[test]
    fn test_build_facilitator_defaults() {
        let session = SessionBuilder::new()
            .with_store(MemoryStore::new())
            .build()
            .unwrap();
        assert_eq!(session.role(), &Role::Facilitator);
        assert_eq!(session.phase(), Phase::Setup);
        assert_eq!(session.current_view(), View::Setup);
        assert!(!session.is_sharing());
        assert_eq!(session.settings().team_members.len(), 8);
    }

    #[test]
    fn test_build_participant_takes_meeting_id_from_link() {
        let link: MeetingLink = "cadence://meeting#meeting=abc123".parse().unwrap();
        let session = SessionBuilder::new()
            .with_store(MemoryStore::new())
            .joining(link)
            .build()
            .unwrap();
        assert_eq!(session.meeting_id(), "abc123");
        assert!(session.role().is_participant());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SessionConfig {
            tick_interval: Duration::ZERO,
            ..Default::default()
        };
        let result = SessionBuilder::new()
            .with_store(MemoryStore::new())
            .with_config(config)
            .build();
        assert!(matches!(result, Err(SessionError::Configuration { .. })));
    }
}
