//! Periodic activities and their cancellation.
//!
//! Which activities run is a pure function of session state
//! ([`Activities::for_session`]). A driver owns one [`ActivityTimers`],
//! re-applies the activity set after every transition, and awaits the armed
//! timers in a `tokio::select!`. Disarming drops the underlying interval, so
//! leaving a state can never leave its timer behind.
//!
//! ```rust,no_run
//! use cadence_core::{session::Command, timers::{Activities, ActivityTimers}};
//! # async fn drive(mut session: cadence_core::session::MeetingSession) {
//! let mut timers = ActivityTimers::new(session.config());
//! loop {
//!     timers.apply(Activities::for_session(&session));
//!     tokio::select! {
//!         _ = timers.countdown.tick() => {
//!             let _ = session.dispatch(Command::Tick);
//!         }
//!         _ = timers.autosave.tick() => {
//!             session.autosave();
//!         }
//!     }
//! }
//! # }
//! ```

use std::{future, time::Duration};

use tokio::time::{self, Instant, Interval, MissedTickBehavior};

use crate::{
    config::SessionConfig,
    models::Phase,
    session::{MeetingSession, Role},
};

/// The set of periodic activities the current state calls for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Activities {
    /// 1 s countdown while counting
    pub countdown: bool,
    /// 1 s break display while on a break
    pub break_clock: bool,
    /// Backup writes while the meeting runs
    pub autosave: bool,
    /// Keep the shared snapshot fresh while idle
    pub share_refresh: bool,
    /// Participant snapshot polling
    pub sync_poll: bool,
    /// Participant presence heartbeat
    pub heartbeat: bool,
}

impl Activities {
    pub fn for_session(session: &MeetingSession) -> Self {
        let running = session.phase() == Phase::Running;
        match session.role() {
            Role::Facilitator => Self {
                countdown: running && session.timer_state().is_counting(),
                break_clock: running && session.timer_state().is_on_break(),
                autosave: running,
                share_refresh: session.is_sharing(),
                sync_poll: false,
                heartbeat: false,
            },
            Role::Participant { .. } => Self {
                countdown: false,
                break_clock: running && session.timer_state().is_on_break(),
                autosave: false,
                share_refresh: false,
                sync_poll: true,
                heartbeat: true,
            },
        }
    }
}

/// An interval that can be armed and disarmed.
///
/// Awaiting a disarmed timer never completes, so it can sit in a
/// `tokio::select!` next to armed ones.
#[derive(Debug)]
pub struct Periodic {
    period: Duration,
    interval: Option<Interval>,
}

impl Periodic {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            interval: None,
        }
    }

    /// Arm or disarm. Re-arming an armed timer keeps its phase; arming a
    /// disarmed one schedules the first tick one full period from now.
    pub fn set_armed(&mut self, armed: bool) {
        match (armed, self.interval.is_some()) {
            (true, false) => {
                let mut interval = time::interval_at(Instant::now() + self.period, self.period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                self.interval = Some(interval);
            }
            (false, true) => self.interval = None,
            _ => {}
        }
    }

    pub fn is_armed(&self) -> bool {
        self.interval.is_some()
    }

    /// Wait for the next tick.
    pub async fn tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => future::pending::<()>().await,
        }
    }
}

/// One [`Periodic`] per activity.
#[derive(Debug)]
pub struct ActivityTimers {
    pub countdown: Periodic,
    pub break_clock: Periodic,
    pub autosave: Periodic,
    pub share_refresh: Periodic,
    pub sync_poll: Periodic,
    pub heartbeat: Periodic,
}

impl ActivityTimers {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            countdown: Periodic::new(config.tick_interval),
            break_clock: Periodic::new(config.tick_interval),
            autosave: Periodic::new(config.autosave_interval),
            share_refresh: Periodic::new(config.poll_interval),
            sync_poll: Periodic::new(config.poll_interval),
            heartbeat: Periodic::new(config.poll_interval),
        }
    }

    /// Arm exactly the requested activities.
    pub fn apply(&mut self, activities: Activities) {
        self.countdown.set_armed(activities.countdown);
        self.break_clock.set_armed(activities.break_clock);
        self.autosave.set_armed(activities.autosave);
        self.share_refresh.set_armed(activities.share_refresh);
        self.sync_poll.set_armed(activities.sync_poll);
        self.heartbeat.set_armed(activities.heartbeat);
    }

    pub fn armed(&self) -> Activities {
        Activities {
            countdown: self.countdown.is_armed(),
            break_clock: self.break_clock.is_armed(),
            autosave: self.autosave.is_armed(),
            share_refresh: self.share_refresh.is_armed(),
            sync_poll: self.sync_poll.is_armed(),
            heartbeat: self.heartbeat.is_armed(),
        }
    }
}
