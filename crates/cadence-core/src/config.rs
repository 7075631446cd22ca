//! Tunable constants of a meeting session.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{error::SessionError, Result};

/// Configuration for a meeting session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    /// Countdown and break-clock tick period
    /// Default: 1 second
    pub tick_interval: Duration,

    /// How often a running session writes its backup
    /// Default: 10 seconds
    pub autosave_interval: Duration,

    /// How often a participant reads the shared snapshot
    /// Default: 2 seconds
    pub poll_interval: Duration,

    /// Age after which a shared snapshot is reported as stale
    /// Default: 10 seconds
    pub stale_after: Duration,

    /// Maximum age of a backup that is still offered for recovery
    /// Default: 30 minutes
    pub recovery_window: Duration,

    /// Percentage of the estimate at or below which an item is wrapping up
    /// Default: 10
    pub wrap_up_percent: u8,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(1),
            autosave_interval: Duration::from_secs(10),
            poll_interval: Duration::from_secs(2),
            stale_after: Duration::from_secs(10),
            recovery_window: Duration::from_secs(30 * 60),
            wrap_up_percent: 10,
        }
    }
}

impl SessionConfig {
    /// Check that every interval is non-zero and the threshold is a
    /// percentage.
    pub fn validate(&self) -> Result<()> {
        let intervals = [
            ("tickInterval", self.tick_interval),
            ("autosaveInterval", self.autosave_interval),
            ("pollInterval", self.poll_interval),
        ];
        for (name, interval) in intervals {
            if interval.is_zero() {
                return Err(SessionError::Configuration {
                    message: format!("{name} must be greater than zero"),
                });
            }
        }
        if self.wrap_up_percent > 100 {
            return Err(SessionError::Configuration {
                message: format!(
                    "wrapUpPercent must be between 0 and 100, got {}",
                    self.wrap_up_percent
                ),
            });
        }
        Ok(())
    }

    /// Age after which a participant presence heartbeat no longer counts.
    pub fn presence_timeout(&self) -> Duration {
        self.poll_interval * 3
    }
}
