//! Type-safe enumerations describing where a meeting session stands.

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// The screen the front-end should present.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum View {
    /// Building the agenda
    #[default]
    Setup,
    /// Running the countdown
    Timer,
    /// Editing team, reasons, templates and appearance
    Settings,
    /// Reviewing the finished meeting
    Summary,
}

impl View {
    pub fn as_str(&self) -> &'static str {
        match self {
            View::Setup => "setup",
            View::Timer => "timer",
            View::Settings => "settings",
            View::Summary => "summary",
        }
    }
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "setup" => Ok(View::Setup),
            "timer" => Ok(View::Timer),
            "settings" => Ok(View::Settings),
            "summary" => Ok(View::Summary),
            _ => Err(format!("Invalid view: {s}")),
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Top-level lifecycle of a meeting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Agenda is editable
    #[default]
    Setup,
    /// Agenda is frozen and items are consumed in order
    Running,
    /// Every item has been advanced past
    Summary,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Setup => "setup",
            Phase::Running => "running",
            Phase::Summary => "summary",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Countdown state of the active item.
///
/// Counting and being on a break are mutually exclusive by construction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", tag = "state")]
pub enum TimerState {
    #[default]
    Paused,
    Counting,
    OnBreak { started_at: Timestamp },
}

impl TimerState {
    pub fn is_counting(&self) -> bool {
        matches!(self, TimerState::Counting)
    }

    pub fn is_on_break(&self) -> bool {
        matches!(self, TimerState::OnBreak { .. })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimerState::Paused => "paused",
            TimerState::Counting => "counting",
            TimerState::OnBreak { .. } => "on break",
        }
    }
}

impl fmt::Display for TimerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Advisory status of the active item's countdown.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum TimerStatus {
    OnTrack,
    WrappingUp,
    Overtime,
}

impl TimerStatus {
    /// Classify `remaining` seconds against an `estimated` duration.
    ///
    /// `wrap_up_percent` is the share of the estimate (0-100) at or below
    /// which the item is considered to be wrapping up.
    pub fn classify(remaining: i64, estimated: i64, wrap_up_percent: u8) -> Self {
        if remaining < 0 {
            TimerStatus::Overtime
        } else if remaining * 100 <= estimated * i64::from(wrap_up_percent) {
            TimerStatus::WrappingUp
        } else {
            TimerStatus::OnTrack
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimerStatus::OnTrack => "On Track",
            TimerStatus::WrappingUp => "Wrapping Up",
            TimerStatus::Overtime => "Overtime",
        }
    }
}

impl fmt::Display for TimerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
