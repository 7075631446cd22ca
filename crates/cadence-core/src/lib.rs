//! Core library for the Cadence meeting agenda timer.
//!
//! This crate holds everything that is not terminal I/O: the agenda and
//! countdown state machine, session backup and recovery, the shared-session
//! sync between a facilitator and participants, settings, JSON
//! import/export, and the meeting summary.
//!
//! # Display Architecture
//!
//! - **Domain Models** ([`models`]): Implement [`std::fmt::Display`] for
//!   direct formatting
//! - **Display Wrappers** ([`display`]): Countdown readouts, numbered
//!   agendas and notification lines
//! - **Terminal Rendering**: Markdown output via the CLI's terminal renderer
//!
//! # Quick Start
//!
//! ```rust
//! use cadence_core::{
//!     params::NewAgendaItem,
//!     session::{Command, SessionBuilder},
//!     store::MemoryStore,
//! };
//!
//! let mut session = SessionBuilder::new().with_store(MemoryStore::new()).build()?;
//! session.dispatch(Command::AddItem(NewAgendaItem::new("Standup", 5)))?;
//! session.dispatch(Command::AddItem(NewAgendaItem::new("Review", 10)))?;
//! session.dispatch(Command::ConfirmAgenda)?;
//!
//! session.dispatch(Command::Advance)?;
//! session.dispatch(Command::Advance)?;
//!
//! let summary = session.summary();
//! assert_eq!(summary.estimated_total, 15);
//! println!("{summary}");
//! # cadence_core::Result::<()>::Ok(())
//! ```

pub mod clock;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod params;
pub mod session;
pub mod settings;
pub mod store;
pub mod summary;
pub mod timers;
pub mod transfer;

// Re-export commonly used types
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::SessionConfig;
pub use display::{AgendaList, Countdown, LocalDateTime, Notification, NotificationLevel};
pub use error::{Result, SessionError};
pub use models::{
    AgendaItem, AgendaTemplate, FontSize, ItemId, Phase, TemplateItem, Theme, TimerState,
    TimerStatus, View,
};
pub use session::{
    Command, ConnectionStatus, Event, MeetingLink, MeetingSession, Role, SessionBuilder,
};
pub use settings::Settings;
pub use summary::MeetingSummary;
