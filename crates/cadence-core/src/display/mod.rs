//! Display wrappers for terminal output.
//!
//! Domain models implement [`std::fmt::Display`] for their standalone form;
//! the wrappers here format them in context: a countdown readout, a numbered
//! agenda with its running total, a notification line.
//!
//! ```rust
//! use cadence_core::display::Countdown;
//!
//! assert_eq!(Countdown(300).to_string(), "05:00");
//! assert_eq!(Countdown(-30).to_string(), "+00:30");
//! ```

pub mod collections;
pub mod countdown;
pub mod datetime;
mod events;
pub mod status;

pub use collections::{AgendaList, NameList, TemplateList};
pub use countdown::Countdown;
pub use datetime::{LocalDateTime, TimeOfDay};
pub use status::{Notification, NotificationLevel};
