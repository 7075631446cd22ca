//! Data models for agendas and meeting sessions.
//!
//! Models implement [`std::fmt::Display`] with short markdown fragments so
//! they can be dropped straight into terminal output; the richer, contextual
//! formatting lives in [`crate::display`].
//!
//! Everything that ends up in the store is serialized in camelCase so the
//! documents stay compatible with exported agenda and settings files.

mod appearance;
mod item;
mod state;
mod template;

pub use appearance::{FontSize, Theme};
pub use item::{AgendaItem, ItemId, MAX_ESTIMATED_MINUTES};
pub use state::{Phase, TimerState, TimerStatus, View};
pub use template::{AgendaTemplate, TemplateItem};
