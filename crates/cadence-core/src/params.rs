//! Parameter structures for session operations.
//!
//! These structures are shared by every front-end and carry no
//! framework-specific derives beyond serde. Interface layers (the CLI
//! argument parser, the interactive console) build them and hand them to
//! [`crate::session::Command`] variants; validation happens here so that a
//! rejected request never reaches the state machine.

use serde::{Deserialize, Serialize};

use crate::{error::SessionError, models::MAX_ESTIMATED_MINUTES, Result};

/// Parameters for adding an agenda item.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAgendaItem {
    /// Title of the item (required, trimmed)
    pub title: String,
    /// Estimated duration in minutes; must be positive
    pub estimated_minutes: i64,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
}

impl NewAgendaItem {
    pub fn new(title: impl Into<String>, estimated_minutes: i64) -> Self {
        Self {
            title: title.into(),
            estimated_minutes,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Validate and normalize the item, returning its trimmed title, the
    /// estimate as a positive minute count, and the trimmed description.
    ///
    /// # Errors
    ///
    /// * `SessionError::Validation` - When the title is blank
    /// * `SessionError::Validation` - When the estimate is not positive
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cadence_core::params::NewAgendaItem;
    ///
    /// let (title, minutes, _) = NewAgendaItem::new("  Standup ", 5).validate()?;
    /// assert_eq!(title, "Standup");
    /// assert_eq!(minutes, 5);
    ///
    /// assert!(NewAgendaItem::new("Standup", 0).validate().is_err());
    /// # cadence_core::Result::<()>::Ok(())
    /// ```
    pub fn validate(&self) -> Result<(String, u32, Option<String>)> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(SessionError::validation("title").with_reason("Title cannot be empty"));
        }

        let minutes = u32::try_from(self.estimated_minutes)
            .ok()
            .filter(|m| (1..=MAX_ESTIMATED_MINUTES).contains(m))
            .ok_or_else(|| {
                SessionError::validation("estimatedMinutes").with_reason(format!(
                    "Time estimate must be between 1 and {MAX_ESTIMATED_MINUTES} minutes, got {}",
                    self.estimated_minutes
                ))
            })?;

        let description = self
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(String::from);

        Ok((title.to_string(), minutes, description))
    }
}

/// Notes captured while the active item runs over its estimate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OvertimeNotes {
    /// Free-form notes
    #[serde(default)]
    pub notes: String,
    /// One of the configured overtime reasons, or empty
    #[serde(default)]
    pub reason: String,
    /// Team members who should follow up
    #[serde(default)]
    pub participants: Vec<String>,
}

/// Parameters for the destructive "start new meeting" reset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StartNewMeeting {
    /// Must be true; the reset discards the current agenda and results
    #[serde(default)]
    pub confirmed: bool,
}

/// Parameters for saving the current agenda as a template.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SaveTemplate {
    /// Name of the new template
    pub name: String,
}
