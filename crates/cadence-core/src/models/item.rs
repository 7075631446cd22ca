//! Agenda item model.

use std::fmt;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Longest estimate accepted for a single item: one full day.
pub const MAX_ESTIMATED_MINUTES: u32 = 24 * 60;

/// Unique identifier of an agenda item.
///
/// Built from the creation instant in milliseconds plus a random tie-breaker,
/// so ids sort in creation order and stay unique when several items are
/// created within the same millisecond.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Generate a fresh id for an item created at `now`.
    pub fn generate(now: Timestamp) -> Self {
        let tie_breaker = Uuid::new_v4().as_u128() as u32;
        Self(format!("{}-{tie_breaker:08x}", now.as_millisecond()))
    }

    /// Borrow the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single agenda entry and, once completed, its outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgendaItem {
    pub id: ItemId,
    pub title: String,
    pub estimated_minutes: u32,
    #[serde(default)]
    pub description: Option<String>,
    /// Zero until the item is completed, then at least 1.
    #[serde(default)]
    pub actual_minutes: u32,
    #[serde(default)]
    pub overtime: bool,
    #[serde(default)]
    pub overtime_notes: String,
    #[serde(default)]
    pub overtime_reason: String,
    #[serde(default)]
    pub follow_up_participants: Vec<String>,
}

impl AgendaItem {
    /// Create a pending item. Inputs are expected to be validated already.
    pub fn new(
        id: ItemId,
        title: impl Into<String>,
        estimated_minutes: u32,
        description: Option<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            estimated_minutes,
            description: description.filter(|d| !d.trim().is_empty()),
            actual_minutes: 0,
            overtime: false,
            overtime_notes: String::new(),
            overtime_reason: String::new(),
            follow_up_participants: Vec::new(),
        }
    }

    /// Estimate expressed in seconds.
    pub fn estimated_seconds(&self) -> i64 {
        i64::from(self.estimated_minutes) * 60
    }

    /// Whether the item has been completed (its outcome is fixed).
    pub fn is_completed(&self) -> bool {
        self.actual_minutes > 0
    }

    /// Minutes spent beyond the estimate, zero when on time.
    pub fn minutes_over(&self) -> u32 {
        self.actual_minutes.saturating_sub(self.estimated_minutes)
    }

    /// Whether this item carries anything worth following up on.
    pub fn needs_follow_up(&self) -> bool {
        self.overtime
            && (!self.overtime_notes.is_empty() || !self.follow_up_participants.is_empty())
    }

    /// Fix the outcome of the item given the seconds still remaining on its
    /// countdown. Negative `remaining` means the estimate was exceeded.
    pub(crate) fn complete(&mut self, remaining: i64) {
        let elapsed = self.estimated_seconds() - remaining;
        let minutes = (elapsed.max(0) + 59) / 60;
        self.actual_minutes = u32::try_from(minutes.max(1)).unwrap_or(u32::MAX);
        self.overtime = remaining < 0;
    }
}

impl fmt::Display for AgendaItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "**{}** ({} min)", self.title, self.estimated_minutes)?;
        if let Some(desc) = &self.description {
            write!(f, " - {desc}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(minutes: u32) -> AgendaItem {
        AgendaItem::new(ItemId::from("1-00000000"), "Standup", minutes, None)
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let now = Timestamp::from_second(1_700_000_000).unwrap();
        let a = ItemId::generate(now);
        let b = ItemId::generate(now);
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("1700000000000-"));
    }

    #[test]
    fn test_complete_rounds_up_partial_minutes() {
        let mut it = item(5);
        it.complete(-30);
        assert_eq!(it.actual_minutes, 6);
        assert!(it.overtime);
        assert_eq!(it.minutes_over(), 1);
    }

    #[test]
    fn test_complete_floor_is_one_minute() {
        let mut it = item(10);
        it.complete(600);
        assert_eq!(it.actual_minutes, 1);
        assert!(!it.overtime);
    }

    #[test]
    fn test_complete_at_exactly_zero_is_not_overtime() {
        let mut it = item(2);
        it.complete(0);
        assert_eq!(it.actual_minutes, 2);
        assert!(!it.overtime);
    }

    #[test]
    fn test_blank_description_is_dropped() {
        let it = AgendaItem::new(ItemId::from("x"), "Review", 3, Some("  ".to_string()));
        assert_eq!(it.description, None);
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(item(5)).unwrap();
        assert_eq!(json["estimatedMinutes"], 5);
        assert_eq!(json["actualMinutes"], 0);
        assert!(json["followUpParticipants"].is_array());
    }
}
