//! Meeting summary and its plain-text export.

use std::fmt::{self, Write as _};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{
    display::{Countdown, LocalDateTime},
    models::AgendaItem,
};

/// Totals and per-item outcomes of a finished (or partially run) meeting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingSummary {
    pub items: Vec<AgendaItem>,
    pub estimated_total: u32,
    pub actual_total: u32,
    pub overtime_items: usize,
    pub total_break_secs: u64,
}

impl MeetingSummary {
    /// Build a summary from completed item snapshots.
    pub fn from_completed(completed: &[AgendaItem], total_break_secs: u64) -> Self {
        Self {
            items: completed.to_vec(),
            estimated_total: completed
                .iter()
                .map(|i| i.estimated_minutes)
                .fold(0, u32::saturating_add),
            actual_total: completed
                .iter()
                .map(|i| i.actual_minutes)
                .fold(0, u32::saturating_add),
            overtime_items: completed.iter().filter(|i| i.overtime).count(),
            total_break_secs,
        }
    }

    pub fn total_items(&self) -> usize {
        self.items.len()
    }

    /// Items that ran over and carry notes or follow-up participants.
    pub fn follow_ups(&self) -> impl Iterator<Item = &AgendaItem> {
        self.items.iter().filter(|item| item.needs_follow_up())
    }

    /// Render the plain-text report meant for pasting into chat or email.
    pub fn to_plain_text(&self, generated_at: Timestamp) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail.
        let _ = self.write_plain_text(&mut out, generated_at);
        out
    }

    fn write_plain_text(&self, out: &mut String, generated_at: Timestamp) -> fmt::Result {
        writeln!(out, "MEETING SUMMARY")?;
        writeln!(out, "Generated: {}", LocalDateTime(&generated_at))?;
        writeln!(out)?;
        writeln!(out, "OVERVIEW:")?;
        writeln!(out, " Total Items: {}", self.total_items())?;
        writeln!(out, " Estimated Time: {} minutes", self.estimated_total)?;
        writeln!(out, " Actual Time: {} minutes", self.actual_total)?;
        writeln!(out, " Overtime Items: {}", self.overtime_items)?;
        if self.total_break_secs > 0 {
            writeln!(out, " Break Time: {} minutes", (self.total_break_secs + 59) / 60)?;
        }
        writeln!(out)?;

        writeln!(out, "AGENDA ITEMS:")?;
        for (index, item) in self.items.iter().enumerate() {
            writeln!(out, "{}. {}", index + 1, item.title)?;
            if let Some(desc) = &item.description {
                writeln!(out, "   Description: {desc}")?;
            }
            write!(
                out,
                "   Estimated: {} min | Actual: {} min",
                item.estimated_minutes, item.actual_minutes
            )?;
            if item.overtime {
                write!(out, " ({} min over)", item.minutes_over())?;
            }
            writeln!(out)?;
            writeln!(out)?;
        }

        let mut follow_ups = self.follow_ups().peekable();
        if follow_ups.peek().is_some() {
            writeln!(out, "FOLLOW-UP ACTIONS:")?;
            for item in follow_ups {
                writeln!(out, " {}", item.title)?;
                if !item.overtime_notes.is_empty() {
                    writeln!(out, "  Notes: {}", item.overtime_notes)?;
                }
                if !item.overtime_reason.is_empty() {
                    writeln!(out, "  Reason: {}", item.overtime_reason)?;
                }
                if !item.follow_up_participants.is_empty() {
                    writeln!(
                        out,
                        "  Participants: {}",
                        item.follow_up_participants.join(", ")
                    )?;
                }
                writeln!(out)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for MeetingSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Meeting Summary")?;
        writeln!(f)?;
        writeln!(f, "- Items: {}", self.total_items())?;
        writeln!(f, "- Estimated: {} min", self.estimated_total)?;
        writeln!(f, "- Actual: {} min", self.actual_total)?;
        writeln!(f, "- Overtime items: {}", self.overtime_items)?;
        if self.total_break_secs > 0 {
            writeln!(f, "- Breaks: {}", Countdown(self.total_break_secs as i64))?;
        }

        if !self.items.is_empty() {
            writeln!(f)?;
            writeln!(f, "## Items")?;
            writeln!(f)?;
            for (index, item) in self.items.iter().enumerate() {
                let marker = if item.overtime { "⚠" } else { "✓" };
                write!(
                    f,
                    "{}. {marker} **{}**: {} min (est. {} min)",
                    index + 1,
                    item.title,
                    item.actual_minutes,
                    item.estimated_minutes
                )?;
                if item.overtime {
                    write!(f, ", {} over", item.minutes_over())?;
                }
                writeln!(f)?;
            }
        }

        let follow_ups: Vec<_> = self.follow_ups().collect();
        if !follow_ups.is_empty() {
            writeln!(f)?;
            writeln!(f, "## Follow-up Actions")?;
            for item in follow_ups {
                writeln!(f)?;
                writeln!(f, "### {}", item.title)?;
                if !item.overtime_notes.is_empty() {
                    writeln!(f, "{}", item.overtime_notes)?;
                }
                if !item.overtime_reason.is_empty() {
                    writeln!(f, "- Reason: {}", item.overtime_reason)?;
                }
                if !item.follow_up_participants.is_empty() {
                    writeln!(f, "- Participants: {}", item.follow_up_participants.join(", "))?;
                }
            }
        }
        Ok(())
    }
}
