//! Notifications for session events.

use super::{Countdown, Notification};
use crate::session::{ConnectionStatus, Event};

impl Event {
    /// The line to show the user, if the event is worth one. Ticks and
    /// snapshot refreshes are silent.
    pub fn notification(&self) -> Option<Notification> {
        let notification = match self {
            Event::ItemAdded {
                item,
                total_minutes,
            } => Notification::success(format!(
                "Added '{}' ({} min). Total: {total_minutes} min",
                item.title, item.estimated_minutes
            )),
            Event::ItemRemoved {
                title,
                total_minutes,
            } => Notification::info(format!("Removed '{title}'. Total: {total_minutes} min")),
            Event::AgendaLoaded { source, count } => {
                Notification::success(format!("Loaded {count} items from {source}"))
            }
            Event::TemplateSaved { name } => {
                Notification::success(format!("Saved template '{name}'"))
            }
            Event::AgendaConfirmed { total_items } => {
                Notification::success(format!("Meeting started with {total_items} items"))
            }
            Event::ItemStarted {
                index,
                title,
                estimated_minutes,
            } => Notification::info(format!(
                "Item {}: {title} ({estimated_minutes} min)",
                index + 1
            )),
            Event::TimerStarted => Notification::info("Timer started"),
            Event::TimerPaused => Notification::info("Timer paused"),
            Event::TimerStopped { remaining } => {
                Notification::info(format!("Timer reset to {}", Countdown(*remaining)))
            }
            Event::WrappingUp { title, remaining } => Notification::warning(format!(
                "Wrapping up '{title}': {} left",
                Countdown(*remaining)
            )),
            Event::OvertimeStarted { title } => {
                Notification::warning(format!("Time exceeded for '{title}'"))
            }
            Event::BreakStarted => Notification::info("Break started, timer paused"),
            Event::BreakEnded {
                duration_secs,
                total_break_secs,
            } => Notification::info(format!(
                "Break ended after {}. Total break time {}",
                Countdown(*duration_secs as i64),
                Countdown(*total_break_secs as i64)
            )),
            Event::ItemCompleted { item } => {
                let mut message = format!(
                    "Completed '{}': {} min (est. {} min)",
                    item.title, item.actual_minutes, item.estimated_minutes
                );
                if item.overtime {
                    message.push_str(&format!(", {} min over", item.minutes_over()));
                }
                Notification::success(message)
            }
            Event::MeetingFinished { summary } => Notification::success(format!(
                "Meeting complete: {} items in {} min",
                summary.total_items(),
                summary.actual_total
            )),
            Event::OvertimeNotesSaved { title } => {
                Notification::success(format!("Overtime notes saved for '{title}'"))
            }
            Event::MeetingReset => Notification::success("New meeting started"),
            Event::SharingEnabled { link } => {
                Notification::success(format!("Share this link: {link}"))
            }
            Event::BackupRestored { items } => Notification::success(format!(
                "Session recovered successfully ({items} items)"
            )),
            Event::BackupDiscarded => Notification::info("Previous session discarded"),
            Event::ConnectionChanged { status } => match status {
                ConnectionStatus::Connected => Notification::success("Connected to the facilitator"),
                ConnectionStatus::Stale => {
                    Notification::warning("The facilitator has not updated recently")
                }
                ConnectionStatus::Disconnected => {
                    Notification::warning("Waiting for the facilitator to share the meeting")
                }
            },
            Event::StorageFailed { operation, message } => {
                Notification::error(format!("Storage failed while {operation}: {message}"))
            }
            Event::Ticked { .. } | Event::ViewChanged { .. } | Event::SnapshotApplied => {
                return None
            }
        };
        Some(notification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::NotificationLevel;

    #[test]
    fn test_ticks_are_silent() {
        assert!(Event::Ticked { remaining: 10 }.notification().is_none());
        assert!(Event::SnapshotApplied.notification().is_none());
    }

    #[test]
    fn test_overtime_is_a_warning() {
        let note = Event::OvertimeStarted {
            title: "Standup".to_string(),
        }
        .notification()
        .unwrap();
        assert_eq!(note.level, NotificationLevel::Warning);
        assert!(note.message.contains("Standup"));
    }

    #[test]
    fn test_storage_failure_is_an_error() {
        let note = Event::StorageFailed {
            operation: "auto-saving".to_string(),
            message: "quota exceeded".to_string(),
        }
        .notification()
        .unwrap();
        assert_eq!(note.level, NotificationLevel::Error);
        assert_eq!(
            note.to_string(),
            "Error: Storage failed while auto-saving: quota exceeded\n"
        );
    }
}
