//! Collection wrapper types for lists of agenda items, templates and names.

use std::fmt;

use crate::models::{AgendaItem, AgendaTemplate};

/// Numbered agenda with an item count and total estimate footer.
///
/// Items before `current` are marked done and the item at `current` is
/// marked active, so the same wrapper serves the setup list and the running
/// meeting.
pub struct AgendaList<'a> {
    items: &'a [AgendaItem],
    current: Option<usize>,
}

impl<'a> AgendaList<'a> {
    pub fn new(items: &'a [AgendaItem]) -> Self {
        Self {
            items,
            current: None,
        }
    }

    pub fn with_current(items: &'a [AgendaItem], current: usize) -> Self {
        Self {
            items,
            current: Some(current),
        }
    }
}

impl fmt::Display for AgendaList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Agenda")?;
        writeln!(f)?;
        if self.items.is_empty() {
            return writeln!(f, "No agenda items yet.");
        }
        for (index, item) in self.items.iter().enumerate() {
            let marker = match self.current {
                Some(current) if index < current => "✓ ",
                Some(current) if index == current => "➤ ",
                Some(_) => "○ ",
                None => "",
            };
            writeln!(f, "{}. {marker}{item}", index + 1)?;
        }
        let total = self
            .items
            .iter()
            .map(|item| item.estimated_minutes)
            .fold(0, u32::saturating_add);
        writeln!(f)?;
        writeln!(f, "{} items, {total} min total", self.items.len())
    }
}

/// List of agenda templates.
pub struct TemplateList<'a>(pub &'a [AgendaTemplate]);

impl fmt::Display for TemplateList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Templates")?;
        writeln!(f)?;
        if self.0.is_empty() {
            return writeln!(f, "No templates saved.");
        }
        for template in self.0 {
            writeln!(f, "- {template}")?;
        }
        Ok(())
    }
}

/// A titled bullet list of names (team members, overtime reasons).
pub struct NameList<'a> {
    pub title: &'a str,
    pub names: &'a [String],
}

impl fmt::Display for NameList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}", self.title)?;
        writeln!(f)?;
        if self.names.is_empty() {
            return writeln!(f, "None.");
        }
        for name in self.names {
            writeln!(f, "- {name}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ItemId;

    fn items() -> Vec<AgendaItem> {
        vec![
            AgendaItem::new(ItemId::from("1"), "Standup", 5, None),
            AgendaItem::new(ItemId::from("2"), "Review", 10, Some("Q3 numbers".to_string())),
        ]
    }

    #[test]
    fn test_agenda_list_total() {
        let items = items();
        let output = AgendaList::new(&items).to_string();
        assert!(output.contains("1. **Standup** (5 min)"));
        assert!(output.contains("2. **Review** (10 min) - Q3 numbers"));
        assert!(output.contains("2 items, 15 min total"));
    }

    #[test]
    fn test_agenda_list_markers() {
        let items = items();
        let output = AgendaList::with_current(&items, 1).to_string();
        assert!(output.contains("1. ✓ **Standup**"));
        assert!(output.contains("2. ➤ **Review**"));
    }

    #[test]
    fn test_empty_lists() {
        assert!(AgendaList::new(&[]).to_string().contains("No agenda items yet."));
        let names = NameList {
            title: "Team",
            names: &[],
        };
        assert!(names.to_string().contains("None."));
    }
}
