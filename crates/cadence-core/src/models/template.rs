//! Reusable agenda templates.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::AgendaItem;

/// The reusable part of an agenda item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateItem {
    pub title: String,
    pub estimated_minutes: u32,
    #[serde(default)]
    pub description: Option<String>,
}

impl TemplateItem {
    pub fn new(title: &str, estimated_minutes: u32, description: &str) -> Self {
        Self {
            title: title.to_string(),
            estimated_minutes,
            description: Some(description.to_string()),
        }
    }
}

impl From<&AgendaItem> for TemplateItem {
    fn from(item: &AgendaItem) -> Self {
        Self {
            title: item.title.clone(),
            estimated_minutes: item.estimated_minutes,
            description: item.description.clone(),
        }
    }
}

/// A named list of items that can seed a new agenda.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgendaTemplate {
    pub name: String,
    pub items: Vec<TemplateItem>,
}

impl AgendaTemplate {
    pub fn total_minutes(&self) -> u32 {
        self.items
            .iter()
            .map(|item| item.estimated_minutes)
            .fold(0, u32::saturating_add)
    }

    /// The templates shipped with a fresh installation.
    pub fn samples() -> Vec<AgendaTemplate> {
        vec![
            AgendaTemplate {
                name: "Daily Standup".to_string(),
                items: vec![
                    TemplateItem::new(
                        "What did you do yesterday?",
                        5,
                        "Team updates on previous day's work",
                    ),
                    TemplateItem::new("What will you do today?", 5, "Planning today's priorities"),
                    TemplateItem::new("Any blockers?", 5, "Discuss impediments and solutions"),
                ],
            },
            AgendaTemplate {
                name: "Project Review".to_string(),
                items: vec![
                    TemplateItem::new(
                        "Project Status Overview",
                        15,
                        "Current progress and milestones",
                    ),
                    TemplateItem::new(
                        "Budget Review",
                        20,
                        "Financial status and resource allocation",
                    ),
                    TemplateItem::new("Risk Assessment", 15, "Identify and mitigate project risks"),
                    TemplateItem::new("Next Steps", 10, "Action items and responsibilities"),
                ],
            },
        ]
    }
}

impl fmt::Display for AgendaTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "**{}**: {} items, {} min total",
            self.name,
            self.items.len(),
            self.total_minutes()
        )
    }
}
