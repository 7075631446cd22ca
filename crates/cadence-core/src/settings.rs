//! Team roster, overtime reasons, templates and appearance preferences.
//!
//! Settings are local to one store: participants and facilitators each keep
//! their own. Every field is persisted under its own key so a corrupt
//! document only resets that one field to its default.

use log::warn;
use serde::de::DeserializeOwned;

use crate::{
    error::SessionError,
    models::{AgendaTemplate, FontSize, Theme},
    store::{keys, Store, StoreExt},
    Result,
};

const DEFAULT_TEAM_MEMBERS: [&str; 8] = [
    "John Smith",
    "Sarah Johnson",
    "Mike Chen",
    "Lisa Rodriguez",
    "David Kim",
    "Emma Wilson",
    "Alex Thompson",
    "Maria Garcia",
];

const DEFAULT_OVERTIME_REASONS: [&str; 8] = [
    "Requires deeper discussion",
    "New issues discovered",
    "Need stakeholder input",
    "Technical complexities",
    "Resource constraints",
    "Timeline concerns",
    "Stakeholder questions",
    "Scope clarification needed",
];

/// User preferences shared by every meeting run from the same store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub team_members: Vec<String>,
    pub overtime_reasons: Vec<String>,
    pub agenda_templates: Vec<AgendaTemplate>,
    pub theme: Theme,
    pub font_size: FontSize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            team_members: DEFAULT_TEAM_MEMBERS.iter().map(|s| s.to_string()).collect(),
            overtime_reasons: DEFAULT_OVERTIME_REASONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            agenda_templates: AgendaTemplate::samples(),
            theme: Theme::default(),
            font_size: FontSize::default(),
        }
    }
}

impl Settings {
    /// Load settings, falling back to defaults for missing or unreadable
    /// entries.
    pub fn load(store: &dyn Store) -> Self {
        let defaults = Self::default();
        Self {
            team_members: load_or(store, keys::TEAM_MEMBERS, defaults.team_members),
            overtime_reasons: load_or(store, keys::OVERTIME_REASONS, defaults.overtime_reasons),
            agenda_templates: load_or(store, keys::AGENDA_TEMPLATES, defaults.agenda_templates),
            theme: load_or(store, keys::CURRENT_THEME, defaults.theme),
            font_size: load_or(store, keys::CURRENT_FONT_SIZE, defaults.font_size),
        }
    }

    /// Persist every field.
    pub fn save(&self, store: &dyn Store) -> Result<()> {
        store.set_json(keys::TEAM_MEMBERS, &self.team_members)?;
        store.set_json(keys::OVERTIME_REASONS, &self.overtime_reasons)?;
        store.set_json(keys::AGENDA_TEMPLATES, &self.agenda_templates)?;
        store.set_json(keys::CURRENT_THEME, &self.theme)?;
        store.set_json(keys::CURRENT_FONT_SIZE, &self.font_size)?;
        Ok(())
    }

    /// Add a team member, returning the normalized name.
    pub fn add_team_member(&mut self, name: &str) -> Result<String> {
        let name = add_unique(&mut self.team_members, name, "teamMember", "Team member")?;
        Ok(name)
    }

    /// Remove a team member. Returns whether the name was present.
    pub fn remove_team_member(&mut self, name: &str) -> bool {
        remove_entry(&mut self.team_members, name)
    }

    /// Merge imported names, skipping duplicates. Returns how many were new.
    pub fn merge_team_members<I: IntoIterator<Item = String>>(&mut self, names: I) -> usize {
        merge_unique(&mut self.team_members, names)
    }

    pub fn is_team_member(&self, name: &str) -> bool {
        self.team_members.iter().any(|member| member == name)
    }

    /// Add an overtime reason, returning the normalized text.
    pub fn add_overtime_reason(&mut self, reason: &str) -> Result<String> {
        add_unique(
            &mut self.overtime_reasons,
            reason,
            "overtimeReason",
            "Reason",
        )
    }

    /// Remove an overtime reason. Returns whether it was present.
    pub fn remove_overtime_reason(&mut self, reason: &str) -> bool {
        remove_entry(&mut self.overtime_reasons, reason)
    }

    /// Merge imported reasons, skipping duplicates. Returns how many were new.
    pub fn merge_overtime_reasons<I: IntoIterator<Item = String>>(&mut self, reasons: I) -> usize {
        merge_unique(&mut self.overtime_reasons, reasons)
    }

    pub fn is_overtime_reason(&self, reason: &str) -> bool {
        self.overtime_reasons.iter().any(|r| r == reason)
    }

    /// Append a template. Names are trimmed and must not be empty.
    pub fn add_template(&mut self, mut template: AgendaTemplate) -> Result<()> {
        template.name = template.name.trim().to_string();
        if template.name.is_empty() {
            return Err(SessionError::validation("templateName")
                .with_reason("Template name cannot be empty"));
        }
        if template.items.is_empty() {
            return Err(SessionError::validation("templateItems")
                .with_reason("No agenda items to save as template"));
        }
        self.agenda_templates.push(template);
        Ok(())
    }

    /// Find a template by name, ignoring case.
    pub fn find_template(&self, name: &str) -> Option<&AgendaTemplate> {
        let name = name.trim();
        self.agenda_templates
            .iter()
            .find(|template| template.name.eq_ignore_ascii_case(name))
    }
}

/// Wipe every stored document (settings, backups, shared sessions) and
/// return the defaults now in effect.
///
/// # Errors
///
/// * `SessionError::ConfirmationRequired` - `confirmed` was false
/// * `SessionError::Storage` - The store could not be cleared
pub fn clear_all_data(store: &dyn Store, confirmed: bool) -> Result<Settings> {
    if !confirmed {
        return Err(SessionError::ConfirmationRequired {
            action: "clearing all data removes settings, templates and session backups"
                .to_string(),
        });
    }
    store.clear()?;
    warn!("Cleared all stored data");
    Ok(Settings::default())
}

fn load_or<T: DeserializeOwned>(store: &dyn Store, key: &str, default: T) -> T {
    match store.get_json::<T>(key) {
        Ok(Some(value)) => value,
        Ok(None) => default,
        Err(e) => {
            warn!("Failed to load setting '{key}', using default: {e}");
            default
        }
    }
}

fn add_unique(list: &mut Vec<String>, value: &str, field: &str, label: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(SessionError::validation(field).with_reason(format!("{label} cannot be empty")));
    }
    if list.iter().any(|existing| existing == value) {
        return Err(SessionError::validation(field).with_reason(format!("{label} already exists")));
    }
    list.push(value.to_string());
    Ok(value.to_string())
}

fn remove_entry(list: &mut Vec<String>, value: &str) -> bool {
    let before = list.len();
    list.retain(|existing| existing != value.trim());
    list.len() != before
}

fn merge_unique<I: IntoIterator<Item = String>>(list: &mut Vec<String>, values: I) -> usize {
    let before = list.len();
    for value in values {
        let value = value.trim();
        if !value.is_empty() && !list.iter().any(|existing| existing == value) {
            list.push(value.to_string());
        }
    }
    list.len() - before
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::TemplateItem, store::MemoryStore};

    #[test]
    fn test_defaults_when_store_is_empty() {
        let settings = Settings::load(&MemoryStore::new());
        assert_eq!(settings.team_members.len(), 8);
        assert_eq!(settings.overtime_reasons.len(), 8);
        assert_eq!(settings.agenda_templates.len(), 2);
        assert_eq!(settings.theme, Theme::ProfessionalBlue);
        assert_eq!(settings.font_size, FontSize::Medium);
    }

    #[test]
    fn test_save_then_load() {
        let store = MemoryStore::new();
        let mut settings = Settings::default();
        settings.add_team_member("Ada Lovelace").unwrap();
        settings.theme = Theme::DarkMode;
        settings.save(&store).unwrap();

        let loaded = Settings::load(&store);
        assert!(loaded.is_team_member("Ada Lovelace"));
        assert_eq!(loaded.theme, Theme::DarkMode);
    }

    #[test]
    fn test_corrupt_entry_falls_back_to_default_only_for_that_key() {
        let store = MemoryStore::new();
        store.set_json(keys::CURRENT_THEME, &Theme::GreenNature).unwrap();
        store.set(keys::TEAM_MEMBERS, "[1, 2").unwrap();

        let loaded = Settings::load(&store);
        assert_eq!(loaded.theme, Theme::GreenNature);
        assert_eq!(loaded.team_members.len(), 8);
    }

    #[test]
    fn test_duplicate_member_rejected() {
        let mut settings = Settings::default();
        let err = settings.add_team_member(" Mike Chen ").unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert!(settings.add_team_member("  ").is_err());
    }

    #[test]
    fn test_merge_deduplicates() {
        let mut settings = Settings::default();
        let added = settings.merge_overtime_reasons(vec![
            "Timeline concerns".to_string(),
            "Fire drill".to_string(),
            "Fire drill".to_string(),
        ]);
        assert_eq!(added, 1);
        assert!(settings.is_overtime_reason("Fire drill"));
    }

    #[test]
    fn test_remove_reports_presence() {
        let mut settings = Settings::default();
        assert!(settings.remove_team_member("Mike Chen"));
        assert!(!settings.remove_team_member("Mike Chen"));
    }

    #[test]
    fn test_clear_all_data_requires_confirmation() {
        let store = MemoryStore::new();
        let mut settings = Settings::default();
        settings.theme = Theme::DarkMode;
        settings.save(&store).unwrap();

        assert!(clear_all_data(&store, false).is_err());
        assert_eq!(Settings::load(&store).theme, Theme::DarkMode);

        let cleared = clear_all_data(&store, true).unwrap();
        assert_eq!(cleared, Settings::default());
        assert!(store.is_empty());
    }

    #[test]
    fn test_template_validation_and_lookup() {
        let mut settings = Settings::default();
        let empty = AgendaTemplate {
            name: "Retro".to_string(),
            items: vec![],
        };
        assert!(settings.add_template(empty).is_err());

        let retro = AgendaTemplate {
            name: " Retro ".to_string(),
            items: vec![TemplateItem::new("What went well", 10, "")],
        };
        settings.add_template(retro).unwrap();
        assert_eq!(settings.find_template("retro").unwrap().name, "Retro");
        assert!(settings.find_template("daily standup").is_some());
    }
}
