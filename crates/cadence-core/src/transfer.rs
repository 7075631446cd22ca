//! JSON import and export documents.
//!
//! Documents exchanged with files:
//!
//! - agenda: `{ "title"?, "items": [{ "title", "estimatedMinutes", "description"? }], "exportDate"? }`
//! - roster / reasons: a flat array of strings
//! - settings backup: `{ "teamMembers", "overtimeReasons", "agendaTemplates"?,
//!   "currentTheme"?, "currentFontSize"?, "backupDate", "version" }`
//!
//! Parsing never touches existing state; callers merge the parsed result
//! only once the whole document has been accepted.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    error::SessionError,
    models::{
        AgendaItem, AgendaTemplate, FontSize, TemplateItem, Theme, MAX_ESTIMATED_MINUTES,
    },
    settings::Settings,
    Result,
};

/// Minutes assigned to imported items without a usable estimate.
pub const DEFAULT_IMPORT_MINUTES: u32 = 10;

const BACKUP_VERSION: &str = "1.0";

/// An exported agenda.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgendaDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub items: Vec<TemplateItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_date: Option<Timestamp>,
}

/// A full settings backup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsBackup {
    pub team_members: Vec<String>,
    pub overtime_reasons: Vec<String>,
    #[serde(default)]
    pub agenda_templates: Option<Vec<AgendaTemplate>>,
    #[serde(default)]
    pub current_theme: Option<String>,
    #[serde(default)]
    pub current_font_size: Option<String>,
    #[serde(default)]
    pub backup_date: Option<Timestamp>,
    #[serde(default)]
    pub version: Option<String>,
}

/// Serialize the agenda for export.
pub fn export_agenda(items: &[AgendaItem], now: Timestamp) -> Result<String> {
    if items.is_empty() {
        return Err(
            SessionError::validation("agendaItems").with_reason("No agenda items to export")
        );
    }
    let date = now.strftime("%Y-%m-%d");
    let document = AgendaDocument {
        title: Some(format!("Meeting Agenda - {date}")),
        items: items.iter().map(TemplateItem::from).collect(),
        export_date: Some(now),
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

/// Parse an agenda document into items ready to be appended.
///
/// Missing titles become "Untitled" and missing or zero estimates become
/// [`DEFAULT_IMPORT_MINUTES`]. Anything else that does not fit the schema
/// rejects the whole document.
pub fn parse_agenda(json: &str) -> Result<Vec<TemplateItem>> {
    let document = parse_value(json)?;
    let items = document
        .get("items")
        .and_then(Value::as_array)
        .ok_or_else(|| SessionError::import("Invalid agenda format: expected an 'items' array"))?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| parse_agenda_entry(index, item))
        .collect()
}

fn parse_agenda_entry(index: usize, item: &Value) -> Result<TemplateItem> {
    let entry = item
        .as_object()
        .ok_or_else(|| SessionError::import(format!("Item {} is not an object", index + 1)))?;

    let title = match entry.get("title") {
        Some(Value::String(title)) if !title.trim().is_empty() => title.trim().to_string(),
        None | Some(Value::Null) | Some(Value::String(_)) => "Untitled".to_string(),
        Some(_) => {
            return Err(SessionError::import(format!(
                "Item {} has a non-text title",
                index + 1
            )))
        }
    };

    let estimated_minutes = match entry.get("estimatedMinutes") {
        None | Some(Value::Null) => DEFAULT_IMPORT_MINUTES,
        Some(Value::Number(n)) => match n.as_u64() {
            Some(0) => DEFAULT_IMPORT_MINUTES,
            Some(m) => u32::try_from(m)
                .ok()
                .filter(|m| *m <= MAX_ESTIMATED_MINUTES)
                .ok_or_else(|| {
                    SessionError::import(format!(
                        "Item {} estimate exceeds {MAX_ESTIMATED_MINUTES} minutes",
                        index + 1
                    ))
                })?,
            None => {
                return Err(SessionError::import(format!(
                    "Item {} estimate must be a positive whole number of minutes",
                    index + 1
                )))
            }
        },
        Some(_) => {
            return Err(SessionError::import(format!(
                "Item {} estimate must be a number",
                index + 1
            )))
        }
    };

    let description = entry
        .get("description")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(String::from);

    Ok(TemplateItem {
        title,
        estimated_minutes,
        description,
    })
}

/// Serialize a roster or reason list.
pub fn export_name_list(names: &[String]) -> Result<String> {
    Ok(serde_json::to_string_pretty(names)?)
}

/// Parse a flat array of strings.
pub fn parse_name_list(json: &str) -> Result<Vec<String>> {
    match parse_value(json)? {
        Value::Array(values) => values
            .into_iter()
            .map(|value| match value {
                Value::String(name) => Ok(name),
                other => Err(SessionError::import(format!(
                    "Invalid format: expected text entries, found {other}"
                ))),
            })
            .collect(),
        _ => Err(SessionError::import("Invalid format: expected an array")),
    }
}

/// Serialize every setting into a backup document.
pub fn export_settings(settings: &Settings, now: Timestamp) -> Result<String> {
    let backup = SettingsBackup {
        team_members: settings.team_members.clone(),
        overtime_reasons: settings.overtime_reasons.clone(),
        agenda_templates: Some(settings.agenda_templates.clone()),
        current_theme: Some(settings.theme.to_string()),
        current_font_size: Some(settings.font_size.to_string()),
        backup_date: Some(now),
        version: Some(BACKUP_VERSION.to_string()),
    };
    Ok(serde_json::to_string_pretty(&backup)?)
}

/// Parse a settings backup into a complete replacement [`Settings`].
///
/// Team members and overtime reasons are required and are normalized like an
/// import; missing templates become an empty list and unknown appearance
/// values fall back to the defaults.
pub fn parse_settings_backup(json: &str) -> Result<Settings> {
    let backup: SettingsBackup = serde_json::from_str(json)
        .map_err(|e| SessionError::import(format!("Invalid backup format: {e}")))?;

    let mut settings = Settings {
        team_members: Vec::new(),
        overtime_reasons: Vec::new(),
        agenda_templates: backup.agenda_templates.unwrap_or_default(),
        theme: backup
            .current_theme
            .and_then(|t| t.parse::<Theme>().ok())
            .unwrap_or_default(),
        font_size: backup
            .current_font_size
            .and_then(|s| s.parse::<FontSize>().ok())
            .unwrap_or_default(),
    };
    settings.merge_team_members(backup.team_members);
    settings.merge_overtime_reasons(backup.overtime_reasons);
    Ok(settings)
}

fn parse_value(json: &str) -> Result<Value> {
    serde_json::from_str(json).map_err(|e| SessionError::import(format!("Invalid JSON format: {e}")))
}
