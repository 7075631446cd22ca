//! Handlers for the settings subcommands.
//!
//! These run outside a meeting: each loads the settings from the store,
//! applies one change, saves, and prints the result.

use anyhow::{Context, Result};
use cadence_core::{
    display::{NameList, TemplateList},
    settings::{clear_all_data, Settings},
    store::Store,
    transfer, Clock, Notification, SystemClock,
};

use crate::{
    args::{NameListCommands, SettingsCommands, TemplateCommands},
    files::{read_json_file, write_json_file},
    renderer::TerminalRenderer,
};

/// Which name list a [`NameListCommands`] applies to.
#[derive(Clone, Copy)]
pub enum NameListKind {
    Team,
    Reasons,
}

impl NameListKind {
    fn title(&self) -> &'static str {
        match self {
            NameListKind::Team => "Team Members",
            NameListKind::Reasons => "Overtime Reasons",
        }
    }

    fn entries<'a>(&self, settings: &'a Settings) -> &'a [String] {
        match self {
            NameListKind::Team => &settings.team_members,
            NameListKind::Reasons => &settings.overtime_reasons,
        }
    }
}

pub struct Cli<S: Store> {
    store: S,
    renderer: TerminalRenderer,
}

impl<S: Store> Cli<S> {
    pub fn new(store: S, renderer: TerminalRenderer) -> Self {
        Self { store, renderer }
    }

    fn load(&self) -> Settings {
        Settings::load(&self.store)
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        settings
            .save(&self.store)
            .context("Failed to save settings")
    }

    fn success(&self, message: impl Into<String>) {
        self.renderer.notify(&Notification::success(message));
    }

    pub fn handle_name_list_command(
        &self,
        kind: NameListKind,
        command: NameListCommands,
    ) -> Result<()> {
        let mut settings = self.load();
        match command {
            NameListCommands::List => {
                let list = NameList {
                    title: kind.title(),
                    names: kind.entries(&settings),
                };
                self.renderer.render(&list.to_string());
            }
            NameListCommands::Add { value } => {
                let added = match kind {
                    NameListKind::Team => settings.add_team_member(&value)?,
                    NameListKind::Reasons => settings.add_overtime_reason(&value)?,
                };
                self.save(&settings)?;
                self.success(format!("Added '{added}'"));
            }
            NameListCommands::Remove { value } => {
                let removed = match kind {
                    NameListKind::Team => settings.remove_team_member(&value),
                    NameListKind::Reasons => settings.remove_overtime_reason(&value),
                };
                if !removed {
                    anyhow::bail!("'{}' not found", value.trim());
                }
                self.save(&settings)?;
                self.success(format!("Removed '{}'", value.trim()));
            }
            NameListCommands::Import { file } => {
                let names = transfer::parse_name_list(&read_json_file(&file)?)?;
                let added = match kind {
                    NameListKind::Team => settings.merge_team_members(names),
                    NameListKind::Reasons => settings.merge_overtime_reasons(names),
                };
                self.save(&settings)?;
                self.success(format!("Imported {added} new entries"));
            }
            NameListCommands::Export { file } => {
                let json = transfer::export_name_list(kind.entries(&settings))?;
                write_json_file(&file, &json)?;
                self.success(format!("Exported to {}", file.display()));
            }
        }
        Ok(())
    }

    pub fn handle_template_command(&self, command: TemplateCommands) -> Result<()> {
        match command {
            TemplateCommands::List => {
                let settings = self.load();
                self.renderer
                    .render(&TemplateList(&settings.agenda_templates).to_string());
            }
        }
        Ok(())
    }

    pub fn handle_settings_command(&self, command: SettingsCommands) -> Result<()> {
        match command {
            SettingsCommands::Show => {
                self.renderer.render(&settings_overview(&self.load()));
            }
            SettingsCommands::Theme { theme } => {
                let mut settings = self.load();
                settings.theme = theme.into();
                self.save(&settings)?;
                self.success(format!("Theme set to {}", settings.theme.name()));
            }
            SettingsCommands::FontSize { size } => {
                let mut settings = self.load();
                settings.font_size = size.into();
                self.save(&settings)?;
                self.success(format!("Font size set to {}", settings.font_size));
            }
            SettingsCommands::Backup { file } => {
                let json = transfer::export_settings(&self.load(), SystemClock.now())?;
                write_json_file(&file, &json)?;
                self.success(format!("Settings backup created at {}", file.display()));
            }
            SettingsCommands::Restore { file } => {
                let settings = transfer::parse_settings_backup(&read_json_file(&file)?)?;
                self.save(&settings)?;
                self.success("Settings restored successfully");
            }
            SettingsCommands::Clear { confirm } => {
                clear_all_data(&self.store, confirm)?;
                self.success("All data cleared");
            }
        }
        Ok(())
    }
}

/// Markdown overview of every setting.
pub fn settings_overview(settings: &Settings) -> String {
    format!(
        "# Settings\n\n\
         - Theme: {}\n\
         - Font size: {}\n\
         - Team members: {}\n\
         - Overtime reasons: {}\n\
         - Templates: {}\n",
        settings.theme.name(),
        settings.font_size,
        settings.team_members.len(),
        settings.overtime_reasons.len(),
        settings.agenda_templates.len()
    )
}
