//! Command-line interface definitions using clap
//!
//! Argument structures carry every clap-specific attribute; each converts
//! into the interface-agnostic type the core expects:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params / Config → Session
//! ```

use std::{path::PathBuf, time::Duration};

use cadence_core::{FontSize, SessionConfig, Theme};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};

/// Terminal meeting agenda timer
///
/// Cadence builds a meeting agenda, counts down each item, tracks overtime
/// and breaks, and produces a summary with follow-up actions. A running
/// meeting can be shared with participants who mirror it read-only.
#[derive(Parser)]
#[command(version, about, name = "cadence")]
pub struct Args {
    /// Path to the SQLite store file. Defaults to
    /// $XDG_DATA_HOME/cadence/cadence.db
    #[arg(long, global = true)]
    pub store_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for the Cadence CLI
#[derive(Subcommand)]
pub enum Commands {
    /// Run a meeting in the interactive console
    #[command(alias = "r")]
    Run(RunArgs),
    /// Follow a shared meeting as a participant
    #[command(alias = "j")]
    Join(JoinArgs),
    /// Manage the team roster
    Team {
        #[command(subcommand)]
        command: NameListCommands,
    },
    /// Manage overtime reasons
    Reasons {
        #[command(subcommand)]
        command: NameListCommands,
    },
    /// Manage agenda templates
    Templates {
        #[command(subcommand)]
        command: TemplateCommands,
    },
    /// Appearance, backup and reset
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },
}

/// Start the interactive meeting console
///
/// Type `help` in the console for the list of commands.
#[derive(ClapArgs)]
pub struct RunArgs {
    /// Agenda JSON file to import at startup
    #[arg(long, conflicts_with = "template")]
    pub agenda: Option<PathBuf>,

    /// Saved template to load at startup
    #[arg(long)]
    pub template: Option<String>,

    /// Restore a recent unfinished meeting without asking
    #[arg(long, conflicts_with = "fresh")]
    pub restore: bool,

    /// Discard any recent unfinished meeting without asking
    #[arg(long)]
    pub fresh: bool,

    /// Publish the meeting for participants right away
    #[arg(long)]
    pub share: bool,

    /// Seconds between automatic backups
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    pub autosave_secs: u64,

    /// Remaining share of the estimate at which an item is "wrapping up"
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub wrap_up_percent: u8,
}

impl From<&RunArgs> for SessionConfig {
    fn from(val: &RunArgs) -> Self {
        SessionConfig {
            autosave_interval: Duration::from_secs(val.autosave_secs),
            wrap_up_percent: val.wrap_up_percent,
            ..SessionConfig::default()
        }
    }
}

/// Follow a shared meeting
#[derive(ClapArgs)]
pub struct JoinArgs {
    /// Meeting link (cadence://meeting#meeting=<id>) or bare meeting id
    pub link: String,

    /// Seconds between snapshot polls
    #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u64).range(1..))]
    pub poll_secs: u64,
}

impl From<&JoinArgs> for SessionConfig {
    fn from(val: &JoinArgs) -> Self {
        SessionConfig {
            poll_interval: Duration::from_secs(val.poll_secs),
            ..SessionConfig::default()
        }
    }
}

/// Operations shared by the team roster and the overtime reasons
#[derive(Subcommand)]
pub enum NameListCommands {
    /// List all entries
    #[command(aliases = ["l", "ls"])]
    List,
    /// Add an entry
    #[command(alias = "a")]
    Add {
        /// Name or reason to add
        value: String,
    },
    /// Remove an entry
    #[command(aliases = ["rm", "d"])]
    Remove {
        /// Name or reason to remove
        value: String,
    },
    /// Merge entries from a JSON array file, skipping duplicates
    Import {
        /// JSON file containing an array of strings
        file: PathBuf,
    },
    /// Write entries to a JSON array file
    Export {
        /// Destination JSON file
        file: PathBuf,
    },
}

#[derive(Subcommand)]
pub enum TemplateCommands {
    /// List saved agenda templates
    #[command(aliases = ["l", "ls"])]
    List,
}

#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Show current settings
    #[command(alias = "s")]
    Show,
    /// Set the color theme
    Theme {
        #[arg(value_enum)]
        theme: ThemeArg,
    },
    /// Set the font size preference
    FontSize {
        #[arg(value_enum)]
        size: FontSizeArg,
    },
    /// Write every setting to a JSON backup file
    Backup {
        /// Destination JSON file
        file: PathBuf,
    },
    /// Replace every setting from a JSON backup file
    Restore {
        /// Backup JSON file
        file: PathBuf,
    },
    /// Delete all stored data, including unfinished meetings
    Clear {
        /// Confirm the deletion
        #[arg(long)]
        confirm: bool,
    },
}

/// Command-line representation of the color themes
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum ThemeArg {
    ProfessionalBlue,
    GreenNature,
    PurpleCorporate,
    OrangeEnergy,
    DarkMode,
}

impl From<ThemeArg> for Theme {
    fn from(val: ThemeArg) -> Self {
        match val {
            ThemeArg::ProfessionalBlue => Theme::ProfessionalBlue,
            ThemeArg::GreenNature => Theme::GreenNature,
            ThemeArg::PurpleCorporate => Theme::PurpleCorporate,
            ThemeArg::OrangeEnergy => Theme::OrangeEnergy,
            ThemeArg::DarkMode => Theme::DarkMode,
        }
    }
}

/// Command-line representation of the font sizes
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum FontSizeArg {
    Small,
    Medium,
    Large,
}

impl From<FontSizeArg> for FontSize {
    fn from(val: FontSizeArg) -> Self {
        match val {
            FontSizeArg::Small => FontSize::Small,
            FontSizeArg::Medium => FontSize::Medium,
            FontSizeArg::Large => FontSize::Large,
        }
    }
}
