//! Cadence CLI Application
//!
//! Terminal front end for running timed meeting agendas, following shared
//! meetings and managing the team roster, overtime reasons and templates.

mod args;
mod cli;
mod console;
mod files;
mod live;
mod renderer;

use std::path::PathBuf;

use anyhow::{Context, Result};
use args::{Args, Commands};
use cadence_core::{store::SqliteStore, MeetingLink, SessionBuilder, SessionConfig};
use clap::Parser;
use cli::{Cli, NameListKind};
use log::info;
use renderer::TerminalRenderer;
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        store_file,
        no_color,
        command,
    } = Args::parse();

    let store = open_store(store_file)?;
    // `Settings` the type is shadowed by the subcommand variant below.
    let theme = cadence_core::Settings::load(&store).theme;
    let renderer = TerminalRenderer::with_theme(!no_color, theme);

    info!("Cadence started");

    match command {
        Run(args) => {
            let session = SessionBuilder::new()
                .with_store(store)
                .with_config(SessionConfig::from(&args))
                .build()
                .context("Failed to initialize meeting session")?;
            live::run_meeting(session, &renderer, &args).await
        }
        Join(args) => {
            let link: MeetingLink = args.link.parse().context("Invalid meeting link")?;
            info!("Joining meeting {}", link.meeting_id());
            let session = SessionBuilder::new()
                .with_store(store)
                .with_config(SessionConfig::from(&args))
                .joining(link)
                .build()
                .context("Failed to join meeting")?;
            live::follow_meeting(session, &renderer).await
        }
        Team { command } => {
            Cli::new(store, renderer).handle_name_list_command(NameListKind::Team, command)
        }
        Reasons { command } => {
            Cli::new(store, renderer).handle_name_list_command(NameListKind::Reasons, command)
        }
        Templates { command } => Cli::new(store, renderer).handle_template_command(command),
        Settings { command } => Cli::new(store, renderer).handle_settings_command(command),
    }
}

fn open_store(path: Option<PathBuf>) -> Result<SqliteStore> {
    match path {
        Some(path) => SqliteStore::open(&path)
            .with_context(|| format!("Failed to open store at {}", path.display())),
        None => SqliteStore::open_default().context("Failed to open default store"),
    }
}
