//! Parsing of interactive console lines.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};
use cadence_core::{
    params::{NewAgendaItem, SaveTemplate, StartNewMeeting},
    session::Command,
    View,
};

pub const HELP: &str = "\
# Commands

## Setup
- `add <minutes> <title> [| description]`: add an agenda item
- `remove <n>`: remove item number n
- `list`: show the agenda
- `template <name>`: replace the agenda with a saved template
- `templates`: list saved templates
- `save-template <name>`: save the agenda as a template
- `import <file>` / `export <file>`: agenda JSON files
- `confirm`: start the meeting

## Meeting
- `start`, `pause`, `toggle`, `stop`: control the countdown
- `next`: complete the current item
- `break`: start or end a break
- `notes <text>`, `reason <text>`, `follow <name, name>`: overtime notes
- `status`: show the timer
- `share`: publish the meeting for participants

## Anywhere
- `view <setup|timer|settings|summary>`: switch view
- `summary [file]`: print or save the plain-text summary
- `new --confirm`: discard everything and start over
- `help`, `quit`
";

/// One parsed console line.
#[derive(Debug, Clone)]
pub enum ConsoleCommand {
    /// A state machine command
    Session(Command),
    /// Remove the agenda item at a 1-based position
    Remove(usize),
    List,
    Templates,
    Import(PathBuf),
    Export(PathBuf),
    Notes(String),
    Reason(String),
    Follow(Vec<String>),
    Status,
    Summary(Option<PathBuf>),
    Help,
    Quit,
    Empty,
}

impl ConsoleCommand {
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_lowercase().as_str() {
            "" => ConsoleCommand::Empty,
            "add" => ConsoleCommand::Session(Command::AddItem(parse_add(rest)?)),
            "remove" | "rm" => ConsoleCommand::Remove(
                rest.parse()
                    .map_err(|_| anyhow!("Usage: remove <item number>"))?,
            ),
            "list" | "ls" => ConsoleCommand::List,
            "template" => {
                ConsoleCommand::Session(Command::LoadTemplate(required(rest, "template <name>")?))
            }
            "templates" => ConsoleCommand::Templates,
            "save-template" => ConsoleCommand::Session(Command::SaveTemplate(SaveTemplate {
                name: required(rest, "save-template <name>")?,
            })),
            "import" => ConsoleCommand::Import(required(rest, "import <file>")?.into()),
            "export" => ConsoleCommand::Export(required(rest, "export <file>")?.into()),
            "confirm" => ConsoleCommand::Session(Command::ConfirmAgenda),
            "start" => ConsoleCommand::Session(Command::Start),
            "pause" => ConsoleCommand::Session(Command::Pause),
            "toggle" => ConsoleCommand::Session(Command::Toggle),
            "stop" | "reset" => ConsoleCommand::Session(Command::Stop),
            "next" => ConsoleCommand::Session(Command::Advance),
            "break" => ConsoleCommand::Session(Command::ToggleBreak),
            "notes" => ConsoleCommand::Notes(rest.to_string()),
            "reason" => ConsoleCommand::Reason(rest.to_string()),
            "follow" => ConsoleCommand::Follow(
                rest.split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(String::from)
                    .collect(),
            ),
            "view" => {
                let view: View = rest.parse().map_err(|e: String| anyhow!(e))?;
                ConsoleCommand::Session(Command::ShowView(view))
            }
            "status" => ConsoleCommand::Status,
            "summary" => ConsoleCommand::Summary((!rest.is_empty()).then(|| rest.into())),
            "share" => ConsoleCommand::Session(Command::EnableSharing),
            "new" => ConsoleCommand::Session(Command::StartNewMeeting(StartNewMeeting {
                confirmed: rest == "--confirm",
            })),
            "help" | "?" => ConsoleCommand::Help,
            "quit" | "exit" => ConsoleCommand::Quit,
            other => bail!("Unknown command '{other}'. Type 'help' for the list of commands"),
        };
        Ok(command)
    }
}

/// `<minutes> <title> [| description]`
fn parse_add(rest: &str) -> Result<NewAgendaItem> {
    let usage = "Usage: add <minutes> <title> [| description]";
    let (minutes, text) = rest
        .split_once(char::is_whitespace)
        .ok_or_else(|| anyhow!(usage))?;
    let minutes: i64 = minutes.parse().map_err(|_| anyhow!(usage))?;

    let item = match text.split_once('|') {
        Some((title, description)) => {
            NewAgendaItem::new(title.trim(), minutes).with_description(description.trim())
        }
        None => NewAgendaItem::new(text.trim(), minutes),
    };
    Ok(item)
}

fn required(rest: &str, usage: &str) -> Result<String> {
    if rest.is_empty() {
        bail!("Usage: {usage}");
    }
    Ok(rest.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add_with_description() {
        let ConsoleCommand::Session(Command::AddItem(item)) =
            ConsoleCommand::parse("add 10 Budget review | Q3 numbers").unwrap()
        else {
            panic!("expected add");
        };
        assert_eq!(item.title, "Budget review");
        assert_eq!(item.estimated_minutes, 10);
        assert_eq!(item.description.as_deref(), Some("Q3 numbers"));
    }

    #[test]
    fn test_parse_add_requires_minutes() {
        assert!(ConsoleCommand::parse("add Standup").is_err());
        assert!(ConsoleCommand::parse("add").is_err());
    }

    #[test]
    fn test_parse_follow_splits_names() {
        let ConsoleCommand::Follow(names) =
            ConsoleCommand::parse("follow Mike Chen, Emma Wilson,").unwrap()
        else {
            panic!("expected follow");
        };
        assert_eq!(names, vec!["Mike Chen", "Emma Wilson"]);
    }

    #[test]
    fn test_parse_new_needs_flag_for_confirmation() {
        let ConsoleCommand::Session(Command::StartNewMeeting(params)) =
            ConsoleCommand::parse("new").unwrap()
        else {
            panic!("expected new");
        };
        assert!(!params.confirmed);
    }

    #[test]
    fn test_parse_unknown_and_blank() {
        assert!(ConsoleCommand::parse("dance").is_err());
        assert!(matches!(
            ConsoleCommand::parse("   ").unwrap(),
            ConsoleCommand::Empty
        ));
        assert!(ConsoleCommand::parse("view agenda").is_err());
    }
}
