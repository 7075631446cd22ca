use std::path::Path;

use assert_cmd::Command;
use cadence_core::{
    params::NewAgendaItem,
    session::{Command as SessionCommand, SessionBuilder},
    store::SqliteStore,
};
use predicates::prelude::*;
use tempfile::TempDir;

/// Helper function to create a temporary directory for CLI tests
fn create_cli_test_environment() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Helper function to create a Command with --no-color and an isolated store
fn cadence_cmd(store: &Path) -> Command {
    let mut cmd = Command::cargo_bin("cadence").expect("Failed to find cadence binary");
    cmd.args(["--no-color", "--store-file", store.to_str().unwrap()]);
    cmd
}

#[test]
fn test_cli_run_full_meeting() {
    let temp_dir = create_cli_test_environment();
    let store = temp_dir.path().join("cli_test.db");

    cadence_cmd(&store)
        .arg("run")
        .write_stdin("add 5 Standup\nadd 10 Review | Sprint demo\nconfirm\nnext\nnext\nsummary\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Added 'Standup' (5 min). Total: 5 min"))
        .stdout(predicate::str::contains("Total: 15 min"))
        .stdout(predicate::str::contains("Meeting started with 2 items"))
        .stdout(predicate::str::contains("MEETING SUMMARY"))
        .stdout(predicate::str::contains(" Total Items: 2"));
}

#[test]
fn test_cli_run_rejects_invalid_input_and_continues() {
    let temp_dir = create_cli_test_environment();
    let store = temp_dir.path().join("cli_test.db");

    cadence_cmd(&store)
        .arg("run")
        .write_stdin("add five Standup\nconfirm\nfrobnicate\nadd 0 Nothing\nlist\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: add <minutes> <title>"))
        .stdout(predicate::str::contains("Add at least one agenda item"))
        .stdout(predicate::str::contains("Unknown command"))
        .stdout(predicate::str::contains("No agenda items yet."));
}

#[test]
fn test_cli_template_loads_agenda() {
    let temp_dir = create_cli_test_environment();
    let store = temp_dir.path().join("cli_test.db");

    cadence_cmd(&store)
        .args(["run", "--template", "Daily Standup"])
        .write_stdin("list\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("# Agenda"));
}

#[test]
fn test_cli_unfinished_meeting_is_recovered() {
    let temp_dir = create_cli_test_environment();
    let store = temp_dir.path().join("cli_test.db");

    cadence_cmd(&store)
        .arg("run")
        .write_stdin("add 5 Standup\nadd 10 Review\nconfirm\nquit\n")
        .assert()
        .success();

    cadence_cmd(&store)
        .args(["run", "--restore"])
        .write_stdin("status\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Session recovered successfully (2 items)",
        ))
        .stdout(predicate::str::contains("Item 1 of 2"));
}

#[test]
fn test_cli_recovery_prompt_declined() {
    let temp_dir = create_cli_test_environment();
    let store = temp_dir.path().join("cli_test.db");

    cadence_cmd(&store)
        .arg("run")
        .write_stdin("add 5 Standup\nquit\n")
        .assert()
        .success();

    cadence_cmd(&store)
        .arg("run")
        .write_stdin("n\nlist\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Restore it? [y/N]"))
        .stdout(predicate::str::contains("Previous session discarded"))
        .stdout(predicate::str::contains("No agenda items yet."));
}

#[test]
fn test_cli_agenda_file_import() {
    let temp_dir = create_cli_test_environment();
    let store = temp_dir.path().join("cli_test.db");
    let agenda = temp_dir.path().join("agenda.json");
    std::fs::write(
        &agenda,
        r#"{"items": [{"title": "Intro", "estimatedMinutes": 5}, {"title": "Plan"}]}"#,
    )
    .unwrap();

    cadence_cmd(&store)
        .args(["run", "--agenda", agenda.to_str().unwrap()])
        .write_stdin("list\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Intro"))
        .stdout(predicate::str::contains("2 items, 15 min total"));
}

#[test]
fn test_cli_import_requires_json_extension() {
    let temp_dir = create_cli_test_environment();
    let store = temp_dir.path().join("cli_test.db");
    let names = temp_dir.path().join("names.txt");
    std::fs::write(&names, r#"["Ada"]"#).unwrap();

    cadence_cmd(&store)
        .args(["team", "import", names.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please select a JSON file"));
}

#[test]
fn test_cli_team_add_and_list() {
    let temp_dir = create_cli_test_environment();
    let store = temp_dir.path().join("cli_test.db");

    cadence_cmd(&store)
        .args(["team", "add", "Ada Lovelace"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added 'Ada Lovelace'"));

    cadence_cmd(&store)
        .args(["team", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ada Lovelace"))
        .stdout(predicate::str::contains("Mike Chen"));

    cadence_cmd(&store)
        .args(["team", "add", "Ada Lovelace"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_cli_settings_theme_persists() {
    let temp_dir = create_cli_test_environment();
    let store = temp_dir.path().join("cli_test.db");

    cadence_cmd(&store)
        .args(["settings", "theme", "dark-mode"])
        .assert()
        .success();

    cadence_cmd(&store)
        .args(["settings", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dark Mode"));
}

#[test]
fn test_cli_settings_clear_requires_confirmation() {
    let temp_dir = create_cli_test_environment();
    let store = temp_dir.path().join("cli_test.db");

    cadence_cmd(&store)
        .args(["settings", "clear"])
        .assert()
        .failure();

    cadence_cmd(&store)
        .args(["settings", "clear", "--confirm"])
        .assert()
        .success()
        .stdout(predicate::str::contains("All data cleared"));
}

#[test]
fn test_cli_join_without_facilitator_waits() {
    let temp_dir = create_cli_test_environment();
    let store = temp_dir.path().join("cli_test.db");

    cadence_cmd(&store)
        .args(["join", "cadence://meeting#meeting=abc123"])
        .write_stdin("start\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Following meeting abc123"))
        .stdout(predicate::str::contains(
            "Waiting for the facilitator to share the meeting",
        ))
        .stdout(predicate::str::contains("only available to the facilitator"));
}

#[test]
fn test_cli_participant_mirrors_shared_meeting() {
    let temp_dir = create_cli_test_environment();
    let store = temp_dir.path().join("cli_test.db");

    // A facilitator still in the meeting, sharing through the same store.
    let mut facilitator = SessionBuilder::new()
        .with_store(SqliteStore::open(&store).unwrap())
        .build()
        .unwrap();
    facilitator
        .dispatch(SessionCommand::AddItem(NewAgendaItem::new("Standup", 5)))
        .unwrap();
    facilitator.dispatch(SessionCommand::EnableSharing).unwrap();
    facilitator.dispatch(SessionCommand::ConfirmAgenda).unwrap();
    let link = facilitator.share_link().unwrap().to_string();

    cadence_cmd(&store)
        .args(["join", &link])
        .write_stdin("quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("[1/1] Standup  05:00  paused"));
}

#[test]
fn test_cli_meeting_ends_sharing_on_quit() {
    let temp_dir = create_cli_test_environment();
    let store = temp_dir.path().join("cli_test.db");

    let output = cadence_cmd(&store)
        .args(["run", "--share"])
        .write_stdin("add 5 Standup\nconfirm\nquit\n")
        .output()
        .unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();
    let link = stdout
        .lines()
        .find_map(|line| line.split("Share this link: ").nth(1))
        .expect("share link printed")
        .trim()
        .to_string();

    cadence_cmd(&store)
        .args(["join", &link])
        .write_stdin("quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Waiting for the facilitator to share the meeting",
        ))
        .stdout(predicate::str::contains("Standup").not());
}

#[test]
fn test_cli_invalid_join_link() {
    let temp_dir = create_cli_test_environment();
    let store = temp_dir.path().join("cli_test.db");

    cadence_cmd(&store)
        .args(["join", "https://example.com/nothing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid meeting link"));
}
