//! The interactive meeting console and the participant mirror.
//!
//! Both run the same loop: stdin lines and the session's periodic
//! activities are awaited together in a `tokio::select!`, and the armed
//! timers are recomputed from the session after every step. Ctrl-C and end of
//! input shut the session down exactly like `quit`.

use anyhow::{bail, Context, Result};
use cadence_core::{
    display::{AgendaList, TemplateList, TimeOfDay},
    params::OvertimeNotes,
    session::{Command, Event, MeetingSession},
    timers::{Activities, ActivityTimers},
    transfer, Countdown, Notification, Phase, View,
};
use log::{debug, info};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};

use crate::{
    args::RunArgs,
    cli::settings_overview,
    console::{ConsoleCommand, HELP},
    files::{read_json_file, write_json_file, write_text_file},
    renderer::TerminalRenderer,
};

/// Whether the console should keep reading.
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Run a meeting as facilitator.
pub async fn run_meeting(
    session: MeetingSession,
    renderer: &TerminalRenderer,
    args: &RunArgs,
) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut console = Console::new(session, renderer);

    renderer.render("# Cadence\n\nType `help` for the list of commands.\n");
    console.offer_recovery(&mut lines, args).await?;

    if let Some(path) = &args.agenda {
        console.execute(&format!("import {}", path.display()));
    }
    if let Some(name) = &args.template {
        console.execute(&format!("template {name}"));
    }
    if args.share {
        console.execute("share");
    }
    console.render_view(console.session.current_view());

    console.drive(&mut lines).await
}

/// Follow a shared meeting as participant.
pub async fn follow_meeting(session: MeetingSession, renderer: &TerminalRenderer) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut console = Console::new(session, renderer);

    renderer.render(&format!(
        "# Following meeting {}\n\nType `status`, `view <name>` or `quit`.\n",
        console.session.meeting_id()
    ));
    let mut events = console.session.heartbeat();
    events.extend(console.session.poll());
    console.show(events);

    console.drive(&mut lines).await
}

struct Console<'a> {
    session: MeetingSession,
    renderer: &'a TerminalRenderer,
    /// Overtime notes being composed for the active item
    draft: OvertimeNotes,
    /// Last mirror line printed for a participant
    last_mirror: String,
}

impl<'a> Console<'a> {
    fn new(session: MeetingSession, renderer: &'a TerminalRenderer) -> Self {
        Self {
            session,
            renderer,
            draft: OvertimeNotes::default(),
            last_mirror: String::new(),
        }
    }

    async fn offer_recovery<R>(&mut self, lines: &mut Lines<R>, args: &RunArgs) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let Some(offer) = self.session.recovery_offer() else {
            return Ok(());
        };

        let restore = if args.restore {
            true
        } else if args.fresh {
            false
        } else {
            let age = offer.age_secs(self.session.now());
            self.renderer.plain(&format!(
                "Found an unfinished meeting with {} items, saved {} ago. Restore it? [y/N]",
                offer.agenda_items.len(),
                Countdown(i64::try_from(age).unwrap_or(i64::MAX))
            ));
            let answer = lines
                .next_line()
                .await
                .context("Failed to read from stdin")?;
            matches!(
                answer.as_deref().map(str::trim),
                Some("y" | "Y" | "yes" | "Yes")
            )
        };

        if restore {
            let events = self.session.restore_backup()?;
            self.show(events);
        } else {
            let events = self.session.discard_backup();
            self.show(events);
        }
        Ok(())
    }

    async fn drive<R>(&mut self, lines: &mut Lines<R>) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut timers = ActivityTimers::new(self.session.config());
        loop {
            timers.apply(Activities::for_session(&self.session));

            let events = tokio::select! {
                line = lines.next_line() => {
                    match line.context("Failed to read from stdin")? {
                        Some(line) => {
                            if self.execute(&line) == Flow::Quit {
                                break;
                            }
                            Vec::new()
                        }
                        None => break,
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Interrupted");
                    break;
                }
                _ = timers.countdown.tick() => self.dispatch(Command::Tick),
                _ = timers.break_clock.tick() => {
                    self.break_reminder();
                    Vec::new()
                }
                _ = timers.autosave.tick() => self.session.autosave(),
                _ = timers.share_refresh.tick() => self.session.publish(),
                _ = timers.sync_poll.tick() => self.session.poll(),
                _ = timers.heartbeat.tick() => self.session.heartbeat(),
            };
            self.show(events);
        }

        let events = self.session.shutdown();
        self.show(events);
        info!("Console closed");
        Ok(())
    }

    /// Parse and run one console line, printing any error.
    fn execute(&mut self, line: &str) -> Flow {
        debug!("Console input: {line}");
        match ConsoleCommand::parse(line).and_then(|command| self.handle(command)) {
            Ok(flow) => flow,
            Err(e) => {
                self.renderer.notify(&Notification::error(format!("{e:#}")));
                Flow::Continue
            }
        }
    }

    fn dispatch(&mut self, command: Command) -> Vec<Event> {
        match self.session.dispatch(command) {
            Ok(events) => events,
            Err(e) => {
                self.renderer.notify(&Notification::error(e.to_string()));
                Vec::new()
            }
        }
    }

    fn handle(&mut self, command: ConsoleCommand) -> Result<Flow> {
        match command {
            ConsoleCommand::Session(command) => {
                let events = self.session.dispatch(command)?;
                self.show(events);
            }
            ConsoleCommand::Remove(position) => {
                let Some(id) = position
                    .checked_sub(1)
                    .and_then(|index| self.session.agenda_items().get(index))
                    .map(|item| item.id.clone())
                else {
                    bail!("No agenda item number {position}");
                };
                let events = self.session.dispatch(Command::RemoveItem(id))?;
                self.show(events);
            }
            ConsoleCommand::List => self.render_agenda(),
            ConsoleCommand::Templates => {
                let templates = &self.session.settings().agenda_templates;
                self.renderer.render(&TemplateList(templates).to_string());
            }
            ConsoleCommand::Import(path) => {
                let items = transfer::parse_agenda(&read_json_file(&path)?)?;
                let events = self.session.dispatch(Command::ImportAgenda(items))?;
                self.show(events);
            }
            ConsoleCommand::Export(path) => {
                let json = transfer::export_agenda(self.session.agenda_items(), self.session.now())?;
                write_json_file(&path, &json)?;
                self.renderer.notify(&Notification::success(format!(
                    "Agenda exported to {}",
                    path.display()
                )));
            }
            ConsoleCommand::Notes(notes) => {
                let draft = OvertimeNotes {
                    notes,
                    ..self.draft.clone()
                };
                self.save_draft(draft)?;
            }
            ConsoleCommand::Reason(reason) => {
                let draft = OvertimeNotes {
                    reason,
                    ..self.draft.clone()
                };
                self.save_draft(draft)?;
            }
            ConsoleCommand::Follow(participants) => {
                let draft = OvertimeNotes {
                    participants,
                    ..self.draft.clone()
                };
                self.save_draft(draft)?;
            }
            ConsoleCommand::Status => self.render_view(View::Timer),
            ConsoleCommand::Summary(path) => {
                if self.session.completed_items().is_empty() {
                    bail!("No completed items yet");
                }
                let text = self.session.summary().to_plain_text(self.session.now());
                match path {
                    Some(path) => {
                        write_text_file(&path, &text)?;
                        self.renderer.notify(&Notification::success(format!(
                            "Summary saved to {}",
                            path.display()
                        )));
                    }
                    None => self.renderer.plain(&text),
                }
            }
            ConsoleCommand::Help => self.renderer.render(HELP),
            ConsoleCommand::Quit => return Ok(Flow::Quit),
            ConsoleCommand::Empty => {}
        }
        Ok(Flow::Continue)
    }

    /// Overtime notes are saved whole; the draft only advances once accepted.
    fn save_draft(&mut self, draft: OvertimeNotes) -> Result<()> {
        let events = self
            .session
            .dispatch(Command::SaveOvertimeNotes(draft.clone()))?;
        self.draft = draft;
        self.show(events);
        Ok(())
    }

    fn show(&mut self, events: Vec<Event>) {
        for event in events {
            if let Some(notification) = event.notification() {
                self.renderer.notify(&notification);
            }
            match event {
                Event::ItemStarted { .. } | Event::MeetingReset => {
                    self.draft = OvertimeNotes::default();
                }
                Event::ViewChanged { view } => self.render_view(view),
                Event::MeetingFinished { summary } => self.renderer.render(&summary.to_string()),
                Event::SnapshotApplied => self.render_mirror(),
                _ => {}
            }
        }
    }

    fn break_reminder(&self) {
        if let Some(elapsed) = self.session.break_elapsed_secs() {
            if elapsed > 0 && elapsed % 60 == 0 {
                self.renderer.notify(&Notification::info(format!(
                    "On break for {}",
                    Countdown(elapsed as i64)
                )));
            }
        }
    }

    fn render_agenda(&self) {
        let items = self.session.agenda_items();
        let list = match self.session.phase() {
            Phase::Running => AgendaList::with_current(items, self.session.current_item_index()),
            _ => AgendaList::new(items),
        };
        self.renderer.render(&list.to_string());
    }

    fn render_view(&self, view: View) {
        match (view, self.session.phase()) {
            (View::Settings, _) => self
                .renderer
                .render(&settings_overview(self.session.settings())),
            (_, Phase::Setup) => self.render_agenda(),
            (_, Phase::Running) => self.renderer.render(&self.status()),
            (_, Phase::Summary) => self.renderer.render(&self.session.summary().to_string()),
        }
    }

    /// Markdown status block for the running meeting.
    fn status(&self) -> String {
        let session = &self.session;
        let Some(item) = session.current_item() else {
            return "# Timer\n\nNo item is running.\n".to_string();
        };

        let mut out = format!(
            "# Timer ({})\n\n**Item {} of {}**: {item}\n",
            TimeOfDay(&session.now()),
            session.current_item_index() + 1,
            session.agenda_items().len()
        );
        if let Some(status) = session.timer_status() {
            out.push_str(&format!(
                "- Remaining: {} ({status})\n",
                Countdown(session.current_item_time())
            ));
        }
        out.push_str(&format!("- Timer: {}\n", session.timer_state()));
        if let Some(elapsed) = session.break_elapsed_secs() {
            out.push_str(&format!("- Break: {}\n", Countdown(elapsed as i64)));
        }
        if session.total_break_secs() > 0 {
            out.push_str(&format!(
                "- Total break: {}\n",
                Countdown(session.total_break_secs() as i64)
            ));
        }
        if let Some(link) = session.share_link() {
            out.push_str(&format!(
                "- Shared: {link} ({} following)\n",
                session.participant_count()
            ));
        }
        if let Some(connection) = session.connection_status() {
            out.push_str(&format!("- Connection: {connection}\n"));
        }
        out
    }

    /// Compact one-line view for participants, printed when it changes.
    fn render_mirror(&mut self) {
        let session = &self.session;
        let line = match (session.phase(), session.current_item()) {
            (Phase::Running, Some(item)) => format!(
                "[{}/{}] {}  {}  {}",
                session.current_item_index() + 1,
                session.agenda_items().len(),
                item.title,
                Countdown(session.current_item_time()),
                session.timer_state()
            ),
            (Phase::Summary, _) => "Meeting complete".to_string(),
            _ => "The facilitator is preparing the agenda".to_string(),
        };
        if line == self.last_mirror {
            return;
        }
        self.renderer.plain(&line);
        if session.phase() == Phase::Summary {
            self.renderer.render(&session.summary().to_string());
        }
        self.last_mirror = line;
    }
}
