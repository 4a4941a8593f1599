use crate::cli::{SessionCommand, SessionLine, normalize_parse_error, split_command_line};
use crate::render;
use clap::{CommandFactory, Parser};
use std::io::{BufRead, Write};
use tasklist_core::config::{Config, NoticeBackend, Palette, palette_for_theme};
use tasklist_core::draft::Draft;
use tasklist_core::error::AppError;
use tasklist_core::model::{TaskId, View};
use tasklist_core::notify::{Notice, Notifier};
use tasklist_core::store::{StoreEvent, TaskStore};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// One interactive session: owns the store for its whole lifetime and
/// turns typed lines into intents.
pub struct Session<W: Write> {
    store: TaskStore,
    draft: Draft,
    config: Config,
    palette: Palette,
    notifier: Box<dyn Notifier>,
    json: bool,
    out: W,
}

impl<W: Write> Session<W> {
    pub fn new(config: Config, notifier: Box<dyn Notifier>, json: bool, out: W) -> Self {
        let palette = palette_for_theme(config.theme.as_deref());
        Self {
            store: TaskStore::new(),
            draft: Draft::default(),
            config,
            palette,
            notifier,
            json,
            out,
        }
    }

    pub fn with_store(mut self, store: TaskStore) -> Self {
        self.store = store;
        self
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Processes lines until EOF or `exit`. Command errors are reported on
    /// stderr and the session keeps going; only I/O failures end it early.
    pub fn run<R: BufRead>(&mut self, input: R) -> Result<(), AppError> {
        for line in input.lines() {
            let line = line?;
            match self.handle_line(&line) {
                Ok(Flow::Exit) => break,
                Ok(Flow::Continue) => {}
                Err(AppError::Io(message)) => return Err(AppError::Io(message)),
                Err(err) => eprintln!("ERROR: {err}"),
            }
        }

        self.out.flush()?;
        Ok(())
    }

    pub fn handle_line(&mut self, line: &str) -> Result<Flow, AppError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Flow::Continue);
        }

        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            return Ok(Flow::Exit);
        }

        if line == "help" || line == "?" {
            let help = SessionLine::command().render_help();
            writeln!(self.out, "{help}")?;
            self.out.flush()?;
            return Ok(Flow::Continue);
        }

        let args = self.expand_alias(split_command_line(line)?)?;
        if args.is_empty() {
            return Ok(Flow::Continue);
        }

        let parsed = SessionLine::try_parse_from(args).map_err(normalize_parse_error)?;
        self.run_command(parsed.command)?;
        self.out.flush()?;
        Ok(Flow::Continue)
    }

    fn expand_alias(&self, mut args: Vec<String>) -> Result<Vec<String>, AppError> {
        let Some(first) = args.first() else {
            return Ok(args);
        };
        let Some(expansion) = self.config.aliases.get(first) else {
            return Ok(args);
        };

        debug!(alias = %first, %expansion, "expanding alias");
        let mut expanded = split_command_line(expansion)?;
        expanded.extend(args.drain(1..));
        Ok(expanded)
    }

    fn run_command(&mut self, command: SessionCommand) -> Result<(), AppError> {
        match command {
            SessionCommand::Add {
                title: None,
                description: None,
            } => {
                let event = self.draft.submit(&mut self.store)?;
                self.emit(event)?;
            }
            SessionCommand::Add { title, description } => {
                let event = self.store.add_task(
                    title.as_deref().unwrap_or(""),
                    description.as_deref().unwrap_or(""),
                )?;
                self.emit(event)?;
            }
            SessionCommand::Title { text } => {
                self.draft.set_title(text.join(" "));
                self.show_draft()?;
            }
            SessionCommand::Description { text } => {
                self.draft.set_description(text.join(" "));
                self.show_draft()?;
            }
            SessionCommand::Draft => self.show_draft()?,
            SessionCommand::Toggle { position } => {
                let id = self.resolve(position)?;
                let event = self.store.toggle_task(id)?;
                self.emit(event)?;
            }
            SessionCommand::Delete { position } => {
                let id = self.resolve(position)?;
                let event = self.store.request_delete_task(id)?;
                self.emit(event)?;
            }
            SessionCommand::Confirm => match self.store.confirm_delete() {
                Some(event) => self.emit(event)?,
                None => self.nothing_pending()?,
            },
            SessionCommand::Cancel => match self.store.cancel_delete() {
                Some(event) => self.emit(event)?,
                None => self.nothing_pending()?,
            },
            SessionCommand::View { view } => {
                let view = view.parse::<View>()?;
                let event = self.store.set_active_view(view);
                self.emit(event)?;
            }
            SessionCommand::List => self.list()?,
            SessionCommand::Status => self.status()?,
        }

        Ok(())
    }

    /// Maps a 1-based position in the active view to the task it shows.
    fn resolve(&self, position: usize) -> Result<TaskId, AppError> {
        let view = self.store.active_view();
        position
            .checked_sub(1)
            .and_then(|index| self.store.view(view).get(index).map(|task| task.id))
            .ok_or_else(|| {
                AppError::not_found(format!("no task at position {position} in {view}"))
            })
    }

    fn emit(&mut self, event: StoreEvent) -> Result<(), AppError> {
        if self.json {
            render::write_json(&mut self.out, &event)?;
        } else {
            render::event(&mut self.out, &event, &self.palette)?;
        }

        if matches!(event, StoreEvent::ViewChanged { .. }) {
            self.list()?;
        }

        if let Some(notice) = Notice::for_event(&event, self.config.notice.dismiss_after()) {
            self.show_notice(&notice)?;
        }

        Ok(())
    }

    fn show_notice(&mut self, notice: &Notice) -> Result<(), AppError> {
        match self.config.notice.backend {
            NoticeBackend::Terminal if self.json => {
                let payload = serde_json::json!({
                    "notice": notice.message,
                    "dismiss_after_ms": self.config.notice.dismiss_after_ms,
                });
                render::write_json(&mut self.out, &payload)
            }
            NoticeBackend::Terminal => render::notice(&mut self.out, notice, &self.palette),
            NoticeBackend::Desktop => {
                if let Err(err) = self.notifier.notify(notice) {
                    warn!(error = %err, "failed to show notice");
                }
                Ok(())
            }
            NoticeBackend::Off => Ok(()),
        }
    }

    fn list(&mut self) -> Result<(), AppError> {
        let view = self.store.active_view();
        let snapshot = self.store.snapshot();
        let tasks = snapshot.view(view);

        if self.json {
            let payload = serde_json::json!({ "view": view, "tasks": tasks });
            render::write_json(&mut self.out, &payload)
        } else {
            render::view(&mut self.out, view, tasks, &self.palette)
        }
    }

    fn status(&mut self) -> Result<(), AppError> {
        let snapshot = self.store.snapshot();
        if self.json {
            return render::write_json(&mut self.out, &snapshot);
        }

        let pending = self
            .store
            .pending_delete()
            .and_then(|id| self.store.get(id));
        render::status(&mut self.out, &snapshot, pending, &self.palette)
    }

    fn show_draft(&mut self) -> Result<(), AppError> {
        if self.json {
            let payload = serde_json::json!({
                "title": self.draft.title,
                "description": self.draft.description,
            });
            render::write_json(&mut self.out, &payload)
        } else {
            render::draft(&mut self.out, &self.draft, &self.palette)
        }
    }

    fn nothing_pending(&mut self) -> Result<(), AppError> {
        if self.json {
            render::write_json(&mut self.out, &serde_json::json!({ "pending_delete": null }))
        } else {
            writeln!(self.out, "No delete is pending.")?;
            Ok(())
        }
    }
}
