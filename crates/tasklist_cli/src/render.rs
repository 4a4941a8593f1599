use serde::Serialize;
use std::io::Write;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tasklist_core::config::Palette;
use tasklist_core::draft::Draft;
use tasklist_core::error::AppError;
use tasklist_core::model::{Task, View};
use tasklist_core::notify::Notice;
use tasklist_core::store::{Snapshot, StoreEvent};

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this task?";

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "#")]
    position: usize,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Added")]
    created_at: String,
    #[tabled(rename = "Done")]
    done: &'static str,
}

impl TaskRow {
    fn new(position: usize, task: &Task) -> Self {
        Self {
            position,
            title: task.title.clone(),
            description: task.description.clone(),
            created_at: task.created_at.clone(),
            done: if task.completed { "[x]" } else { "[ ]" },
        }
    }
}

pub fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> Result<(), AppError> {
    let line =
        serde_json::to_string(value).map_err(|err| AppError::invalid_data(err.to_string()))?;
    writeln!(out, "{line}")?;
    Ok(())
}

/// Renders one view as a table; positions are 1-based within the view.
pub fn view<W: Write>(
    out: &mut W,
    view: View,
    tasks: &[Task],
    palette: &Palette,
) -> Result<(), AppError> {
    let header = format!("{} ({})", view.label(), tasks.len());
    writeln!(out, "{}", palette.accentize(&header))?;

    if tasks.is_empty() {
        writeln!(out, "{}", palette.mutedize("No tasks."))?;
        return Ok(());
    }

    let rows: Vec<TaskRow> = tasks
        .iter()
        .enumerate()
        .map(|(index, task)| TaskRow::new(index + 1, task))
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::psql());
    writeln!(out, "{table}")?;
    Ok(())
}

pub fn event<W: Write>(out: &mut W, event: &StoreEvent, palette: &Palette) -> Result<(), AppError> {
    match event {
        StoreEvent::TaskAdded { task } => {
            writeln!(out, "Added task: {} ({})", task.title, task.created_at)?;
        }
        StoreEvent::TaskToggled { task } => {
            let verb = if task.completed { "Completed" } else { "Reopened" };
            writeln!(out, "{verb} task: {}", task.title)?;
        }
        StoreEvent::DeleteRequested { task, .. } => delete_prompt(out, task, palette)?,
        StoreEvent::DeleteCancelled { task } => writeln!(out, "Kept task: {}", task.title)?,
        StoreEvent::TaskDeleted { task, .. } => writeln!(out, "Deleted task: {}", task.title)?,
        StoreEvent::ViewChanged { view } => writeln!(out, "Showing {view}")?,
    }
    Ok(())
}

pub fn delete_prompt<W: Write>(out: &mut W, task: &Task, palette: &Palette) -> Result<(), AppError> {
    writeln!(out, "{}", palette.accentize("Delete Task"))?;
    writeln!(out, "{DELETE_PROMPT}")?;
    writeln!(
        out,
        "{}",
        palette.mutedize(&format!("  {} - {}", task.title, task.description))
    )?;
    writeln!(out, "Type `confirm` to delete or `cancel` to keep it.")?;
    Ok(())
}

pub fn notice<W: Write>(out: &mut W, notice: &Notice, palette: &Palette) -> Result<(), AppError> {
    writeln!(out, "{}", palette.accentize(&notice.message))?;
    Ok(())
}

pub fn draft<W: Write>(out: &mut W, draft: &Draft, palette: &Palette) -> Result<(), AppError> {
    let show = |value: &str| {
        if value.trim().is_empty() {
            palette.mutedize("(empty)")
        } else {
            value.to_string()
        }
    };
    writeln!(out, "Title: {}", show(&draft.title))?;
    writeln!(out, "Description: {}", show(&draft.description))?;
    Ok(())
}

pub fn status<W: Write>(
    out: &mut W,
    snapshot: &Snapshot,
    pending: Option<&Task>,
    palette: &Palette,
) -> Result<(), AppError> {
    writeln!(
        out,
        "{}: {} | {}: {} | Viewing: {}",
        View::Todo,
        snapshot.todo.len(),
        View::Completed,
        snapshot.completed.len(),
        palette.accentize(snapshot.active_view.label())
    )?;
    if let Some(task) = pending {
        writeln!(out, "Pending delete: {}", task.title)?;
    }
    Ok(())
}
