use crate::error::AppError;
use crate::model::{Task, TaskId, View};
use serde::Serialize;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};
use tracing::debug;

/// Produces the `HH:MM:SS` creation stamp for new tasks.
pub type Clock = fn() -> Result<String, AppError>;

/// A user request addressed to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    AddTask { title: String, description: String },
    ToggleComplete(TaskId),
    RequestDelete(TaskId),
    CancelDelete,
    ConfirmDelete,
    SetActiveView(View),
}

/// What a transition did. The rendering surface derives transient state
/// (the "added" notice, the confirmation prompt) from these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum StoreEvent {
    TaskAdded { task: Task },
    TaskToggled { task: Task },
    DeleteRequested { task: Task, position: usize },
    DeleteCancelled { task: Task },
    TaskDeleted { task: Task, position: usize },
    ViewChanged { view: View },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub todo: Vec<Task>,
    pub completed: Vec<Task>,
    pub pending_delete_index: Option<usize>,
    pub active_view: View,
}

impl Snapshot {
    pub fn view(&self, view: View) -> &[Task] {
        match view {
            View::Todo => &self.todo,
            View::Completed => &self.completed,
        }
    }

    pub fn active(&self) -> &[Task] {
        self.view(self.active_view)
    }
}

/// Authoritative task list for one session.
///
/// Tasks keep insertion order for their whole life; nothing here ever
/// reorders them. Every rejected call leaves the store untouched.
#[derive(Debug, Clone)]
pub struct TaskStore {
    tasks: Vec<Task>,
    pending_delete: Option<TaskId>,
    active_view: View,
    next_id: u64,
    clock: Clock,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore {
    pub fn new() -> Self {
        Self::with_clock(local_time_label)
    }

    pub fn with_clock(clock: Clock) -> Self {
        Self {
            tasks: Vec::new(),
            pending_delete: None,
            active_view: View::default(),
            next_id: 1,
            clock,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn id_at(&self, index: usize) -> Option<TaskId> {
        self.tasks.get(index).map(|task| task.id)
    }

    pub fn position_of(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }

    pub fn active_view(&self) -> View {
        self.active_view
    }

    pub fn pending_delete(&self) -> Option<TaskId> {
        self.pending_delete
    }

    pub fn pending_delete_index(&self) -> Option<usize> {
        self.pending_delete.and_then(|id| self.position_of(id))
    }

    pub fn view(&self, view: View) -> Vec<&Task> {
        self.tasks.iter().filter(|task| view.includes(task)).collect()
    }

    pub fn todo_view(&self) -> Vec<&Task> {
        self.view(View::Todo)
    }

    pub fn completed_view(&self) -> Vec<&Task> {
        self.view(View::Completed)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            todo: self.todo_view().into_iter().cloned().collect(),
            completed: self.completed_view().into_iter().cloned().collect(),
            pending_delete_index: self.pending_delete_index(),
            active_view: self.active_view,
        }
    }

    pub fn apply(&mut self, intent: Intent) -> Result<Option<StoreEvent>, AppError> {
        match intent {
            Intent::AddTask { title, description } => {
                self.add_task(&title, &description).map(Some)
            }
            Intent::ToggleComplete(id) => self.toggle_task(id).map(Some),
            Intent::RequestDelete(id) => self.request_delete_task(id).map(Some),
            Intent::CancelDelete => Ok(self.cancel_delete()),
            Intent::ConfirmDelete => Ok(self.confirm_delete()),
            Intent::SetActiveView(view) => Ok(Some(self.set_active_view(view))),
        }
    }

    pub fn add_task(&mut self, title: &str, description: &str) -> Result<StoreEvent, AppError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::invalid_input("title is required"));
        }

        let description = description.trim();
        if description.is_empty() {
            return Err(AppError::invalid_input("description is required"));
        }

        let created_at = (self.clock)()?;
        let id = TaskId(self.next_id);
        self.next_id += 1;

        let task = Task {
            id,
            title: title.to_string(),
            description: description.to_string(),
            completed: false,
            created_at,
        };
        self.tasks.push(task.clone());
        debug!(task_id = %id, "task added");

        Ok(StoreEvent::TaskAdded { task })
    }

    pub fn toggle_complete(&mut self, index: usize) -> Result<StoreEvent, AppError> {
        let id = self.id_at(index).ok_or_else(|| index_not_found(index))?;
        self.toggle_task(id)
    }

    pub fn toggle_task(&mut self, id: TaskId) -> Result<StoreEvent, AppError> {
        let task = self
            .tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or_else(|| id_not_found(id))?;
        task.completed = !task.completed;
        debug!(task_id = %id, completed = task.completed, "task toggled");

        Ok(StoreEvent::TaskToggled { task: task.clone() })
    }

    pub fn request_delete(&mut self, index: usize) -> Result<StoreEvent, AppError> {
        let id = self.id_at(index).ok_or_else(|| index_not_found(index))?;
        self.request_delete_task(id)
    }

    /// Marks `id` as awaiting confirmation, replacing any earlier request.
    pub fn request_delete_task(&mut self, id: TaskId) -> Result<StoreEvent, AppError> {
        let position = self.position_of(id).ok_or_else(|| id_not_found(id))?;
        if let Some(previous) = self.pending_delete.replace(id)
            && previous != id
        {
            debug!(task_id = %previous, "pending delete replaced");
        }
        debug!(task_id = %id, position, "delete requested");

        Ok(StoreEvent::DeleteRequested {
            task: self.tasks[position].clone(),
            position,
        })
    }

    pub fn cancel_delete(&mut self) -> Option<StoreEvent> {
        let id = self.pending_delete.take()?;
        let task = self.get(id)?.clone();
        debug!(task_id = %id, "delete cancelled");
        Some(StoreEvent::DeleteCancelled { task })
    }

    pub fn confirm_delete(&mut self) -> Option<StoreEvent> {
        let id = self.pending_delete.take()?;
        let position = self.position_of(id)?;
        let task = self.tasks.remove(position);
        debug!(task_id = %id, position, "task deleted");

        Some(StoreEvent::TaskDeleted { task, position })
    }

    pub fn set_active_view(&mut self, view: View) -> StoreEvent {
        self.active_view = view;
        debug!(view = view.label(), "active view changed");
        StoreEvent::ViewChanged { view }
    }
}

fn index_not_found(index: usize) -> AppError {
    AppError::not_found(format!("no task at index {index}"))
}

fn id_not_found(id: TaskId) -> AppError {
    AppError::not_found(format!("task {id} not found"))
}

fn local_time_label() -> Result<String, AppError> {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    OffsetDateTime::now_utc()
        .to_offset(offset)
        .format(format_description!("[hour]:[minute]:[second]"))
        .map_err(|err| AppError::invalid_data(err.to_string()))
}
