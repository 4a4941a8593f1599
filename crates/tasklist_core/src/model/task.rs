use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque handle assigned by the store when a task is created.
///
/// Ids come from a per-store counter and are never reused, so a handle taken
/// from a view stays valid until that exact task is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task-{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub completed: bool,
    /// Local wall-clock time of creation, `HH:MM:SS`.
    pub created_at: String,
}
