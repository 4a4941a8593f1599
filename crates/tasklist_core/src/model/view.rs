use crate::error::AppError;
use crate::model::Task;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two filtered projections of the task list.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    #[default]
    Todo,
    Completed,
}

impl View {
    pub fn label(self) -> &'static str {
        match self {
            Self::Todo => "To Do",
            Self::Completed => "Completed",
        }
    }

    /// Tab position of the view, left to right.
    pub fn tab_index(self) -> usize {
        match self {
            Self::Todo => 0,
            Self::Completed => 1,
        }
    }

    pub fn includes(self, task: &Task) -> bool {
        match self {
            Self::Todo => !task.completed,
            Self::Completed => task.completed,
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for View {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let cleaned: String = raw
            .trim()
            .chars()
            .filter(|ch| ch.is_ascii_alphanumeric())
            .map(|ch| ch.to_ascii_lowercase())
            .collect();

        match cleaned.as_str() {
            "todo" | "pending" | "open" | "0" => Ok(Self::Todo),
            "completed" | "complete" | "done" | "1" => Ok(Self::Completed),
            _ => Err(AppError::invalid_input(format!(
                "unknown view '{}' (expected todo or completed)",
                raw.trim()
            ))),
        }
    }
}
