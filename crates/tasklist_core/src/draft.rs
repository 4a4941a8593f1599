use crate::error::AppError;
use crate::store::{StoreEvent, TaskStore};

/// Contents of the add form while the user is still typing.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Draft {
    pub title: String,
    pub description: String,
}

impl Draft {
    pub fn set_title<T: Into<String>>(&mut self, title: T) {
        self.title = title.into();
    }

    pub fn set_description<T: Into<String>>(&mut self, description: T) {
        self.description = description.into();
    }

    pub fn is_ready(&self) -> bool {
        !self.title.trim().is_empty() && !self.description.trim().is_empty()
    }

    pub fn clear(&mut self) {
        self.title.clear();
        self.description.clear();
    }

    /// Adds the drafted task. The inputs are cleared only when the store
    /// accepted it; a rejected draft stays as typed.
    pub fn submit(&mut self, store: &mut TaskStore) -> Result<StoreEvent, AppError> {
        let event = store.add_task(&self.title, &self.description)?;
        self.clear();
        Ok(event)
    }
}
