mod task;
mod view;

pub use task::{Task, TaskId};
pub use view::View;
