use crate::config::{Config, NoticeBackend};
use crate::error::AppError;
use crate::store::StoreEvent;
use std::time::Duration;

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "linux")]
pub use linux::LinuxNotifier;

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub use windows::WindowsNotifier;

const DISABLE_ENV_VAR: &str = "TASKLIST_DISABLE_NOTIFICATIONS";
pub const TASK_ADDED_MESSAGE: &str = "Task added!";

/// A short acknowledgment shown to the user and dismissed on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub dismiss_after: Duration,
}

impl Notice {
    /// Only a successful add is acknowledged.
    pub fn for_event(event: &StoreEvent, dismiss_after: Duration) -> Option<Self> {
        match event {
            StoreEvent::TaskAdded { .. } => Some(Self {
                message: TASK_ADDED_MESSAGE.to_string(),
                dismiss_after,
            }),
            _ => None,
        }
    }
}

pub trait Notifier {
    fn notify(&self, notice: &Notice) -> Result<(), AppError>;
}

pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _notice: &Notice) -> Result<(), AppError> {
        Ok(())
    }
}

/// Picks the out-of-process notifier for `config`. Terminal notices are
/// drawn by the session itself, so they get the no-op notifier here.
pub fn notifier_from_config(config: &Config) -> Result<Box<dyn Notifier>, AppError> {
    if notifications_disabled() {
        return Ok(Box::new(NoopNotifier));
    }

    match config.notice.backend {
        NoticeBackend::Terminal | NoticeBackend::Off => Ok(Box::new(NoopNotifier)),
        NoticeBackend::Desktop => match platform_notifier() {
            Ok(notifier) => Ok(notifier),
            Err(AppError::InvalidData(message)) => {
                tracing::warn!(%message, "desktop notices unavailable");
                Ok(Box::new(NoopNotifier))
            }
            Err(other) => Err(other),
        },
    }
}

pub fn notifications_disabled() -> bool {
    std::env::var_os(DISABLE_ENV_VAR).is_some()
}

#[cfg(target_os = "linux")]
pub fn platform_notifier() -> Result<Box<dyn Notifier>, AppError> {
    Ok(Box::new(LinuxNotifier))
}

#[cfg(windows)]
pub fn platform_notifier() -> Result<Box<dyn Notifier>, AppError> {
    Ok(Box::new(WindowsNotifier))
}

#[cfg(not(any(target_os = "linux", windows)))]
pub fn platform_notifier() -> Result<Box<dyn Notifier>, AppError> {
    Err(AppError::invalid_data(
        "notifications are not supported on this platform",
    ))
}

#[cfg(test)]
mod tests {
    use super::{Notice, TASK_ADDED_MESSAGE};
    use crate::model::View;
    use crate::store::{StoreEvent, TaskStore};
    use std::time::Duration;

    #[test]
    fn task_added_produces_notice() {
        let mut store = TaskStore::new();
        let event = store.add_task("A", "first").unwrap();

        let notice = Notice::for_event(&event, Duration::from_secs(3)).unwrap();
        assert_eq!(notice.message, TASK_ADDED_MESSAGE);
        assert_eq!(notice.dismiss_after, Duration::from_secs(3));
    }

    #[test]
    fn other_events_produce_no_notice() {
        let mut store = TaskStore::new();
        store.add_task("A", "first").unwrap();
        let events = [
            store.toggle_complete(0).unwrap(),
            store.request_delete(0).unwrap(),
            store.confirm_delete().unwrap(),
            StoreEvent::ViewChanged {
                view: View::Completed,
            },
        ];

        for event in &events {
            assert!(Notice::for_event(event, Duration::from_secs(3)).is_none());
        }
    }
}
