use crate::error::AppError;
use crate::notify::{Notice, Notifier};
use notify_rust::{Notification, Timeout};

pub struct LinuxNotifier;

impl Notifier for LinuxNotifier {
    fn notify(&self, notice: &Notice) -> Result<(), AppError> {
        let expire_ms = u32::try_from(notice.dismiss_after.as_millis()).unwrap_or(u32::MAX);
        Notification::new()
            .summary("tasklist")
            .body(&notice.message)
            .timeout(Timeout::Milliseconds(expire_ms))
            .show()
            .map_err(|err| AppError::io(err.to_string()))?;
        Ok(())
    }
}
