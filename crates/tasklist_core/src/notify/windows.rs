use crate::error::AppError;
use crate::notify::{Notice, Notifier};
use std::time::Duration;
use tauri_winrt_notification::{Duration as ToastDuration, Toast};

// Windows only offers two toast lengths; the short one lasts about seven seconds.
const SHORT_TOAST: Duration = Duration::from_secs(7);

pub struct WindowsNotifier;

impl Notifier for WindowsNotifier {
    fn notify(&self, notice: &Notice) -> Result<(), AppError> {
        let duration = if notice.dismiss_after <= SHORT_TOAST {
            ToastDuration::Short
        } else {
            ToastDuration::Long
        };

        Toast::new(Toast::POWERSHELL_APP_ID)
            .title("tasklist")
            .text1(&notice.message)
            .duration(duration)
            .show()
            .map_err(|err| AppError::io(err.to_string()))
    }
}
