// 🔔 Notifications - explicit side-effect channel for toasts
//
// Components never reach for a global toast queue. They are handed a
// Notifier and emit into it; the front end decides how to show it.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
    pub emitted_at: DateTime<Utc>,
}

impl Toast {
    pub fn success(message: &str) -> Self {
        Toast {
            level: ToastLevel::Success,
            message: message.to_string(),
            emitted_at: Utc::now(),
        }
    }

    pub fn error(message: &str) -> Self {
        Toast {
            level: ToastLevel::Error,
            message: message.to_string(),
            emitted_at: Utc::now(),
        }
    }
}

pub trait Notifier {
    fn notify(&mut self, toast: Toast);
}

/// Sends toasts to the log. Used where no screen is attached.
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&mut self, toast: Toast) {
        match toast.level {
            ToastLevel::Success => tracing::info!(message = %toast.message, "toast"),
            ToastLevel::Error => tracing::warn!(message = %toast.message, "toast"),
        }
    }
}

/// Toasts kept by a ToastLog; older ones are dropped
pub const TOAST_HISTORY: usize = 20;

/// Keeps the most recent toasts in order. The TUI shows the latest one in its
/// status bar.
#[derive(Debug, Default)]
pub struct ToastLog {
    toasts: VecDeque<Toast>,
}

impl ToastLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latest(&self) -> Option<&Toast> {
        self.toasts.back()
    }

    pub fn all(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    pub fn clear(&mut self) {
        self.toasts.clear();
    }
}

impl Notifier for ToastLog {
    fn notify(&mut self, toast: Toast) {
        if self.toasts.len() == TOAST_HISTORY {
            self.toasts.pop_front();
        }
        self.toasts.push_back(toast);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_log_keeps_order() {
        let mut log = ToastLog::new();
        log.notify(Toast::error("first"));
        log.notify(Toast::success("second"));

        assert_eq!(log.len(), 2);
        assert_eq!(log.latest().map(|t| t.message.as_str()), Some("second"));
        assert_eq!(log.all().next().map(|t| t.level), Some(ToastLevel::Error));

        log.clear();
        assert!(log.latest().is_none());
        assert!(log.is_empty());
    }

    #[test]
    fn test_toast_log_is_bounded() {
        let mut log = ToastLog::new();
        for i in 0..TOAST_HISTORY + 5 {
            log.notify(Toast::success(&format!("toast {}", i)));
        }

        assert_eq!(log.len(), TOAST_HISTORY);
        assert_eq!(log.all().next().map(|t| t.message.as_str()), Some("toast 5"));
        let last = format!("toast {}", TOAST_HISTORY + 4);
        assert_eq!(log.latest().map(|t| t.message.as_str()), Some(last.as_str()));
    }
}
