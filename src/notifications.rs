//! User-visible notifications.
//!
//! The engine and the pomodoro timer emit through the [`Notifier`] port; the
//! application collects them in a [`NotificationCenter`] which feeds the modal
//! overlay and, when enabled, the desktop.

use std::collections::VecDeque;
use std::fmt;

#[cfg(target_os = "macos")]
use std::process::Command;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    SubtaskStarted { name: String },
    PomodoroComplete,
}

impl Notification {
    pub fn title(&self) -> &'static str {
        match self {
            Self::SubtaskStarted { .. } => "Subtask Started",
            Self::PomodoroComplete => "Pomodoro",
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SubtaskStarted { name } => write!(f, "Subtask \"{}\" has started!", name),
            Self::PomodoroComplete => f.write_str("Pomodoro timer is complete!"),
        }
    }
}

/// Sink for notifications
pub trait Notifier {
    fn notify(&mut self, notification: Notification);
}

impl Notifier for Vec<Notification> {
    fn notify(&mut self, notification: Notification) {
        self.push(notification);
    }
}

/// Queue of notifications waiting to be acknowledged in the UI
#[derive(Debug, Default)]
pub struct NotificationCenter {
    pending: VecDeque<Notification>,
    desktop: bool,
}

impl NotificationCenter {
    pub fn new(desktop: bool) -> Self {
        Self {
            pending: VecDeque::new(),
            desktop,
        }
    }

    /// The notification currently shown, if any
    pub fn current(&self) -> Option<&Notification> {
        self.pending.front()
    }

    pub fn dismiss(&mut self) -> Option<Notification> {
        self.pending.pop_front()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

impl Notifier for NotificationCenter {
    fn notify(&mut self, notification: Notification) {
        tracing::info!(%notification, "notification");
        if self.desktop {
            send_desktop(&notification);
        }
        self.pending.push_back(notification);
    }
}

/// Best-effort desktop notification. Currently only implemented for macOS.
fn send_desktop(notification: &Notification) {
    #[cfg(target_os = "macos")]
    {
        let script = format!(
            r#"display notification "{}" with title "Timebox - {}""#,
            notification.to_string().replace('"', "\\\""),
            notification.title()
        );

        if let Err(err) = Command::new("osascript").arg("-e").arg(&script).output() {
            tracing::debug!(error = %err, "desktop notification failed");
        }
    }

    #[cfg(not(target_os = "macos"))]
    {
        // No-op on other platforms
        let _ = notification;
    }
}
