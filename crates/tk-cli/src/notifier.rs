//! Terminal session-ended notifications.

use std::io::Write;

use tk_core::{NotificationPermission, Notifier};

/// Rings the terminal bell and prints the message on stderr.
#[derive(Debug, Clone, Copy)]
pub struct TerminalNotifier {
    permission: NotificationPermission,
}

impl TerminalNotifier {
    pub const fn new(permission: NotificationPermission) -> Self {
        Self { permission }
    }
}

impl Notifier for TerminalNotifier {
    fn permission(&self) -> NotificationPermission {
        self.permission
    }

    fn show(&self, message: &str) {
        let mut stderr = std::io::stderr().lock();
        if let Err(err) = writeln!(stderr, "\x07{message}") {
            tracing::debug!(error = %err, "failed to show notification");
        }
    }
}
