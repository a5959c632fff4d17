//! Session-ended notifications.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::types::ValidationError;

/// Message shown when a session ends.
pub const SESSION_ENDED_MESSAGE: &str = "Timer Session Ended";

/// Whether the user allowed notifications.
///
/// Only [`NotificationPermission::Granted`] shows anything. `Default` means
/// the user was never asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPermission {
    Granted,
    Denied,
    #[default]
    Default,
}

impl NotificationPermission {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Granted => "granted",
            Self::Denied => "denied",
            Self::Default => "default",
        }
    }
}

impl fmt::Display for NotificationPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for NotificationPermission {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "granted" => Ok(Self::Granted),
            "denied" => Ok(Self::Denied),
            "default" => Ok(Self::Default),
            _ => Err(ValidationError::InvalidPermission {
                value: s.to_string(),
            }),
        }
    }
}

/// Announces the end of a session.
///
/// Implementations swallow their own failures; a missing notification must
/// never block a stop.
pub trait Notifier {
    fn permission(&self) -> NotificationPermission;

    /// Displays `message`. Only called when permission is granted.
    fn show(&self, message: &str);

    /// Shows the session-ended message if permitted. Returns whether it was shown.
    fn session_ended(&self) -> bool {
        if self.permission() != NotificationPermission::Granted {
            tracing::debug!(permission = %self.permission(), "notification suppressed");
            return false;
        }
        self.show(SESSION_ENDED_MESSAGE);
        true
    }
}

/// Notifier that counts what it would have shown.
#[derive(Debug, Clone, Default)]
pub struct CountingNotifier {
    permission: NotificationPermission,
    shown: Rc<Cell<usize>>,
}

impl CountingNotifier {
    pub fn new(permission: NotificationPermission) -> Self {
        Self {
            permission,
            shown: Rc::default(),
        }
    }

    /// How many notifications were displayed, across all clones.
    pub fn shown(&self) -> usize {
        self.shown.get()
    }
}

impl Notifier for CountingNotifier {
    fn permission(&self) -> NotificationPermission {
        self.permission
    }

    fn show(&self, _message: &str) {
        self.shown.set(self.shown.get() + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_granted_permission_shows() {
        let granted = CountingNotifier::new(NotificationPermission::Granted);
        assert!(granted.session_ended());
        assert_eq!(granted.shown(), 1);

        for permission in [NotificationPermission::Denied, NotificationPermission::Default] {
            let notifier = CountingNotifier::new(permission);
            assert!(!notifier.session_ended());
            assert_eq!(notifier.shown(), 0);
        }
    }

    #[test]
    fn permission_parses_from_config_strings() {
        assert_eq!(
            "granted".parse::<NotificationPermission>().unwrap(),
            NotificationPermission::Granted
        );
        assert!("maybe".parse::<NotificationPermission>().is_err());
        let json = serde_json::to_string(&NotificationPermission::Denied).unwrap();
        assert_eq!(json, "\"denied\"");
    }
}
