//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use tk_core::{DEFAULT_BUDGET_MS, NotificationPermission, TrackingMode};

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the database file.
    pub database_path: PathBuf,
    /// Tick period of the session timer, in milliseconds.
    pub tick_period_ms: u64,
    /// Countdown budget used when `--budget` is not given, in milliseconds.
    pub default_budget_ms: i64,
    /// Mode used when `--mode` is not given.
    pub default_mode: TrackingMode,
    /// Whether session-ended notifications may be shown.
    pub notifications: NotificationPermission,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_path", &self.database_path)
            .field("tick_period_ms", &self.tick_period_ms)
            .field("default_budget_ms", &self.default_budget_ms)
            .field("default_mode", &self.default_mode)
            .field("notifications", &self.notifications)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            database_path: data_dir.join("tk.db"),
            tick_period_ms: 100,
            default_budget_ms: DEFAULT_BUDGET_MS,
            default_mode: TrackingMode::Timer,
            notifications: NotificationPermission::Default,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (TK_*)
        figment = figment.merge(Env::prefixed("TK_"));

        figment.extract()
    }

    pub const fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }
}

/// Returns the platform-specific config directory for tk.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("tk"))
}

/// Returns the platform-specific data directory for tk.
///
/// On Linux: `~/.local/share/tk`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("tk"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dirs_data_path_returns_some() {
        assert!(dirs_data_path().is_some());
    }

    #[test]
    fn test_dirs_data_path_ends_with_tk() {
        let path = dirs_data_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "tk");
    }

    #[test]
    fn test_default_config_uses_data_dir_for_db() {
        let config = Config::default();
        let data_dir = dirs_data_path().unwrap();
        assert_eq!(config.database_path, data_dir.join("tk.db"));
        assert_eq!(config.tick_period(), Duration::from_millis(100));
        assert_eq!(config.default_budget_ms, 1_500_000);
    }

    #[test]
    fn test_config_file_overrides_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("tk.toml");
        std::fs::write(
            &path,
            "database_path = \"/tmp/other.db\"\n\
             tick_period_ms = 250\n\
             default_mode = \"stopwatch\"\n\
             notifications = \"granted\"\n",
        )
        .unwrap();

        let config = Config::load_from(Some(&path)).unwrap();
        assert_eq!(config.database_path, PathBuf::from("/tmp/other.db"));
        assert_eq!(config.tick_period_ms, 250);
        assert_eq!(config.default_mode, TrackingMode::Stopwatch);
        assert_eq!(config.notifications, NotificationPermission::Granted);
    }
}
