//! Interval duration configuration.
//!
//! Two positive-integer durations in minutes, persisted as pretty JSON
//! under the user config directory. Loading never fails: a missing or
//! corrupt file yields the defaults (25 minute work, 5 minute break).

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TimekeeperError};

pub const DEFAULT_WORK_MINUTES: u32 = 25;
pub const DEFAULT_BREAK_MINUTES: u32 = 5;

/// Work/break interval lengths in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_work_minutes")]
    pub work_minutes: u32,
    #[serde(default = "default_break_minutes")]
    pub break_minutes: u32,
}

fn default_work_minutes() -> u32 {
    DEFAULT_WORK_MINUTES
}

fn default_break_minutes() -> u32 {
    DEFAULT_BREAK_MINUTES
}

impl Default for TimerConfig {
    fn default() -> Self {
        TimerConfig {
            work_minutes: DEFAULT_WORK_MINUTES,
            break_minutes: DEFAULT_BREAK_MINUTES,
        }
    }
}

impl TimerConfig {
    pub fn work_secs(&self) -> u64 {
        u64::from(self.work_minutes) * 60
    }

    pub fn break_secs(&self) -> u64 {
        u64::from(self.break_minutes) * 60
    }

    /// Replaces zero durations with the defaults. The durations are a
    /// positive-integer contract; a hand-edited `0` would otherwise make
    /// the timer complete on its first tick.
    fn sanitized(mut self) -> Self {
        if self.work_minutes == 0 {
            self.work_minutes = DEFAULT_WORK_MINUTES;
        }
        if self.break_minutes == 0 {
            self.break_minutes = DEFAULT_BREAK_MINUTES;
        }
        self
    }
}

/// Returns the path to the configuration file.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("timekeeper").join("config.json"))
}

/// Loads the configuration, returning defaults if the file is missing or
/// unreadable. Called at every timer start, so edits take effect on the
/// next session without a restart.
pub fn load_config() -> TimerConfig {
    load_config_from(config_path())
}

fn load_config_from(path: Option<PathBuf>) -> TimerConfig {
    path.and_then(|p| fs::read_to_string(&p).ok())
        .and_then(|c| serde_json::from_str::<TimerConfig>(&c).ok())
        .unwrap_or_default()
        .sanitized()
}

/// Saves the configuration to disk, creating the parent directory.
pub fn save_config(config: &TimerConfig) -> Result<()> {
    let path = config_path().ok_or(TimekeeperError::ConfigDirUnavailable)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| TimekeeperError::ConfigWriteFailed {
            path: path.clone(),
            source,
        })?;
    }
    let content =
        serde_json::to_string_pretty(config).map_err(|source| TimekeeperError::Json {
            context: "serializing timer config".to_string(),
            source,
        })?;
    fs::write(&path, content)
        .map_err(|source| TimekeeperError::ConfigWriteFailed { path, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_are_25_and_5() {
        let config = TimerConfig::default();
        assert_eq!(config.work_minutes, 25);
        assert_eq!(config.break_minutes, 5);
        assert_eq!(config.work_secs(), 1500);
        assert_eq!(config.break_secs(), 300);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("nope.json");
        assert_eq!(load_config_from(Some(path)), TimerConfig::default());
    }

    #[test]
    fn test_corrupt_file_yields_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.json");
        fs::write(&path, "{not json").unwrap();
        assert_eq!(load_config_from(Some(path)), TimerConfig::default());
    }

    #[test]
    fn test_partial_file_fills_missing_field() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.json");
        fs::write(&path, r#"{"work_minutes": 50}"#).unwrap();
        let config = load_config_from(Some(path));
        assert_eq!(config.work_minutes, 50);
        assert_eq!(config.break_minutes, 5);
    }

    #[test]
    fn test_zero_durations_are_replaced() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.json");
        fs::write(&path, r#"{"work_minutes": 0, "break_minutes": 0}"#).unwrap();
        assert_eq!(load_config_from(Some(path)), TimerConfig::default());
    }
}
