//! Runtime configuration for hosts embedding the note store.
//!
//! Values come from the environment with fixed fallbacks, so a host can run
//! with zero configuration:
//!
//! | Variable | Default |
//! |---|---|
//! | `NOTEBOX_DB_PATH` | `<temp_dir>/notebox.sqlite3` |
//! | `NOTEBOX_LOG_LEVEL` | `debug` (debug builds) / `info` (release) |
//! | `NOTEBOX_LOG_DIR` | unset: file logging disabled |

use crate::logging::default_log_level;
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "NOTEBOX_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "NOTEBOX_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "NOTEBOX_LOG_DIR";

/// Fixed database file name used when no path is configured.
pub const DEFAULT_DB_FILE_NAME: &str = "notebox.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteboxConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    /// Absolute directory for rolling log files; `None` disables them.
    pub log_dir: Option<PathBuf>,
}

impl Default for NoteboxConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl NoteboxConfig {
    /// Resolves configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration through `lookup`, treating blank values as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let defaults = Self::default();
        Self {
            db_path: read(DB_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            log_level: read(LOG_LEVEL_ENV).unwrap_or(defaults.log_level),
            log_dir: read(LOG_DIR_ENV).map(PathBuf::from),
        }
    }
}

fn default_db_path() -> PathBuf {
    std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)
}
