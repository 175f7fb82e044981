//! Note record and insertion payload.
//!
//! # Invariants
//! - `id` is assigned by storage, monotonically increasing and never reused.
//! - `text` is stored verbatim; callers reject blank input before insertion.

use chrono::Local;
use serde::{Deserialize, Serialize};

/// Store-assigned note identifier (SQLite rowid).
pub type NoteId = i64;

/// Display format for generated timestamps, rendered in local time.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A persisted note as returned by reads. Always a detached copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub text: String,
    /// Human-readable creation time.
    pub timestamp: String,
}

/// Payload for one insertion.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewNote {
    pub text: String,
    /// Caller-supplied creation time; generated at insert when `None`.
    pub timestamp: Option<String>,
}

impl NewNote {
    /// Creates a payload whose timestamp is generated at insert time.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            timestamp: None,
        }
    }

    /// Creates a payload carrying an explicit timestamp.
    pub fn with_timestamp(text: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            timestamp: Some(timestamp.into()),
        }
    }

    /// Returns the timestamp to persist, generating "now" when absent.
    pub fn resolved_timestamp(&self) -> String {
        self.timestamp.clone().unwrap_or_else(generated_timestamp)
    }
}

/// Formats the current local time for a freshly added note.
pub fn generated_timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::{generated_timestamp, NewNote};
    use chrono::NaiveDateTime;

    #[test]
    fn generated_timestamp_parses_back_with_display_format() {
        let value = generated_timestamp();
        NaiveDateTime::parse_from_str(&value, super::TIMESTAMP_FORMAT)
            .expect("generated timestamp should use the display format");
    }

    #[test]
    fn explicit_timestamp_is_kept() {
        let entry = NewNote::with_timestamp("a", "yesterday");
        assert_eq!(entry.resolved_timestamp(), "yesterday");
    }

    #[test]
    fn missing_timestamp_is_generated() {
        let entry = NewNote::new("a");
        assert!(!entry.resolved_timestamp().is_empty());
    }
}
