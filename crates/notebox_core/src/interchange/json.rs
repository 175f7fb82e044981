//! JSON export/import document format.
//!
//! # Invariants
//! - Export is a pretty-printed array of `{id, text, timestamp}` objects
//!   with two-space indentation.
//! - Import ignores `id` and any unknown field; the store assigns fresh ids.
//! - An absent, null, false or empty imported `timestamp` is generated at
//!   insert; numbers and `true` are kept in their JSON text form.
//! - Export file names contain no `:` so they are valid on every platform.

use crate::model::note::{NewNote, Note};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type InterchangeResult<T> = Result<T, InterchangeError>;

#[derive(Debug)]
pub enum InterchangeError {
    /// Import document is not an array of note objects.
    Malformed(serde_json::Error),
    /// Notes could not be rendered for export.
    Serialize(serde_json::Error),
}

impl Display for InterchangeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(err) => write!(f, "{err}"),
            Self::Serialize(err) => write!(f, "cannot serialize notes: {err}"),
        }
    }
}

impl Error for InterchangeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Malformed(err) | Self::Serialize(err) => Some(err),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ImportedNote {
    text: String,
    #[serde(default)]
    timestamp: Option<Value>,
}

impl From<ImportedNote> for NewNote {
    fn from(value: ImportedNote) -> Self {
        Self {
            text: value.text,
            timestamp: value.timestamp.and_then(timestamp_text),
        }
    }
}

fn timestamp_text(value: Value) -> Option<String> {
    match value {
        Value::String(text) if !text.is_empty() => Some(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

/// Renders `notes` as the export document.
pub fn export_notes(notes: &[Note]) -> InterchangeResult<String> {
    serde_json::to_string_pretty(notes).map_err(InterchangeError::Serialize)
}

/// Parses an import document into insertion payloads, preserving order.
pub fn parse_import(document: &str) -> InterchangeResult<Vec<NewNote>> {
    let entries: Vec<ImportedNote> =
        serde_json::from_str(document).map_err(InterchangeError::Malformed)?;
    Ok(entries.into_iter().map(NewNote::from).collect())
}

/// Builds the export file name for a snapshot taken at `now`,
/// e.g. `notes_2024-05-01T10-00-00.000Z.json`.
pub fn export_file_name(now: DateTime<Utc>) -> String {
    let stamp = now
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace(':', "-");
    format!("notes_{stamp}.json")
}

#[cfg(test)]
mod tests {
    use super::{export_file_name, export_notes, parse_import, InterchangeError};
    use crate::model::note::Note;
    use chrono::{TimeZone, Utc};

    #[test]
    fn export_uses_two_space_indentation() {
        let notes = vec![Note {
            id: 1,
            text: "Buy milk".to_string(),
            timestamp: "2024-05-01 10:00:00".to_string(),
        }];
        let document = export_notes(&notes).unwrap();
        assert_eq!(
            document,
            "[\n  {\n    \"id\": 1,\n    \"text\": \"Buy milk\",\n    \"timestamp\": \"2024-05-01 10:00:00\"\n  }\n]"
        );
    }

    #[test]
    fn export_of_empty_collection_is_empty_array() {
        assert_eq!(export_notes(&[]).unwrap(), "[]");
    }

    #[test]
    fn import_ignores_ids_and_keeps_order() {
        let entries = parse_import(
            r#"[{"id": 7, "text": "b", "timestamp": "t1"}, {"id": 3, "text": "a"}]"#,
        )
        .unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].text, "b");
        assert_eq!(entries[0].timestamp.as_deref(), Some("t1"));
        assert_eq!(entries[1].text, "a");
        assert_eq!(entries[1].timestamp, None);
    }

    #[test]
    fn import_treats_null_and_empty_timestamp_as_missing() {
        let entries =
            parse_import(r#"[{"text": "x", "timestamp": null}, {"text": "y", "timestamp": ""}]"#)
                .unwrap();
        assert!(entries.iter().all(|entry| entry.timestamp.is_none()));
    }

    #[test]
    fn import_keeps_numeric_timestamp_as_text() {
        let entries = parse_import(
            r#"[{"text": "a"}, {"text": "b", "timestamp": 1700000000}, {"text": "c", "timestamp": false}]"#,
        )
        .unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].timestamp, None);
        assert_eq!(entries[1].timestamp.as_deref(), Some("1700000000"));
        assert_eq!(entries[2].timestamp, None);
    }

    #[test]
    fn import_rejects_non_array_and_missing_text() {
        for document in [r#"{"text": "x"}"#, r#"[{"timestamp": "t"}]"#, "not json", ""] {
            let err = parse_import(document).unwrap_err();
            assert!(matches!(err, InterchangeError::Malformed(_)), "{document}");
        }
    }

    #[test]
    fn export_file_name_uses_iso_utc_millis() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        let name = export_file_name(now);
        assert_eq!(name, "notes_2024-05-01T10-00-00.000Z.json");
        assert!(!name.contains(':'));
    }
}
