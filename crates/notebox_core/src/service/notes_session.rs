//! Host-facing notes session.
//!
//! # Responsibility
//! - Track whether the store is unopened, open, or failed to open.
//! - Turn each user action into one human-readable status message.
//! - Bridge export/import files to the store through `interchange`.
//!
//! # Invariants
//! - Every action settles with exactly one `StatusMessage`, including
//!   imports where some entries fail.
//! - Actions before a successful open fail with `StoreError::NotReady`.
//! - Input text is trimmed; blank input never reaches the store.

use crate::interchange::json::{export_file_name, export_notes, parse_import};
use crate::model::note::Note;
use crate::store::note_store::{NoteStore, StoreError, StoreLocation, StoreResult};
use chrono::Utc;
use log::{info, warn};
use std::path::{Path, PathBuf};

/// Outcome category of a status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Failure,
    /// The action was not attempted; the user needs to fix their input.
    Prompt,
}

/// One transient, user-visible status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

impl StatusMessage {
    fn success(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Success,
            text: text.into(),
        }
    }

    fn failure(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Failure,
            text: text.into(),
        }
    }

    fn prompt(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Prompt,
            text: text.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.kind == StatusKind::Success
    }
}

/// Result of an export action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    pub status: StatusMessage,
    /// Written file, when the export succeeded.
    pub path: Option<PathBuf>,
}

#[derive(Debug)]
enum StoreState {
    Unopened,
    Open(NoteStore),
    Failed(String),
}

/// Owns the store handle on behalf of a UI or CLI host.
#[derive(Debug)]
pub struct NotesSession {
    state: StoreState,
}

impl Default for NotesSession {
    fn default() -> Self {
        Self::new()
    }
}

impl NotesSession {
    /// Creates a session whose store is not opened yet.
    pub fn new() -> Self {
        Self {
            state: StoreState::Unopened,
        }
    }

    /// Creates a session around an already opened store.
    pub fn with_store(store: NoteStore) -> Self {
        Self {
            state: StoreState::Open(store),
        }
    }

    /// Returns the open store, or `StoreError::NotReady`.
    pub fn store(&self) -> StoreResult<&NoteStore> {
        match &self.state {
            StoreState::Open(store) => Ok(store),
            StoreState::Unopened | StoreState::Failed(_) => Err(StoreError::NotReady),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, StoreState::Open(_))
    }

    /// Reason of the last failed open, if the session is in the failed state.
    pub fn open_failure(&self) -> Option<&str> {
        match &self.state {
            StoreState::Failed(reason) => Some(reason.as_str()),
            _ => None,
        }
    }

    /// Opens the store at `location`. An already open session is kept as is;
    /// a failed session may retry.
    pub async fn open(&mut self, location: StoreLocation) -> StatusMessage {
        if self.is_open() {
            return StatusMessage::success("Notes database ready.");
        }

        match NoteStore::open_at(location).await {
            Ok(store) => {
                self.state = StoreState::Open(store);
                StatusMessage::success("Notes database ready.")
            }
            Err(err) => {
                let reason = err.to_string();
                self.state = StoreState::Failed(reason.clone());
                StatusMessage::failure(format!("Failed to initialize database: {reason}"))
            }
        }
    }

    /// Saves trimmed `input` as a new note.
    pub async fn save_note(&self, input: &str) -> StatusMessage {
        let text = input.trim();
        if text.is_empty() {
            return StatusMessage::prompt("Please enter a note.");
        }

        let result = match self.store() {
            Ok(store) => store.add(text, None).await,
            Err(err) => Err(err),
        };
        match result {
            Ok(_) => StatusMessage::success("Note saved successfully."),
            Err(err) => StatusMessage::failure(format!("Failed to save note: {err}")),
        }
    }

    /// Returns every note for display.
    pub async fn load_notes(&self) -> StoreResult<Vec<Note>> {
        self.store()?.list_all().await
    }

    pub async fn clear_notes(&self) -> StatusMessage {
        let result = match self.store() {
            Ok(store) => store.clear_all().await,
            Err(err) => Err(err),
        };
        match result {
            Ok(()) => StatusMessage::success("All notes cleared."),
            Err(err) => StatusMessage::failure(format!("Failed to clear notes: {err}")),
        }
    }

    /// Writes every note to a timestamped JSON file inside `dir`.
    pub async fn export_notes(&self, dir: &Path) -> ExportOutcome {
        match self.write_export(dir).await {
            Ok(path) => {
                info!("event=notes_export module=session status=ok");
                ExportOutcome {
                    status: StatusMessage::success("Notes exported successfully."),
                    path: Some(path),
                }
            }
            Err(message) => {
                warn!("event=notes_export module=session status=error");
                ExportOutcome {
                    status: StatusMessage::failure(format!("Failed to export notes: {message}")),
                    path: None,
                }
            }
        }
    }

    /// Imports the JSON document at `path` as new notes with fresh ids.
    ///
    /// Entries are added independently; the message reports the first
    /// failure when any entry could not be stored.
    pub async fn import_notes(&self, path: &Path) -> StatusMessage {
        let store = match self.store() {
            Ok(store) => store,
            Err(err) => return StatusMessage::failure(format!("Failed to import notes: {err}")),
        };

        let document = match tokio::fs::read_to_string(path).await {
            Ok(document) => document,
            Err(err) => {
                warn!("event=notes_import module=session status=error stage=read error={err}");
                return StatusMessage::failure("Failed to read file.");
            }
        };

        let entries = match parse_import(&document) {
            Ok(entries) => entries,
            Err(err) => return StatusMessage::failure(format!("Invalid JSON file: {err}")),
        };

        let report = store.bulk_add(entries).await;
        info!(
            "event=notes_import module=session status={} total={} failed={}",
            if report.all_succeeded() { "ok" } else { "partial" },
            report.len(),
            report.failed_count()
        );
        let first_failure = report.failures().next().map(|(_, err)| err.to_string());
        match first_failure {
            None => StatusMessage::success("Notes imported successfully."),
            Some(err) => StatusMessage::failure(format!("Failed to import some notes: {err}")),
        }
    }

    async fn write_export(&self, dir: &Path) -> Result<PathBuf, String> {
        let notes = self.load_notes().await.map_err(|err| err.to_string())?;
        let document = export_notes(&notes).map_err(|err| err.to_string())?;
        let path = dir.join(export_file_name(Utc::now()));
        tokio::fs::write(&path, document)
            .await
            .map_err(|err| format!("cannot write `{}`: {err}", path.display()))?;
        Ok(path)
    }
}
