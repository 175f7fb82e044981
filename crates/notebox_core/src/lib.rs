//! Core of NoteBox, a small local note store.
//! Hosts open a `NoteStore` (or drive one through `NotesSession`) and never
//! touch SQLite directly.

pub mod config;
pub mod db;
pub mod interchange;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use config::NoteboxConfig;
pub use interchange::json::{export_file_name, export_notes, parse_import, InterchangeError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::note::{NewNote, Note, NoteId};
pub use repo::note_repo::{NoteRepository, RepoError, RepoResult, SqliteNoteRepository};
pub use service::notes_session::{ExportOutcome, NotesSession, StatusKind, StatusMessage};
pub use store::note_store::{
    BulkAddOutcome, BulkAddReport, NoteStore, StoreError, StoreLocation, StoreResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
