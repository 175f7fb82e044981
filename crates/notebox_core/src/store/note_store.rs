//! Owned, cloneable handle over one note collection.
//!
//! # Responsibility
//! - Open or create the collection and hand back a ready handle.
//! - Run add/list/clear on the blocking pool so callers never block.
//! - Fan bulk imports out as independent adds and gather every outcome.
//!
//! # Invariants
//! - All clones share one connection; each operation is one transaction.
//! - Operations issued concurrently may commit in any order.
//! - A bulk import never fails as a whole; per-entry failures are reported
//!   next to the successes, in entry order.
//! - Logged events carry ids, counts and durations, never note text.

use crate::db::{open_db, open_db_in_memory, DbError};
use crate::model::note::{NewNote, Note, NoteId};
use crate::repo::note_repo::{NoteRepository, RepoError, RepoResult, SqliteNoteRepository};
use log::{error, info, warn};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Instant;

pub type StoreResult<T> = Result<T, StoreError>;

/// Caller-facing error for note store operations.
#[derive(Debug)]
pub enum StoreError {
    /// Storage could not be opened or is at an unsupported schema version.
    Init(RepoError),
    /// Operation attempted before a successful open.
    NotReady,
    /// An add or clear transaction failed.
    Write(RepoError),
    /// A list transaction failed.
    Read(RepoError),
}

impl StoreError {
    /// Returns true for schema-version conflicts detected at open.
    pub fn is_version_conflict(&self) -> bool {
        matches!(
            self,
            Self::Init(RepoError::Db(DbError::UnsupportedSchemaVersion { .. }))
        )
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Init(err) => write!(f, "cannot open notes database: {err}"),
            Self::NotReady => write!(f, "notes database is not open"),
            Self::Write(err) => write!(f, "write failed: {err}"),
            Self::Read(err) => write!(f, "read failed: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Init(err) | Self::Write(err) | Self::Read(err) => Some(err),
            Self::NotReady => None,
        }
    }
}

/// Where a store keeps its collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    File(PathBuf),
    Memory,
}

impl StoreLocation {
    fn mode(&self) -> &'static str {
        match self {
            Self::File(_) => "file",
            Self::Memory => "memory",
        }
    }
}

/// Result of one entry of a bulk import.
#[derive(Debug)]
pub struct BulkAddOutcome {
    /// Position of the entry in the submitted sequence.
    pub index: usize,
    pub result: StoreResult<NoteId>,
}

/// Gathered results of [`NoteStore::bulk_add`], one per entry, in entry order.
#[derive(Debug, Default)]
pub struct BulkAddReport {
    pub outcomes: Vec<BulkAddOutcome>,
}

impl BulkAddReport {
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Ids assigned to the entries that were committed.
    pub fn inserted_ids(&self) -> Vec<NoteId> {
        self.outcomes
            .iter()
            .filter_map(|outcome| outcome.result.as_ref().ok().copied())
            .collect()
    }

    /// Entries whose add failed, with their errors.
    pub fn failures(&self) -> impl Iterator<Item = (usize, &StoreError)> {
        self.outcomes
            .iter()
            .filter_map(|outcome| outcome.result.as_ref().err().map(|err| (outcome.index, err)))
    }

    pub fn failed_count(&self) -> usize {
        self.failures().count()
    }

    /// True when every entry was committed (vacuously true when empty).
    pub fn all_succeeded(&self) -> bool {
        self.failed_count() == 0
    }
}

/// Handle to an open note collection.
///
/// Cloning is cheap; every clone addresses the same collection.
#[derive(Debug, Clone)]
pub struct NoteStore {
    conn: Arc<Mutex<Connection>>,
    location: StoreLocation,
}

impl NoteStore {
    /// Opens the collection stored at `path`, creating it on first use.
    ///
    /// # Errors
    /// - `StoreError::Init` when the file cannot be opened, the schema is
    ///   newer than supported, or the notes table is missing.
    pub async fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        Self::open_at(StoreLocation::File(path.into())).await
    }

    /// Opens a private, empty in-memory collection.
    pub async fn open_in_memory() -> StoreResult<Self> {
        Self::open_at(StoreLocation::Memory).await
    }

    /// Opens the collection at `location`.
    pub async fn open_at(location: StoreLocation) -> StoreResult<Self> {
        let started_at = Instant::now();
        let target = location.clone();
        let opened = tokio::task::spawn_blocking(move || -> RepoResult<Connection> {
            let conn = match &target {
                StoreLocation::File(path) => open_db(path)?,
                StoreLocation::Memory => open_db_in_memory()?,
            };
            let _ = SqliteNoteRepository::try_new(&conn)?;
            Ok(conn)
        })
        .await
        .map_err(|err| RepoError::TaskAborted(err.to_string()))
        .and_then(|result| result);

        match opened {
            Ok(conn) => {
                info!(
                    "event=store_open module=store status=ok mode={} duration_ms={}",
                    location.mode(),
                    started_at.elapsed().as_millis()
                );
                Ok(Self {
                    conn: Arc::new(Mutex::new(conn)),
                    location,
                })
            }
            Err(err) => {
                error!(
                    "event=store_open module=store status=error mode={} duration_ms={} error={}",
                    location.mode(),
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(StoreError::Init(err))
            }
        }
    }

    pub fn location(&self) -> &StoreLocation {
        &self.location
    }

    /// Inserts one note; a missing `timestamp` is generated as "now".
    pub async fn add(
        &self,
        text: impl Into<String>,
        timestamp: Option<String>,
    ) -> StoreResult<NoteId> {
        self.add_entry(NewNote {
            text: text.into(),
            timestamp,
        })
        .await
    }

    /// Inserts one prepared payload and returns its assigned id.
    pub async fn add_entry(&self, entry: NewNote) -> StoreResult<NoteId> {
        let started_at = Instant::now();
        let text_len = entry.text.chars().count();
        match self.with_repo(move |repo| repo.insert_note(&entry)).await {
            Ok(id) => {
                info!(
                    "event=note_add module=store status=ok id={id} text_chars={text_len} duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(id)
            }
            Err(err) => {
                error!(
                    "event=note_add module=store status=error duration_ms={} error={err}",
                    started_at.elapsed().as_millis()
                );
                Err(StoreError::Write(err))
            }
        }
    }

    /// Returns every stored note in ascending id order.
    pub async fn list_all(&self) -> StoreResult<Vec<Note>> {
        let started_at = Instant::now();
        match self.with_repo(|repo| repo.list_notes()).await {
            Ok(notes) => {
                info!(
                    "event=note_list module=store status=ok count={} duration_ms={}",
                    notes.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(notes)
            }
            Err(err) => {
                error!(
                    "event=note_list module=store status=error duration_ms={} error={err}",
                    started_at.elapsed().as_millis()
                );
                Err(StoreError::Read(err))
            }
        }
    }

    /// Deletes every note. Assigned ids are not handed out again afterwards.
    pub async fn clear_all(&self) -> StoreResult<()> {
        let started_at = Instant::now();
        match self.with_repo(|repo| repo.clear_notes()).await {
            Ok(removed) => {
                info!(
                    "event=note_clear module=store status=ok removed={removed} duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=note_clear module=store status=error duration_ms={} error={err}",
                    started_at.elapsed().as_millis()
                );
                Err(StoreError::Write(err))
            }
        }
    }

    /// Adds every entry as an independent operation and waits for all of
    /// them to settle.
    ///
    /// All adds are issued before any is awaited, so their commit order is
    /// unspecified. The report lists outcomes in entry order.
    pub async fn bulk_add(&self, entries: Vec<NewNote>) -> BulkAddReport {
        if entries.is_empty() {
            return BulkAddReport::default();
        }

        let started_at = Instant::now();
        let handles = entries
            .into_iter()
            .map(|entry| {
                let store = self.clone();
                tokio::spawn(async move { store.add_entry(entry).await })
            })
            .collect::<Vec<_>>();

        let mut outcomes = Vec::with_capacity(handles.len());
        for (index, handle) in handles.into_iter().enumerate() {
            let result = match handle.await {
                Ok(result) => result,
                Err(err) => Err(StoreError::Write(RepoError::TaskAborted(err.to_string()))),
            };
            outcomes.push(BulkAddOutcome { index, result });
        }

        let report = BulkAddReport { outcomes };
        let failed = report.failed_count();
        if failed == 0 {
            info!(
                "event=note_bulk_add module=store status=ok total={} duration_ms={}",
                report.len(),
                started_at.elapsed().as_millis()
            );
        } else {
            warn!(
                "event=note_bulk_add module=store status=partial total={} failed={failed} duration_ms={}",
                report.len(),
                started_at.elapsed().as_millis()
            );
        }
        report
    }

    async fn with_repo<T, F>(&self, op: F) -> RepoResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&SqliteNoteRepository<'_>) -> RepoResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock().map_err(|_| RepoError::ConnectionPoisoned)?;
            op(&SqliteNoteRepository::new(&guard))
        })
        .await
        .map_err(|err| RepoError::TaskAborted(err.to_string()))?
    }
}
