//! Note repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Insert, list and clear rows of the `notes` table.
//! - Reject connections whose schema does not carry the notes table.
//!
//! # Invariants
//! - Each method is exactly one SQLite statement, hence one transaction.
//! - `id` is never bound on insert; SQLite `AUTOINCREMENT` assigns it.
//! - Listing order is `id ASC`.

use crate::db::DbError;
use crate::model::note::{NewNote, Note, NoteId};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const NOTE_SELECT_SQL: &str = "SELECT id, text, timestamp FROM notes";

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence error for note reads and writes.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    InvalidData(String),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// A previous holder of the connection lock panicked.
    ConnectionPoisoned,
    /// The blocking task running the statement was cancelled or panicked.
    TaskAborted(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted note data: {message}"),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
            Self::ConnectionPoisoned => write!(f, "notes connection lock is poisoned"),
            Self::TaskAborted(details) => write!(f, "storage task aborted: {details}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for the note collection.
pub trait NoteRepository {
    /// Inserts one note and returns its assigned id.
    fn insert_note(&self, entry: &NewNote) -> RepoResult<NoteId>;
    /// Returns every stored note ordered by id.
    fn list_notes(&self) -> RepoResult<Vec<Note>>;
    /// Deletes every stored note and returns how many rows were removed.
    fn clear_notes(&self) -> RepoResult<usize>;
}

/// SQLite-backed note repository borrowing a migrated connection.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Wraps `conn` after checking that the notes schema is present.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_notes_schema(conn)?;
        Ok(Self::new(conn))
    }

    /// Wraps a connection whose schema was already checked by `try_new`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn insert_note(&self, entry: &NewNote) -> RepoResult<NoteId> {
        let timestamp = entry.resolved_timestamp();
        self.conn.execute(
            "INSERT INTO notes (text, timestamp) VALUES (?1, ?2);",
            params![entry.text.as_str(), timestamp.as_str()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn list_notes(&self) -> RepoResult<Vec<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }
        Ok(notes)
    }

    fn clear_notes(&self) -> RepoResult<usize> {
        Ok(self.conn.execute("DELETE FROM notes;", [])?)
    }
}

fn parse_note_row(row: &Row<'_>) -> RepoResult<Note> {
    let id: NoteId = row.get("id")?;
    let text: Option<String> = row.get("text")?;
    let timestamp: Option<String> = row.get("timestamp")?;
    match (text, timestamp) {
        (Some(text), Some(timestamp)) => Ok(Note {
            id,
            text,
            timestamp,
        }),
        _ => Err(RepoError::InvalidData(format!(
            "note {id} has NULL text or timestamp"
        ))),
    }
}

fn ensure_notes_schema(conn: &Connection) -> RepoResult<()> {
    if !table_exists(conn, "notes")? {
        return Err(RepoError::MissingRequiredTable("notes"));
    }
    for column in ["id", "text", "timestamp"] {
        if !table_has_column(conn, "notes", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "notes",
                column,
            });
        }
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
