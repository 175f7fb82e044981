//! Connection bootstrap for the notes database.
//!
//! # Responsibility
//! - Open a file-backed or in-memory SQLite connection.
//! - Run the migration registry before handing the connection out.
//!
//! # Invariants
//! - Returned connections are at the latest known schema version.

use super::migrations::apply_migrations;
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens (or creates) the notes database file at `path`.
///
/// Missing parent directories are created. Existing notes are left untouched.
///
/// # Side effects
/// - Emits `db_open` events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let path = path.as_ref();
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=file");

    let result = prepare_parent(path)
        .and_then(|()| Connection::open(path).map_err(DbError::from))
        .and_then(|mut conn| bootstrap_connection(&mut conn).map(|()| conn));

    log_open_outcome("file", started_at, result.as_ref().err());
    result
}

/// Opens a private in-memory notes database.
///
/// Every call yields an independent, empty collection.
pub fn open_db_in_memory() -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=memory");

    let result = Connection::open_in_memory()
        .map_err(DbError::from)
        .and_then(|mut conn| bootstrap_connection(&mut conn).map(|()| conn));

    log_open_outcome("memory", started_at, result.as_ref().err());
    result
}

fn prepare_parent(path: &Path) -> DbResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent)?;
            Ok(())
        }
        _ => Ok(()),
    }
}

fn bootstrap_connection(conn: &mut Connection) -> DbResult<()> {
    conn.busy_timeout(BUSY_TIMEOUT)?;
    apply_migrations(conn)
}

fn log_open_outcome(mode: &str, started_at: Instant, err: Option<&DbError>) {
    let duration_ms = started_at.elapsed().as_millis();
    match err {
        None => info!("event=db_open module=db status=ok mode={mode} duration_ms={duration_ms}"),
        Some(err) => error!(
            "event=db_open module=db status=error mode={mode} duration_ms={duration_ms} error={err}"
        ),
    }
}
