//! Command-line host for the NoteBox core.
//!
//! # Responsibility
//! - Stand in for the UI layer: one subcommand per user action.
//! - Print the session's status message and exit non-zero on failure.

use clap::{Parser, Subcommand};
use notebox_core::{init_logging, NoteboxConfig, NotesSession, StatusMessage, StoreLocation};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "notebox",
    version = notebox_core::core_version(),
    about = "Keep short notes in a local database"
)]
struct Cli {
    /// Database file (defaults to $NOTEBOX_DB_PATH or a temp-dir file).
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Save a new note.
    Add {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Show every saved note.
    List {
        /// Print the export document instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Delete every note.
    Clear,
    /// Write all notes to a timestamped JSON file.
    Export {
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
    /// Add the notes of a JSON export file with fresh ids.
    Import { file: PathBuf },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let mut config = NoteboxConfig::from_env();
    if let Some(db) = cli.db {
        config.db_path = db;
    }

    if let Some(log_dir) = config.log_dir.as_deref() {
        if let Err(err) = init_logging(&config.log_level, log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let mut session = NotesSession::new();
    let opened = session.open(StoreLocation::File(config.db_path)).await;
    if !opened.is_success() {
        return report(&opened);
    }

    match cli.command {
        Command::Add { text } => report(&session.save_note(&text.join(" ")).await),
        Command::List { json } => list(&session, json).await,
        Command::Clear => report(&session.clear_notes().await),
        Command::Export { dir } => {
            let outcome = session.export_notes(&dir).await;
            if let Some(path) = outcome.path.as_ref() {
                println!("{}", path.display());
            }
            report(&outcome.status)
        }
        Command::Import { file } => report(&session.import_notes(&file).await),
    }
}

async fn list(session: &NotesSession, json: bool) -> ExitCode {
    let notes = match session.load_notes().await {
        Ok(notes) => notes,
        Err(err) => {
            eprintln!("Failed to load notes: {err}");
            return ExitCode::FAILURE;
        }
    };

    if json {
        match notebox_core::export_notes(&notes) {
            Ok(document) => println!("{document}"),
            Err(err) => {
                eprintln!("Failed to load notes: {err}");
                return ExitCode::FAILURE;
            }
        }
        return ExitCode::SUCCESS;
    }

    if notes.is_empty() {
        println!("No notes yet.");
    }
    for note in &notes {
        println!("#{} [{}]", note.id, note.timestamp);
        println!("{}", note.text);
    }
    ExitCode::SUCCESS
}

fn report(status: &StatusMessage) -> ExitCode {
    if status.is_success() {
        println!("{}", status.text);
        ExitCode::SUCCESS
    } else {
        log::debug!("event=cli_status module=cli status=error");
        eprintln!("{}", status.text);
        ExitCode::FAILURE
    }
}
