use notebox_core::{NoteStore, NotesSession, StatusKind, StoreError, StoreLocation};
use rusqlite::Connection;

async fn open_session() -> NotesSession {
    let mut session = NotesSession::new();
    let status = session.open(StoreLocation::Memory).await;
    assert!(status.is_success(), "{}", status.text);
    session
}

#[tokio::test]
async fn actions_before_open_report_not_ready() {
    let session = NotesSession::new();
    assert!(!session.is_open());

    assert!(matches!(
        session.load_notes().await,
        Err(StoreError::NotReady)
    ));

    let saved = session.save_note("hello").await;
    assert_eq!(saved.kind, StatusKind::Failure);
    assert!(saved.text.starts_with("Failed to save note:"));

    let cleared = session.clear_notes().await;
    assert_eq!(cleared.kind, StatusKind::Failure);
    assert!(cleared.text.starts_with("Failed to clear notes:"));
}

#[tokio::test]
async fn blank_input_is_rejected_before_reaching_store() {
    let session = open_session().await;

    let status = session.save_note("   \n\t").await;
    assert_eq!(status.kind, StatusKind::Prompt);
    assert_eq!(status.text, "Please enter a note.");
    assert!(session.load_notes().await.unwrap().is_empty());
}

#[tokio::test]
async fn save_trims_input_and_clear_empties_the_list() {
    let session = open_session().await;

    let status = session.save_note("  Buy milk  ").await;
    assert_eq!(status.text, "Note saved successfully.");
    let notes = session.load_notes().await.unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].text, "Buy milk");

    let status = session.clear_notes().await;
    assert_eq!(status.text, "All notes cleared.");
    assert!(session.load_notes().await.unwrap().is_empty());
}

#[tokio::test]
async fn session_over_existing_store_shares_its_notes() {
    let store = NoteStore::open_in_memory().await.unwrap();
    store.add("from store", None).await.unwrap();

    let mut session = NotesSession::with_store(store.clone());
    assert!(session.is_open());
    assert!(session.open(StoreLocation::Memory).await.is_success());

    session.save_note("from session").await;
    let texts = store
        .list_all()
        .await
        .unwrap()
        .into_iter()
        .map(|note| note.text)
        .collect::<Vec<_>>();
    assert_eq!(texts, vec!["from store".to_string(), "from session".to_string()]);
}

#[tokio::test]
async fn import_with_numeric_timestamp_stores_every_entry() {
    let dir = tempfile::tempdir().unwrap();
    let session = open_session().await;
    let import = dir.path().join("numeric.json");
    std::fs::write(
        &import,
        r#"[{"text": "a"}, {"text": "b", "timestamp": 1700000000}]"#,
    )
    .unwrap();

    let status = session.import_notes(&import).await;
    assert_eq!(status.text, "Notes imported successfully.");
    let notes = session.load_notes().await.unwrap();
    assert_eq!(notes.len(), 2);
    assert_eq!(notes[1].timestamp, "1700000000");
}

#[tokio::test]
async fn failed_open_can_be_retried() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.sqlite3");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 5;").unwrap();
    drop(conn);

    let mut session = NotesSession::new();
    let status = session.open(StoreLocation::File(path)).await;
    assert_eq!(status.kind, StatusKind::Failure);
    assert!(status.text.starts_with("Failed to initialize database:"));
    assert!(session.open_failure().is_some());
    assert!(matches!(session.store(), Err(StoreError::NotReady)));

    let status = session.open(StoreLocation::Memory).await;
    assert!(status.is_success());
    assert!(session.is_open());
}

#[tokio::test]
async fn export_writes_pretty_json_that_imports_back() {
    let dir = tempfile::tempdir().unwrap();
    let session = open_session().await;
    session.save_note("first").await;
    session.save_note("second").await;

    let outcome = session.export_notes(dir.path()).await;
    assert_eq!(outcome.status.text, "Notes exported successfully.");
    let path = outcome.path.unwrap();
    let file_name = path.file_name().unwrap().to_string_lossy().to_string();
    assert!(file_name.starts_with("notes_"));
    assert!(file_name.ends_with("Z.json"));
    assert!(!file_name.contains(':'));

    let document = std::fs::read_to_string(&path).unwrap();
    assert!(document.starts_with("[\n  {\n    \"id\": 1,"));

    let status = session.import_notes(&path).await;
    assert_eq!(status.text, "Notes imported successfully.");
    let notes = session.load_notes().await.unwrap();
    assert_eq!(notes.len(), 4);
    assert_eq!(
        notes.iter().filter(|note| note.text == "first").count(),
        2
    );
}

#[tokio::test]
async fn export_into_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let session = open_session().await;

    let outcome = session.export_notes(&dir.path().join("absent")).await;
    assert_eq!(outcome.status.kind, StatusKind::Failure);
    assert!(outcome.status.text.starts_with("Failed to export notes:"));
    assert_eq!(outcome.path, None);
}

#[tokio::test]
async fn import_reports_unreadable_and_malformed_files() {
    let dir = tempfile::tempdir().unwrap();
    let session = open_session().await;

    let missing = session.import_notes(&dir.path().join("nope.json")).await;
    assert_eq!(missing.text, "Failed to read file.");

    let bad = dir.path().join("bad.json");
    std::fs::write(&bad, "{ not json").unwrap();
    let malformed = session.import_notes(&bad).await;
    assert!(malformed.text.starts_with("Invalid JSON file:"));
    assert!(session.load_notes().await.unwrap().is_empty());
}

#[tokio::test]
async fn import_of_empty_array_completes() {
    let dir = tempfile::tempdir().unwrap();
    let session = open_session().await;
    let empty = dir.path().join("empty.json");
    std::fs::write(&empty, "[]").unwrap();

    let status = session.import_notes(&empty).await;
    assert_eq!(status.text, "Notes imported successfully.");
    assert!(session.load_notes().await.unwrap().is_empty());
}

#[tokio::test]
async fn partial_import_reports_failure_but_keeps_good_entries() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("notes.sqlite3");
    {
        let conn = notebox_core::db::open_db(&db_path).unwrap();
        conn.execute_batch(
            "CREATE TRIGGER reject_text BEFORE INSERT ON notes
             WHEN NEW.text = 'bad'
             BEGIN SELECT RAISE(ABORT, 'induced write failure'); END;",
        )
        .unwrap();
    }
    let mut session = NotesSession::new();
    assert!(session.open(StoreLocation::File(db_path)).await.is_success());

    let import = dir.path().join("import.json");
    std::fs::write(
        &import,
        r#"[{"text": "good"}, {"text": "bad"}, {"id": 99, "text": "fine", "timestamp": "t"}]"#,
    )
    .unwrap();

    let status = session.import_notes(&import).await;
    assert_eq!(status.kind, StatusKind::Failure);
    assert!(status.text.starts_with("Failed to import some notes:"));

    let notes = session.load_notes().await.unwrap();
    assert_eq!(notes.len(), 2);
    assert!(notes.iter().all(|note| note.id != 99));
}
