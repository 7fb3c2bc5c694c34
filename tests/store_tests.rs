//! Tests for JsonStore
//!
//! These tests verify:
//! - First-run seeding and idempotent initialization
//! - Load failures for missing and malformed documents
//! - Whole-document saves with the on-disk format kept stable

use std::fs;

use library_kiosk::{Book, BookDocument, Document, JsonStore, Seeded, StoreError, UserDocument};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_store() -> (TempDir, JsonStore) {
    let temp_dir = TempDir::new().unwrap();
    let store = JsonStore::in_dir(temp_dir.path());
    (temp_dir, store)
}

// =============================================================================
// Initialization Tests
// =============================================================================

#[test]
fn test_initialize_seeds_both_documents() {
    let (_dir, store) = setup_store();

    let seeded = store.initialize().unwrap();
    assert_eq!(seeded, Seeded { users: true, books: true });

    let users = store.load_users().unwrap();
    let accounts: Vec<(&str, &str)> = users
        .users
        .iter()
        .map(|(id, record)| (id.as_str(), record.password.as_str()))
        .collect();
    assert_eq!(accounts, vec![("admin", "admin123"), ("user1", "password1")]);

    let books = store.load_books().unwrap().books;
    let titles: Vec<&str> = books.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, vec!["1984", "To Kill a Mockingbird", "The Great Gatsby"]);
    assert!(books.iter().all(|b| b.is_available));
    assert_eq!(books[2].author, "F. Scott Fitzgerald");
    assert_eq!(books[1].image, "mockingbird.png");
}

#[test]
fn test_initialize_never_overwrites() {
    let (_dir, store) = setup_store();
    store.initialize().unwrap();

    let custom = BookDocument {
        books: vec![Book::new("Dune", "Frank Herbert", "https://example.org/dune.jpg")],
    };
    store.save_books(&custom).unwrap();

    let seeded = store.initialize().unwrap();
    assert_eq!(seeded, Seeded::default());
    assert_eq!(store.load_books().unwrap(), custom);
}

#[test]
fn test_initialize_seeds_only_missing_document() {
    let (dir, store) = setup_store();
    fs::write(dir.path().join("user_db.json"), r#"{"users": {}}"#).unwrap();

    let seeded = store.initialize().unwrap();
    assert_eq!(seeded, Seeded { users: false, books: true });
    assert_eq!(store.load_users().unwrap(), UserDocument::default());
}

#[test]
fn test_initialize_leaves_malformed_document_alone() {
    let (dir, store) = setup_store();
    let path = dir.path().join("book_db.json");
    fs::write(&path, "garbage").unwrap();

    store.initialize().unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "garbage");
}

#[test]
fn test_initialize_reports_unreadable_location() {
    let (dir, _) = setup_store();
    let blocker = dir.path().join("not-a-dir");
    fs::write(&blocker, "file").unwrap();

    let store = JsonStore::in_dir(&blocker);
    match store.initialize() {
        Err(StoreError::Io { path, .. }) => assert_eq!(path, store.path(Document::Users)),
        other => panic!("expected Io, got {other:?}"),
    }
    assert_eq!(fs::read_to_string(&blocker).unwrap(), "file");
}

// =============================================================================
// Load Tests
// =============================================================================

#[test]
fn test_load_missing_document_is_not_found() {
    let (_dir, store) = setup_store();
    match store.load_books() {
        Err(StoreError::NotFound { path }) => assert!(path.ends_with("book_db.json")),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn test_load_malformed_document_is_parse_error() {
    let (dir, store) = setup_store();
    fs::write(dir.path().join("user_db.json"), "{\"users\": [").unwrap();
    assert!(matches!(store.load_users(), Err(StoreError::Parse { .. })));
}

#[test]
fn test_load_invalid_utf8_document_is_parse_error() {
    let (dir, store) = setup_store();
    fs::write(dir.path().join("book_db.json"), b"{\"books\": [\xff\xfe]}").unwrap();
    match store.load_books() {
        Err(StoreError::Parse { path, .. }) => assert_eq!(path, store.path(Document::Books)),
        other => panic!("expected Parse, got {other:?}"),
    }
}

#[test]
fn test_load_wrong_shape_is_parse_error() {
    let (dir, store) = setup_store();
    fs::write(
        dir.path().join("book_db.json"),
        r#"{"books": [{"title": "1984", "author": "George Orwell"}]}"#,
    )
    .unwrap();
    assert!(matches!(store.load_books(), Err(StoreError::Parse { .. })));
}

#[test]
fn test_load_generic_document() {
    let (_dir, store) = setup_store();
    store.initialize().unwrap();
    let raw: serde_json::Value = store.load(Document::Users).unwrap();
    assert_eq!(raw["users"]["admin"]["password"], "admin123");
}

// =============================================================================
// Save Tests
// =============================================================================

#[test]
fn test_save_preserves_order_and_format() {
    let (dir, store) = setup_store();
    let mut lent = Book::new("A Tale of Two Cities", "Charles Dickens", "tale.png");
    lent.is_available = false;
    let doc = BookDocument {
        books: vec![
            Book::new("Zorba the Greek", "Nikos Kazantzakis", "zorba.png"),
            lent,
        ],
    };
    store.save_books(&doc).unwrap();

    assert_eq!(store.load_books().unwrap(), doc);

    let text = fs::read_to_string(dir.path().join("book_db.json")).unwrap();
    assert!(text.starts_with("{\n    \"books\": [\n        {\n            \"title\": \"Zorba the Greek\""));
    assert!(text.contains("\"is_available\": false"));
}

#[test]
fn test_save_leaves_no_temp_file() {
    let (dir, store) = setup_store();
    store.initialize().unwrap();
    store.save_books(&BookDocument::default()).unwrap();

    let names: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert!(names.iter().all(|name| !name.ends_with(".tmp")), "{names:?}");
}

#[test]
fn test_save_into_unwritable_location_is_io_error() {
    let (dir, _) = setup_store();
    let blocker = dir.path().join("not-a-dir");
    fs::write(&blocker, "file").unwrap();

    let store = JsonStore::in_dir(&blocker);
    assert!(matches!(
        store.save_books(&BookDocument::default()),
        Err(StoreError::Io { .. })
    ));
}

#[test]
fn test_failed_temp_write_names_the_document() {
    let (dir, store) = setup_store();
    store.initialize().unwrap();
    let before = fs::read_to_string(store.path(Document::Books)).unwrap();
    fs::create_dir(dir.path().join("book_db.json.tmp")).unwrap();

    match store.save_books(&BookDocument::default()) {
        Err(StoreError::Io { path, .. }) => assert_eq!(path, store.path(Document::Books)),
        other => panic!("expected Io, got {other:?}"),
    }
    assert_eq!(fs::read_to_string(store.path(Document::Books)).unwrap(), before);
}
