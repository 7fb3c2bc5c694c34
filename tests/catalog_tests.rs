//! Tests for Catalog and AuthGate against freshly seeded storage
//!
//! These tests verify:
//! - Listing the seeded catalog
//! - Borrow/return transitions and their failure cases
//! - Case-insensitive title matching
//! - Credential checks against the user document

use library_kiosk::{AuthError, AuthGate, BorrowError, Catalog, JsonStore, ReturnError, StoreError};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

struct Kiosk {
    _dir: TempDir,
    store: JsonStore,
    catalog: Catalog,
    gate: AuthGate,
}

fn fresh_kiosk() -> Kiosk {
    let dir = TempDir::new().unwrap();
    let store = JsonStore::in_dir(dir.path());
    store.initialize().unwrap();
    Kiosk {
        catalog: Catalog::new(store.clone()),
        gate: AuthGate::new(store.clone()),
        store,
        _dir: dir,
    }
}

fn availability(catalog: &Catalog, title: &str) -> bool {
    catalog
        .list_books()
        .unwrap()
        .into_iter()
        .find(|book| book.title == title)
        .map(|book| book.is_available)
        .unwrap()
}

const SEEDED: [&str; 3] = ["1984", "To Kill a Mockingbird", "The Great Gatsby"];

// =============================================================================
// Listing Tests
// =============================================================================

#[test]
fn test_list_after_initialize_returns_seeded_titles() {
    let kiosk = fresh_kiosk();
    let books = kiosk.catalog.list_books().unwrap();
    let titles: Vec<&str> = books.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, SEEDED.to_vec());
    assert!(books.iter().all(|b| b.is_available));
}

#[test]
fn test_list_without_document_propagates_store_error() {
    let dir = TempDir::new().unwrap();
    let catalog = Catalog::new(JsonStore::in_dir(dir.path()));
    assert!(matches!(catalog.list_books(), Err(StoreError::NotFound { .. })));
    assert!(matches!(
        catalog.borrow("1984"),
        Err(BorrowError::Store(StoreError::NotFound { .. }))
    ));
}

// =============================================================================
// Borrow / Return Tests
// =============================================================================

#[test]
fn test_borrow_return_scenario() {
    let kiosk = fresh_kiosk();

    let identity = kiosk.gate.authenticate("admin", "admin123").unwrap();
    assert_eq!(identity.as_str(), "admin");

    let borrowed = kiosk.catalog.borrow("1984").unwrap();
    assert_eq!(borrowed.title, "1984");
    assert!(!borrowed.is_available);
    assert!(!availability(&kiosk.catalog, "1984"));

    assert!(matches!(
        kiosk.catalog.borrow("1984"),
        Err(BorrowError::NotFoundOrUnavailable)
    ));

    let returned = kiosk.catalog.return_book("1984").unwrap();
    assert!(returned.is_available);
    assert!(availability(&kiosk.catalog, "1984"));
}

#[test]
fn test_borrow_then_return_restores_every_title() {
    let kiosk = fresh_kiosk();
    for title in SEEDED {
        let before = availability(&kiosk.catalog, title);
        kiosk.catalog.borrow(title).unwrap();
        kiosk.catalog.return_book(title).unwrap();
        assert_eq!(availability(&kiosk.catalog, title), before);
    }
}

#[test]
fn test_borrow_is_persisted_for_other_instances() {
    let kiosk = fresh_kiosk();
    kiosk.catalog.borrow("The Great Gatsby").unwrap();

    let reopened = Catalog::new(kiosk.store.clone());
    assert!(!availability(&reopened, "The Great Gatsby"));
}

#[test]
fn test_borrow_unknown_title() {
    let kiosk = fresh_kiosk();
    assert!(matches!(
        kiosk.catalog.borrow("nonexistent title"),
        Err(BorrowError::NotFoundOrUnavailable)
    ));
}

#[test]
fn test_borrow_when_everything_is_lent() {
    let kiosk = fresh_kiosk();
    for title in SEEDED {
        kiosk.catalog.borrow(title).unwrap();
    }
    assert!(matches!(
        kiosk.catalog.borrow("anything"),
        Err(BorrowError::NoneAvailable)
    ));
    assert!(matches!(
        kiosk.catalog.borrow("1984"),
        Err(BorrowError::NoneAvailable)
    ));
}

#[test]
fn test_return_on_fresh_catalog_reports_none_borrowed() {
    let kiosk = fresh_kiosk();
    assert!(matches!(
        kiosk.catalog.return_book("1984"),
        Err(ReturnError::NoneBorrowed)
    ));
}

#[test]
fn test_return_of_available_title_fails() {
    let kiosk = fresh_kiosk();
    kiosk.catalog.borrow("1984").unwrap();
    assert!(matches!(
        kiosk.catalog.return_book("The Great Gatsby"),
        Err(ReturnError::NotFoundOrAvailable)
    ));
    assert!(availability(&kiosk.catalog, "The Great Gatsby"));
}

#[test]
fn test_title_matching_ignores_case() {
    let kiosk = fresh_kiosk();

    let book = kiosk.catalog.borrow("to KILL a mockingBIRD").unwrap();
    assert_eq!(book.title, "To Kill a Mockingbird");

    let book = kiosk.catalog.return_book("TO KILL A MOCKINGBIRD").unwrap();
    assert_eq!(book.title, "To Kill a Mockingbird");
    assert!(book.is_available);
}

#[test]
fn test_title_matching_is_exact_apart_from_case() {
    let kiosk = fresh_kiosk();
    assert!(matches!(
        kiosk.catalog.borrow("Great Gatsby"),
        Err(BorrowError::NotFoundOrUnavailable)
    ));
    assert!(matches!(
        kiosk.catalog.borrow("1984 "),
        Err(BorrowError::NotFoundOrUnavailable)
    ));
}

#[test]
fn test_borrow_only_touches_one_record() {
    let kiosk = fresh_kiosk();
    kiosk.catalog.borrow("1984").unwrap();

    let lent: Vec<String> = kiosk
        .catalog
        .borrowed_books()
        .unwrap()
        .into_iter()
        .map(|b| b.title)
        .collect();
    assert_eq!(lent, vec!["1984".to_string()]);
    assert_eq!(kiosk.catalog.available_books().unwrap().len(), 2);
}

// =============================================================================
// Authentication Tests
// =============================================================================

#[test]
fn test_seeded_accounts_authenticate() {
    let kiosk = fresh_kiosk();
    for (id, secret) in [("admin", "admin123"), ("user1", "password1")] {
        let identity = kiosk.gate.authenticate(id, secret).unwrap();
        assert_eq!(identity.as_str(), id);
        assert_eq!(identity.to_string(), id);
    }
}

#[test]
fn test_bad_credentials_are_indistinguishable() {
    let kiosk = fresh_kiosk();
    let unknown_user = kiosk.gate.authenticate("ghost", "admin123").unwrap_err();
    let wrong_secret = kiosk.gate.authenticate("admin", "password1").unwrap_err();
    let empty = kiosk.gate.authenticate("", "").unwrap_err();

    assert!(matches!(unknown_user, AuthError::InvalidCredentials));
    assert!(matches!(wrong_secret, AuthError::InvalidCredentials));
    assert!(matches!(empty, AuthError::InvalidCredentials));
    assert_eq!(unknown_user.to_string(), wrong_secret.to_string());
}

#[test]
fn test_authenticate_without_user_document() {
    let dir = TempDir::new().unwrap();
    let gate = AuthGate::new(JsonStore::in_dir(dir.path()));
    assert!(matches!(
        gate.authenticate("admin", "admin123"),
        Err(AuthError::Store(StoreError::NotFound { .. }))
    ));
}
