//! Catalog operations. Every call reloads the book document, applies at most
//! one availability flip, and writes the whole document back.

use crate::error::{BorrowError, ReturnError, StoreError};
use crate::models::Book;
use crate::store::JsonStore;

/// Borrow/return/list over the book document.
#[derive(Debug, Clone)]
pub struct Catalog {
    store: JsonStore,
}

impl Catalog {
    pub fn new(store: JsonStore) -> Self {
        Self { store }
    }

    /// Every book in stored order.
    pub fn list_books(&self) -> Result<Vec<Book>, StoreError> {
        Ok(self.store.load_books()?.books)
    }

    /// Books that can currently be borrowed, in stored order.
    pub fn available_books(&self) -> Result<Vec<Book>, StoreError> {
        self.books_where(true)
    }

    /// Books that are currently lent out, in stored order.
    pub fn borrowed_books(&self) -> Result<Vec<Book>, StoreError> {
        self.books_where(false)
    }

    /// Lend the first available book whose title matches case-insensitively.
    pub fn borrow(&self, title: &str) -> Result<Book, BorrowError> {
        let mut doc = self.store.load_books()?;
        if !doc.books.iter().any(|book| book.is_available) {
            return Err(BorrowError::NoneAvailable);
        }

        let book = doc
            .books
            .iter_mut()
            .find(|book| book.is_available && book.title_matches(title))
            .ok_or(BorrowError::NotFoundOrUnavailable)?;
        book.is_available = false;
        let updated = book.clone();

        self.store.save_books(&doc)?;
        tracing::info!(title = %updated.title, "book borrowed");
        Ok(updated)
    }

    /// Take back the first lent-out book whose title matches case-insensitively.
    pub fn return_book(&self, title: &str) -> Result<Book, ReturnError> {
        let mut doc = self.store.load_books()?;
        if doc.books.iter().all(|book| book.is_available) {
            return Err(ReturnError::NoneBorrowed);
        }

        let book = doc
            .books
            .iter_mut()
            .find(|book| !book.is_available && book.title_matches(title))
            .ok_or(ReturnError::NotFoundOrAvailable)?;
        book.is_available = true;
        let updated = book.clone();

        self.store.save_books(&doc)?;
        tracing::info!(title = %updated.title, "book returned");
        Ok(updated)
    }

    fn books_where(&self, available: bool) -> Result<Vec<Book>, StoreError> {
        Ok(self
            .list_books()?
            .into_iter()
            .filter(|book| book.is_available == available)
            .collect())
    }
}
