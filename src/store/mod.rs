//! Persistence module split across logical submodules.

mod documents;
mod seed;

pub use documents::{Document, JsonStore, Seeded, BOOK_DB_FILE, USER_DB_FILE};
