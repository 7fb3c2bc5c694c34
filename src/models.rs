//! Domain models that mirror the two JSON documents and get passed throughout
//! the kiosk. They stay light-weight data holders; the store owns file access
//! and the catalog owns the availability rules.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Top-level shape of `user_db.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDocument {
    /// Accounts keyed by identifier.
    pub users: BTreeMap<String, UserRecord>,
}

/// A single kiosk account. Secrets are stored and compared in plain text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub password: String,
}

impl UserRecord {
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
        }
    }
}

/// Top-level shape of `book_db.json`. Order of `books` is the catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookDocument {
    pub books: Vec<Book>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One catalog entry. The title doubles as the lookup key for borrow and
/// return, although nothing prevents two entries from sharing a title.
pub struct Book {
    pub title: String,
    pub author: String,
    /// `true` while the book sits on the shelf, `false` while it is lent out.
    pub is_available: bool,
    /// Cover reference: a local filename or a remote URL.
    pub image: String,
}

impl Book {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        image: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            is_available: true,
            image: image.into(),
        }
    }

    /// Case-insensitive comparison on the full title.
    pub fn title_matches(&self, title: &str) -> bool {
        self.title.to_lowercase() == title.to_lowercase()
    }

    /// Label used by the list views.
    pub fn status_label(&self) -> &'static str {
        if self.is_available {
            "Available"
        } else {
            "Borrowed"
        }
    }

    /// Classify the cover reference, resolving local files against `base`.
    pub fn cover(&self, base: &Path) -> Cover {
        let reference = self.image.trim();
        if reference.is_empty() {
            Cover::Missing
        } else if reference.starts_with("http://") || reference.starts_with("https://") {
            Cover::Remote(reference.to_string())
        } else {
            let path = Path::new(reference);
            if path.is_absolute() {
                Cover::Local(path.to_path_buf())
            } else {
                Cover::Local(base.join(path))
            }
        }
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} by {}", self.title, self.author)
    }
}

/// Where a book's cover lives once its reference has been interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cover {
    Missing,
    Remote(String),
    Local(PathBuf),
}

/// The validated identifier of a logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity(String);

impl Identity {
    pub(crate) fn new(identifier: impl Into<String>) -> Self {
        Self(identifier.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
