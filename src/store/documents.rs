use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::StoreError;
use crate::models::{BookDocument, UserDocument};

use super::seed::{default_books, default_users};

/// File name of the account document inside the data directory.
pub const USER_DB_FILE: &str = "user_db.json";
/// File name of the catalog document inside the data directory.
pub const BOOK_DB_FILE: &str = "book_db.json";

/// Indentation used for every document we write.
const INDENT: &[u8] = b"    ";

/// The two documents the kiosk persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Document {
    Users,
    Books,
}

/// Which documents `initialize` had to create.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Seeded {
    pub users: bool,
    pub books: bool,
}

/// Whole-document JSON persistence. Every read parses the full file and every
/// write replaces it, so the struct only needs to remember where the files
/// live.
#[derive(Debug, Clone)]
pub struct JsonStore {
    users_path: PathBuf,
    books_path: PathBuf,
}

impl JsonStore {
    /// Store rooted in `data_dir` using the standard document file names.
    pub fn in_dir(data_dir: impl AsRef<Path>) -> Self {
        let dir = data_dir.as_ref();
        Self::with_paths(dir.join(USER_DB_FILE), dir.join(BOOK_DB_FILE))
    }

    pub fn with_paths(users_path: impl Into<PathBuf>, books_path: impl Into<PathBuf>) -> Self {
        Self {
            users_path: users_path.into(),
            books_path: books_path.into(),
        }
    }

    pub fn path(&self, document: Document) -> &Path {
        match document {
            Document::Users => &self.users_path,
            Document::Books => &self.books_path,
        }
    }

    /// Create any missing document with its default contents. Existing files
    /// are left untouched, even when they are malformed.
    pub fn initialize(&self) -> Result<Seeded, StoreError> {
        let mut seeded = Seeded::default();

        if !document_exists(&self.users_path)? {
            self.save(Document::Users, &default_users())?;
            tracing::info!(path = %self.users_path.display(), "seeded default accounts");
            seeded.users = true;
        }

        if !document_exists(&self.books_path)? {
            self.save(Document::Books, &default_books())?;
            tracing::info!(path = %self.books_path.display(), "seeded default catalog");
            seeded.books = true;
        }

        Ok(seeded)
    }

    /// Read and parse a whole document.
    pub fn load<T: DeserializeOwned>(&self, document: Document) -> Result<T, StoreError> {
        let path = self.path(document);
        let raw = fs::read(path).map_err(|err| {
            if err.kind() == io::ErrorKind::NotFound {
                StoreError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                StoreError::io(path, err)
            }
        })?;

        let data = serde_json::from_slice(&raw).map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::trace!(?document, bytes = raw.len(), "loaded document");
        Ok(data)
    }

    /// Replace a document with `data`. The bytes land in a sibling temp file
    /// first and are renamed into place, so readers see either the old or the
    /// new document.
    pub fn save<T: Serialize>(&self, document: Document, data: &T) -> Result<(), StoreError> {
        let path = self.path(document);
        let bytes = to_pretty_json(data).map_err(|err| {
            StoreError::io(path, io::Error::new(io::ErrorKind::InvalidData, err))
        })?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| StoreError::io(parent, err))?;
        }

        let tmp_path = temp_path(path);
        write_synced(&tmp_path, &bytes).map_err(|err| {
            let _ = fs::remove_file(&tmp_path);
            StoreError::io(path, err)
        })?;
        fs::rename(&tmp_path, path).map_err(|err| {
            let _ = fs::remove_file(&tmp_path);
            StoreError::io(path, err)
        })?;

        tracing::debug!(?document, bytes = bytes.len(), "saved document");
        Ok(())
    }

    pub fn load_users(&self) -> Result<UserDocument, StoreError> {
        self.load(Document::Users)
    }

    pub fn load_books(&self) -> Result<BookDocument, StoreError> {
        self.load(Document::Books)
    }

    pub fn save_books(&self, books: &BookDocument) -> Result<(), StoreError> {
        self.save(Document::Books, books)
    }
}

/// Serialize with the four-space indent the documents have always used.
fn to_pretty_json<T: Serialize>(data: &T) -> serde_json::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    data.serialize(&mut serializer)?;
    buf.push(b'\n');
    Ok(buf)
}

/// A failed stat is an error, not an absent document.
fn document_exists(path: &Path) -> Result<bool, StoreError> {
    path.try_exists().map_err(|err| StoreError::io(path, err))
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}
