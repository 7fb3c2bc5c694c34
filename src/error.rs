//! Error taxonomy for the kiosk core. Each operation family gets its own enum
//! so the presentation layer can match on the exact outcome; store failures
//! ride along unchanged inside each of them.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures while reading or writing one of the JSON documents.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document {} does not exist", .path.display())]
    NotFound { path: PathBuf },

    #[error("document {} is not valid: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown identifier and wrong secret are deliberately indistinguishable.
    #[error("invalid username or password")]
    InvalidCredentials,

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum BorrowError {
    #[error("book not found or already borrowed")]
    NotFoundOrUnavailable,

    #[error("no books are currently available for borrowing")]
    NoneAvailable,

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum ReturnError {
    #[error("book not found or already available")]
    NotFoundOrAvailable,

    #[error("no books are currently borrowed")]
    NoneBorrowed,

    #[error(transparent)]
    Store(#[from] StoreError),
}
