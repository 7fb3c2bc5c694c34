//! Core library surface for the Library Kiosk TUI application.
//!
//! The persistence store, catalog and session gate are usable on their own;
//! the `ui` module layers the terminal kiosk on top of them.
pub mod catalog;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod session;
pub mod store;
pub mod ui;

pub use catalog::Catalog;
pub use config::{Args, Config};
pub use error::{AuthError, BorrowError, ReturnError, StoreError};
pub use models::{Book, BookDocument, Cover, Identity, UserDocument, UserRecord};
pub use session::{AuthGate, Session};
pub use store::{Document, JsonStore, Seeded};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
