//! Ratatui front-end for the library kiosk. It is the only caller of the
//! core: it authenticates through the session gate and routes every catalog
//! change through `Catalog`, turning typed errors into footer messages.

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
