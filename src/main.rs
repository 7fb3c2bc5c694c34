//! Binary entry point that glues the JSON-backed catalog to the TUI: resolve
//! configuration, start file logging, seed missing documents, then drive the
//! Ratatui event loop until the user exits.
use anyhow::Context;
use clap::Parser;
use library_kiosk::{logging, run_app, App, Args, Config, JsonStore};

fn main() -> anyhow::Result<()> {
    let config = Config::from_args(Args::parse())?;
    let _log_guard = logging::init(&config)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        data_dir = %config.data_dir.display(),
        "starting library kiosk"
    );

    let store = JsonStore::with_paths(config.users_path(), config.books_path());
    let seeded = store
        .initialize()
        .context("failed to initialize kiosk documents")?;

    if config.init_only {
        println!(
            "Documents ready in {} (users seeded: {}, books seeded: {}).",
            config.data_dir.display(),
            seeded.users,
            seeded.books
        );
        return Ok(());
    }

    let mut app = App::new(store, config.data_dir.clone());
    let result = run_app(&mut app);
    if let Err(err) = &result {
        tracing::error!(error = %format!("{err:#}"), "kiosk terminated");
    }
    tracing::info!("library kiosk stopped");
    result
}
