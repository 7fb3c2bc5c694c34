//! Runtime configuration: where the documents live and how chatty the log is.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use clap::Parser;
use directories::BaseDirs;

use crate::store::{BOOK_DB_FILE, USER_DB_FILE};

/// Folder name used beneath the user's home directory for kiosk data.
const DATA_DIR_NAME: &str = ".library-kiosk";
/// Log file written inside the data directory.
const LOG_FILE_NAME: &str = "kiosk.log";

/// Command line for the kiosk binary.
#[derive(Parser, Debug, Clone)]
#[command(name = "library-kiosk")]
#[command(about = "Terminal kiosk for borrowing and returning library books")]
#[command(version)]
pub struct Args {
    /// Directory holding user_db.json, book_db.json and the log file
    #[arg(short, long, env = "LIBRARY_KIOSK_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Tracing filter directive (RUST_LOG wins when set)
    #[arg(long, env = "LIBRARY_KIOSK_LOG", default_value = "info")]
    pub log_level: String,

    /// Seed missing documents and exit without starting the kiosk
    #[arg(long)]
    pub init_only: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub log_level: String,
    pub init_only: bool,
}

impl Config {
    /// Resolve the configuration, falling back to `~/.library-kiosk`.
    pub fn from_args(args: Args) -> Result<Self> {
        let data_dir = match args.data_dir {
            Some(dir) => dir,
            None => default_data_dir()?,
        };
        Ok(Self {
            data_dir,
            log_level: args.log_level,
            init_only: args.init_only,
        })
    }

    pub fn users_path(&self) -> PathBuf {
        self.data_dir.join(USER_DB_FILE)
    }

    pub fn books_path(&self) -> PathBuf {
        self.data_dir.join(BOOK_DB_FILE)
    }

    pub fn log_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn log_file_name(&self) -> &'static str {
        LOG_FILE_NAME
    }
}

/// Resolve the home-relative data directory.
fn default_data_dir() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME))
}
