//! Error types for merge operations.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("List file not found: {0}")]
    ManifestNotFound(PathBuf),

    #[error("No DBs found in list: {0}")]
    EmptyManifest(PathBuf),

    #[error("Missing DB: {0}")]
    SourceMissing(PathBuf),
}

pub type Result<T> = std::result::Result<T, Error>;
