//! Store - the destination (combined) training database.
//!
//! Holds one SQLite connection open for the whole run. Source stores are
//! opened read-only, one at a time, by [`Store::merge_source`].

mod copy;
mod offsets;
mod remap;
mod summary;

use std::path::{Path, PathBuf};

use rusqlite::Connection;

use crate::init::initialize_schema;
use crate::schema::Table;
use crate::Result;

pub use copy::{MergeStats, SourceOutcome};
pub use offsets::{next_offset, IdAllocator};
pub use remap::IdMap;
pub use summary::{summarize_source, MinutesSummary, SourceMinutes};

/// The destination store that sources are merged into.
///
/// Foreign keys are not enforced: dangling references in a source are
/// copied as NULL or as-is, never rejected.
pub struct Store {
    path: PathBuf,
    conn: Connection,
}

impl Store {
    /// Open (or create) a destination store and ensure the schema exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = Connection::open(&path)?;
        conn.pragma_update(None, "foreign_keys", false)?;
        initialize_schema(&conn)?;
        Ok(Self { path, conn })
    }

    /// Open a throwaway in-memory destination.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", false)?;
        initialize_schema(&conn)?;
        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Path of the destination file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Borrow the underlying connection for ad hoc queries.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Current maximum id in `table`, or 0 if it is empty.
    pub fn next_offset(&self, table: Table) -> Result<i64> {
        Ok(next_offset(&self.conn, table)?)
    }

    /// Number of rows in `table`.
    pub fn row_count(&self, table: Table) -> Result<i64> {
        let count = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", table.name()),
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Number of rows in `sessions`.
    pub fn session_count(&self) -> Result<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM sessions", [], |row| row.get(0))?;
        Ok(count)
    }
}
