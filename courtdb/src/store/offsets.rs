//! Primary key allocation for destination tables.
//!
//! The offset for a table is its current `MAX(id)` (0 when empty). A batch of
//! K source rows gets ids `offset + 1 ..= offset + K` in read order. Offsets
//! are read fresh for every table of every source, never cached.

use rusqlite::Connection;

use crate::schema::Table;

/// Current maximum id in `table`, or 0 if the table is empty.
pub fn next_offset(conn: &Connection, table: Table) -> rusqlite::Result<i64> {
    conn.query_row(
        &format!("SELECT COALESCE(MAX(id), 0) FROM {}", table.name()),
        [],
        |row| row.get(0),
    )
}

/// Hands out fresh ids for one table during one source pass.
#[derive(Debug)]
pub struct IdAllocator {
    offset: i64,
    assigned: i64,
}

impl IdAllocator {
    /// Start allocating above the table's current maximum id.
    pub fn for_table(conn: &Connection, table: Table) -> rusqlite::Result<Self> {
        Ok(Self::starting_at(next_offset(conn, table)?))
    }

    /// Start allocating above a known offset.
    pub fn starting_at(offset: i64) -> Self {
        Self {
            offset,
            assigned: 0,
        }
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// Next fresh id.
    pub fn next_id(&mut self) -> i64 {
        self.assigned += 1;
        self.offset + self.assigned
    }

    /// How many ids have been handed out.
    pub fn assigned(&self) -> usize {
        self.assigned as usize
    }
}
