//! Per-source merge pass.
//!
//! Copies one source store into the destination inside a single
//! transaction, in dependency order:
//!
//! 1. `sessions` (insert-if-absent)
//! 2. `matches` (fresh ids, builds the match map)
//! 3. `points` (fresh ids, `match_id` remapped, builds the point map)
//! 4. `player_stats` (`match_id` remapped)
//! 5. `events` (`match_id` and `point_id` remapped)
//! 6. `debug_events` (`match_id` remapped)

use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::{IdAllocator, IdMap, Store};
use crate::schema::{
    DebugEventRecord, EventRecord, MatchRecord, PlayerStatRecord, PointRecord, Record,
    SessionRecord, Table,
};
use crate::{Error, Result};

/// Rows inserted into the destination by one or more source passes.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct MergeStats {
    /// Sessions actually inserted (already-present ones are not counted).
    pub sessions: usize,
    pub matches: usize,
    pub points: usize,
    pub player_stats: usize,
    pub events: usize,
    pub debug_events: usize,
}

impl MergeStats {
    pub fn add(&mut self, other: &MergeStats) {
        self.sessions += other.sessions;
        self.matches += other.matches;
        self.points += other.points;
        self.player_stats += other.player_stats;
        self.events += other.events;
        self.debug_events += other.debug_events;
    }

    /// Rows inserted into an id-assigned table.
    pub fn get(&self, table: Table) -> usize {
        match table {
            Table::Matches => self.matches,
            Table::Points => self.points,
            Table::PlayerStats => self.player_stats,
            Table::Events => self.events,
            Table::DebugEvents => self.debug_events,
        }
    }

    fn set(&mut self, table: Table, rows: usize) {
        match table {
            Table::Matches => self.matches = rows,
            Table::Points => self.points = rows,
            Table::PlayerStats => self.player_stats = rows,
            Table::Events => self.events = rows,
            Table::DebugEvents => self.debug_events = rows,
        }
    }

    /// All rows inserted, sessions included.
    pub fn total_rows(&self) -> usize {
        self.sessions + Table::ALL.iter().map(|&t| self.get(t)).sum::<usize>()
    }
}

/// What happened to one manifest entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SourceOutcome {
    Merged { path: PathBuf, stats: MergeStats },
    Skipped { path: PathBuf, reason: String },
}

impl SourceOutcome {
    pub fn path(&self) -> &Path {
        match self {
            SourceOutcome::Merged { path, .. } | SourceOutcome::Skipped { path, .. } => path,
        }
    }

    pub fn stats(&self) -> Option<&MergeStats> {
        match self {
            SourceOutcome::Merged { stats, .. } => Some(stats),
            SourceOutcome::Skipped { .. } => None,
        }
    }
}

impl Store {
    /// Merge one source store into the destination.
    ///
    /// A missing source is skipped (logged, destination untouched). All rows
    /// from the source are committed together; on error the source's rows are
    /// rolled back and the error is returned.
    pub fn merge_source(&mut self, source: &Path) -> Result<SourceOutcome> {
        if !source.exists() {
            warn!(source = %source.display(), "skipping missing source store");
            return Ok(SourceOutcome::Skipped {
                path: source.to_path_buf(),
                reason: Error::SourceMissing(source.to_path_buf()).to_string(),
            });
        }

        let src = Connection::open_with_flags(
            source,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        let tx = self.conn.transaction()?;
        let stats = copy_source(&src, &tx)?;
        tx.commit()?;

        info!(
            source = %source.display(),
            sessions = stats.sessions,
            matches = stats.matches,
            points = stats.points,
            player_stats = stats.player_stats,
            events = stats.events,
            debug_events = stats.debug_events,
            "merged source store"
        );

        Ok(SourceOutcome::Merged {
            path: source.to_path_buf(),
            stats,
        })
    }
}

/// Copy every table of `src` into `dest`, remapping ids.
fn copy_source(src: &Connection, dest: &Connection) -> Result<MergeStats> {
    let mut stats = MergeStats {
        sessions: copy_sessions(src, dest)?,
        ..MergeStats::default()
    };

    let mut match_ids = IdMap::new();
    let mut point_ids = IdMap::new();

    let copied = copy_table(src, dest, Table::Matches, |record: MatchRecord, id| {
        match_ids.insert(record.id, id);
        MatchRecord { id, ..record }
    })?;
    stats.set(Table::Matches, copied);

    let copied = copy_table(src, dest, Table::Points, |record: PointRecord, id| {
        point_ids.insert(record.id, id);
        PointRecord {
            id,
            match_id: match_ids.resolve(record.match_id),
            ..record
        }
    })?;
    stats.set(Table::Points, copied);

    let copied = copy_table(src, dest, Table::PlayerStats, |record: PlayerStatRecord, id| {
        PlayerStatRecord {
            id,
            match_id: match_ids.resolve(record.match_id),
            ..record
        }
    })?;
    stats.set(Table::PlayerStats, copied);

    let copied = copy_table(src, dest, Table::Events, |record: EventRecord, id| EventRecord {
        id,
        match_id: match_ids.resolve(record.match_id),
        point_id: point_ids.resolve(record.point_id),
        ..record
    })?;
    stats.set(Table::Events, copied);

    let copied = copy_table(src, dest, Table::DebugEvents, |record: DebugEventRecord, id| {
        DebugEventRecord {
            id,
            match_id: match_ids.resolve(record.match_id),
            ..record
        }
    })?;
    stats.set(Table::DebugEvents, copied);

    Ok(stats)
}

/// Insert-if-absent every session. Returns how many were new.
fn copy_sessions(src: &Connection, dest: &Connection) -> Result<usize> {
    let mut inserted = 0;
    let mut stmt = src.prepare(SessionRecord::SELECT_ALL)?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        inserted += SessionRecord::from_row(row)?.insert(dest)?;
    }
    Ok(inserted)
}

/// Stream one table from `src` to `dest`.
///
/// The offset is read from `dest` right before copying. `rewrite` receives each
/// source record with its freshly assigned id and returns the row to insert.
fn copy_table<R, F>(
    src: &Connection,
    dest: &Connection,
    table: Table,
    mut rewrite: F,
) -> Result<usize>
where
    R: Record,
    F: FnMut(R, i64) -> R,
{
    let mut ids = IdAllocator::for_table(dest, table)?;
    debug!(table = %table, offset = ids.offset(), "copying table");

    let mut stmt = src.prepare(R::SELECT_ALL)?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let record = R::from_row(row)?;
        let id = ids.next_id();
        rewrite(record, id).insert(dest)?;
    }

    Ok(ids.assigned())
}
