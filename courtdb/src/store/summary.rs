//! Match count and play time across source stores.

use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags};
use serde::Serialize;

use crate::Result;

/// Matches and summed duration for one source store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceMinutes {
    pub path: PathBuf,
    /// `None` when the store does not exist.
    pub matches: Option<i64>,
    pub duration_secs: Option<f64>,
}

impl SourceMinutes {
    pub fn is_missing(&self) -> bool {
        self.matches.is_none()
    }
}

/// Totals over a list of source stores. Missing stores are listed but not
/// counted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MinutesSummary {
    pub sources: Vec<SourceMinutes>,
    pub total_matches: i64,
    pub total_secs: f64,
}

impl MinutesSummary {
    /// Summarize each path in order.
    pub fn collect<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let mut summary = Self::default();
        for path in paths {
            let source = summarize_source(path.as_ref())?;
            summary.total_matches += source.matches.unwrap_or(0);
            summary.total_secs += source.duration_secs.unwrap_or(0.0);
            summary.sources.push(source);
        }
        Ok(summary)
    }

    pub fn total_minutes(&self) -> f64 {
        self.total_secs / 60.0
    }
}

/// Count matches and sum `duration_secs` in one source store.
pub fn summarize_source(path: &Path) -> Result<SourceMinutes> {
    if !path.exists() {
        return Ok(SourceMinutes {
            path: path.to_path_buf(),
            matches: None,
            duration_secs: None,
        });
    }

    let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
    let (matches, duration_secs): (i64, f64) = conn.query_row(
        "SELECT COUNT(*), COALESCE(SUM(duration_secs), 0.0) FROM matches",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;

    Ok(SourceMinutes {
        path: path.to_path_buf(),
        matches: Some(matches),
        duration_secs: Some(duration_secs),
    })
}
