//! Schema initialization for training stores.
//!
//! # Tables
//!
//! - `sessions` - one row per simulator session, keyed by an opaque text id
//! - `matches` - references `sessions(id)`
//! - `points` - references `matches(id)`
//! - `player_stats` - references `matches(id)`, one row per side
//! - `events` - references `matches(id)` and, optionally, `points(id)`
//! - `debug_events` - references `matches(id)`
//!
//! Every statement is `IF NOT EXISTS`, so initializing a store that already
//! carries the schema is a no-op.

use std::fs;
use std::path::Path;

use rusqlite::Connection;

use crate::{Error, Result};

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS sessions (
    id TEXT PRIMARY KEY,
    created_at TEXT NOT NULL,
    session_type TEXT NOT NULL,
    config_json TEXT,
    display_name TEXT
);

CREATE TABLE IF NOT EXISTS matches (
    id INTEGER PRIMARY KEY,
    session_id TEXT REFERENCES sessions(id),
    display_name TEXT,
    seed INTEGER NOT NULL,
    level INTEGER NOT NULL,
    level_name TEXT NOT NULL,
    left_profile TEXT NOT NULL,
    right_profile TEXT NOT NULL,
    score_left INTEGER NOT NULL,
    score_right INTEGER NOT NULL,
    duration_secs REAL NOT NULL,
    winner TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS points (
    id INTEGER PRIMARY KEY,
    match_id INTEGER REFERENCES matches(id),
    point_index INTEGER NOT NULL,
    start_time_ms INTEGER NOT NULL,
    end_time_ms INTEGER,
    winner TEXT
);

CREATE TABLE IF NOT EXISTS player_stats (
    id INTEGER PRIMARY KEY,
    match_id INTEGER REFERENCES matches(id),
    side TEXT NOT NULL,
    goals INTEGER NOT NULL,
    shots_attempted INTEGER NOT NULL,
    shots_made INTEGER NOT NULL,
    steals_attempted INTEGER NOT NULL,
    steals_successful INTEGER NOT NULL,
    possession_time REAL NOT NULL,
    distance_traveled REAL NOT NULL,
    jumps INTEGER NOT NULL,
    nav_paths_completed INTEGER NOT NULL,
    nav_paths_failed INTEGER NOT NULL,
    avg_shot_x REAL NOT NULL DEFAULT 0.0,
    avg_shot_y REAL NOT NULL DEFAULT 0.0,
    avg_shot_quality REAL NOT NULL DEFAULT 0.0
);

CREATE TABLE IF NOT EXISTS events (
    id INTEGER PRIMARY KEY,
    match_id INTEGER REFERENCES matches(id),
    point_id INTEGER REFERENCES points(id),
    time_ms INTEGER NOT NULL,
    tick_frame INTEGER NOT NULL DEFAULT 0,
    event_type TEXT NOT NULL,
    data TEXT NOT NULL,
    created_at TEXT DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS debug_events (
    id INTEGER PRIMARY KEY,
    match_id INTEGER REFERENCES matches(id),
    time_ms INTEGER NOT NULL,
    tick_frame INTEGER NOT NULL,
    player TEXT NOT NULL,
    pos_x REAL NOT NULL,
    pos_y REAL NOT NULL,
    vel_x REAL NOT NULL,
    vel_y REAL NOT NULL,
    input_move_x REAL NOT NULL,
    input_jump INTEGER NOT NULL,
    grounded INTEGER NOT NULL,
    is_jumping INTEGER NOT NULL,
    coyote_timer REAL NOT NULL,
    jump_buffer_timer REAL NOT NULL,
    facing REAL NOT NULL,
    nav_active INTEGER NOT NULL,
    nav_path_index INTEGER NOT NULL,
    nav_action TEXT,
    level_id TEXT NOT NULL,
    human_controlled INTEGER NOT NULL,
    created_at TEXT DEFAULT CURRENT_TIMESTAMP
);

CREATE INDEX IF NOT EXISTS idx_matches_session ON matches(session_id);
CREATE INDEX IF NOT EXISTS idx_matches_profiles ON matches(left_profile, right_profile);
CREATE INDEX IF NOT EXISTS idx_matches_level ON matches(level);
CREATE INDEX IF NOT EXISTS idx_player_stats_match ON player_stats(match_id);
CREATE INDEX IF NOT EXISTS idx_events_match ON events(match_id);
CREATE INDEX IF NOT EXISTS idx_events_point ON events(point_id);
CREATE INDEX IF NOT EXISTS idx_events_type ON events(event_type);
CREATE INDEX IF NOT EXISTS idx_events_time ON events(match_id, time_ms);
CREATE INDEX IF NOT EXISTS idx_events_tick ON events(match_id, tick_frame);
CREATE INDEX IF NOT EXISTS idx_points_match ON points(match_id);
CREATE INDEX IF NOT EXISTS idx_debug_match ON debug_events(match_id);
CREATE INDEX IF NOT EXISTS idx_debug_time ON debug_events(match_id, time_ms);
CREATE INDEX IF NOT EXISTS idx_debug_tick ON debug_events(match_id, tick_frame);
"#;

/// Create the six training tables, their foreign keys, and indexes.
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

/// Get a destination path ready to be opened.
///
/// Creates the parent directory. With `fresh`, an existing file is removed.
pub fn prepare_destination(path: &Path, fresh: bool) -> Result<()> {
    if path.is_dir() {
        return Err(Error::Storage(format!(
            "destination is a directory: {}",
            path.display()
        )));
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    if fresh && path.exists() {
        fs::remove_file(path)?;
    }

    Ok(())
}
