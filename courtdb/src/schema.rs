//! Row types for the six training tables.
//!
//! Each record maps one row of a source or destination store. Ids are plain
//! `i64` row ids local to the store they were read from; the merger rewrites
//! them before inserting into the destination.

use std::fmt;

use rusqlite::types::Value;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

/// Tables with integer primary keys assigned by the merger.
///
/// `sessions` is keyed by an opaque string id and is never offset, so it has
/// no variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Matches,
    Points,
    PlayerStats,
    Events,
    DebugEvents,
}

impl Table {
    /// All id-assigned tables, in dependency (copy) order.
    pub const ALL: [Table; 5] = [
        Table::Matches,
        Table::Points,
        Table::PlayerStats,
        Table::Events,
        Table::DebugEvents,
    ];

    /// SQL table name.
    pub fn name(self) -> &'static str {
        match self {
            Table::Matches => "matches",
            Table::Points => "points",
            Table::PlayerStats => "player_stats",
            Table::Events => "events",
            Table::DebugEvents => "debug_events",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A row type that can be read from and written to a training store.
pub trait Record: Sized {
    /// Query selecting every row, columns in `from_row` order.
    const SELECT_ALL: &'static str;

    /// Build a record from a row produced by `SELECT_ALL`.
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;

    /// Insert this record. Returns the number of rows written.
    fn insert(&self, conn: &Connection) -> rusqlite::Result<usize>;
}

/// Read every row of a record's table.
pub fn select_all<R: Record>(conn: &Connection) -> rusqlite::Result<Vec<R>> {
    let mut stmt = conn.prepare(R::SELECT_ALL)?;
    let rows = stmt.query_map([], |row| R::from_row(row))?;
    rows.collect()
}

/// A training session (one run of the simulator).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Opaque session id (UUID text in practice).
    pub id: String,

    /// When the session was created (RFC 3339 text).
    pub created_at: String,

    /// Kind of session, e.g. "training" or "tournament".
    pub session_type: String,

    /// Serialized session settings.
    pub config_json: Option<String>,

    /// Human-readable label.
    pub display_name: Option<String>,
}

impl SessionRecord {
    /// Create a session with no config or display name.
    pub fn new(
        id: impl Into<String>,
        created_at: impl Into<String>,
        session_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            created_at: created_at.into(),
            session_type: session_type.into(),
            config_json: None,
            display_name: None,
        }
    }
}

impl Record for SessionRecord {
    const SELECT_ALL: &'static str =
        "SELECT id, created_at, session_type, config_json, display_name FROM sessions";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            created_at: row.get(1)?,
            session_type: row.get(2)?,
            config_json: row.get(3)?,
            display_name: row.get(4)?,
        })
    }

    /// Insert-if-absent keyed on the session id. Returns 0 when the session
    /// was already present.
    fn insert(&self, conn: &Connection) -> rusqlite::Result<usize> {
        conn.prepare_cached(
            "INSERT OR IGNORE INTO sessions (id, created_at, session_type, config_json, display_name) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?
        .execute(params![
            self.id,
            self.created_at,
            self.session_type,
            self.config_json,
            self.display_name,
        ])
    }
}

/// A single match between two AI profiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: i64,

    /// Owning session. Nullable in the schema.
    pub session_id: Option<String>,

    pub display_name: Option<String>,

    /// RNG seed the match was played with.
    pub seed: i64,

    /// Level number and its name at the time of the match.
    pub level: i64,
    pub level_name: String,

    /// AI profile on each side.
    pub left_profile: String,
    pub right_profile: String,

    pub score_left: i64,
    pub score_right: i64,

    /// Wall-clock match length in seconds.
    pub duration_secs: f64,

    /// "left", "right" or "tie".
    pub winner: String,
}

impl Record for MatchRecord {
    const SELECT_ALL: &'static str = "SELECT id, session_id, display_name, seed, level, level_name, \
         left_profile, right_profile, score_left, score_right, duration_secs, winner FROM matches";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            session_id: row.get(1)?,
            display_name: row.get(2)?,
            seed: row.get(3)?,
            level: row.get(4)?,
            level_name: row.get(5)?,
            left_profile: row.get(6)?,
            right_profile: row.get(7)?,
            score_left: row.get(8)?,
            score_right: row.get(9)?,
            duration_secs: row.get(10)?,
            winner: row.get(11)?,
        })
    }

    fn insert(&self, conn: &Connection) -> rusqlite::Result<usize> {
        conn.prepare_cached(
            "INSERT INTO matches (id, session_id, display_name, seed, level, level_name, \
             left_profile, right_profile, score_left, score_right, duration_secs, winner) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        )?
        .execute(params![
            self.id,
            self.session_id,
            self.display_name,
            self.seed,
            self.level,
            self.level_name,
            self.left_profile,
            self.right_profile,
            self.score_left,
            self.score_right,
            self.duration_secs,
            self.winner,
        ])
    }
}

/// One point (rally) within a match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointRecord {
    pub id: i64,
    pub match_id: Option<i64>,
    pub point_index: i64,
    pub start_time_ms: i64,
    /// Unset if the match ended mid-point.
    pub end_time_ms: Option<i64>,
    pub winner: Option<String>,
}

impl Record for PointRecord {
    const SELECT_ALL: &'static str =
        "SELECT id, match_id, point_index, start_time_ms, end_time_ms, winner FROM points";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            match_id: row.get(1)?,
            point_index: row.get(2)?,
            start_time_ms: row.get(3)?,
            end_time_ms: row.get(4)?,
            winner: row.get(5)?,
        })
    }

    fn insert(&self, conn: &Connection) -> rusqlite::Result<usize> {
        conn.prepare_cached(
            "INSERT INTO points (id, match_id, point_index, start_time_ms, end_time_ms, winner) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )?
        .execute(params![
            self.id,
            self.match_id,
            self.point_index,
            self.start_time_ms,
            self.end_time_ms,
            self.winner,
        ])
    }
}

/// Per-side counters for a match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStatRecord {
    pub id: i64,
    pub match_id: Option<i64>,
    /// "L" or "R".
    pub side: String,
    pub goals: i64,
    pub shots_attempted: i64,
    pub shots_made: i64,
    pub steals_attempted: i64,
    pub steals_successful: i64,
    pub possession_time: f64,
    pub distance_traveled: f64,
    pub jumps: i64,
    pub nav_paths_completed: i64,
    pub nav_paths_failed: i64,
    pub avg_shot_x: f64,
    pub avg_shot_y: f64,
    pub avg_shot_quality: f64,
}

impl Record for PlayerStatRecord {
    const SELECT_ALL: &'static str = "SELECT id, match_id, side, goals, shots_attempted, shots_made, \
         steals_attempted, steals_successful, possession_time, distance_traveled, jumps, \
         nav_paths_completed, nav_paths_failed, avg_shot_x, avg_shot_y, avg_shot_quality \
         FROM player_stats";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            match_id: row.get(1)?,
            side: row.get(2)?,
            goals: row.get(3)?,
            shots_attempted: row.get(4)?,
            shots_made: row.get(5)?,
            steals_attempted: row.get(6)?,
            steals_successful: row.get(7)?,
            possession_time: row.get(8)?,
            distance_traveled: row.get(9)?,
            jumps: row.get(10)?,
            nav_paths_completed: row.get(11)?,
            nav_paths_failed: row.get(12)?,
            avg_shot_x: row.get(13)?,
            avg_shot_y: row.get(14)?,
            avg_shot_quality: row.get(15)?,
        })
    }

    fn insert(&self, conn: &Connection) -> rusqlite::Result<usize> {
        conn.prepare_cached(
            "INSERT INTO player_stats (id, match_id, side, goals, shots_attempted, shots_made, \
             steals_attempted, steals_successful, possession_time, distance_traveled, jumps, \
             nav_paths_completed, nav_paths_failed, avg_shot_x, avg_shot_y, avg_shot_quality) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
        )?
        .execute(params![
            self.id,
            self.match_id,
            self.side,
            self.goals,
            self.shots_attempted,
            self.shots_made,
            self.steals_attempted,
            self.steals_successful,
            self.possession_time,
            self.distance_traveled,
            self.jumps,
            self.nav_paths_completed,
            self.nav_paths_failed,
            self.avg_shot_x,
            self.avg_shot_y,
            self.avg_shot_quality,
        ])
    }
}

/// A timestamped game event.
///
/// `event_type` and `data` are opaque to the merger and are carried as raw
/// SQLite values, so a BLOB payload copies through unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    pub id: i64,
    pub match_id: Option<i64>,
    /// Point the event happened in, if any.
    pub point_id: Option<i64>,
    pub time_ms: i64,
    pub tick_frame: i64,
    pub event_type: Value,
    pub data: Value,
    pub created_at: Option<String>,
}

impl Record for EventRecord {
    const SELECT_ALL: &'static str = "SELECT id, match_id, point_id, time_ms, tick_frame, event_type, \
         data, created_at FROM events";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            match_id: row.get(1)?,
            point_id: row.get(2)?,
            time_ms: row.get(3)?,
            tick_frame: row.get(4)?,
            event_type: row.get(5)?,
            data: row.get(6)?,
            created_at: row.get(7)?,
        })
    }

    fn insert(&self, conn: &Connection) -> rusqlite::Result<usize> {
        conn.prepare_cached(
            "INSERT INTO events (id, match_id, point_id, time_ms, tick_frame, event_type, data, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )?
        .execute(params![
            self.id,
            self.match_id,
            self.point_id,
            self.time_ms,
            self.tick_frame,
            self.event_type,
            self.data,
            self.created_at,
        ])
    }
}

/// A per-tick movement/input sample for one player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebugEventRecord {
    pub id: i64,
    pub match_id: Option<i64>,
    pub time_ms: i64,
    pub tick_frame: i64,
    /// "L" or "R".
    pub player: String,
    pub pos_x: f64,
    pub pos_y: f64,
    pub vel_x: f64,
    pub vel_y: f64,
    pub input_move_x: f64,
    pub input_jump: bool,
    pub grounded: bool,
    pub is_jumping: bool,
    pub coyote_timer: f64,
    pub jump_buffer_timer: f64,
    pub facing: f64,
    pub nav_active: bool,
    pub nav_path_index: i64,
    pub nav_action: Option<String>,
    pub level_id: String,
    pub human_controlled: bool,
    pub created_at: Option<String>,
}

impl Record for DebugEventRecord {
    const SELECT_ALL: &'static str = "SELECT id, match_id, time_ms, tick_frame, player, pos_x, pos_y, \
         vel_x, vel_y, input_move_x, input_jump, grounded, is_jumping, coyote_timer, \
         jump_buffer_timer, facing, nav_active, nav_path_index, nav_action, level_id, \
         human_controlled, created_at FROM debug_events";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            match_id: row.get(1)?,
            time_ms: row.get(2)?,
            tick_frame: row.get(3)?,
            player: row.get(4)?,
            pos_x: row.get(5)?,
            pos_y: row.get(6)?,
            vel_x: row.get(7)?,
            vel_y: row.get(8)?,
            input_move_x: row.get(9)?,
            input_jump: row.get(10)?,
            grounded: row.get(11)?,
            is_jumping: row.get(12)?,
            coyote_timer: row.get(13)?,
            jump_buffer_timer: row.get(14)?,
            facing: row.get(15)?,
            nav_active: row.get(16)?,
            nav_path_index: row.get(17)?,
            nav_action: row.get(18)?,
            level_id: row.get(19)?,
            human_controlled: row.get(20)?,
            created_at: row.get(21)?,
        })
    }

    fn insert(&self, conn: &Connection) -> rusqlite::Result<usize> {
        conn.prepare_cached(
            "INSERT INTO debug_events (id, match_id, time_ms, tick_frame, player, pos_x, pos_y, \
             vel_x, vel_y, input_move_x, input_jump, grounded, is_jumping, coyote_timer, \
             jump_buffer_timer, facing, nav_active, nav_path_index, nav_action, level_id, \
             human_controlled, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, \
             ?17, ?18, ?19, ?20, ?21, ?22)",
        )?
        .execute(params![
            self.id,
            self.match_id,
            self.time_ms,
            self.tick_frame,
            self.player,
            self.pos_x,
            self.pos_y,
            self.vel_x,
            self.vel_y,
            self.input_move_x,
            self.input_jump,
            self.grounded,
            self.is_jumping,
            self.coyote_timer,
            self.jump_buffer_timer,
            self.facing,
            self.nav_active,
            self.nav_path_index,
            self.nav_action,
            self.level_id,
            self.human_controlled,
            self.created_at,
        ])
    }
}
