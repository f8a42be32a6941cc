//! Source store builders shared by unit tests.

use std::path::PathBuf;

use rusqlite::types::Value;
use rusqlite::Connection;

use crate::init::initialize_schema;
use crate::schema::{
    DebugEventRecord, EventRecord, MatchRecord, PlayerStatRecord, PointRecord, Record,
    SessionRecord,
};

pub fn match_record(id: i64, session_id: &str) -> MatchRecord {
    MatchRecord {
        id,
        session_id: Some(session_id.to_string()),
        display_name: None,
        seed: 1000 + id,
        level: 3,
        level_name: "Islands".to_string(),
        left_profile: "Balanced".to_string(),
        right_profile: "Aggressive".to_string(),
        score_left: 5,
        score_right: 3,
        duration_secs: 60.0,
        winner: "left".to_string(),
    }
}

pub fn point(id: i64, match_id: i64) -> PointRecord {
    PointRecord {
        id,
        match_id: Some(match_id),
        point_index: 0,
        start_time_ms: 0,
        end_time_ms: Some(4_000),
        winner: Some("L".to_string()),
    }
}

pub fn event(id: i64, match_id: i64, point_id: Option<i64>) -> EventRecord {
    EventRecord {
        id,
        match_id: Some(match_id),
        point_id,
        time_ms: 100 * id,
        tick_frame: 6 * id,
        event_type: Value::from("PU".to_string()),
        data: Value::from("{\"player\":\"L\"}".to_string()),
        created_at: Some("2026-01-01 00:00:00".to_string()),
    }
}

fn player_stat(id: i64, match_id: i64, side: &str) -> PlayerStatRecord {
    PlayerStatRecord {
        id,
        match_id: Some(match_id),
        side: side.to_string(),
        goals: 2,
        shots_attempted: 6,
        shots_made: 2,
        steals_attempted: 3,
        steals_successful: 1,
        possession_time: 21.5,
        distance_traveled: 812.0,
        jumps: 14,
        nav_paths_completed: 9,
        nav_paths_failed: 1,
        avg_shot_x: 0.0,
        avg_shot_y: 0.0,
        avg_shot_quality: 0.4,
    }
}

fn debug_event(id: i64, match_id: i64) -> DebugEventRecord {
    DebugEventRecord {
        id,
        match_id: Some(match_id),
        time_ms: 16 * id,
        tick_frame: id,
        player: "L".to_string(),
        pos_x: 10.0,
        pos_y: 2.0,
        vel_x: 1.5,
        vel_y: 0.0,
        input_move_x: 1.0,
        input_jump: false,
        grounded: true,
        is_jumping: false,
        coyote_timer: 0.0,
        jump_buffer_timer: 0.0,
        facing: 1.0,
        nav_active: true,
        nav_path_index: 2,
        nav_action: Some("walk".to_string()),
        level_id: "islands".to_string(),
        human_controlled: false,
        created_at: None,
    }
}

/// Builds an on-disk source store with the training schema.
pub struct SourceBuilder {
    path: PathBuf,
    sessions: Vec<SessionRecord>,
    matches: Vec<MatchRecord>,
    points: Vec<PointRecord>,
    player_stats: Vec<PlayerStatRecord>,
    events: Vec<EventRecord>,
    debug_events: Vec<DebugEventRecord>,
}

impl SourceBuilder {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            sessions: Vec::new(),
            matches: Vec::new(),
            points: Vec::new(),
            player_stats: Vec::new(),
            events: Vec::new(),
            debug_events: Vec::new(),
        }
    }

    pub fn session(mut self, id: &str) -> Self {
        self.sessions
            .push(SessionRecord::new(id, "2026-01-01T00:00:00Z", "training"));
        self
    }

    /// Add `count` matches with ids continuing from the last one.
    pub fn matches(mut self, count: i64, session_id: &str) -> Self {
        let start = self.matches.len() as i64 + 1;
        for id in start..start + count {
            self.matches.push(match_record(id, session_id));
        }
        self
    }

    pub fn with_match(mut self, record: MatchRecord) -> Self {
        self.matches.push(record);
        self
    }

    pub fn with_point(mut self, record: PointRecord) -> Self {
        self.points.push(record);
        self
    }

    pub fn with_event(mut self, record: EventRecord) -> Self {
        self.events.push(record);
        self
    }

    /// Add one stats row per side for a match.
    pub fn player_stats_for(mut self, match_id: i64) -> Self {
        for side in ["L", "R"] {
            let id = self.player_stats.len() as i64 + 1;
            self.player_stats.push(player_stat(id, match_id, side));
        }
        self
    }

    pub fn debug_events_for(mut self, match_id: i64, count: i64) -> Self {
        for _ in 0..count {
            let id = self.debug_events.len() as i64 + 1;
            self.debug_events.push(debug_event(id, match_id));
        }
        self
    }

    /// Write the store and return its path.
    pub fn build(self) -> PathBuf {
        let conn = Connection::open(&self.path).unwrap();
        conn.pragma_update(None, "foreign_keys", false).unwrap();
        initialize_schema(&conn).unwrap();
        for r in &self.sessions {
            r.insert(&conn).unwrap();
        }
        for r in &self.matches {
            r.insert(&conn).unwrap();
        }
        for r in &self.points {
            r.insert(&conn).unwrap();
        }
        for r in &self.player_stats {
            r.insert(&conn).unwrap();
        }
        for r in &self.events {
            r.insert(&conn).unwrap();
        }
        for r in &self.debug_events {
            r.insert(&conn).unwrap();
        }
        self.path
    }
}
