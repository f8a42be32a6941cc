//! courtdb: merge engine for offline training databases.
//!
//! Consolidates several schema-identical SQLite stores, each recorded by one
//! offline session, into a single combined store with remapped ids.

pub mod config;
pub mod error;
pub mod init;
pub mod manifest;
pub mod merge;
pub mod schema;
pub mod store;

#[cfg(test)]
mod fixtures;

pub use config::Config;
pub use error::{Error, Result};
pub use manifest::{parse_manifest, read_manifest};
pub use merge::{Coordinator, MergeReport};
pub use schema::{
    DebugEventRecord, EventRecord, MatchRecord, PlayerStatRecord, PointRecord, Record,
    SessionRecord, Table,
};
pub use store::{
    summarize_source, IdAllocator, IdMap, MergeStats, MinutesSummary, SourceMinutes,
    SourceOutcome, Store,
};
