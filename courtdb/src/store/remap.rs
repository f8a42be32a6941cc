//! Old-id to new-id mapping for one source pass.

use std::collections::HashMap;

/// Maps source-local row ids to the ids assigned in the destination.
///
/// One map per referenced table (`matches`, `points`), built while that table
/// is copied and dropped when the source pass ends. Unknown ids resolve to
/// `None` so a dangling reference becomes NULL instead of failing the row.
#[derive(Debug, Default)]
pub struct IdMap {
    ids: HashMap<i64, i64>,
}

impl IdMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that source id `old` was written as `new`.
    pub fn insert(&mut self, old: i64, new: i64) {
        self.ids.insert(old, new);
    }

    /// Rewrite a nullable foreign key. NULL stays NULL.
    pub fn resolve(&self, old: Option<i64>) -> Option<i64> {
        old.and_then(|id| self.ids.get(&id).copied())
    }
}
