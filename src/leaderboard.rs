use crate::scoring::ScoreEntry;
use serde::{Deserialize, Serialize};

pub const LEADERBOARD_CAPACITY: usize = 10;

/// Best results, fastest first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Leaderboard {
    entries: Vec<ScoreEntry>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a result, keeping the board sorted and bounded. Equal wpm keeps arrival order.
    pub fn record(&mut self, entry: ScoreEntry) {
        self.entries.push(entry);
        self.normalize();
    }

    /// Re-establish ordering and capacity, e.g. after loading hand-edited data.
    pub fn normalize(&mut self) {
        self.entries
            .sort_by(|a, b| b.words_per_minute.cmp(&a.words_per_minute));
        self.entries.truncate(LEADERBOARD_CAPACITY);
    }

    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn best(&self) -> Option<&ScoreEntry> {
        self.entries.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
