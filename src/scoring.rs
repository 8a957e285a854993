use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Elapsed time is never taken to be shorter than this when computing wpm
pub const MIN_ELAPSED_MS: i64 = 1_000;
/// Upper bound on any reported wpm
pub const MAX_WPM: u32 = 999;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Mode {
    Normal,
    Challenge,
}

/// Result of one completed phrase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreEntry {
    pub words_per_minute: u32,
    pub accuracy_percent: u8,
    pub completed_at: DateTime<Local>,
    pub mode: Mode,
}

/// Live figures shown while typing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stats {
    pub wpm: u32,
    pub accuracy: u8,
    pub elapsed_secs: u64,
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

pub fn words_per_minute(
    typed: &str,
    started_at: Option<DateTime<Local>>,
    now: DateTime<Local>,
) -> u32 {
    let Some(started_at) = started_at else {
        return 0;
    };
    let elapsed_ms = (now - started_at).num_milliseconds().max(MIN_ELAPSED_MS);
    let minutes = elapsed_ms as f64 / 60_000.0;
    let wpm = (word_count(typed) as f64 / minutes).round();

    (wpm as u32).min(MAX_WPM)
}

pub fn accuracy_percent(total_keystrokes: u32, error_count: u32) -> u8 {
    if total_keystrokes == 0 {
        return 100;
    }
    let correct = total_keystrokes.saturating_sub(error_count);
    ((100.0 * correct as f64) / total_keystrokes as f64).round() as u8
}

pub fn elapsed_seconds(started_at: Option<DateTime<Local>>, now: DateTime<Local>) -> u64 {
    started_at
        .map(|start| (now - start).num_milliseconds().max(0) as u64 / 1000)
        .unwrap_or(0)
}

/// Average wpm over a set of results
pub fn mean_wpm(entries: &[ScoreEntry]) -> Option<f64> {
    if entries.is_empty() {
        return None;
    }
    let sum: u64 = entries.iter().map(|e| e.words_per_minute as u64).sum();
    Some(sum as f64 / entries.len() as f64)
}
