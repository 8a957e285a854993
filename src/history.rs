use crate::phrases::Language;
use crate::scoring::{Mode, ScoreEntry};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub date: String,
    pub language: Language,
    pub mode: Mode,
    pub wpm: u32,
    pub accuracy: u8,
}

impl HistoryRecord {
    pub fn new(entry: &ScoreEntry, language: Language) -> Self {
        Self {
            date: entry.completed_at.to_rfc3339(),
            language,
            mode: entry.mode,
            wpm: entry.words_per_minute,
            accuracy: entry.accuracy_percent,
        }
    }
}

/// Append-only csv log of every completed phrase
#[derive(Debug, Clone)]
pub struct HistoryLog {
    path: PathBuf,
}

impl HistoryLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, record: &HistoryRecord) -> Result<(), csv::Error> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        // a fresh file needs the header row
        let needs_header = !self.path.exists();
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer.serialize(record)?;
        writer.flush()?;
        Ok(())
    }

    pub fn read_all(&self) -> Result<Vec<HistoryRecord>, csv::Error> {
        let mut reader = csv::Reader::from_path(&self.path)?;
        reader.deserialize().collect()
    }
}
