use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Keys of the values the game persists between runs
pub mod keys {
    pub const LANGUAGE: &str = "language";
    pub const HIGH_SCORE: &str = "highScore";
    pub const BEST_CHALLENGE_SCORE: &str = "bestChallengeScore";
    pub const LEADERBOARD: &str = "leaderboard";
    pub const THEME: &str = "theme";
}

/// Roughly what a browser grants a single origin
pub const DEFAULT_QUOTA_BYTES: u64 = 5 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage quota exceeded writing {key}: {needed} bytes needed, quota is {quota}")]
    QuotaExceeded {
        key: String,
        needed: u64,
        quota: u64,
    },
    #[error("storage i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not encode value: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Synchronous string-keyed store holding JSON text
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, text: &str) -> Result<(), StorageError>;
}

/// Read `key` and decode it, falling back to `default` on a missing or corrupt value.
pub fn load_or_default<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str, default: T) -> T {
    let Some(text) = store.get(key) else {
        log::debug!("no stored value for {key}, using default");
        return default;
    };
    match serde_json::from_str(&text) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("stored value for {key} is corrupt ({e}), using default");
            default
        }
    }
}

/// Encode and write `value`; failures are logged and reported as `false`.
pub fn save_logged<T: Serialize + ?Sized>(store: &mut dyn KeyValueStore, key: &str, value: &T) -> bool {
    let result = serde_json::to_string(value)
        .map_err(StorageError::from)
        .and_then(|text| store.set(key, &text));
    match result {
        Ok(()) => true,
        Err(e) => {
            log::warn!("failed to persist {key}: {e}");
            false
        }
    }
}

/// One `<key>.json` file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    quota_bytes: u64,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self::with_quota(dir, DEFAULT_QUOTA_BYTES)
    }

    pub fn with_quota<P: AsRef<Path>>(dir: P, quota_bytes: u64) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            quota_bytes,
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn used_bytes_excluding(&self, key: &str) -> u64 {
        let skip = self.path_for(key);
        let Ok(entries) = fs::read_dir(&self.dir) else {
            return 0;
        };
        entries
            .filter_map(Result::ok)
            .filter(|e| e.path() != skip && e.path().extension().is_some_and(|x| x == "json"))
            .filter_map(|e| e.metadata().ok())
            .map(|m| m.len())
            .sum()
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(text) => Some(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                log::warn!("reading {key} failed: {e}");
                None
            }
        }
    }

    fn set(&mut self, key: &str, text: &str) -> Result<(), StorageError> {
        let needed = self.used_bytes_excluding(key) + text.len() as u64;
        if needed > self.quota_bytes {
            return Err(StorageError::QuotaExceeded {
                key: key.to_string(),
                needed,
                quota: self.quota_bytes,
            });
        }
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), text)?;
        Ok(())
    }
}

/// In-process store, used when no state directory can be resolved
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
    quota_bytes: Option<u64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota_bytes: u64) -> Self {
        Self {
            values: HashMap::new(),
            quota_bytes: Some(quota_bytes),
        }
    }

    /// Write raw text, bypassing encoding and quota (used to seed corrupt data).
    pub fn insert_raw(&mut self, key: &str, text: &str) {
        self.values.insert(key.to_string(), text.to_string());
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, text: &str) -> Result<(), StorageError> {
        if let Some(quota) = self.quota_bytes {
            let used: u64 = self
                .values
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(_, v)| v.len() as u64)
                .sum();
            let needed = used + text.len() as u64;
            if needed > quota {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    quota,
                });
            }
        }
        self.values.insert(key.to_string(), text.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::tempdir;

    #[test]
    fn test_corrupt_value_yields_default() {
        let mut store = MemoryStore::new();
        store.insert_raw(keys::HIGH_SCORE, "{{ definitely not json");

        let score: u32 = load_or_default(&store, keys::HIGH_SCORE, 7);
        assert_eq!(score, 7);
    }

    #[test]
    fn test_missing_value_yields_default() {
        let store = MemoryStore::new();
        let langs: Vec<String> = load_or_default(&store, keys::LANGUAGE, vec!["x".into()]);
        assert_eq!(langs, vec!["x".to_string()]);
    }

    #[test]
    fn test_wrong_shape_yields_default() {
        let mut store = MemoryStore::new();
        store.insert_raw(keys::HIGH_SCORE, r#""forty""#);
        assert_eq!(load_or_default::<u32>(&store, keys::HIGH_SCORE, 0), 0);
    }

    #[test]
    fn test_saved_value_loads_back() {
        let mut store = MemoryStore::new();
        assert!(save_logged(&mut store, keys::HIGH_SCORE, &88u32));
        assert_eq!(store.get(keys::HIGH_SCORE).as_deref(), Some("88"));
        assert_eq!(load_or_default::<u32>(&store, keys::HIGH_SCORE, 0), 88);
    }

    #[test]
    fn test_memory_quota_is_enforced() {
        let mut store = MemoryStore::with_quota(8);
        assert!(store.set("a", "1234").is_ok());
        assert_matches!(
            store.set("b", "123456"),
            Err(StorageError::QuotaExceeded { needed: 10, quota: 8, .. })
        );
        // overwriting a key does not count its old value
        assert!(store.set("a", "12345678").is_ok());
        assert!(!save_logged(&mut store, "b", &1u8));
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("state"));

        assert_eq!(store.get(keys::THEME), None);
        store.set(keys::THEME, r#""light""#).unwrap();
        assert_eq!(store.get(keys::THEME).as_deref(), Some(r#""light""#));
        assert!(dir.path().join("state").join("theme.json").exists());
    }

    #[test]
    fn test_file_store_quota_exceeded() {
        let dir = tempdir().unwrap();
        let mut store = FileStore::with_quota(dir.path(), 10);

        store.set("one", "12345").unwrap();
        let err = store.set("two", "1234567").unwrap_err();
        assert_matches!(err, StorageError::QuotaExceeded { .. });
        assert_eq!(store.get("two"), None);
    }

    #[test]
    fn test_file_store_corrupt_file_falls_back() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("leaderboard.json"), "[{\"broken\"").unwrap();
        let store = FileStore::new(dir.path());

        let board: Vec<u32> = load_or_default(&store, keys::LEADERBOARD, Vec::new());
        assert!(board.is_empty());
    }
}
