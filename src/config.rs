use crate::app_dirs::AppDirs;
use crate::phrases::{DEFAULT_ENGLISH_ENDPOINT, DEFAULT_FRENCH_ENDPOINT};
use crate::storage::DEFAULT_QUOTA_BYTES;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CHALLENGE_SECS: u32 = 60;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub challenge_secs: u32,
    pub online: bool,
    pub show_keyboard: bool,
    pub english_endpoint: String,
    pub french_endpoint: String,
    pub fetch_timeout_ms: u64,
    pub storage_quota_bytes: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            challenge_secs: DEFAULT_CHALLENGE_SECS,
            online: false,
            show_keyboard: true,
            english_endpoint: DEFAULT_ENGLISH_ENDPOINT.to_string(),
            french_endpoint: DEFAULT_FRENCH_ENDPOINT.to_string(),
            fetch_timeout_ms: 3_000,
            storage_quota_bytes: DEFAULT_QUOTA_BYTES,
        }
    }
}

impl Config {
    /// Replace values the game cannot run with by their defaults
    pub fn sanitized(mut self) -> Self {
        if self.challenge_secs == 0 {
            log::warn!("challenge_secs must be at least 1, using {DEFAULT_CHALLENGE_SECS}");
            self.challenge_secs = DEFAULT_CHALLENGE_SECS;
        }
        self
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        let path = AppDirs::config_path().unwrap_or_else(|| PathBuf::from("phrasedash_config.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        match fs::read(&self.path) {
            Ok(bytes) => match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => cfg.sanitized(),
                Err(e) => {
                    log::warn!("ignoring unreadable config {}: {}", self.path.display(), e);
                    Config::default()
                }
            },
            Err(_) => Config::default(),
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).unwrap_or_default();
        fs::write(&self.path, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_roundtrip_default_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config::default();
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn test_missing_file_yields_default() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("nope.json"));
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn test_partial_config_fills_in_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "challenge_secs": 30, "online": true }"#).unwrap();

        let loaded = FileConfigStore::with_path(&path).load();
        assert_eq!(loaded.challenge_secs, 30);
        assert!(loaded.online);
        assert!(loaded.show_keyboard);
        assert_eq!(loaded.english_endpoint, DEFAULT_ENGLISH_ENDPOINT);
    }

    #[test]
    fn test_corrupt_config_yields_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, b"{not json").unwrap();
        assert_eq!(FileConfigStore::with_path(&path).load(), Config::default());
    }

    #[test]
    fn test_zero_challenge_length_falls_back_to_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "challenge_secs": 0 }"#).unwrap();
        assert_eq!(
            FileConfigStore::with_path(&path).load().challenge_secs,
            DEFAULT_CHALLENGE_SECS
        );
    }
}
