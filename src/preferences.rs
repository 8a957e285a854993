use crate::phrases::Language;
use crate::storage::{keys, load_or_default, save_logged, KeyValueStore};
use serde::{Deserialize, Serialize};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggle(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

/// Settings and records that survive restarts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Preferences {
    pub language: Language,
    pub high_score: u32,
    pub best_challenge_score: u32,
    pub theme: Theme,
}

impl Preferences {
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let defaults = Self::default();
        Self {
            language: load_or_default(store, keys::LANGUAGE, defaults.language),
            high_score: load_or_default(store, keys::HIGH_SCORE, defaults.high_score),
            best_challenge_score: load_or_default(
                store,
                keys::BEST_CHALLENGE_SCORE,
                defaults.best_challenge_score,
            ),
            theme: load_or_default(store, keys::THEME, defaults.theme),
        }
    }

    pub fn set_language(&mut self, store: &mut dyn KeyValueStore, language: Language) {
        self.language = language;
        save_logged(store, keys::LANGUAGE, &language);
    }

    pub fn set_theme(&mut self, store: &mut dyn KeyValueStore, theme: Theme) {
        self.theme = theme;
        save_logged(store, keys::THEME, &theme);
    }

    /// Raise the high score if `wpm` beats it. Returns true when it did.
    pub fn offer_high_score(&mut self, store: &mut dyn KeyValueStore, wpm: u32) -> bool {
        if wpm <= self.high_score {
            return false;
        }
        self.high_score = wpm;
        save_logged(store, keys::HIGH_SCORE, &wpm);
        true
    }

    /// Raise the best challenge score if `score` beats it. Returns true when it did.
    pub fn offer_challenge_score(&mut self, store: &mut dyn KeyValueStore, score: u32) -> bool {
        if score <= self.best_challenge_score {
            return false;
        }
        self.best_challenge_score = score;
        save_logged(store, keys::BEST_CHALLENGE_SCORE, &score);
        true
    }

    pub fn reset_scores(&mut self, store: &mut dyn KeyValueStore) {
        self.high_score = 0;
        self.best_challenge_score = 0;
        save_logged(store, keys::HIGH_SCORE, &0u32);
        save_logged(store, keys::BEST_CHALLENGE_SCORE, &0u32);
    }
}
