pub mod normalize;
pub mod remote;

use include_dir::{include_dir, Dir};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

pub use remote::{PhraseDelivery, RemotePhrases};

pub const DEFAULT_ENGLISH_ENDPOINT: &str = "https://api.quotable.io/random";
pub const DEFAULT_FRENCH_ENDPOINT: &str = "https://kaamelott.chaudie.re/api/random";

static PHRASE_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/phrases/data");

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    French,
}

impl Language {
    pub fn toggle(self) -> Self {
        match self {
            Language::English => Language::French,
            Language::French => Language::English,
        }
    }

    fn file_name(self) -> String {
        format!("{self}.json")
    }
}

#[derive(Debug, Error)]
pub enum PhraseError {
    #[error("phrase request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("phrase response was not understood: {0}")]
    Malformed(String),
    #[error("phrase response held no text")]
    Empty,
}

/// Identifies one phrase request; answers to older tickets are dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Ticket(pub u64);

impl Ticket {
    pub fn next(self) -> Self {
        Ticket(self.0 + 1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhraseRequest {
    Ready(String),
    /// Answer arrives later as a [`PhraseDelivery`]
    Pending,
}

/// Supplies the next phrase to type
pub trait PhraseSource {
    fn request(&mut self, language: Language, ticket: Ticket) -> PhraseRequest;
}

#[derive(Deserialize, Clone, Debug)]
struct PhraseFile {
    #[allow(dead_code)]
    name: String,
    phrases: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pick {
    Random,
    /// Walk the list in order, wrapping around
    Sequential,
}

/// The two fixed phrase lists bundled with the binary
#[derive(Debug, Clone)]
pub struct LocalPhrases {
    lists: HashMap<Language, Vec<String>>,
    pick: Pick,
    cursor: HashMap<Language, usize>,
    last: Option<String>,
}

impl LocalPhrases {
    pub fn new(pick: Pick) -> Self {
        let lists = [Language::English, Language::French]
            .into_iter()
            .map(|lang| (lang, read_phrase_file(lang)))
            .collect();
        Self::with_lists(lists, pick)
    }

    pub fn from_lists(english: Vec<String>, french: Vec<String>, pick: Pick) -> Self {
        let lists = HashMap::from([(Language::English, english), (Language::French, french)]);
        Self::with_lists(lists, pick)
    }

    fn with_lists(mut lists: HashMap<Language, Vec<String>>, pick: Pick) -> Self {
        for (lang, list) in lists.iter_mut() {
            list.retain(|p| !p.trim().is_empty());
            if list.is_empty() {
                log::warn!("no {lang} phrases available, using a stand-in");
                list.push(stand_in(*lang).to_string());
            }
        }
        Self {
            lists,
            pick,
            cursor: HashMap::new(),
            last: None,
        }
    }

    pub fn phrases(&self, language: Language) -> &[String] {
        self.lists.get(&language).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Deterministic choice used as the fallback for failed remote requests
    pub fn by_index(&self, language: Language, index: usize) -> String {
        let list = self.phrases(language);
        if list.is_empty() {
            return stand_in(language).to_string();
        }
        list[index % list.len()].clone()
    }

    pub fn next_phrase(&mut self, language: Language) -> String {
        let phrase = match self.pick {
            Pick::Sequential => {
                let idx = self.cursor.entry(language).or_insert(0);
                let current = *idx;
                *idx += 1;
                self.by_index(language, current)
            }
            Pick::Random => {
                let list = self.phrases(language);
                let mut rng = rand::thread_rng();
                // avoid serving the same phrase twice in a row
                let candidates: Vec<&String> = list
                    .iter()
                    .filter(|p| list.len() == 1 || Some(*p) != self.last.as_ref())
                    .collect();
                candidates
                    .choose(&mut rng)
                    .map(|p| (*p).clone())
                    .unwrap_or_else(|| stand_in(language).to_string())
            }
        };
        self.last = Some(phrase.clone());
        phrase
    }
}

impl Default for LocalPhrases {
    fn default() -> Self {
        Self::new(Pick::Random)
    }
}

impl PhraseSource for LocalPhrases {
    fn request(&mut self, language: Language, _ticket: Ticket) -> PhraseRequest {
        PhraseRequest::Ready(self.next_phrase(language))
    }
}

fn stand_in(language: Language) -> &'static str {
    match language {
        Language::English => "The quick brown fox jumps over the lazy dog.",
        Language::French => "Portez ce vieux whisky au juge blond qui fume.",
    }
}

fn read_phrase_file(language: Language) -> Vec<String> {
    let Some(file) = PHRASE_DIR.get_file(language.file_name()) else {
        log::warn!("bundled phrase file for {language} is missing");
        return Vec::new();
    };
    let parsed = file
        .contents_utf8()
        .ok_or_else(|| PhraseError::Malformed("not utf-8".into()))
        .and_then(|text| {
            serde_json::from_str::<PhraseFile>(text).map_err(|e| PhraseError::Malformed(e.to_string()))
        });
    match parsed {
        Ok(file) => file.phrases,
        Err(e) => {
            log::warn!("bundled phrase file for {language} unreadable: {e}");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_lists_load() {
        let local = LocalPhrases::new(Pick::Random);
        assert!(local.phrases(Language::English).len() >= 10);
        assert!(local.phrases(Language::French).len() >= 10);
        assert_ne!(
            local.phrases(Language::English)[0],
            local.phrases(Language::French)[0]
        );
    }

    #[test]
    fn test_language_toggle_and_names() {
        assert_eq!(Language::English.toggle(), Language::French);
        assert_eq!(Language::French.toggle(), Language::English);
        assert_eq!(Language::French.to_string(), "french");
        assert_eq!(serde_json::to_string(&Language::English).unwrap(), r#""english""#);
    }

    #[test]
    fn test_sequential_pick_wraps() {
        let mut local = LocalPhrases::from_lists(
            vec!["one".into(), "two".into()],
            vec!["un".into()],
            Pick::Sequential,
        );
        assert_eq!(local.next_phrase(Language::English), "one");
        assert_eq!(local.next_phrase(Language::English), "two");
        assert_eq!(local.next_phrase(Language::English), "one");
        assert_eq!(local.next_phrase(Language::French), "un");
    }

    #[test]
    fn test_random_pick_avoids_immediate_repeat() {
        let mut local = LocalPhrases::from_lists(
            vec!["alpha".into(), "beta".into()],
            vec!["un".into()],
            Pick::Random,
        );
        let mut prev = local.next_phrase(Language::English);
        for _ in 0..20 {
            let next = local.next_phrase(Language::English);
            assert_ne!(next, prev);
            prev = next;
        }
        // a single-entry list may repeat
        assert_eq!(local.next_phrase(Language::French), "un");
        assert_eq!(local.next_phrase(Language::French), "un");
    }

    #[test]
    fn test_empty_list_gets_stand_in() {
        let mut local = LocalPhrases::from_lists(vec![], vec!["  ".into()], Pick::Random);
        assert!(!local.next_phrase(Language::English).is_empty());
        assert!(!local.next_phrase(Language::French).trim().is_empty());
    }

    #[test]
    fn test_by_index_is_deterministic() {
        let local = LocalPhrases::from_lists(
            vec!["a".into(), "b".into(), "c".into()],
            vec!["x".into()],
            Pick::Random,
        );
        assert_eq!(local.by_index(Language::English, 4), "b");
        assert_eq!(local.by_index(Language::English, 4), "b");
    }

    #[test]
    fn test_local_requests_are_ready() {
        let mut local = LocalPhrases::from_lists(vec!["a".into()], vec!["b".into()], Pick::Random);
        assert_eq!(
            local.request(Language::French, Ticket(1)),
            PhraseRequest::Ready("b".into())
        );
    }
}
