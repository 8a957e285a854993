use chrono::{DateTime, Local};

/// What a single keystroke did to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keystroke {
    /// Input was longer than the phrase and got cut back to its length
    Truncated { completed: bool },
    Progress { mismatch_at: Option<usize> },
    Completed,
    /// A phrase is still loading, nothing to type against yet
    Ignored,
}

/// represents one attempt at typing a phrase
#[derive(Debug, Clone, PartialEq)]
pub struct TypingSession {
    target_phrase: String,
    typed_input: String,
    started_at: Option<DateTime<Local>>,
    total_keystrokes: u32,
    error_count: u32,
    loading: bool,
}

impl TypingSession {
    pub fn new(phrase: impl Into<String>, now: DateTime<Local>) -> Self {
        let mut session = Self::loading();
        session.initialize(phrase, now);
        session
    }

    /// Placeholder shown while the next phrase is being fetched
    pub fn loading() -> Self {
        Self {
            target_phrase: String::new(),
            typed_input: String::new(),
            started_at: None,
            total_keystrokes: 0,
            error_count: 0,
            loading: true,
        }
    }

    pub fn initialize(&mut self, phrase: impl Into<String>, now: DateTime<Local>) {
        self.target_phrase = phrase.into();
        self.typed_input.clear();
        self.started_at = Some(now);
        self.total_keystrokes = 0;
        self.error_count = 0;
        self.loading = false;
    }

    /// Apply the full contents of the input field after a keystroke.
    ///
    /// Errors are counted per keystroke: a call adds at most one error, for the
    /// first position that differs from the phrase, however many positions differ.
    /// Input longer than the phrase is cut down without counting a keystroke or an error.
    pub fn submit_keystroke(&mut self, new_input: &str) -> Keystroke {
        if self.loading {
            return Keystroke::Ignored;
        }

        let limit = self.target_len();
        if new_input.chars().count() > limit {
            self.typed_input = new_input.chars().take(limit).collect();
            return Keystroke::Truncated {
                completed: self.is_complete(),
            };
        }

        self.total_keystrokes += 1;
        let mismatch_at = first_mismatch(&self.target_phrase, new_input);
        if mismatch_at.is_some() {
            self.error_count += 1;
        }
        self.typed_input = new_input.to_string();

        if self.is_complete() {
            Keystroke::Completed
        } else {
            Keystroke::Progress { mismatch_at }
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.loading && self.typed_input == self.target_phrase
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn target_phrase(&self) -> &str {
        &self.target_phrase
    }

    pub fn typed_input(&self) -> &str {
        &self.typed_input
    }

    pub fn started_at(&self) -> Option<DateTime<Local>> {
        self.started_at
    }

    pub fn total_keystrokes(&self) -> u32 {
        self.total_keystrokes
    }

    pub fn error_count(&self) -> u32 {
        self.error_count
    }

    pub fn target_len(&self) -> usize {
        self.target_phrase.chars().count()
    }

    /// Number of leading typed chars that match the phrase
    pub fn correct_prefix_len(&self) -> usize {
        first_mismatch(&self.target_phrase, &self.typed_input)
            .unwrap_or_else(|| self.typed_input.chars().count())
    }

    pub fn expected_char(&self, idx: usize) -> Option<char> {
        self.target_phrase.chars().nth(idx)
    }
}

/// Index of the first typed char that differs from the target, scanning from 0
pub fn first_mismatch(target: &str, typed: &str) -> Option<usize> {
    let mut expected = target.chars();
    typed
        .chars()
        .enumerate()
        .find(|(_, c)| expected.next() != Some(*c))
        .map(|(idx, _)| idx)
}
