use crate::challenge::{ChallengeState, ChallengeTimer, TimerTick};
use crate::clock::Moment;
use crate::guard::{Edit, InputGuard, KeyHighlight, Rejection, ShakeSignal, Verdict};
use crate::history::{HistoryLog, HistoryRecord};
use crate::leaderboard::Leaderboard;
use crate::phrases::{Language, PhraseDelivery, PhraseRequest, PhraseSource, Ticket};
use crate::preferences::{Preferences, Theme};
use crate::scoring::{self, Mode, ScoreEntry, Stats};
use crate::session::{Keystroke, TypingSession};
use crate::storage::{keys, load_or_default, save_logged, KeyValueStore};
use crossterm::event::{Event, KeyCode};

#[derive(Debug, Clone)]
pub struct GameOptions {
    pub challenge_secs: u32,
    pub history: Option<HistoryLog>,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            challenge_secs: crate::config::DEFAULT_CHALLENGE_SECS,
            history: None,
        }
    }
}

/// What happened to one piece of input
#[derive(Debug, Clone, PartialEq)]
pub enum InputOutcome {
    Accepted,
    /// Input ran past the end of the phrase and was cut back
    Truncated,
    Rejected(Rejection),
    Completed(Completion),
    /// Nothing to type into: loading, or the challenge has run out
    Ignored,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub entry: ScoreEntry,
    pub new_high_score: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChallengeSummary {
    pub score: u32,
    pub new_best: bool,
}

/// One running game: the live session plus everything scored and persisted around it
pub struct Game {
    session: TypingSession,
    challenge: ChallengeTimer,
    challenge_score: u32,
    last_challenge: Option<ChallengeSummary>,
    leaderboard: Leaderboard,
    preferences: Preferences,
    store: Box<dyn KeyValueStore>,
    source: Box<dyn PhraseSource>,
    options: GameOptions,
    ticket: Ticket,
    guard: InputGuard,
    shake: ShakeSignal,
    highlight: KeyHighlight,
    last_result: Option<ScoreEntry>,
}

impl Game {
    pub fn new(
        store: Box<dyn KeyValueStore>,
        source: Box<dyn PhraseSource>,
        options: GameOptions,
        now: Moment,
    ) -> Self {
        let preferences = Preferences::load(store.as_ref());
        let mut leaderboard: Leaderboard =
            load_or_default(store.as_ref(), keys::LEADERBOARD, Leaderboard::new());
        leaderboard.normalize();

        let mut game = Self {
            session: TypingSession::loading(),
            challenge: ChallengeTimer::new(),
            challenge_score: 0,
            last_challenge: None,
            leaderboard,
            preferences,
            store,
            source,
            options,
            ticket: Ticket::default(),
            guard: InputGuard,
            shake: ShakeSignal::default(),
            highlight: KeyHighlight::default(),
            last_result: None,
        };
        game.request_next_phrase(now);
        game
    }

    /// Route a raw terminal event through the input guard into the session.
    pub fn handle_event(&mut self, event: &Event, now: Moment) -> InputOutcome {
        match self.guard.classify(event) {
            Verdict::Accept(edit) => {
                let code = match edit {
                    Edit::Insert(c) => KeyCode::Char(c),
                    Edit::Delete => KeyCode::Backspace,
                };
                self.highlight.press(code, now.mono);
                match edit {
                    Edit::Insert(c) => self.type_char(c, now),
                    Edit::Delete => self.backspace(now),
                }
            }
            Verdict::Special(code) => {
                self.highlight.press(code, now.mono);
                InputOutcome::Ignored
            }
            Verdict::Reject(rejection) => self.reject(rejection, now),
            Verdict::Ignore => InputOutcome::Ignored,
        }
    }

    pub fn handle_paste(&mut self, text: &str, now: Moment) -> InputOutcome {
        self.handle_event(&Event::Paste(text.to_string()), now)
    }

    pub fn type_char(&mut self, c: char, now: Moment) -> InputOutcome {
        let mut input = self.session.typed_input().to_string();
        input.push(c);
        self.apply_input(&input, now)
    }

    pub fn backspace(&mut self, now: Moment) -> InputOutcome {
        let mut input = self.session.typed_input().to_string();
        if input.pop().is_none() {
            return InputOutcome::Ignored;
        }
        self.apply_input(&input, now)
    }

    /// Replace the whole input field at once, as a paste that slipped past the guard would.
    pub fn force_input(&mut self, text: &str, now: Moment) -> InputOutcome {
        self.apply_input(text, now)
    }

    fn reject(&mut self, rejection: Rejection, now: Moment) -> InputOutcome {
        log::debug!("rejected {rejection}");
        self.shake.trigger(now.mono);
        InputOutcome::Rejected(rejection)
    }

    fn apply_input(&mut self, input: &str, now: Moment) -> InputOutcome {
        if !self.challenge.accepts_input() {
            return InputOutcome::Ignored;
        }
        match self.session.submit_keystroke(input) {
            Keystroke::Ignored => InputOutcome::Ignored,
            Keystroke::Progress { .. } => InputOutcome::Accepted,
            Keystroke::Completed => InputOutcome::Completed(self.complete(now)),
            Keystroke::Truncated { completed } => {
                self.shake.trigger(now.mono);
                if completed {
                    InputOutcome::Completed(self.complete(now))
                } else {
                    InputOutcome::Truncated
                }
            }
        }
    }

    /// Score the matched phrase and move straight on to the next one.
    fn complete(&mut self, now: Moment) -> Completion {
        let stats = self.stats(now);
        let mode = if self.challenge.is_running() {
            self.challenge_score += 1;
            Mode::Challenge
        } else {
            Mode::Normal
        };
        let entry = ScoreEntry {
            words_per_minute: stats.wpm,
            accuracy_percent: stats.accuracy,
            completed_at: now.wall,
            mode,
        };
        log::info!(
            "phrase complete: {} wpm, {}% accuracy ({mode})",
            entry.words_per_minute,
            entry.accuracy_percent
        );

        self.leaderboard.record(entry.clone());
        save_logged(self.store.as_mut(), keys::LEADERBOARD, &self.leaderboard);
        let new_high_score = self
            .preferences
            .offer_high_score(self.store.as_mut(), entry.words_per_minute);
        if let Some(history) = &self.options.history {
            let record = HistoryRecord::new(&entry, self.preferences.language);
            if let Err(e) = history.append(&record) {
                log::warn!("could not append to {}: {e}", history.path().display());
            }
        }
        self.last_result = Some(entry.clone());

        self.request_next_phrase(now);
        Completion {
            entry,
            new_high_score,
        }
    }

    fn request_next_phrase(&mut self, now: Moment) {
        self.ticket = self.ticket.next();
        let language = self.preferences.language;
        match self.source.request(language, self.ticket) {
            PhraseRequest::Ready(phrase) => self.session.initialize(phrase, now.wall),
            PhraseRequest::Pending => {
                log::debug!("waiting for {language} phrase, ticket {:?}", self.ticket);
                self.session = TypingSession::loading();
            }
        }
    }

    /// Apply a phrase fetched in the background. Answers to superseded requests are dropped.
    pub fn phrase_arrived(&mut self, delivery: PhraseDelivery, now: Moment) -> bool {
        if delivery.ticket != self.ticket
            || delivery.language != self.preferences.language
            || !self.session.is_loading()
        {
            log::debug!("dropping stale phrase for ticket {:?}", delivery.ticket);
            return false;
        }
        self.session.initialize(delivery.phrase, now.wall);
        true
    }

    /// Advance the challenge countdown; returns a summary when it runs out.
    pub fn on_clock(&mut self, now: Moment) -> Option<ChallengeSummary> {
        let ended = self
            .challenge
            .poll(now.mono)
            .into_iter()
            .any(|tick| tick == TimerTick::Ended);
        ended.then(|| self.finish_challenge())
    }

    fn finish_challenge(&mut self) -> ChallengeSummary {
        let score = self.challenge_score;
        let new_best = self
            .preferences
            .offer_challenge_score(self.store.as_mut(), score);
        log::info!("challenge over: {score} phrases (best {})", self.preferences.best_challenge_score);
        let summary = ChallengeSummary { score, new_best };
        self.last_challenge = Some(summary);
        summary
    }

    pub fn start_challenge(&mut self, now: Moment) {
        self.challenge_score = 0;
        self.last_challenge = None;
        self.challenge.start(self.options.challenge_secs.max(1), now.mono);
        self.request_next_phrase(now);
    }

    pub fn stop_challenge(&mut self, now: Moment) {
        self.challenge.stop();
        self.challenge_score = 0;
        self.request_next_phrase(now);
    }

    /// Fresh phrase in the current language, keeping scores
    pub fn skip_phrase(&mut self, now: Moment) {
        if self.challenge.accepts_input() {
            self.request_next_phrase(now);
        }
    }

    pub fn toggle_language(&mut self, now: Moment) {
        self.set_language(self.preferences.language.toggle(), now);
    }

    /// Switch language, persist it and start over on a phrase in that language
    pub fn set_language(&mut self, language: Language, now: Moment) {
        self.preferences.set_language(self.store.as_mut(), language);
        self.shake.clear();
        self.request_next_phrase(now);
    }

    pub fn toggle_theme(&mut self) -> Theme {
        let theme = self.preferences.theme.toggle();
        self.set_theme(theme);
        theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.preferences.set_theme(self.store.as_mut(), theme);
    }

    pub fn reset_scores(&mut self) {
        self.leaderboard.clear();
        save_logged(self.store.as_mut(), keys::LEADERBOARD, &self.leaderboard);
        self.preferences.reset_scores(self.store.as_mut());
    }

    pub fn stats(&self, now: Moment) -> Stats {
        let started_at = self.session.started_at();
        Stats {
            wpm: scoring::words_per_minute(self.session.typed_input(), started_at, now.wall),
            accuracy: scoring::accuracy_percent(
                self.session.total_keystrokes(),
                self.session.error_count(),
            ),
            elapsed_secs: scoring::elapsed_seconds(started_at, now.wall),
        }
    }

    pub fn share_text(&self) -> String {
        match (self.last_challenge, &self.last_result) {
            (Some(summary), _) => format!(
                "I typed {} phrases in a {}s phrasedash challenge (best {}).",
                summary.score, self.options.challenge_secs, self.preferences.best_challenge_score
            ),
            (None, Some(entry)) => format!(
                "I just typed a phrase at {} wpm with {}% accuracy on phrasedash (high score {} wpm).",
                entry.words_per_minute, entry.accuracy_percent, self.preferences.high_score
            ),
            (None, None) => format!(
                "My phrasedash high score is {} wpm.",
                self.preferences.high_score
            ),
        }
    }

    pub fn session(&self) -> &TypingSession {
        &self.session
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn language(&self) -> Language {
        self.preferences.language
    }

    pub fn challenge(&self) -> &ChallengeTimer {
        &self.challenge
    }

    pub fn challenge_state(&self) -> ChallengeState {
        self.challenge
            .snapshot(self.preferences.best_challenge_score)
    }

    pub fn challenge_score(&self) -> u32 {
        self.challenge_score
    }

    pub fn last_challenge(&self) -> Option<ChallengeSummary> {
        self.last_challenge
    }

    pub fn last_result(&self) -> Option<&ScoreEntry> {
        self.last_result.as_ref()
    }

    pub fn current_ticket(&self) -> Ticket {
        self.ticket
    }

    pub fn is_shaking(&self, now: Moment) -> bool {
        self.shake.is_active(now.mono)
    }

    pub fn highlighted_key(&self, now: Moment) -> Option<KeyCode> {
        self.highlight.current(now.mono)
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }
}
