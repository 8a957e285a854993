use crate::clock::Moment;
use crate::game::{ChallengeSummary, Game, InputOutcome};
use crate::phrases::PhraseDelivery;
use crate::share::{ShareCascade, ShareOutcome};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Typing,
    Leaderboard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppControl {
    Continue,
    Quit,
}

/// Message box drawn over the current screen until dismissed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub body: String,
}

impl Notice {
    fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    fn challenge_over(summary: ChallengeSummary, best: u32) -> Self {
        let body = if summary.new_best {
            format!("{} phrases. New best!", summary.score)
        } else {
            format!("{} phrases (best {best})", summary.score)
        };
        Self::new("Time's up", body)
    }
}

pub struct App {
    pub game: Game,
    pub state: AppState,
    pub show_keyboard: bool,
    notice: Option<Notice>,
    share: ShareCascade,
    now: Moment,
}

impl App {
    pub fn new(game: Game, share: ShareCascade, show_keyboard: bool, now: Moment) -> Self {
        Self {
            game,
            state: AppState::Typing,
            show_keyboard,
            notice: None,
            share,
            now,
        }
    }

    /// Hotkeys first, then the game through its input guard
    pub fn handle_input(&mut self, event: &Event, now: Moment) -> AppControl {
        self.now = now;
        if let Event::Key(key) = event {
            if key.kind == KeyEventKind::Press {
                if let Some(control) = self.on_hotkey(key, now) {
                    return control;
                }
            }
        }
        if self.state != AppState::Typing {
            return AppControl::Continue;
        }

        if let InputOutcome::Completed(done) = self.game.handle_event(event, now) {
            if done.new_high_score {
                log::info!("new high score: {} wpm", done.entry.words_per_minute);
            }
        }
        AppControl::Continue
    }

    fn on_hotkey(&mut self, key: &KeyEvent, now: Moment) -> Option<AppControl> {
        let control = match key.code {
            KeyCode::Esc => {
                if self.notice.take().is_some() {
                    AppControl::Continue
                } else if self.state == AppState::Leaderboard {
                    self.state = AppState::Typing;
                    AppControl::Continue
                } else {
                    AppControl::Quit
                }
            }
            KeyCode::Enter if self.notice.is_some() => {
                self.notice = None;
                AppControl::Continue
            }
            KeyCode::F(1) => {
                self.game.toggle_language(now);
                AppControl::Continue
            }
            KeyCode::F(2) => {
                self.game.toggle_theme();
                AppControl::Continue
            }
            KeyCode::F(3) => {
                if self.game.challenge().is_running() {
                    self.game.stop_challenge(now);
                } else {
                    self.notice = None;
                    self.game.start_challenge(now);
                }
                AppControl::Continue
            }
            KeyCode::F(4) => {
                self.state = match self.state {
                    AppState::Typing => AppState::Leaderboard,
                    AppState::Leaderboard => AppState::Typing,
                };
                AppControl::Continue
            }
            KeyCode::F(5) => {
                self.share_result();
                AppControl::Continue
            }
            KeyCode::F(6) => {
                self.game.skip_phrase(now);
                AppControl::Continue
            }
            _ => return None,
        };
        Some(control)
    }

    fn share_result(&mut self) {
        let text = self.game.share_text();
        self.notice = Some(match self.share.share(&text) {
            ShareOutcome::Shared => Notice::new("Shared", "Opened the share page in your browser"),
            ShareOutcome::Copied => Notice::new("Copied", "Result copied to the clipboard"),
            ShareOutcome::Displayed(text) => Notice::new("Share", text),
        });
    }

    pub fn on_tick(&mut self, now: Moment) {
        self.now = now;
        if let Some(summary) = self.game.on_clock(now) {
            let best = self.game.preferences().best_challenge_score;
            self.notice = Some(Notice::challenge_over(summary, best));
        }
    }

    pub fn deliver(&mut self, delivery: PhraseDelivery, now: Moment) {
        self.now = now;
        if delivery.fallback {
            log::info!("using a built-in {} phrase", delivery.language);
        }
        self.game.phrase_arrived(delivery, now);
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Time the next frame is drawn for
    pub fn now(&self) -> Moment {
        self.now
    }
}
