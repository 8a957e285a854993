// Library surface for the binary and for headless/integration tests.
pub mod app;
pub mod app_dirs;
pub mod challenge;
pub mod clock;
pub mod config;
pub mod game;
pub mod guard;
pub mod history;
pub mod leaderboard;
pub mod phrases;
pub mod preferences;
pub mod runtime;
pub mod scoring;
pub mod session;
pub mod share;
pub mod storage;
pub mod ui;

pub use app::{App, AppControl, AppState};
pub use game::{Game, GameOptions, InputOutcome};
