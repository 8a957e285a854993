use std::time::{Duration, Instant};

const TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running,
    Ended,
}

/// Identifies one countdown; ticks carrying an older token are ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerToken(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTick {
    Remaining(u32),
    Ended,
    Stale,
}

/// Snapshot for display and persistence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChallengeState {
    pub active: bool,
    pub seconds_remaining: u32,
    pub best_score_ever: u32,
}

/// Fixed-length countdown that closes input when it runs out
#[derive(Debug, Clone)]
pub struct ChallengeTimer {
    state: TimerState,
    seconds_remaining: u32,
    generation: u64,
    next_tick_at: Option<Instant>,
}

impl Default for ChallengeTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl ChallengeTimer {
    pub fn new() -> Self {
        Self {
            state: TimerState::Idle,
            seconds_remaining: 0,
            generation: 0,
            next_tick_at: None,
        }
    }

    /// Begin a countdown, replacing any countdown already running.
    pub fn start(&mut self, duration_secs: u32, now: Instant) -> TimerToken {
        self.generation += 1;
        self.seconds_remaining = duration_secs;
        if duration_secs == 0 {
            self.state = TimerState::Ended;
            self.next_tick_at = None;
        } else {
            self.state = TimerState::Running;
            self.next_tick_at = Some(now + TICK);
        }
        log::debug!("challenge countdown {} started: {}s", self.generation, duration_secs);
        self.token()
    }

    /// Manual reset back to idle; input is accepted again.
    pub fn stop(&mut self) {
        self.generation += 1;
        self.state = TimerState::Idle;
        self.seconds_remaining = 0;
        self.next_tick_at = None;
    }

    pub fn token(&self) -> TimerToken {
        TimerToken(self.generation)
    }

    /// Advance the countdown identified by `token` by one second.
    pub fn tick(&mut self, token: TimerToken) -> TimerTick {
        if token.0 != self.generation || self.state != TimerState::Running {
            return TimerTick::Stale;
        }
        self.seconds_remaining = self.seconds_remaining.saturating_sub(1);
        if self.seconds_remaining == 0 {
            self.state = TimerState::Ended;
            self.next_tick_at = None;
            log::debug!("challenge countdown {} ended", self.generation);
            TimerTick::Ended
        } else {
            if let Some(at) = self.next_tick_at.as_mut() {
                *at += TICK;
            }
            TimerTick::Remaining(self.seconds_remaining)
        }
    }

    /// Fire every one-second tick that has come due by `now`.
    pub fn poll(&mut self, now: Instant) -> Vec<TimerTick> {
        let mut fired = Vec::new();
        while let Some(at) = self.next_tick_at {
            if at > now {
                break;
            }
            let tick = self.tick(self.token());
            fired.push(tick);
            if tick != TimerTick::Remaining(self.seconds_remaining) {
                break;
            }
        }
        fired
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn seconds_remaining(&self) -> u32 {
        self.seconds_remaining
    }

    pub fn accepts_input(&self) -> bool {
        self.state != TimerState::Ended
    }

    pub fn snapshot(&self, best_score_ever: u32) -> ChallengeState {
        ChallengeState {
            active: self.is_running(),
            seconds_remaining: self.seconds_remaining,
            best_score_ever,
        }
    }
}
