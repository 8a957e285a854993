use chrono::{DateTime, Local};
use std::time::{Duration, Instant};

/// A point in time on both clocks the game needs: wall time for timestamps,
/// monotonic time for countdowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Moment {
    pub wall: DateTime<Local>,
    pub mono: Instant,
}

impl Moment {
    pub fn now() -> Self {
        Self {
            wall: Local::now(),
            mono: Instant::now(),
        }
    }

    pub fn after(self, elapsed: Duration) -> Self {
        Self {
            wall: self.wall + chrono::Duration::from_std(elapsed).unwrap_or(chrono::Duration::zero()),
            mono: self.mono + elapsed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_after_moves_both_clocks() {
        let t0 = Moment::now();
        let t1 = t0.after(Duration::from_millis(1_500));
        assert_eq!((t1.wall - t0.wall).num_milliseconds(), 1_500);
        assert_eq!(t1.mono - t0.mono, Duration::from_millis(1_500));
    }
}
