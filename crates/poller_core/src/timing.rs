use std::time::Duration;

use chrono::TimeDelta;

/// Delay between a poll's completion and the next poll.
pub const POLL_INTERVAL: Duration = Duration::from_millis(5000);

/// Minutes subtracted from the last known update time before each poll.
pub const BACKOFF_WINDOW_MINUTES: i64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollTiming {
    pub interval: Duration,
    pub backoff: TimeDelta,
}

impl Default for PollTiming {
    fn default() -> Self {
        Self {
            interval: POLL_INTERVAL,
            backoff: TimeDelta::minutes(BACKOFF_WINDOW_MINUTES),
        }
    }
}
