use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// The row's timer elapsed (or the poller just started).
    TimerFired,
    /// The in-flight request finished, successfully or not.
    Completed {
        outcome: PollOutcome,
        received_at: DateTime<Utc>,
    },
    /// The host disposed of the row.
    StopRequested,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// 2xx response; an empty body means "nothing new".
    Body(String),
    /// Transport, status or size failure, described for the log.
    Failed(String),
}
