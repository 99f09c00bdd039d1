//! Poller core: pure per-row polling state machine.
mod effect;
mod msg;
mod request;
mod row;
mod state;
mod timing;
mod update;
mod view_model;

pub use effect::{Effect, SkipReason};
pub use msg::{Msg, PollOutcome};
pub use request::{format_http_date, parse_row_date, PollRequest};
pub use row::{Row, RowKey, SubmissionId};
pub use state::{PollPhase, RowPoll};
pub use timing::{PollTiming, BACKOFF_WINDOW_MINUTES, POLL_INTERVAL};
pub use update::update;
pub use view_model::RowView;
