use std::time::Duration;

use crate::{PollRequest, RowKey};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SendRequest(PollRequest),
    /// Row content was replaced and its date advanced to `date`.
    RowUpdated { key: RowKey, date: String },
    /// The completed request did not change the row.
    Unchanged { key: RowKey, failure: Option<String> },
    /// The timer fired but no request could be built.
    Skipped { key: RowKey, reason: SkipReason },
    Schedule { delay: Duration },
    Stopped { key: RowKey },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    InvalidDate { raw: String },
}
