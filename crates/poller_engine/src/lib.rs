//! Poller engine: HTTP transport and one async task per polled row.
mod cells;
mod clock;
mod decode;
mod engine;
mod fetch;
mod poller;
mod sink;
mod types;

pub use cells::cell_texts;
pub use clock::{Clock, SystemClock};
pub use decode::{decode_fragment, DecodedFragment};
pub use engine::{PollerEngine, PollerSet, RowPollerHandle};
pub use fetch::{FetchSettings, ReqwestSubmissionFetcher, SubmissionFetcher};
pub use sink::{ChannelEventSink, EventSink};
pub use types::{FailureKind, FetchError, FetchOutput, PollerEvent};
