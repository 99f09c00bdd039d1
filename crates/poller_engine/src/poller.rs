use std::sync::Arc;

use poller_core::{update, Effect, Msg, PollOutcome, PollRequest, RowPoll, RowView, SkipReason};
use poller_logging::{poller_debug, poller_info, poller_trace, poller_warn};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::{Clock, EventSink, PollerEvent, SubmissionFetcher};

/// Drives one row: wait, fetch, update, repeat, until cancelled.
pub(crate) struct RowPollerTask {
    pub(crate) state: RowPoll,
    pub(crate) fetcher: Arc<dyn SubmissionFetcher>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) sink: Arc<dyn EventSink>,
    pub(crate) view_tx: watch::Sender<RowView>,
    pub(crate) cancel: CancellationToken,
}

impl RowPollerTask {
    pub(crate) async fn run(mut self) {
        poller_debug!(
            "Row {} polling submission {}",
            self.state.key(),
            self.state.row().submission_id()
        );

        // No initial delay: the first poll starts right away.
        let mut next = Some(Msg::TimerFired);
        while let Some(msg) = next.take() {
            let (state, effects) = update(self.state.clone(), msg);
            self.state = state;
            self.view_tx.send_replace(self.state.view());

            for effect in effects {
                if let Some(msg) = self.run_effect(effect).await {
                    next = Some(msg);
                }
            }
        }
    }

    async fn run_effect(&self, effect: Effect) -> Option<Msg> {
        match effect {
            Effect::SendRequest(request) => Some(self.request(request).await),
            Effect::Schedule { delay } => {
                tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => Some(Msg::StopRequested),
                    _ = tokio::time::sleep(delay) => Some(Msg::TimerFired),
                }
            }
            Effect::RowUpdated { key, date } => {
                poller_info!("updated row {} {}", key, date);
                self.sink.emit(PollerEvent::RowUpdated(self.state.view()));
                None
            }
            Effect::Unchanged { key, failure } => {
                match failure {
                    Some(reason) => poller_debug!("Row {} unchanged after failure: {}", key, reason),
                    None => poller_trace!("Row {} unchanged", key),
                }
                None
            }
            Effect::Skipped {
                key,
                reason: SkipReason::InvalidDate { raw },
            } => {
                poller_warn!("Row {} skipped poll: unparsable date {:?}", key, raw);
                None
            }
            Effect::Stopped { key } => {
                poller_debug!("Row {} stopped", key);
                self.sink.emit(PollerEvent::Stopped { key });
                None
            }
        }
    }

    async fn request(&self, request: PollRequest) -> Msg {
        let result = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Msg::StopRequested,
            result = self.fetcher.fetch(&request) => result,
        };
        let received_at = self.clock.now();

        let outcome = match result {
            Ok(output) => {
                poller_trace!(
                    "Row {} got {} ({} bytes, {})",
                    self.state.key(),
                    output.status,
                    output.byte_len,
                    output.content_type.as_deref().unwrap_or("no content type")
                );
                PollOutcome::Body(output.body)
            }
            Err(error) => {
                self.sink.emit(PollerEvent::PollFailed {
                    key: self.state.key(),
                    submission_id: request.submission_id.clone(),
                    error: error.clone(),
                });
                PollOutcome::Failed(error.to_string())
            }
        };
        Msg::Completed {
            outcome,
            received_at,
        }
    }
}
