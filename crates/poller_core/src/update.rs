use crate::{Effect, Msg, PollOutcome, PollPhase, RowPoll, SkipReason};

/// Pure update function: applies a message to a row's polling state and
/// returns the effects the engine must carry out, in order.
pub fn update(mut state: RowPoll, msg: Msg) -> (RowPoll, Vec<Effect>) {
    let key = state.key();
    let interval = state.timing().interval;

    let effects = match (state.phase(), msg) {
        (PollPhase::Stopped, _) => Vec::new(),
        (_, Msg::StopRequested) => {
            state.set_phase(PollPhase::Stopped);
            vec![Effect::Stopped { key }]
        }
        (PollPhase::Waiting, Msg::TimerFired) => match state.next_request() {
            Some(request) => {
                state.set_phase(PollPhase::Requesting);
                vec![Effect::SendRequest(request)]
            }
            None => {
                let raw = state.row().date.clone();
                vec![
                    Effect::Skipped {
                        key,
                        reason: SkipReason::InvalidDate { raw },
                    },
                    Effect::Schedule { delay: interval },
                ]
            }
        },
        // At most one request per row is in flight.
        (PollPhase::Requesting, Msg::TimerFired) => Vec::new(),
        (PollPhase::Requesting, Msg::Completed { outcome, received_at }) => {
            state.set_phase(PollPhase::Waiting);
            let first = match outcome {
                PollOutcome::Body(body) if !body.is_empty() => {
                    let date = state.apply_update(body, received_at);
                    Effect::RowUpdated { key, date }
                }
                PollOutcome::Body(_) => Effect::Unchanged { key, failure: None },
                PollOutcome::Failed(reason) => Effect::Unchanged {
                    key,
                    failure: Some(reason),
                },
            };
            vec![first, Effect::Schedule { delay: interval }]
        }
        // A completion without a request in flight is stale.
        (PollPhase::Waiting, Msg::Completed { .. }) => Vec::new(),
    };

    (state, effects)
}
