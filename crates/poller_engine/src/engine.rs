use std::sync::Arc;

use poller_core::{PollTiming, Row, RowKey, RowPoll, RowView};
use poller_logging::poller_info;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::poller::RowPollerTask;
use crate::{Clock, EventSink, SubmissionFetcher, SystemClock};

/// Starts row pollers. Every poller shares the fetcher, clock and event sink
/// but nothing else; rows never coordinate with each other.
///
/// Spawning requires a running tokio runtime.
#[derive(Clone)]
pub struct PollerEngine {
    fetcher: Arc<dyn SubmissionFetcher>,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn EventSink>,
    timing: PollTiming,
}

impl PollerEngine {
    pub fn new(
        fetcher: Arc<dyn SubmissionFetcher>,
        sink: Arc<dyn EventSink>,
        timing: PollTiming,
    ) -> Self {
        Self {
            fetcher,
            clock: Arc::new(SystemClock),
            sink,
            timing,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Starts one independent poller per row, keyed by position.
    pub fn initialize(&self, rows: impl IntoIterator<Item = Row>) -> PollerSet {
        let handles: Vec<_> = rows
            .into_iter()
            .enumerate()
            .map(|(key, row)| self.spawn_row(key, row))
            .collect();
        poller_info!("Started {} row pollers", handles.len());
        PollerSet { handles }
    }

    /// Starts polling a single row immediately.
    pub fn spawn_row(&self, key: RowKey, row: Row) -> RowPollerHandle {
        let state = RowPoll::new(key, row, self.timing);
        let (view_tx, view_rx) = watch::channel(state.view());
        let cancel = CancellationToken::new();

        let task = RowPollerTask {
            state,
            fetcher: self.fetcher.clone(),
            clock: self.clock.clone(),
            sink: self.sink.clone(),
            view_tx,
            cancel: cancel.clone(),
        };
        let join = tokio::spawn(task.run());

        RowPollerHandle {
            key,
            view_rx,
            cancel,
            join,
        }
    }
}

/// Observes and disposes of one row's poller.
pub struct RowPollerHandle {
    key: RowKey,
    view_rx: watch::Receiver<RowView>,
    cancel: CancellationToken,
    join: JoinHandle<()>,
}

impl RowPollerHandle {
    pub fn view(&self) -> RowView {
        self.view_rx.borrow().clone()
    }

    /// Receiver that wakes on every state change of the row.
    pub fn subscribe(&self) -> watch::Receiver<RowView> {
        self.view_rx.clone()
    }

    /// Abandons any in-flight request; the row is not touched afterwards.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Waits for the poller to end. Only returns after `stop`.
    pub async fn join(self) {
        let _ = self.join.await;
    }
}

/// The pollers started for one table.
#[derive(Default)]
pub struct PollerSet {
    handles: Vec<RowPollerHandle>,
}

impl PollerSet {
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn get(&self, key: RowKey) -> Option<&RowPollerHandle> {
        self.handles.iter().find(|handle| handle.key == key)
    }

    pub fn views(&self) -> Vec<RowView> {
        self.handles.iter().map(RowPollerHandle::view).collect()
    }

    pub fn stop_all(&self) {
        for handle in &self.handles {
            handle.stop();
        }
    }

    /// Stops every poller and waits until all of them have ended.
    pub async fn shutdown(self) {
        self.stop_all();
        for handle in self.handles {
            handle.join().await;
        }
        poller_info!("All row pollers stopped");
    }
}
