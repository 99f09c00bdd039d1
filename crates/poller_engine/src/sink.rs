use tokio::sync::mpsc;

use crate::PollerEvent;

pub trait EventSink: Send + Sync {
    fn emit(&self, event: PollerEvent);
}

/// Forwards events to an unbounded channel; a closed receiver drops them.
pub struct ChannelEventSink {
    tx: mpsc::UnboundedSender<PollerEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::UnboundedSender<PollerEvent>) -> Self {
        Self { tx }
    }

    pub fn channel() -> (Self, mpsc::UnboundedReceiver<PollerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: PollerEvent) {
        let _ = self.tx.send(event);
    }
}
