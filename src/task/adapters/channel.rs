//! Event sink forwarding settled events over a tokio channel.

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use crate::task::{domain::MutationEvent, ports::TaskEventSink};

/// Sink handing each event to a single downstream receiver.
///
/// Publishing never blocks. Events published after the receiver is dropped
/// are discarded.
#[derive(Debug, Clone)]
pub struct ChannelEventSink {
    sender: UnboundedSender<MutationEvent>,
}

impl ChannelEventSink {
    /// Creates a sink and the receiver observing it.
    #[must_use]
    pub fn channel() -> (Self, UnboundedReceiver<MutationEvent>) {
        let (sender, receiver) = unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl TaskEventSink for ChannelEventSink {
    fn publish(&self, event: MutationEvent) {
        let task_id = event.task_id();
        if self.sender.send(event).is_err() {
            tracing::debug!(task_id = %task_id, "event receiver dropped, discarding event");
        }
    }
}
