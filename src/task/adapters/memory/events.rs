//! In-memory event sink recording every published event.

use std::sync::{Arc, Mutex, PoisonError};

use crate::task::{
    domain::{MutationEvent, TaskId},
    ports::TaskEventSink,
};

/// Sink that keeps published events in publication order.
#[derive(Debug, Clone, Default)]
pub struct RecordingEventSink {
    events: Arc<Mutex<Vec<MutationEvent>>>,
}

impl RecordingEventSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of all events published so far.
    #[must_use]
    pub fn events(&self) -> Vec<MutationEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the events published for one task.
    #[must_use]
    pub fn events_for(&self, task_id: TaskId) -> Vec<MutationEvent> {
        self.events()
            .into_iter()
            .filter(|event| event.task_id() == task_id)
            .collect()
    }

    /// Removes and returns all recorded events.
    #[must_use]
    pub fn drain(&self) -> Vec<MutationEvent> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl TaskEventSink for RecordingEventSink {
    fn publish(&self, event: MutationEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}
