//! Observer port receiving settled mutation events.

use crate::task::domain::MutationEvent;

/// Consumer of [`MutationEvent`]s published by the mutation coordinator.
///
/// Ownership of each event moves to the sink. Implementations must not
/// block; the coordinator publishes from inside its settle step.
pub trait TaskEventSink: Send + Sync {
    /// Receives one settled mutation event.
    fn publish(&self, event: MutationEvent);
}
