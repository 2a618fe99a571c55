//! Deadline classification bound to configured thresholds and a clock.

use crate::task::domain::{Task, UrgencyLevel, UrgencyThresholds, classify_deadline};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;

/// Classifies deadlines against the clock's local time.
#[derive(Clone)]
pub struct DeadlineClassifier<C>
where
    C: Clock + Send + Sync,
{
    thresholds: UrgencyThresholds,
    clock: Arc<C>,
}

impl<C> DeadlineClassifier<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a classifier with fixed thresholds.
    ///
    /// Inverted thresholds are accepted as configured and only logged.
    #[must_use]
    pub fn new(thresholds: UrgencyThresholds, clock: Arc<C>) -> Self {
        if thresholds.is_inverted() {
            tracing::warn!(
                warning_offset_days = thresholds.warning_offset_days,
                danger_offset_days = thresholds.danger_offset_days,
                "danger offset exceeds warning offset; warning level can be skipped"
            );
        }
        Self { thresholds, clock }
    }

    /// Returns the configured thresholds.
    #[must_use]
    pub const fn thresholds(&self) -> UrgencyThresholds {
        self.thresholds
    }

    /// Classifies a deadline. Returns `None` when there is no deadline.
    #[must_use]
    pub fn classify(&self, deadline: Option<DateTime<Utc>>) -> Option<UrgencyLevel> {
        classify_deadline(deadline, &self.clock.local(), self.thresholds)
    }

    /// Classifies a task's deadline.
    #[must_use]
    pub fn classify_task(&self, task: &Task) -> Option<UrgencyLevel> {
        self.classify(task.deadline())
    }
}
