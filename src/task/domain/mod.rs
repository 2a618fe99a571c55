//! Domain model for the task lifecycle core.
//!
//! Covers task snapshots and their relations, the status graph, deadline
//! urgency, and the mutation lifecycle. Nothing here performs I/O.

mod changes;
mod error;
mod ids;
mod mutation;
mod status;
mod task;
mod urgency;

pub use changes::{
    FIELD_DEADLINE, FIELD_DESCRIPTION, FIELD_NAME, FIELD_TASK_STATUS_ID, TaskFieldChanges,
};
pub use error::{MutationPhaseError, StatusGraphError, TaskDomainError};
pub use ids::{LabelId, MutationId, TaskId, TaskStatusId, UserId};
pub use mutation::{MutationEvent, MutationKind, MutationPhase, MutationRecord};
pub use status::{StatusEdge, StatusGraph, TaskStatus, TaskStatusRecord};
pub use task::{Task, TaskAssignment, TaskLabel, User};
pub use urgency::{UrgencyLevel, UrgencyThresholds, classify_deadline};
