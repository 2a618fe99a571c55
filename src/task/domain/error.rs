//! Error types for task domain validation and status graph construction.

use super::TaskStatusId;
use thiserror::Error;

/// Errors returned while constructing domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// An entity identifier was zero.
    #[error("invalid {entity} identifier {value}, expected a positive integer")]
    InvalidIdentifier {
        /// Entity kind the identifier belongs to.
        entity: &'static str,
        /// Rejected raw value.
        value: u64,
    },

    /// The task name is empty after trimming.
    #[error("task name must not be empty")]
    EmptyTaskName,

    /// The status name is empty after trimming.
    #[error("task status name must not be empty")]
    EmptyStatusName,
}

/// Errors returned while assembling a [`super::StatusGraph`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StatusGraphError {
    /// Two statuses share the same identifier.
    #[error("duplicate task status identifier: {0}")]
    DuplicateStatus(TaskStatusId),

    /// A next or prev edge points at a status outside the graph.
    #[error("task status {from} references unknown {edge} status {target}")]
    DanglingReference {
        /// Status carrying the edge.
        from: TaskStatusId,
        /// Edge direction (`next` or `prev`).
        edge: &'static str,
        /// Missing target identifier.
        target: TaskStatusId,
    },
}

/// Error returned when a mutation phase change is not allowed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid mutation phase transition from {from} to {to}")]
pub struct MutationPhaseError {
    /// Phase the mutation was in.
    pub from: &'static str,
    /// Phase that was requested.
    pub to: &'static str,
}
