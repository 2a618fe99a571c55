//! Moving tasks one step along their status graph.

use crate::task::{
    domain::{StatusEdge, TaskFieldChanges, TaskId, TaskStatusId},
    ports::{TaskApi, TaskApiError, TaskEventSink, TaskStatusApi},
    services::{
        MutationOutcome, Neighbour, StatusNeighbourResolver, TaskMutationCoordinator,
        TaskMutationError,
    },
};
use thiserror::Error;

/// Errors returned while stepping a task to a neighbouring status.
#[derive(Debug, Error)]
pub enum StatusStepError {
    /// The task has no current status.
    #[error("task {0} has no status")]
    NoStatus(TaskId),

    /// The current status has no edge in the requested direction.
    #[error("task {task_id} status has no default {edge} status")]
    NoNeighbour {
        /// Target task.
        task_id: TaskId,
        /// Requested direction.
        edge: &'static str,
    },

    /// The edge points at a status that no longer exists.
    #[error("default {edge} status {status_id} of task {task_id} is unavailable")]
    NeighbourUnavailable {
        /// Target task.
        task_id: TaskId,
        /// Requested direction.
        edge: &'static str,
        /// Missing status.
        status_id: TaskStatusId,
    },

    /// Resolving the neighbour failed.
    #[error(transparent)]
    Lookup(#[from] TaskApiError),

    /// Applying the status change failed.
    #[error(transparent)]
    Mutation(#[from] TaskMutationError),
}

/// Result type for status workflow operations.
pub type StatusStepResult<T> = Result<T, StatusStepError>;

/// Steps tracked tasks to their default next or prev status.
///
/// Reads the settled snapshot held by the coordinator, resolves the neighbour
/// lazily, then issues a field update through the coordinator so the change
/// follows the usual mutate-then-refresh protocol.
pub struct StatusWorkflowService<A, S, E>
where
    A: TaskApi + 'static,
    S: TaskStatusApi,
    E: TaskEventSink + 'static,
{
    coordinator: TaskMutationCoordinator<A, E>,
    resolver: StatusNeighbourResolver<S>,
}

impl<A, S, E> StatusWorkflowService<A, S, E>
where
    A: TaskApi + 'static,
    S: TaskStatusApi,
    E: TaskEventSink + 'static,
{
    /// Creates a workflow service.
    #[must_use]
    pub const fn new(
        coordinator: TaskMutationCoordinator<A, E>,
        resolver: StatusNeighbourResolver<S>,
    ) -> Self {
        Self {
            coordinator,
            resolver,
        }
    }

    /// Moves the task to its default next status.
    ///
    /// # Errors
    ///
    /// Returns [`StatusStepError`] when there is no usable next status or the
    /// lookup or update fails.
    pub async fn advance(&self, task_id: TaskId) -> StatusStepResult<MutationOutcome> {
        self.step(task_id, StatusEdge::Next).await
    }

    /// Moves the task back to its default prev status.
    ///
    /// # Errors
    ///
    /// Returns [`StatusStepError`] when there is no usable prev status or the
    /// lookup or update fails.
    pub async fn revert(&self, task_id: TaskId) -> StatusStepResult<MutationOutcome> {
        self.step(task_id, StatusEdge::Prev).await
    }

    async fn step(&self, task_id: TaskId, edge: StatusEdge) -> StatusStepResult<MutationOutcome> {
        let Some(task) = self.coordinator.snapshot(task_id)? else {
            return Ok(MutationOutcome::Skipped);
        };
        let status = task.status().ok_or(StatusStepError::NoStatus(task_id))?;

        let target = match self.resolver.resolve(status, edge).await? {
            Neighbour::Available(target) => target,
            Neighbour::None => {
                return Err(StatusStepError::NoNeighbour {
                    task_id,
                    edge: edge.as_str(),
                });
            }
            Neighbour::Unavailable(status_id) => {
                return Err(StatusStepError::NeighbourUnavailable {
                    task_id,
                    edge: edge.as_str(),
                    status_id,
                });
            }
        };

        tracing::info!(
            task_id = %task_id,
            from = %status.id(),
            to = %target.id(),
            edge = edge.as_str(),
            "moving task along status graph"
        );
        let changes = TaskFieldChanges::new().with_status(Some(target.id()));
        Ok(self.coordinator.update_fields(task_id, changes).await?)
    }
}
