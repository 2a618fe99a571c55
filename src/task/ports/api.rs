//! Entity-access port for the backend task API.
//!
//! Retries, timeouts and the wire protocol belong to implementations of these
//! traits; the core only awaits their results.

use crate::task::domain::{
    LabelId, Task, TaskFieldChanges, TaskId, TaskStatus, TaskStatusId, UserId,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for entity API operations.
pub type TaskApiResult<T> = Result<T, TaskApiError>;

/// Task operations exposed by the backend.
///
/// Boolean results report whether the backend changed anything.
#[async_trait]
pub trait TaskApi: Send + Sync {
    /// Fetches the authoritative task, including status and relations.
    ///
    /// # Errors
    ///
    /// Returns [`TaskApiError::TaskNotFound`] when the task does not exist.
    async fn find(&self, id: TaskId) -> TaskApiResult<Task>;

    /// Deletes a task.
    ///
    /// Returns `false` when the backend declined the deletion.
    async fn delete_by_id(&self, id: TaskId) -> TaskApiResult<bool>;

    /// Applies a partial field update.
    ///
    /// Returns `false` when the backend declined the update.
    async fn update(&self, id: TaskId, changes: &TaskFieldChanges) -> TaskApiResult<bool>;

    /// Assigns a user to a task.
    ///
    /// Returns `false` when the user was already assigned.
    async fn add_assignment(&self, task_id: TaskId, user_id: UserId) -> TaskApiResult<bool>;

    /// Removes a user assignment.
    ///
    /// Returns `false` when the user was not assigned.
    async fn remove_assignment(&self, task_id: TaskId, user_id: UserId) -> TaskApiResult<bool>;

    /// Attaches a label to a task.
    ///
    /// Returns `false` when the label was already attached.
    async fn add_label(&self, task_id: TaskId, label_id: LabelId) -> TaskApiResult<bool>;

    /// Detaches a label from a task.
    ///
    /// Returns `false` when the label was not attached.
    async fn remove_label(&self, task_id: TaskId, label_id: LabelId) -> TaskApiResult<bool>;
}

/// Status lookups exposed by the backend.
#[async_trait]
pub trait TaskStatusApi: Send + Sync {
    /// Fetches a status by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskApiError::StatusNotFound`] when the status does not
    /// exist, for example after an administrative deletion.
    async fn find_status_by_id(&self, id: TaskStatusId) -> TaskApiResult<TaskStatus>;
}

/// Errors returned by entity API implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskApiError {
    /// The task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The status does not exist.
    #[error("task status not found: {0}")]
    StatusNotFound(TaskStatusId),

    /// The backend refused the request.
    #[error("request rejected: {0}")]
    Rejected(String),

    /// Network or protocol failure.
    #[error("transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskApiError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }

    /// Creates a rejection with the given reason.
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected(reason.into())
    }
}
