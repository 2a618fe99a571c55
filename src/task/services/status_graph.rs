//! Lazy resolution of status graph neighbours.

use crate::task::{
    domain::{StatusEdge, Task, TaskStatus, TaskStatusId},
    ports::{TaskApiError, TaskApiResult, TaskStatusApi},
};
use std::sync::Arc;

/// Resolved neighbour along one edge of the status graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Neighbour {
    /// The status has no edge in this direction.
    None,
    /// The edge resolved to a status.
    Available(TaskStatus),
    /// The edge points at a status that no longer exists.
    Unavailable(TaskStatusId),
}

impl Neighbour {
    /// Returns the resolved status, if available.
    #[must_use]
    pub const fn status(&self) -> Option<&TaskStatus> {
        match self {
            Self::Available(status) => Some(status),
            Self::None | Self::Unavailable(_) => None,
        }
    }

    /// Consumes the neighbour, returning the resolved status if available.
    #[must_use]
    pub fn into_status(self) -> Option<TaskStatus> {
        match self {
            Self::Available(status) => Some(status),
            Self::None | Self::Unavailable(_) => None,
        }
    }
}

/// Both neighbours of a task's current status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusNeighbours {
    /// Neighbour along the default next edge.
    pub next: Neighbour,
    /// Neighbour along the default prev edge.
    pub prev: Neighbour,
}

impl StatusNeighbours {
    const fn none() -> Self {
        Self {
            next: Neighbour::None,
            prev: Neighbour::None,
        }
    }
}

/// Resolves status edges through the backend, one request at a time.
///
/// Nothing is cached; each call may hit the backend again.
#[derive(Clone)]
pub struct StatusNeighbourResolver<S>
where
    S: TaskStatusApi,
{
    api: Arc<S>,
}

impl<S> StatusNeighbourResolver<S>
where
    S: TaskStatusApi,
{
    /// Creates a resolver backed by the given status API.
    #[must_use]
    pub const fn new(api: Arc<S>) -> Self {
        Self { api }
    }

    /// Resolves the neighbour of `status` along `edge`.
    ///
    /// A missing edge makes no backend call. A status that no longer exists
    /// is reported as [`Neighbour::Unavailable`].
    ///
    /// # Errors
    ///
    /// Returns [`TaskApiError`] for failures other than a missing status.
    pub async fn resolve(
        &self,
        status: &TaskStatus,
        edge: StatusEdge,
    ) -> TaskApiResult<Neighbour> {
        let Some(target) = status.edge(edge) else {
            return Ok(Neighbour::None);
        };

        match self.api.find_status_by_id(target).await {
            Ok(resolved) => Ok(Neighbour::Available(resolved)),
            Err(TaskApiError::StatusNotFound(_)) => {
                tracing::warn!(
                    status_id = %status.id(),
                    edge = edge.as_str(),
                    target = %target,
                    "status graph edge points at a missing status"
                );
                Ok(Neighbour::Unavailable(target))
            }
            Err(err) => Err(err),
        }
    }

    /// Resolves the default next status.
    ///
    /// # Errors
    ///
    /// See [`Self::resolve`].
    pub async fn resolve_next(&self, status: &TaskStatus) -> TaskApiResult<Neighbour> {
        self.resolve(status, StatusEdge::Next).await
    }

    /// Resolves the default prev status.
    ///
    /// # Errors
    ///
    /// See [`Self::resolve`].
    pub async fn resolve_prev(&self, status: &TaskStatus) -> TaskApiResult<Neighbour> {
        self.resolve(status, StatusEdge::Prev).await
    }

    /// Resolves both neighbours of the task's current status concurrently.
    ///
    /// A task without a status resolves to no neighbours without any call.
    ///
    /// # Errors
    ///
    /// See [`Self::resolve`].
    pub async fn resolve_neighbours(&self, task: &Task) -> TaskApiResult<StatusNeighbours> {
        let Some(status) = task.status() else {
            return Ok(StatusNeighbours::none());
        };

        let (next, prev) = tokio::join!(self.resolve_next(status), self.resolve_prev(status));
        Ok(StatusNeighbours {
            next: next?,
            prev: prev?,
        })
    }
}
