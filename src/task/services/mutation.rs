//! Mutate-then-refresh coordination for task-changing operations.
//!
//! Every operation issues one mutating call, re-fetches the authoritative
//! task, swaps the locally held snapshot and publishes exactly one event.
//! Mutations of the same task run one after another in issue order;
//! mutations of different tasks run independently.

use crate::task::{
    domain::{
        LabelId, MutationEvent, MutationId, MutationKind, MutationPhase, MutationPhaseError,
        MutationRecord, Task, TaskFieldChanges, TaskId, UserId,
    },
    ports::{TaskApi, TaskApiError, TaskEventSink},
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use thiserror::Error;

/// Result of a mutation request that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The task is not tracked; nothing was sent and no event was published.
    Skipped,
    /// The mutation settled and its event was published.
    Settled {
        /// Correlation identifier used in logs.
        mutation_id: MutationId,
        /// Operation that settled.
        kind: MutationKind,
    },
}

impl MutationOutcome {
    /// Returns `true` when the mutation settled.
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        matches!(self, Self::Settled { .. })
    }
}

/// Service-level errors for task mutations.
#[derive(Debug, Error)]
pub enum TaskMutationError {
    /// The mutating call failed; local state is unchanged.
    #[error("{kind} on task {task_id} failed")]
    Transport {
        /// Target task.
        task_id: TaskId,
        /// Failed operation.
        kind: MutationKind,
        /// Backend failure.
        #[source]
        source: TaskApiError,
    },

    /// The mutation was applied but the follow-up fetch failed, so the local
    /// snapshot is stale.
    #[error("{kind} on task {task_id} was applied but could not be confirmed")]
    StaleRefresh {
        /// Target task.
        task_id: TaskId,
        /// Applied operation.
        kind: MutationKind,
        /// Refresh failure.
        #[source]
        source: TaskApiError,
    },

    /// Loading a task for tracking failed.
    #[error("loading task {task_id} failed")]
    Load {
        /// Requested task.
        task_id: TaskId,
        /// Backend failure.
        #[source]
        source: TaskApiError,
    },

    /// The detached mutation task stopped before reporting an outcome.
    #[error("{kind} on task {task_id} was interrupted: {reason}")]
    Interrupted {
        /// Target task.
        task_id: TaskId,
        /// Interrupted operation.
        kind: MutationKind,
        /// Runtime-provided reason.
        reason: String,
    },

    /// The snapshot store lock was poisoned.
    #[error("task snapshot store unavailable: {0}")]
    SnapshotStore(String),

    /// Internal phase bookkeeping went out of order.
    #[error(transparent)]
    Phase(#[from] MutationPhaseError),
}

impl TaskMutationError {
    /// Returns `true` when the backend applied the mutation despite the
    /// error.
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::StaleRefresh { .. })
    }
}

/// Result type for mutation coordinator operations.
pub type TaskMutationResult<T> = Result<T, TaskMutationError>;

/// Single mutating call with its minimal payload.
#[derive(Debug, Clone)]
enum MutationRequest {
    Delete,
    UpdateFields(TaskFieldChanges),
    AssignUser(UserId),
    UnassignUser(UserId),
    AddLabel(LabelId),
    RemoveLabel(LabelId),
}

impl MutationRequest {
    const fn kind(&self) -> MutationKind {
        match self {
            Self::Delete => MutationKind::Delete,
            Self::UpdateFields(_) => MutationKind::UpdateFields,
            Self::AssignUser(_) => MutationKind::AssignUser,
            Self::UnassignUser(_) => MutationKind::UnassignUser,
            Self::AddLabel(_) => MutationKind::AddLabel,
            Self::RemoveLabel(_) => MutationKind::RemoveLabel,
        }
    }

    async fn send<A>(&self, api: &A, task_id: TaskId) -> Result<bool, TaskApiError>
    where
        A: TaskApi + ?Sized,
    {
        match self {
            Self::Delete => api.delete_by_id(task_id).await,
            Self::UpdateFields(changes) => api.update(task_id, changes).await,
            Self::AssignUser(user_id) => api.add_assignment(task_id, *user_id).await,
            Self::UnassignUser(user_id) => api.remove_assignment(task_id, *user_id).await,
            Self::AddLabel(label_id) => api.add_label(task_id, *label_id).await,
            Self::RemoveLabel(label_id) => api.remove_label(task_id, *label_id).await,
        }
    }
}

type Lane = Arc<tokio::sync::Mutex<()>>;

/// Coordinates task mutations and owns the settled task snapshots.
///
/// Only tracked tasks can be mutated. Once a mutation has been sent it runs
/// on a detached tokio task, so dropping the caller's future does not stop
/// it from settling or failing. Operations must be called from within a
/// tokio runtime.
pub struct TaskMutationCoordinator<A, E>
where
    A: TaskApi + 'static,
    E: TaskEventSink + 'static,
{
    api: Arc<A>,
    sink: Arc<E>,
    snapshots: Arc<RwLock<HashMap<TaskId, Task>>>,
    lanes: Arc<Mutex<HashMap<TaskId, Lane>>>,
}

impl<A, E> Clone for TaskMutationCoordinator<A, E>
where
    A: TaskApi + 'static,
    E: TaskEventSink + 'static,
{
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            sink: Arc::clone(&self.sink),
            snapshots: Arc::clone(&self.snapshots),
            lanes: Arc::clone(&self.lanes),
        }
    }
}

impl<A, E> TaskMutationCoordinator<A, E>
where
    A: TaskApi + 'static,
    E: TaskEventSink + 'static,
{
    /// Creates a coordinator with no tracked tasks.
    #[must_use]
    pub fn new(api: Arc<A>, sink: Arc<E>) -> Self {
        Self {
            api,
            sink,
            snapshots: Arc::new(RwLock::new(HashMap::new())),
            lanes: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Starts tracking a snapshot the caller already holds, replacing any
    /// previous one.
    ///
    /// # Errors
    ///
    /// Returns [`TaskMutationError::SnapshotStore`] when the store is
    /// poisoned.
    pub fn track(&self, task: Task) -> TaskMutationResult<()> {
        self.snapshots
            .write()
            .map_err(|err| TaskMutationError::SnapshotStore(err.to_string()))?
            .insert(task.id(), task);
        Ok(())
    }

    /// Fetches a task from the backend and starts tracking it.
    ///
    /// # Errors
    ///
    /// Returns [`TaskMutationError::Load`] when the fetch fails.
    pub async fn load(&self, task_id: TaskId) -> TaskMutationResult<Task> {
        let task = self
            .api
            .find(task_id)
            .await
            .map_err(|source| TaskMutationError::Load { task_id, source })?;
        self.track(task.clone())?;
        Ok(task)
    }

    /// Returns a copy of the settled snapshot of a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskMutationError::SnapshotStore`] when the store is
    /// poisoned.
    pub fn snapshot(&self, task_id: TaskId) -> TaskMutationResult<Option<Task>> {
        Ok(self
            .snapshots
            .read()
            .map_err(|err| TaskMutationError::SnapshotStore(err.to_string()))?
            .get(&task_id)
            .cloned())
    }

    /// Returns `true` when a snapshot of the task is held.
    ///
    /// # Errors
    ///
    /// Returns [`TaskMutationError::SnapshotStore`] when the store is
    /// poisoned.
    pub fn is_tracked(&self, task_id: TaskId) -> TaskMutationResult<bool> {
        Ok(self
            .snapshots
            .read()
            .map_err(|err| TaskMutationError::SnapshotStore(err.to_string()))?
            .contains_key(&task_id))
    }

    /// Stops tracking a task, returning its last snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`TaskMutationError::SnapshotStore`] when the store is
    /// poisoned.
    pub fn forget(&self, task_id: TaskId) -> TaskMutationResult<Option<Task>> {
        let forgotten = self
            .snapshots
            .write()
            .map_err(|err| TaskMutationError::SnapshotStore(err.to_string()))?
            .remove(&task_id);
        self.prune_lane(task_id)?;
        Ok(forgotten)
    }

    /// Deletes a task. On success the snapshot is dropped and
    /// [`MutationEvent::Deleted`] is published.
    ///
    /// # Errors
    ///
    /// Returns [`TaskMutationError::Transport`] when the backend fails or
    /// declines the deletion.
    pub async fn delete(&self, task_id: TaskId) -> TaskMutationResult<MutationOutcome> {
        self.execute(task_id, MutationRequest::Delete).await
    }

    /// Applies a partial field update and publishes
    /// [`MutationEvent::Modified`].
    ///
    /// # Errors
    ///
    /// Returns [`TaskMutationError::Transport`] when the backend fails or
    /// declines the update, or [`TaskMutationError::StaleRefresh`] when the
    /// follow-up fetch fails.
    pub async fn update_fields(
        &self,
        task_id: TaskId,
        changes: TaskFieldChanges,
    ) -> TaskMutationResult<MutationOutcome> {
        self.execute(task_id, MutationRequest::UpdateFields(changes))
            .await
    }

    /// Assigns a user and publishes [`MutationEvent::AssignmentChanged`].
    ///
    /// # Errors
    ///
    /// Returns [`TaskMutationError::Transport`] or
    /// [`TaskMutationError::StaleRefresh`].
    pub async fn assign_user(
        &self,
        task_id: TaskId,
        user_id: UserId,
    ) -> TaskMutationResult<MutationOutcome> {
        self.execute(task_id, MutationRequest::AssignUser(user_id))
            .await
    }

    /// Unassigns a user and publishes [`MutationEvent::AssignmentChanged`].
    ///
    /// Unassigning a user who is not assigned succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`TaskMutationError::Transport`] or
    /// [`TaskMutationError::StaleRefresh`].
    pub async fn unassign_user(
        &self,
        task_id: TaskId,
        user_id: UserId,
    ) -> TaskMutationResult<MutationOutcome> {
        self.execute(task_id, MutationRequest::UnassignUser(user_id))
            .await
    }

    /// Attaches a label and publishes [`MutationEvent::LabelChanged`].
    ///
    /// # Errors
    ///
    /// Returns [`TaskMutationError::Transport`] or
    /// [`TaskMutationError::StaleRefresh`].
    pub async fn add_label(
        &self,
        task_id: TaskId,
        label_id: LabelId,
    ) -> TaskMutationResult<MutationOutcome> {
        self.execute(task_id, MutationRequest::AddLabel(label_id))
            .await
    }

    /// Detaches a label and publishes [`MutationEvent::LabelChanged`].
    ///
    /// Detaching a label that is not attached succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`TaskMutationError::Transport`] or
    /// [`TaskMutationError::StaleRefresh`].
    pub async fn remove_label(
        &self,
        task_id: TaskId,
        label_id: LabelId,
    ) -> TaskMutationResult<MutationOutcome> {
        self.execute(task_id, MutationRequest::RemoveLabel(label_id))
            .await
    }

    async fn execute(
        &self,
        task_id: TaskId,
        request: MutationRequest,
    ) -> TaskMutationResult<MutationOutcome> {
        let kind = request.kind();
        if !self.is_tracked(task_id)? {
            tracing::debug!(
                task_id = %task_id,
                mutation = %kind,
                "ignoring mutation of untracked task"
            );
            return Ok(MutationOutcome::Skipped);
        }

        let permit = self.lane(task_id)?.lock_owned().await;

        // A mutation queued ahead of this one may have deleted the task.
        if !self.is_tracked(task_id)? {
            tracing::debug!(
                task_id = %task_id,
                mutation = %kind,
                "task left tracking while queued"
            );
            drop(permit);
            self.prune_lane(task_id)?;
            return Ok(MutationOutcome::Skipped);
        }

        let coordinator = self.clone();
        let handle = tokio::spawn(async move {
            let outcome = coordinator.run(task_id, request).await;
            drop(permit);
            if let Err(err) = coordinator.prune_lane(task_id) {
                tracing::warn!(
                    task_id = %task_id,
                    error = %err,
                    "could not prune mutation lane"
                );
            }
            outcome
        });

        handle
            .await
            .map_err(|err| TaskMutationError::Interrupted {
                task_id,
                kind,
                reason: err.to_string(),
            })?
    }

    async fn run(
        &self,
        task_id: TaskId,
        request: MutationRequest,
    ) -> TaskMutationResult<MutationOutcome> {
        let mut record = MutationRecord::new(task_id, request.kind());
        let kind = record.kind();
        let mutation_id = record.id();

        record.advance(MutationPhase::Requested)?;
        tracing::info!(
            task_id = %task_id,
            mutation = %kind,
            mutation_id = %mutation_id,
            "requesting task mutation"
        );

        let sent = request.send(&*self.api, task_id).await;
        if let Err(source) = accept_response(kind, sent) {
            record.advance(MutationPhase::Failed)?;
            tracing::warn!(
                task_id = %task_id,
                mutation = %kind,
                mutation_id = %mutation_id,
                error = %source,
                "task mutation failed"
            );
            return Err(TaskMutationError::Transport {
                task_id,
                kind,
                source,
            });
        }
        record.advance(MutationPhase::Applied)?;

        if kind == MutationKind::Delete {
            self.remove_snapshot(task_id)?;
            record.advance(MutationPhase::Settled)?;
            self.sink.publish(MutationEvent::Deleted { task_id });
            tracing::info!(
                task_id = %task_id,
                mutation = %kind,
                mutation_id = %mutation_id,
                "task mutation settled"
            );
            return Ok(MutationOutcome::Settled { mutation_id, kind });
        }

        record.advance(MutationPhase::Refreshing)?;
        tracing::debug!(
            task_id = %task_id,
            mutation_id = %mutation_id,
            "refreshing task snapshot"
        );
        let refreshed = self.api.find(task_id).await.and_then(|task| {
            if task.id() == task_id {
                Ok(task)
            } else {
                Err(TaskApiError::rejected(format!(
                    "refresh of task {task_id} returned task {}",
                    task.id()
                )))
            }
        });
        let task = match refreshed {
            Ok(task) => task,
            Err(source) => {
                record.advance(MutationPhase::Failed)?;
                tracing::warn!(
                    task_id = %task_id,
                    mutation = %kind,
                    mutation_id = %mutation_id,
                    error = %source,
                    "task mutation applied but refresh failed; snapshot is stale"
                );
                return Err(TaskMutationError::StaleRefresh {
                    task_id,
                    kind,
                    source,
                });
            }
        };

        self.replace_snapshot(task_id, task.clone())?;
        record.advance(MutationPhase::Settled)?;
        self.sink.publish(kind.settled_event(task_id, task));
        tracing::info!(
            task_id = %task_id,
            mutation = %kind,
            mutation_id = %mutation_id,
            "task mutation settled"
        );
        Ok(MutationOutcome::Settled { mutation_id, kind })
    }

    fn lane(&self, task_id: TaskId) -> TaskMutationResult<Lane> {
        let mut lanes = self
            .lanes
            .lock()
            .map_err(|err| TaskMutationError::SnapshotStore(err.to_string()))?;
        Ok(Arc::clone(lanes.entry(task_id).or_default()))
    }

    /// Drops the lane of a task once no mutation holds or awaits it.
    ///
    /// Every holder and waiter owns a clone of the lane, so a lane referenced
    /// only by the map is idle. Lane lookups take the same map lock, which
    /// keeps a new waiter from slipping in between the check and the removal.
    fn prune_lane(&self, task_id: TaskId) -> TaskMutationResult<()> {
        let mut lanes = self
            .lanes
            .lock()
            .map_err(|err| TaskMutationError::SnapshotStore(err.to_string()))?;
        if lanes
            .get(&task_id)
            .is_some_and(|lane| Arc::strong_count(lane) == 1)
        {
            lanes.remove(&task_id);
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn lane_count(&self) -> usize {
        self.lanes.lock().map_or(0, |lanes| lanes.len())
    }

    /// Swaps the held snapshot. Tasks forgotten mid-flight stay forgotten.
    fn replace_snapshot(&self, task_id: TaskId, task: Task) -> TaskMutationResult<()> {
        let mut snapshots = self
            .snapshots
            .write()
            .map_err(|err| TaskMutationError::SnapshotStore(err.to_string()))?;
        if let Some(held) = snapshots.get_mut(&task_id) {
            *held = task;
        }
        Ok(())
    }

    fn remove_snapshot(&self, task_id: TaskId) -> TaskMutationResult<()> {
        self.snapshots
            .write()
            .map_err(|err| TaskMutationError::SnapshotStore(err.to_string()))?
            .remove(&task_id);
        Ok(())
    }
}

/// Interprets the backend's answer to a mutating call.
///
/// Relational calls report `false` when the association was already in the
/// requested state, which counts as success. For deletions and updates
/// `false` means the backend declined.
fn accept_response(
    kind: MutationKind,
    sent: Result<bool, TaskApiError>,
) -> Result<(), TaskApiError> {
    if sent? {
        return Ok(());
    }
    if kind.is_relational() {
        tracing::debug!(mutation = %kind, "association already in requested state");
        return Ok(());
    }
    Err(TaskApiError::rejected(format!("backend declined {kind}")))
}
