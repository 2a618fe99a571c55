//! Mutation kinds, lifecycle phases, and outward events.

use super::{MutationId, MutationPhaseError, Task, TaskId};
use std::fmt;

/// Kind of state-changing operation issued against a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    /// Task deletion.
    Delete,
    /// Partial field update.
    UpdateFields,
    /// User assignment.
    AssignUser,
    /// User unassignment.
    UnassignUser,
    /// Label attachment.
    AddLabel,
    /// Label detachment.
    RemoveLabel,
}

impl MutationKind {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Delete => "delete",
            Self::UpdateFields => "update_fields",
            Self::AssignUser => "assign_user",
            Self::UnassignUser => "unassign_user",
            Self::AddLabel => "add_label",
            Self::RemoveLabel => "remove_label",
        }
    }

    /// Returns `true` for operations that change a task relation rather than
    /// the task itself.
    #[must_use]
    pub const fn is_relational(self) -> bool {
        matches!(
            self,
            Self::AssignUser | Self::UnassignUser | Self::AddLabel | Self::RemoveLabel
        )
    }

    /// Builds the event published when a mutation of this kind settles.
    ///
    /// `Delete` ignores the snapshot since none exists after deletion.
    #[must_use]
    pub fn settled_event(self, task_id: TaskId, task: Task) -> MutationEvent {
        match self {
            Self::Delete => MutationEvent::Deleted { task_id },
            Self::UpdateFields => MutationEvent::Modified { task_id, task },
            Self::AssignUser | Self::UnassignUser => {
                MutationEvent::AssignmentChanged { task_id, task }
            }
            Self::AddLabel | Self::RemoveLabel => MutationEvent::LabelChanged { task_id, task },
        }
    }
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a settled mutation, published to observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationEvent {
    /// The task was deleted.
    Deleted {
        /// Deleted task.
        task_id: TaskId,
    },
    /// Task fields were updated.
    Modified {
        /// Updated task.
        task_id: TaskId,
        /// Fresh snapshot after the update.
        task: Task,
    },
    /// A user was assigned or unassigned.
    AssignmentChanged {
        /// Affected task.
        task_id: TaskId,
        /// Fresh snapshot after the change.
        task: Task,
    },
    /// A label was attached or detached.
    LabelChanged {
        /// Affected task.
        task_id: TaskId,
        /// Fresh snapshot after the change.
        task: Task,
    },
}

impl MutationEvent {
    /// Returns the affected task identifier.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        match self {
            Self::Deleted { task_id }
            | Self::Modified { task_id, .. }
            | Self::AssignmentChanged { task_id, .. }
            | Self::LabelChanged { task_id, .. } => *task_id,
        }
    }

    /// Returns the fresh snapshot carried by the event, if any.
    #[must_use]
    pub const fn task(&self) -> Option<&Task> {
        match self {
            Self::Deleted { .. } => None,
            Self::Modified { task, .. }
            | Self::AssignmentChanged { task, .. }
            | Self::LabelChanged { task, .. } => Some(task),
        }
    }

    /// Consumes the event, returning the carried snapshot.
    #[must_use]
    pub fn into_task(self) -> Option<Task> {
        match self {
            Self::Deleted { .. } => None,
            Self::Modified { task, .. }
            | Self::AssignmentChanged { task, .. }
            | Self::LabelChanged { task, .. } => Some(task),
        }
    }
}

/// Lifecycle phase of one in-flight mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationPhase {
    /// Not yet issued.
    Idle,
    /// The mutating call is in flight.
    Requested,
    /// The mutating call succeeded.
    Applied,
    /// The authoritative task is being fetched.
    Refreshing,
    /// The snapshot was replaced and the event published.
    Settled,
    /// The mutation or its refresh failed.
    Failed,
}

impl MutationPhase {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Requested => "requested",
            Self::Applied => "applied",
            Self::Refreshing => "refreshing",
            Self::Settled => "settled",
            Self::Failed => "failed",
        }
    }

    /// Returns `true` when no further phase change is possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Settled | Self::Failed)
    }

    /// Returns `true` when moving from `self` to `target` is permitted.
    ///
    /// `Applied` may settle directly, which is the path taken by deletions
    /// since there is nothing left to refresh.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Idle, Self::Requested)
                | (Self::Requested, Self::Applied | Self::Failed)
                | (Self::Applied, Self::Refreshing | Self::Settled)
                | (Self::Refreshing, Self::Settled | Self::Failed)
        )
    }
}

impl fmt::Display for MutationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bookkeeping for one mutation as it moves through its phases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    id: MutationId,
    task_id: TaskId,
    kind: MutationKind,
    phase: MutationPhase,
}

impl MutationRecord {
    /// Starts a record in [`MutationPhase::Idle`].
    #[must_use]
    pub fn new(task_id: TaskId, kind: MutationKind) -> Self {
        Self {
            id: MutationId::new(),
            task_id,
            kind,
            phase: MutationPhase::Idle,
        }
    }

    /// Returns the mutation correlation identifier.
    #[must_use]
    pub const fn id(&self) -> MutationId {
        self.id
    }

    /// Returns the target task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the operation kind.
    #[must_use]
    pub const fn kind(&self) -> MutationKind {
        self.kind
    }

    /// Returns the current phase.
    #[must_use]
    pub const fn phase(&self) -> MutationPhase {
        self.phase
    }

    /// Moves the record to `target`.
    ///
    /// # Errors
    ///
    /// Returns [`MutationPhaseError`] when the transition is not permitted.
    pub const fn advance(&mut self, target: MutationPhase) -> Result<(), MutationPhaseError> {
        if !self.phase.can_transition_to(target) {
            return Err(MutationPhaseError {
                from: self.phase.as_str(),
                to: target.as_str(),
            });
        }
        self.phase = target;
        Ok(())
    }
}
