//! Task statuses and the directed status graph linking them.

use super::{StatusGraphError, TaskDomainError, TaskStatusId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Direction of an edge in the status graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusEdge {
    /// The suggested follow-up status.
    Next,
    /// The suggested preceding status.
    Prev,
}

impl StatusEdge {
    /// Returns the edge name used in logs and errors.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Next => "next",
            Self::Prev => "prev",
        }
    }
}

/// A node of the status graph.
///
/// Edges are stored by identifier only. They may be missing, may point back
/// at the same status, and `next`/`prev` of two statuses need not agree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TaskStatusRecord", into = "TaskStatusRecord")]
pub struct TaskStatus {
    id: TaskStatusId,
    name: String,
    description: Option<String>,
    default_next: Option<TaskStatusId>,
    default_prev: Option<TaskStatusId>,
}

impl TaskStatus {
    /// Creates a status without edges.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyStatusName`] when the name is blank.
    pub fn new(id: TaskStatusId, name: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = name.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyStatusName);
        }
        Ok(Self {
            id,
            name: trimmed.to_owned(),
            description: None,
            default_next: None,
            default_prev: None,
        })
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the default next edge.
    #[must_use]
    pub const fn with_default_next(mut self, next: Option<TaskStatusId>) -> Self {
        self.default_next = next;
        self
    }

    /// Sets the default prev edge.
    #[must_use]
    pub const fn with_default_prev(mut self, prev: Option<TaskStatusId>) -> Self {
        self.default_prev = prev;
        self
    }

    /// Returns the status identifier.
    #[must_use]
    pub const fn id(&self) -> TaskStatusId {
        self.id
    }

    /// Returns the status name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the default next status identifier, if any.
    #[must_use]
    pub const fn default_next(&self) -> Option<TaskStatusId> {
        self.default_next
    }

    /// Returns the default prev status identifier, if any.
    #[must_use]
    pub const fn default_prev(&self) -> Option<TaskStatusId> {
        self.default_prev
    }

    /// Returns the identifier on the given edge, if any.
    #[must_use]
    pub const fn edge(&self, edge: StatusEdge) -> Option<TaskStatusId> {
        match edge {
            StatusEdge::Next => self.default_next,
            StatusEdge::Prev => self.default_prev,
        }
    }
}

/// Wire representation of a task status.
///
/// The backend encodes a missing edge either as `null` or as `0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStatusRecord {
    /// Status identifier.
    pub id: u64,
    /// Status name.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Raw default next reference.
    #[serde(default)]
    pub default_next_task_status_id: Option<u64>,
    /// Raw default prev reference.
    #[serde(default)]
    pub default_prev_task_status_id: Option<u64>,
}

impl TryFrom<TaskStatusRecord> for TaskStatus {
    type Error = TaskDomainError;

    fn try_from(record: TaskStatusRecord) -> Result<Self, Self::Error> {
        let mut status = Self::new(TaskStatusId::new(record.id)?, record.name)?
            .with_default_next(TaskStatusId::from_reference(
                record.default_next_task_status_id,
            ))
            .with_default_prev(TaskStatusId::from_reference(
                record.default_prev_task_status_id,
            ));
        status.description = record.description;
        Ok(status)
    }
}

impl From<TaskStatus> for TaskStatusRecord {
    fn from(status: TaskStatus) -> Self {
        Self {
            id: status.id.value(),
            name: status.name,
            description: status.description,
            default_next_task_status_id: status.default_next.map(TaskStatusId::value),
            default_prev_task_status_id: status.default_prev.map(TaskStatusId::value),
        }
    }
}

/// A validated set of statuses with referential lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusGraph {
    statuses: HashMap<TaskStatusId, TaskStatus>,
}

impl StatusGraph {
    /// Builds a graph, checking that identifiers are unique and every edge
    /// resolves inside the graph.
    ///
    /// # Errors
    ///
    /// Returns [`StatusGraphError::DuplicateStatus`] or
    /// [`StatusGraphError::DanglingReference`].
    pub fn new(statuses: impl IntoIterator<Item = TaskStatus>) -> Result<Self, StatusGraphError> {
        let mut by_id = HashMap::new();
        for status in statuses {
            let id = status.id();
            if by_id.insert(id, status).is_some() {
                return Err(StatusGraphError::DuplicateStatus(id));
            }
        }

        for status in by_id.values() {
            for edge in [StatusEdge::Next, StatusEdge::Prev] {
                if let Some(target) = status.edge(edge)
                    && !by_id.contains_key(&target)
                {
                    return Err(StatusGraphError::DanglingReference {
                        from: status.id(),
                        edge: edge.as_str(),
                        target,
                    });
                }
            }
        }

        Ok(Self { statuses: by_id })
    }

    /// Returns the status with the given identifier.
    #[must_use]
    pub fn get(&self, id: TaskStatusId) -> Option<&TaskStatus> {
        self.statuses.get(&id)
    }

    /// Returns the default next status of `id`.
    #[must_use]
    pub fn next_of(&self, id: TaskStatusId) -> Option<&TaskStatus> {
        self.neighbour_of(id, StatusEdge::Next)
    }

    /// Returns the default prev status of `id`.
    #[must_use]
    pub fn prev_of(&self, id: TaskStatusId) -> Option<&TaskStatus> {
        self.neighbour_of(id, StatusEdge::Prev)
    }

    /// Returns the neighbour of `id` along `edge`.
    #[must_use]
    pub fn neighbour_of(&self, id: TaskStatusId, edge: StatusEdge) -> Option<&TaskStatus> {
        self.get(id)
            .and_then(|status| status.edge(edge))
            .and_then(|target| self.get(target))
    }

    /// Removes a status, leaving edges that pointed at it dangling.
    ///
    /// Models an administrative deletion made behind the core's back.
    pub fn remove(&mut self, id: TaskStatusId) -> Option<TaskStatus> {
        self.statuses.remove(&id)
    }

    /// Returns the number of statuses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    /// Returns `true` when the graph holds no statuses.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }
}
