//! In-memory entity API for tests and embedding.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::task::{
    domain::{
        FIELD_DEADLINE, FIELD_DESCRIPTION, FIELD_NAME, FIELD_TASK_STATUS_ID, LabelId, StatusGraph,
        Task, TaskFieldChanges, TaskId, TaskLabel, TaskStatus, TaskStatusId, User, UserId,
    },
    ports::{TaskApi, TaskApiError, TaskApiResult, TaskStatusApi},
};

/// Thread-safe in-memory backend holding tasks, statuses, users and labels.
///
/// Enforces the association uniqueness the real backend guarantees: a user
/// is assigned to a task at most once and a label is attached at most once.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskApi {
    state: Arc<RwLock<InMemoryApiState>>,
}

#[derive(Debug, Default)]
struct InMemoryApiState {
    tasks: HashMap<TaskId, Task>,
    statuses: StatusGraph,
    users: HashMap<UserId, User>,
    labels: HashMap<LabelId, TaskLabel>,
}

impl InMemoryTaskApi {
    /// Creates an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend serving the given status graph.
    #[must_use]
    pub fn with_statuses(statuses: StatusGraph) -> Self {
        Self {
            state: Arc::new(RwLock::new(InMemoryApiState {
                statuses,
                ..InMemoryApiState::default()
            })),
        }
    }

    /// Registers a user that can be assigned to tasks.
    ///
    /// # Errors
    ///
    /// Returns [`TaskApiError::Transport`] when the state lock is poisoned.
    pub fn insert_user(&self, user: User) -> TaskApiResult<()> {
        self.write()?.users.insert(user.id(), user);
        Ok(())
    }

    /// Registers a label that can be attached to tasks.
    ///
    /// # Errors
    ///
    /// Returns [`TaskApiError::Transport`] when the state lock is poisoned.
    pub fn insert_label(&self, label: TaskLabel) -> TaskApiResult<()> {
        self.write()?.labels.insert(label.id(), label);
        Ok(())
    }

    /// Stores or replaces a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskApiError::Transport`] when the state lock is poisoned.
    pub fn insert_task(&self, task: Task) -> TaskApiResult<()> {
        self.write()?.tasks.insert(task.id(), task);
        Ok(())
    }

    /// Deletes a status administratively, leaving references to it dangling.
    ///
    /// # Errors
    ///
    /// Returns [`TaskApiError::Transport`] when the state lock is poisoned.
    pub fn remove_status(&self, id: TaskStatusId) -> TaskApiResult<Option<TaskStatus>> {
        Ok(self.write()?.statuses.remove(id))
    }

    fn read(&self) -> TaskApiResult<RwLockReadGuard<'_, InMemoryApiState>> {
        self.state
            .read()
            .map_err(|err| TaskApiError::transport(std::io::Error::other(err.to_string())))
    }

    fn write(&self) -> TaskApiResult<RwLockWriteGuard<'_, InMemoryApiState>> {
        self.state
            .write()
            .map_err(|err| TaskApiError::transport(std::io::Error::other(err.to_string())))
    }
}

fn task_mut(state: &mut InMemoryApiState, id: TaskId) -> TaskApiResult<&mut Task> {
    state.tasks.get_mut(&id).ok_or(TaskApiError::TaskNotFound(id))
}

/// Applies one field of a partial update to a working copy.
fn apply_field(
    state: &InMemoryApiState,
    task: &mut Task,
    key: &str,
    value: &Value,
) -> TaskApiResult<()> {
    match key {
        FIELD_NAME => {
            let name = value
                .as_str()
                .ok_or_else(|| TaskApiError::rejected("name must be a string"))?;
            task.rename(name)
                .map_err(|err| TaskApiError::rejected(err.to_string()))
        }
        FIELD_DESCRIPTION => {
            let description = optional_string(key, value)?;
            task.set_description(description);
            Ok(())
        }
        FIELD_DEADLINE => {
            let deadline = optional_string(key, value)?
                .map(|raw| {
                    DateTime::parse_from_rfc3339(&raw)
                        .map(|at| at.with_timezone(&Utc))
                        .map_err(|err| TaskApiError::rejected(format!("invalid deadline: {err}")))
                })
                .transpose()?;
            task.set_deadline(deadline);
            Ok(())
        }
        FIELD_TASK_STATUS_ID => {
            let raw = match value {
                Value::Null => None,
                other => Some(other.as_u64().ok_or_else(|| {
                    TaskApiError::rejected("task_status_id must be a non-negative integer")
                })?),
            };
            let status = TaskStatusId::from_reference(raw)
                .map(|id| {
                    state
                        .statuses
                        .get(id)
                        .cloned()
                        .ok_or(TaskApiError::StatusNotFound(id))
                })
                .transpose()?;
            task.set_status(status);
            Ok(())
        }
        unknown => Err(TaskApiError::rejected(format!("unknown task field: {unknown}"))),
    }
}

fn optional_string(key: &str, value: &Value) -> TaskApiResult<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(text) => Ok(Some(text.clone())),
        _ => Err(TaskApiError::rejected(format!(
            "{key} must be a string or null"
        ))),
    }
}

#[async_trait]
impl TaskApi for InMemoryTaskApi {
    async fn find(&self, id: TaskId) -> TaskApiResult<Task> {
        self.read()?
            .tasks
            .get(&id)
            .cloned()
            .ok_or(TaskApiError::TaskNotFound(id))
    }

    async fn delete_by_id(&self, id: TaskId) -> TaskApiResult<bool> {
        Ok(self.write()?.tasks.remove(&id).is_some())
    }

    async fn update(&self, id: TaskId, changes: &TaskFieldChanges) -> TaskApiResult<bool> {
        let mut state = self.write()?;
        let Some(current) = state.tasks.get(&id) else {
            return Ok(false);
        };

        // All fields apply or none do.
        let mut updated = current.clone();
        for (key, value) in changes.as_map() {
            apply_field(&state, &mut updated, key, value)?;
        }
        state.tasks.insert(id, updated);
        Ok(true)
    }

    async fn add_assignment(&self, task_id: TaskId, user_id: UserId) -> TaskApiResult<bool> {
        let mut state = self.write()?;
        let user = state
            .users
            .get(&user_id)
            .cloned()
            .ok_or_else(|| TaskApiError::rejected(format!("unknown user: {user_id}")))?;
        Ok(task_mut(&mut state, task_id)?.assign(user))
    }

    async fn remove_assignment(&self, task_id: TaskId, user_id: UserId) -> TaskApiResult<bool> {
        let mut state = self.write()?;
        Ok(task_mut(&mut state, task_id)?.unassign(user_id))
    }

    async fn add_label(&self, task_id: TaskId, label_id: LabelId) -> TaskApiResult<bool> {
        let mut state = self.write()?;
        let label = state
            .labels
            .get(&label_id)
            .cloned()
            .ok_or_else(|| TaskApiError::rejected(format!("unknown label: {label_id}")))?;
        Ok(task_mut(&mut state, task_id)?.attach_label(label))
    }

    async fn remove_label(&self, task_id: TaskId, label_id: LabelId) -> TaskApiResult<bool> {
        let mut state = self.write()?;
        Ok(task_mut(&mut state, task_id)?.detach_label(label_id))
    }
}

#[async_trait]
impl TaskStatusApi for InMemoryTaskApi {
    async fn find_status_by_id(&self, id: TaskStatusId) -> TaskApiResult<TaskStatus> {
        self.read()?
            .statuses
            .get(id)
            .cloned()
            .ok_or(TaskApiError::StatusNotFound(id))
    }
}
