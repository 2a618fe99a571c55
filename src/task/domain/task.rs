//! Task snapshot and its relational records.

use super::{LabelId, TaskDomainError, TaskId, TaskStatus, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user that can be assigned to tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    username: String,
    #[serde(default)]
    email: Option<String>,
}

impl User {
    /// Creates a user record.
    #[must_use]
    pub fn new(id: UserId, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            email: None,
        }
    }

    /// Sets the e-mail address.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the e-mail address, if known.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}

/// A label that can be attached to tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskLabel {
    id: LabelId,
    name: String,
    #[serde(default)]
    colour: Option<String>,
}

impl TaskLabel {
    /// Creates a label record.
    #[must_use]
    pub fn new(id: LabelId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            colour: None,
        }
    }

    /// Sets the display colour.
    #[must_use]
    pub fn with_colour(mut self, colour: impl Into<String>) -> Self {
        self.colour = Some(colour.into());
        self
    }

    /// Returns the label identifier.
    #[must_use]
    pub const fn id(&self) -> LabelId {
        self.id
    }

    /// Returns the label name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the display colour, if any.
    #[must_use]
    pub fn colour(&self) -> Option<&str> {
        self.colour.as_deref()
    }
}

/// Association between a task and an assigned user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskAssignment {
    user: User,
    task_id: TaskId,
}

impl TaskAssignment {
    /// Creates an assignment record.
    #[must_use]
    pub const fn new(task_id: TaskId, user: User) -> Self {
        Self { user, task_id }
    }

    /// Returns the assigned user.
    #[must_use]
    pub const fn user(&self) -> &User {
        &self.user
    }

    /// Returns the task the user is assigned to.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }
}

/// Point-in-time snapshot of a task as returned by the backend.
///
/// Snapshots are replaced wholesale after every mutation and never patched
/// field by field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    deadline: Option<DateTime<Utc>>,
    #[serde(default, rename = "task_status")]
    status: Option<TaskStatus>,
    #[serde(default)]
    assigned_users: Vec<TaskAssignment>,
    #[serde(default)]
    labels: Vec<TaskLabel>,
}

impl Task {
    /// Creates a task without deadline, status or relations.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTaskName`] when the name is blank.
    pub fn new(id: TaskId, name: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = name.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyTaskName);
        }
        Ok(Self {
            id,
            name: trimmed.to_owned(),
            description: None,
            deadline: None,
            status: None,
            assigned_users: Vec::new(),
            labels: Vec::new(),
        })
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the deadline.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: Option<DateTime<Utc>>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Sets the current status.
    #[must_use]
    pub fn with_status(mut self, status: Option<TaskStatus>) -> Self {
        self.status = status;
        self
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<DateTime<Utc>> {
        self.deadline
    }

    /// Returns the current status, if set.
    #[must_use]
    pub const fn status(&self) -> Option<&TaskStatus> {
        self.status.as_ref()
    }

    /// Returns the assignment records.
    #[must_use]
    pub fn assignments(&self) -> &[TaskAssignment] {
        &self.assigned_users
    }

    /// Returns the assigned users.
    pub fn assigned_users(&self) -> impl Iterator<Item = &User> {
        self.assigned_users.iter().map(TaskAssignment::user)
    }

    /// Returns `true` when `user_id` is assigned to this task.
    #[must_use]
    pub fn is_assigned(&self, user_id: UserId) -> bool {
        self.assigned_users().any(|user| user.id() == user_id)
    }

    /// Returns the attached labels.
    #[must_use]
    pub fn labels(&self) -> &[TaskLabel] {
        &self.labels
    }

    /// Returns `true` when `label_id` is attached to this task.
    #[must_use]
    pub fn has_label(&self, label_id: LabelId) -> bool {
        self.labels.iter().any(|label| label.id() == label_id)
    }

    /// Renames the task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTaskName`] when the name is blank.
    pub fn rename(&mut self, name: impl Into<String>) -> Result<(), TaskDomainError> {
        let raw = name.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyTaskName);
        }
        trimmed.clone_into(&mut self.name);
        Ok(())
    }

    /// Replaces the description.
    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    /// Replaces the deadline.
    pub const fn set_deadline(&mut self, deadline: Option<DateTime<Utc>>) {
        self.deadline = deadline;
    }

    /// Replaces the current status.
    pub fn set_status(&mut self, status: Option<TaskStatus>) {
        self.status = status;
    }

    /// Assigns a user. Returns `false` when the user was already assigned.
    pub fn assign(&mut self, user: User) -> bool {
        if self.is_assigned(user.id()) {
            return false;
        }
        self.assigned_users.push(TaskAssignment::new(self.id, user));
        true
    }

    /// Unassigns a user. Returns `false` when the user was not assigned.
    pub fn unassign(&mut self, user_id: UserId) -> bool {
        let before = self.assigned_users.len();
        self.assigned_users
            .retain(|assignment| assignment.user().id() != user_id);
        self.assigned_users.len() != before
    }

    /// Attaches a label. Returns `false` when it was already attached.
    pub fn attach_label(&mut self, label: TaskLabel) -> bool {
        if self.has_label(label.id()) {
            return false;
        }
        self.labels.push(label);
        true
    }

    /// Detaches a label. Returns `false` when it was not attached.
    pub fn detach_label(&mut self, label_id: LabelId) -> bool {
        let before = self.labels.len();
        self.labels.retain(|label| label.id() != label_id);
        self.labels.len() != before
    }
}
