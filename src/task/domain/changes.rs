//! Partial field maps sent with task updates.

use super::TaskStatusId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field name of the task name.
pub const FIELD_NAME: &str = "name";
/// Field name of the task description.
pub const FIELD_DESCRIPTION: &str = "description";
/// Field name of the task deadline.
pub const FIELD_DEADLINE: &str = "deadline";
/// Field name of the task status reference.
pub const FIELD_TASK_STATUS_ID: &str = "task_status_id";

/// Partial set of task fields to change.
///
/// Only the fields present are sent; absent fields are left untouched by the
/// backend. Explicit `null` clears a nullable field.
///
/// # Examples
///
/// ```
/// use tasklane::task::domain::TaskFieldChanges;
///
/// let changes = TaskFieldChanges::new()
///     .with_name("Write release notes")
///     .with_deadline(None);
///
/// assert_eq!(changes.len(), 2);
/// assert!(changes.as_map().get("deadline").is_some_and(serde_json::Value::is_null));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskFieldChanges(Map<String, Value>);

impl TaskFieldChanges {
    /// Creates an empty change set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the task name.
    #[must_use]
    pub fn with_name(self, name: impl Into<String>) -> Self {
        self.with_field(FIELD_NAME, Value::String(name.into()))
    }

    /// Sets or clears the description.
    #[must_use]
    pub fn with_description(self, description: Option<String>) -> Self {
        self.with_field(
            FIELD_DESCRIPTION,
            description.map_or(Value::Null, Value::String),
        )
    }

    /// Sets or clears the deadline.
    #[must_use]
    pub fn with_deadline(self, deadline: Option<DateTime<Utc>>) -> Self {
        self.with_field(
            FIELD_DEADLINE,
            deadline.map_or(Value::Null, |at| Value::String(at.to_rfc3339())),
        )
    }

    /// Sets or clears the status reference.
    #[must_use]
    pub fn with_status(self, status: Option<TaskStatusId>) -> Self {
        self.with_field(
            FIELD_TASK_STATUS_ID,
            status.map_or(Value::Null, |id| Value::from(id.value())),
        )
    }

    /// Sets an arbitrary field.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.0.insert(key.into(), value);
        self
    }

    /// Returns the underlying JSON object.
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Returns the number of fields to change.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the field names in the change set.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl From<Map<String, Value>> for TaskFieldChanges {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
