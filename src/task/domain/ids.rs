//! Identifier types for the task domain.
//!
//! Every entity the core touches is addressed by a positive integer assigned
//! by the backend. Zero is never a valid identifier; on the wire it stands
//! for "no reference".

use super::TaskDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! positive_id {
    ($(#[$meta:meta])* $name:ident, $entity:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "u64", into = "u64")]
        pub struct $name(u64);

        impl $name {
            /// Creates a validated identifier.
            ///
            /// # Errors
            ///
            /// Returns [`TaskDomainError::InvalidIdentifier`] when the value
            /// is zero.
            pub const fn new(value: u64) -> Result<Self, TaskDomainError> {
                if value == 0 {
                    return Err(TaskDomainError::InvalidIdentifier {
                        entity: $entity,
                        value,
                    });
                }
                Ok(Self(value))
            }

            /// Interprets a raw wire reference, mapping zero and `None` to
            /// "no reference".
            #[must_use]
            pub const fn from_reference(value: Option<u64>) -> Option<Self> {
                match value {
                    Some(raw) if raw > 0 => Some(Self(raw)),
                    _ => None,
                }
            }

            /// Returns the underlying numeric value.
            #[must_use]
            pub const fn value(self) -> u64 {
                self.0
            }
        }

        impl TryFrom<u64> for $name {
            type Error = TaskDomainError;

            fn try_from(value: u64) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

positive_id!(
    /// Backend identifier of a task.
    TaskId,
    "task"
);

positive_id!(
    /// Backend identifier of a user that can be assigned to tasks.
    UserId,
    "user"
);

positive_id!(
    /// Backend identifier of a task label.
    LabelId,
    "label"
);

positive_id!(
    /// Backend identifier of a node in the status graph.
    TaskStatusId,
    "task status"
);

/// Correlation identifier for one in-flight mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MutationId(Uuid);

impl MutationId {
    /// Creates a new random mutation identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for MutationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MutationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
