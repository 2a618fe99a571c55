//! Port contracts for the task lifecycle core.
//!
//! Ports define infrastructure-agnostic interfaces used by task services:
//! the backend entity API and the observer receiving settled events.

pub mod api;
pub mod events;

pub use api::{TaskApi, TaskApiError, TaskApiResult, TaskStatusApi};
pub use events::TaskEventSink;
