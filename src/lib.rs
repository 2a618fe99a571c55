//! Tasklane: task lifecycle core for task-tracking clients.
//!
//! This crate models task statuses as a navigable graph, classifies deadlines
//! by urgency, and coordinates every task-changing operation through a
//! mutate, refetch and publish protocol so observers only ever see settled
//! state.
//!
//! # Architecture
//!
//! Tasklane follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for the entity API and event sinks
//! - **Adapters**: Concrete implementations of ports (in-memory, channels)
//!
//! # Modules
//!
//! - [`task`]: Status graph, urgency classification and mutation coordination

pub mod task;
