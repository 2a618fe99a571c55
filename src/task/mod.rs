//! Task lifecycle core.
//!
//! Holds the status graph model, the deadline urgency classifier, and the
//! mutate-then-refresh protocol applied to every task-changing operation.
//! The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
