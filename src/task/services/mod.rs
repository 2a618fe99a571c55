//! Application services for the task lifecycle core.

mod mutation;
mod status_graph;
mod urgency;
mod workflow;

pub use mutation::{
    MutationOutcome, TaskMutationCoordinator, TaskMutationError, TaskMutationResult,
};
pub use status_graph::{Neighbour, StatusNeighbourResolver, StatusNeighbours};
pub use urgency::DeadlineClassifier;
pub use workflow::{StatusStepError, StatusStepResult, StatusWorkflowService};
