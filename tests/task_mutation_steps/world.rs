//! Shared world state for task mutation BDD scenarios.

use std::sync::Arc;

use eyre::WrapErr;
use rstest::fixture;
use tasklane::task::{
    adapters::memory::{InMemoryTaskApi, RecordingEventSink},
    domain::{
        LabelId, StatusGraph, Task, TaskId, TaskLabel, TaskStatus, TaskStatusId,
        UrgencyThresholds, User, UserId,
    },
    services::{
        MutationOutcome, StatusNeighbourResolver, StatusStepResult, StatusWorkflowService,
        TaskMutationCoordinator, TaskMutationResult,
    },
};

/// Coordinator type used by the BDD world.
pub type TestCoordinator = TaskMutationCoordinator<InMemoryTaskApi, RecordingEventSink>;

/// Workflow service type used by the BDD world.
pub type TestWorkflow =
    StatusWorkflowService<InMemoryTaskApi, InMemoryTaskApi, RecordingEventSink>;

/// Scenario world for task mutation behaviour tests.
pub struct TaskMutationWorld {
    pub api: Arc<InMemoryTaskApi>,
    pub sink: Arc<RecordingEventSink>,
    pub coordinator: TestCoordinator,
    pub workflow: TestWorkflow,
    pub thresholds: UrgencyThresholds,
    pub last_outcome: Option<TaskMutationResult<MutationOutcome>>,
    pub last_step: Option<StatusStepResult<MutationOutcome>>,
}

impl TaskMutationWorld {
    /// Creates a world backed by a seeded in-memory API.
    ///
    /// # Errors
    ///
    /// Returns an error when the seed data is inconsistent.
    pub fn new() -> Result<Self, eyre::Report> {
        let api = Arc::new(InMemoryTaskApi::with_statuses(seed_statuses()?));
        seed_directory(&api)?;
        let sink = Arc::new(RecordingEventSink::new());
        let coordinator = TaskMutationCoordinator::new(Arc::clone(&api), Arc::clone(&sink));
        let workflow = StatusWorkflowService::new(
            coordinator.clone(),
            StatusNeighbourResolver::new(Arc::clone(&api)),
        );

        Ok(Self {
            api,
            sink,
            coordinator,
            workflow,
            thresholds: UrgencyThresholds::default(),
            last_outcome: None,
            last_step: None,
        })
    }

    /// Returns the settled snapshot of a tracked task.
    ///
    /// # Errors
    ///
    /// Returns an error when the task is not tracked.
    pub fn snapshot(&self, task_id: TaskId) -> Result<Task, eyre::Report> {
        self.coordinator
            .snapshot(task_id)
            .wrap_err("read task snapshot")?
            .ok_or_else(|| eyre::eyre!("task {task_id} is not tracked"))
    }
}

/// Fixture that creates a new scenario world.
///
/// # Panics
///
/// Panics when the seed data cannot be loaded.
#[fixture]
pub fn world() -> TaskMutationWorld {
    TaskMutationWorld::new().unwrap_or_else(|err| panic!("seed scenario world: {err:?}"))
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Parses a task identifier from a step argument.
///
/// # Errors
///
/// Returns an error when the identifier is zero.
pub fn task_id(raw: u64) -> Result<TaskId, eyre::Report> {
    TaskId::new(raw).wrap_err("task id in scenario")
}

fn status_id(raw: u64) -> Result<TaskStatusId, eyre::Report> {
    TaskStatusId::new(raw).wrap_err("status id in scenario")
}

fn seed_statuses() -> Result<StatusGraph, eyre::Report> {
    let todo = TaskStatus::new(status_id(1)?, "todo")?.with_default_next(Some(status_id(2)?));
    let doing = TaskStatus::new(status_id(2)?, "doing")?
        .with_default_next(Some(status_id(3)?))
        .with_default_prev(Some(status_id(1)?));
    let done = TaskStatus::new(status_id(3)?, "done")?.with_default_prev(Some(status_id(2)?));
    StatusGraph::new([todo, doing, done]).wrap_err("seed status graph")
}

fn seed_directory(api: &InMemoryTaskApi) -> Result<(), eyre::Report> {
    api.insert_user(User::new(UserId::new(3)?, "franco"))?;
    api.insert_user(User::new(UserId::new(4)?, "ada"))?;
    api.insert_label(TaskLabel::new(LabelId::new(10)?, "backend"))?;
    api.insert_label(TaskLabel::new(LabelId::new(11)?, "urgent"))?;
    Ok(())
}
