//! Shared fixtures, clocks and API doubles for task unit tests.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use mockall::mock;
use tokio::sync::Notify;

use crate::task::{
    adapters::memory::InMemoryTaskApi,
    domain::{
        LabelId, StatusGraph, Task, TaskFieldChanges, TaskId, TaskLabel, TaskStatus, TaskStatusId,
        User, UserId,
    },
    ports::{TaskApi, TaskApiResult, TaskStatusApi},
};

mock! {
    pub Api {}

    #[async_trait]
    impl TaskApi for Api {
        async fn find(&self, id: TaskId) -> TaskApiResult<Task>;
        async fn delete_by_id(&self, id: TaskId) -> TaskApiResult<bool>;
        async fn update(&self, id: TaskId, changes: &TaskFieldChanges) -> TaskApiResult<bool>;
        async fn add_assignment(&self, task_id: TaskId, user_id: UserId) -> TaskApiResult<bool>;
        async fn remove_assignment(&self, task_id: TaskId, user_id: UserId) -> TaskApiResult<bool>;
        async fn add_label(&self, task_id: TaskId, label_id: LabelId) -> TaskApiResult<bool>;
        async fn remove_label(&self, task_id: TaskId, label_id: LabelId) -> TaskApiResult<bool>;
    }
}

mock! {
    pub StatusApi {}

    #[async_trait]
    impl TaskStatusApi for StatusApi {
        async fn find_status_by_id(&self, id: TaskStatusId) -> TaskApiResult<TaskStatus>;
    }
}

/// Clock frozen at a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    pub const fn at(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

pub fn utc(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .expect("valid calendar date")
}

pub fn task_id(raw: u64) -> TaskId {
    TaskId::new(raw).expect("valid task id")
}

pub fn user_id(raw: u64) -> UserId {
    UserId::new(raw).expect("valid user id")
}

pub fn label_id(raw: u64) -> LabelId {
    LabelId::new(raw).expect("valid label id")
}

pub fn status_id(raw: u64) -> TaskStatusId {
    TaskStatusId::new(raw).expect("valid status id")
}

pub fn status(id: u64, name: &str, next: Option<u64>, prev: Option<u64>) -> TaskStatus {
    TaskStatus::new(status_id(id), name)
        .expect("valid status")
        .with_default_next(TaskStatusId::from_reference(next))
        .with_default_prev(TaskStatusId::from_reference(prev))
}

/// `todo -> doing -> done`, with matching prev edges.
pub fn workflow_graph() -> StatusGraph {
    StatusGraph::new([
        status(1, "todo", Some(2), None),
        status(2, "doing", Some(3), Some(1)),
        status(3, "done", None, Some(2)),
    ])
    .expect("valid workflow graph")
}

/// Task 7 in `todo`, due 2024-01-10, with no relations.
pub fn sample_task() -> Task {
    Task::new(task_id(7), "Write release notes")
        .expect("valid task")
        .with_deadline(Some(utc(2024, 1, 10)))
        .with_status(Some(status(1, "todo", Some(2), None)))
}

/// Backend seeded with the workflow graph, users 3 and 4, labels 10 and 11,
/// and [`sample_task`].
pub fn seeded_api() -> InMemoryTaskApi {
    let api = InMemoryTaskApi::with_statuses(workflow_graph());
    api.insert_user(User::new(user_id(3), "franco").with_email("pm@example.com"))
        .expect("insert user 3");
    api.insert_user(User::new(user_id(4), "ada")).expect("insert user 4");
    api.insert_label(TaskLabel::new(label_id(10), "backend"))
        .expect("insert label 10");
    api.insert_label(TaskLabel::new(label_id(11), "urgent").with_colour("#d33"))
        .expect("insert label 11");
    api.insert_task(sample_task()).expect("insert sample task");
    api
}

/// In-memory API whose `add_label` parks until released.
///
/// `entered` is notified once the call has reached the backend.
pub struct GatedApi {
    pub inner: InMemoryTaskApi,
    pub entered: Arc<Notify>,
    pub release: Arc<Notify>,
}

impl GatedApi {
    pub fn new(inner: InMemoryTaskApi) -> Self {
        Self {
            inner,
            entered: Arc::new(Notify::new()),
            release: Arc::new(Notify::new()),
        }
    }
}

#[async_trait]
impl TaskApi for GatedApi {
    async fn find(&self, id: TaskId) -> TaskApiResult<Task> {
        self.inner.find(id).await
    }

    async fn delete_by_id(&self, id: TaskId) -> TaskApiResult<bool> {
        self.inner.delete_by_id(id).await
    }

    async fn update(&self, id: TaskId, changes: &TaskFieldChanges) -> TaskApiResult<bool> {
        self.inner.update(id, changes).await
    }

    async fn add_assignment(&self, task_id: TaskId, user_id: UserId) -> TaskApiResult<bool> {
        self.inner.add_assignment(task_id, user_id).await
    }

    async fn remove_assignment(&self, task_id: TaskId, user_id: UserId) -> TaskApiResult<bool> {
        self.inner.remove_assignment(task_id, user_id).await
    }

    async fn add_label(&self, task_id: TaskId, label_id: LabelId) -> TaskApiResult<bool> {
        self.entered.notify_one();
        self.release.notified().await;
        self.inner.add_label(task_id, label_id).await
    }

    async fn remove_label(&self, task_id: TaskId, label_id: LabelId) -> TaskApiResult<bool> {
        self.inner.remove_label(task_id, label_id).await
    }
}
