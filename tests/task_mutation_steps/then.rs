//! Then steps for task mutation BDD scenarios.

use super::world::{TaskMutationWorld, task_id};
use chrono::{DateTime, Utc};
use eyre::WrapErr;
use rstest_bdd_macros::then;
use tasklane::task::{
    domain::{MutationEvent, UserId, classify_deadline},
    services::{MutationOutcome, StatusStepError},
};

#[then("the event count for task {id:u64} is {count:usize}")]
fn event_count(world: &TaskMutationWorld, id: u64, count: usize) -> Result<(), eyre::Report> {
    let published = world.sink.events_for(task_id(id)?).len();
    eyre::ensure!(
        published == count,
        "expected {count} events for task {id}, found {published}"
    );
    Ok(())
}

#[then(r#"the last event for task {id:u64} is "{kind}""#)]
fn last_event_kind(world: &TaskMutationWorld, id: u64, kind: String) -> Result<(), eyre::Report> {
    let events = world.sink.events_for(task_id(id)?);
    let last = events
        .last()
        .ok_or_else(|| eyre::eyre!("no events published for task {id}"))?;
    let actual = match last {
        MutationEvent::Deleted { .. } => "deleted",
        MutationEvent::Modified { .. } => "modified",
        MutationEvent::AssignmentChanged { .. } => "assignment",
        MutationEvent::LabelChanged { .. } => "label",
    };
    eyre::ensure!(actual == kind, "expected {kind} event, found {last:?}");
    Ok(())
}

#[then(r#"the snapshot of task {id:u64} is named "{name}""#)]
fn snapshot_named(world: &TaskMutationWorld, id: u64, name: String) -> Result<(), eyre::Report> {
    let task = world.snapshot(task_id(id)?)?;
    eyre::ensure!(task.name() == name, "expected name {name}, found {}", task.name());
    Ok(())
}

#[then(r#"the snapshot of task {id:u64} has status "{status}""#)]
fn snapshot_status(world: &TaskMutationWorld, id: u64, status: String) -> Result<(), eyre::Report> {
    let task = world.snapshot(task_id(id)?)?;
    let actual = task.status().map(|current| current.name());
    eyre::ensure!(
        actual == Some(status.as_str()),
        "expected status {status}, found {actual:?}"
    );
    Ok(())
}

#[then("the snapshot of task {id:u64} lists user {user:u64} once")]
fn snapshot_lists_user_once(
    world: &TaskMutationWorld,
    id: u64,
    user: u64,
) -> Result<(), eyre::Report> {
    let user_id = UserId::new(user)?;
    let task = world.snapshot(task_id(id)?)?;
    let occurrences = task
        .assigned_users()
        .filter(|assigned| assigned.id() == user_id)
        .count();
    eyre::ensure!(
        occurrences == 1,
        "expected user {user} once, found {occurrences} times"
    );
    Ok(())
}

#[then("the last mutation settled")]
fn last_mutation_settled(world: &TaskMutationWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_outcome
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing mutation result"))?;
    eyre::ensure!(
        matches!(result, Ok(outcome) if outcome.is_settled()),
        "expected a settled mutation, got {result:?}"
    );
    Ok(())
}

#[then("the last mutation was skipped")]
fn last_mutation_skipped(world: &TaskMutationWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_outcome
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing mutation result"))?;
    eyre::ensure!(
        matches!(result, Ok(MutationOutcome::Skipped)),
        "expected a skipped mutation, got {result:?}"
    );
    Ok(())
}

#[then("task {id:u64} is no longer tracked")]
fn no_longer_tracked(world: &TaskMutationWorld, id: u64) -> Result<(), eyre::Report> {
    let tracked = world
        .coordinator
        .is_tracked(task_id(id)?)
        .wrap_err("read tracking state")?;
    eyre::ensure!(!tracked, "task {id} is still tracked");
    Ok(())
}

#[then("the step fails because the next status is unavailable")]
fn step_fails_unavailable(world: &TaskMutationWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_step
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing step result"))?;
    eyre::ensure!(
        matches!(
            result,
            Err(StatusStepError::NeighbourUnavailable { edge: "next", .. })
        ),
        "expected NeighbourUnavailable error, got {result:?}"
    );
    Ok(())
}

#[then(r#"a deadline of "{deadline}" seen at "{now}" is "{level}""#)]
fn deadline_level(
    world: &TaskMutationWorld,
    deadline: String,
    now: String,
    level: String,
) -> Result<(), eyre::Report> {
    let due = parse_instant(&deadline)?;
    let observed_at = parse_instant(&now)?;
    let actual = classify_deadline(Some(due), &observed_at, world.thresholds)
        .ok_or_else(|| eyre::eyre!("deadline produced no urgency"))?;
    eyre::ensure!(
        actual.as_str() == level,
        "expected {level} urgency, found {actual}"
    );
    Ok(())
}

fn parse_instant(raw: &str) -> Result<DateTime<Utc>, eyre::Report> {
    DateTime::parse_from_rfc3339(raw)
        .map(|at| at.with_timezone(&Utc))
        .wrap_err_with(|| format!("parse timestamp {raw}"))
}
