//! When steps for task mutation BDD scenarios.

use super::world::{TaskMutationWorld, run_async, task_id};
use rstest_bdd_macros::when;
use tasklane::task::domain::{LabelId, TaskFieldChanges, UserId};

#[when(r#"task {id:u64} is renamed to "{name}""#)]
fn rename_task(world: &mut TaskMutationWorld, id: u64, name: String) -> Result<(), eyre::Report> {
    let changes = TaskFieldChanges::new().with_name(name);
    let result = run_async(world.coordinator.update_fields(task_id(id)?, changes));
    world.last_outcome = Some(result);
    Ok(())
}

#[when("user {user:u64} is assigned to task {id:u64}")]
fn assign_user(world: &mut TaskMutationWorld, user: u64, id: u64) -> Result<(), eyre::Report> {
    let result = run_async(world.coordinator.assign_user(task_id(id)?, UserId::new(user)?));
    world.last_outcome = Some(result);
    Ok(())
}

#[when("label {label:u64} is added to task {id:u64}")]
fn add_label(world: &mut TaskMutationWorld, label: u64, id: u64) -> Result<(), eyre::Report> {
    let result = run_async(world.coordinator.add_label(task_id(id)?, LabelId::new(label)?));
    world.last_outcome = Some(result);
    Ok(())
}

#[when("label {label:u64} is removed from task {id:u64}")]
fn remove_label(world: &mut TaskMutationWorld, label: u64, id: u64) -> Result<(), eyre::Report> {
    let result = run_async(
        world
            .coordinator
            .remove_label(task_id(id)?, LabelId::new(label)?),
    );
    world.last_outcome = Some(result);
    Ok(())
}

#[when("task {id:u64} is deleted")]
fn delete_task(world: &mut TaskMutationWorld, id: u64) -> Result<(), eyre::Report> {
    let result = run_async(world.coordinator.delete(task_id(id)?));
    world.last_outcome = Some(result);
    Ok(())
}

#[when("task {id:u64} is advanced")]
fn advance_task(world: &mut TaskMutationWorld, id: u64) -> Result<(), eyre::Report> {
    let result = run_async(world.workflow.advance(task_id(id)?));
    world.last_step = Some(result);
    Ok(())
}
