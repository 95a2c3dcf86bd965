//! When steps for task reordering BDD scenarios.

use super::world::{BoardWorld, run_async};
use rstest_bdd_macros::when;
use taskboard::board::{domain::TaskId, services::TaskMoveRequest};

/// Identifier no scenario ever creates.
const UNKNOWN_TASK: i64 = 9_999;

#[when(r#"the task at position {from:i64} of "{list}" is moved to position {to:i64}"#)]
fn move_by_position(
    world: &mut BoardWorld,
    from: i64,
    list: String,
    to: i64,
) -> Result<(), eyre::Report> {
    let list_id = world.list(&list)?.id();
    let request = TaskMoveRequest::within_list(list_id, from, to);
    world.last_move = Some(run_async(world.reorder.apply(world.project_id, request)));
    Ok(())
}

#[when(r#"task "{task}" is moved within "{list}" to position {to:i64}"#)]
fn move_by_id(
    world: &mut BoardWorld,
    task: String,
    list: String,
    to: i64,
) -> Result<(), eyre::Report> {
    let list_id = world.list(&list)?.id();
    let task_id = world.task(&task)?;
    let request = TaskMoveRequest::within_list_by_id(list_id, task_id, to);
    world.last_move = Some(run_async(world.reorder.apply(world.project_id, request)));
    Ok(())
}

#[when(r#"task "{task}" is moved from "{source}" to position {to:i64} of "{destination}""#)]
fn move_across(
    world: &mut BoardWorld,
    task: String,
    source: String,
    to: i64,
    destination: String,
) -> Result<(), eyre::Report> {
    let task_id = world.task(&task)?;
    let request = TaskMoveRequest::across_lists(
        task_id,
        world.list(&source)?.id(),
        world.list(&destination)?.id(),
        to,
    );
    world.last_move = Some(run_async(world.reorder.apply(world.project_id, request)));
    Ok(())
}

#[when(r#"an unknown task is moved from "{source}" to position {to:i64} of "{destination}""#)]
fn move_unknown(
    world: &mut BoardWorld,
    source: String,
    to: i64,
    destination: String,
) -> Result<(), eyre::Report> {
    let task_id = TaskId::new(UNKNOWN_TASK).map_err(|err| eyre::eyre!("{err}"))?;
    let request = TaskMoveRequest::across_lists(
        task_id,
        world.list(&source)?.id(),
        world.list(&destination)?.id(),
        to,
    );
    world.last_move = Some(run_async(world.reorder.apply(world.project_id, request)));
    Ok(())
}
