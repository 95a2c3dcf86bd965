//! Then steps for task reordering BDD scenarios.

use super::world::{BoardWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::then;
use taskboard::board::{domain::ReorderError, services::TaskReorderError};

#[then(r#"the list "{title}" reads "{expected}""#)]
fn list_reads(world: &BoardWorld, title: String, expected: String) -> Result<(), eyre::Report> {
    let list = world.list(&title)?;
    let tasks = run_async(world.lifecycle.tasks_in_list(world.project_id, list.id()))
        .wrap_err("load tasks for assertion")?;
    let actual = tasks
        .iter()
        .map(|task| format!("{}:{}", task.title().as_str(), task.order().value()))
        .collect::<Vec<_>>()
        .join(", ");

    if actual != expected {
        return Err(eyre::eyre!(
            "list {title}: expected {expected}, found {actual}"
        ));
    }
    Ok(())
}

#[then("the move fails because the task was not found")]
fn move_fails_not_found(world: &BoardWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_move
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no move was attempted"))?;
    if !matches!(
        result,
        Err(TaskReorderError::Plan(ReorderError::TaskNotFound(_)))
    ) {
        return Err(eyre::eyre!("expected TaskNotFound, got {result:?}"));
    }
    Ok(())
}
