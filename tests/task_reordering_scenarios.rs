//! Behaviour tests for drag-and-drop task reordering.

mod task_reordering_steps;

use rstest_bdd_macros::scenario;
use task_reordering_steps::world::{BoardWorld, world};

#[scenario(
    path = "tests/features/task_reordering.feature",
    name = "Move a task to the top of its list"
)]
#[tokio::test(flavor = "multi_thread")]
async fn move_to_top(world: BoardWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/task_reordering.feature",
    name = "Move a task into another list"
)]
#[tokio::test(flavor = "multi_thread")]
async fn move_into_another_list(world: BoardWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/task_reordering.feature",
    name = "Repeating a move leaves the same order"
)]
#[tokio::test(flavor = "multi_thread")]
async fn repeated_move_is_idempotent(world: BoardWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/task_reordering.feature",
    name = "Destinations beyond the end clamp to the last position"
)]
#[tokio::test(flavor = "multi_thread")]
async fn destination_is_clamped(world: BoardWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/task_reordering.feature",
    name = "Moving an unknown task changes nothing"
)]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_task_changes_nothing(world: BoardWorld) {
    let _ = world;
}
