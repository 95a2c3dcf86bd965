//! Board lists, tasks, and moves inside a seeded project.

#![expect(
    clippy::expect_used,
    reason = "Test helpers use expect for assertion clarity"
)]

use super::helpers::{runtime, seed_project, state, user};
use rstest::rstest;
use std::io;
use taskboard::board::{
    domain::{BoardList, Task},
    services::{CreateTaskRequest, TaskMoveRequest, UpdateTaskRequest},
};
use taskboard::http::state::AppState;
use taskboard::identity::Actor;
use taskboard::workspace::domain::Project;
use tokio::runtime::Runtime;

fn list_with(
    rt: &Runtime,
    state: &AppState,
    actor: &Actor,
    project: &Project,
    title: &str,
    tasks: &[&str],
) -> (BoardList, Vec<Task>) {
    let list = rt
        .block_on(state.tasks.create_list(actor, project.id(), title))
        .expect("create list");
    let created = tasks
        .iter()
        .map(|task_title| {
            rt.block_on(state.tasks.create_task(
                actor,
                CreateTaskRequest::new(project.id(), list.id(), *task_title),
            ))
            .expect("create task")
        })
        .collect();
    (list, created)
}

fn titles(rt: &Runtime, state: &AppState, project: &Project, list: &BoardList) -> Vec<String> {
    rt.block_on(state.tasks.tasks_in_list(project.id(), list.id()))
        .expect("tasks in list")
        .iter()
        .map(|task| format!("{}:{}", task.title().as_str(), task.order().value()))
        .collect()
}

#[rstest]
fn dragging_between_lists_keeps_both_lists_dense(
    runtime: io::Result<Runtime>,
    state: AppState,
) {
    let rt = runtime.expect("runtime");
    let owner = user(1);
    let (_, project) = seed_project(&rt, &state, &owner, false).expect("seed");
    let (todo, todo_tasks) = list_with(&rt, &state, &owner, &project, "To do", &["A", "B", "C"]);
    let (done, _) = list_with(&rt, &state, &owner, &project, "Done", &["X"]);

    let outcome = rt
        .block_on(state.reorder.apply(
            project.id(),
            TaskMoveRequest::across_lists(todo_tasks[1].id(), todo.id(), done.id(), 1),
        ))
        .expect("move task");

    assert_eq!(outcome.updated, 4);
    assert_eq!(titles(&rt, &state, &project, &todo), ["A:1", "C:2"]);
    assert_eq!(titles(&rt, &state, &project, &done), ["B:1", "X:2"]);

    let summaries = rt
        .block_on(state.tasks.lists_for_project(project.id()))
        .expect("list summaries");
    let counts: Vec<u64> = summaries.iter().map(|summary| summary.task_count).collect();
    assert_eq!(counts, [2, 2]);
}

#[rstest]
fn archived_tasks_stay_findable_by_slug(runtime: io::Result<Runtime>, state: AppState) {
    let rt = runtime.expect("runtime");
    let owner = user(1);
    let (_, project) = seed_project(&rt, &state, &owner, false).expect("seed");
    let (_, tasks) = list_with(&rt, &state, &owner, &project, "To do", &["Ship it"]);
    let slug = tasks[0]
        .slug()
        .map(|slug| slug.as_str().to_owned())
        .expect("task slug");

    rt.block_on(
        state
            .tasks
            .update_task(tasks[0].id(), UpdateTaskRequest::new().with_archived(true)),
    )
    .expect("archive task");

    let archived = rt
        .block_on(state.tasks.archived_tasks(project.id()))
        .expect("archived tasks");
    assert_eq!(archived.len(), 1);
    let by_slug = rt.block_on(state.tasks.find_task(&slug)).expect("find by slug");
    assert!(by_slug.is_archived());
}

#[rstest]
fn explicit_orders_are_written_as_given(runtime: io::Result<Runtime>, state: AppState) {
    let rt = runtime.expect("runtime");
    let owner = user(1);
    let (_, project) = seed_project(&rt, &state, &owner, false).expect("seed");
    let (list, tasks) = list_with(&rt, &state, &owner, &project, "To do", &["A", "B"]);

    let updated = rt
        .block_on(
            state
                .tasks
                .update_orders(&[(tasks[0].id(), 2), (tasks[1].id(), 1)]),
        )
        .expect("update orders");

    assert_eq!(updated, 2);
    assert_eq!(titles(&rt, &state, &project, &list), ["B:1", "A:2"]);
    let count = rt
        .block_on(state.tasks.count_in_list(list.id()))
        .expect("count");
    assert_eq!(count, 2);
}

#[rstest]
fn deleting_a_workspace_clears_every_board_it_held(
    runtime: io::Result<Runtime>,
    state: AppState,
) {
    let rt = runtime.expect("runtime");
    let owner = user(1);
    let (workspace, project) = seed_project(&rt, &state, &owner, false).expect("seed");
    let (todo, tasks) = list_with(&rt, &state, &owner, &project, "To do", &["A", "B"]);
    rt.block_on(state.projects.toggle_star(&owner, project.id()))
        .expect("star");

    rt.block_on(state.workspaces.delete(&owner, workspace.id()))
        .expect("delete workspace");
    let purged = rt
        .block_on(state.projects.purge_workspace(workspace.id()))
        .expect("purge projects");
    for project_id in &purged {
        rt.block_on(state.tasks.purge_project(*project_id))
            .expect("purge board");
    }

    assert_eq!(purged, [project.id()]);
    assert!(rt.block_on(state.tasks.find_list(todo.id())).is_err());
    for task in &tasks {
        assert!(rt.block_on(state.tasks.find_task(&task.id().to_string())).is_err());
    }
    assert!(
        rt.block_on(state.projects.starred(&owner))
            .expect("starred")
            .is_empty()
    );
}
