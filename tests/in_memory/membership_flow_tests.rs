//! Membership gating of workspaces and projects.

use super::helpers::{admin, runtime, seed_project, state, user};
use rstest::rstest;
use std::io;
use taskboard::http::state::AppState;
use taskboard::workspace::services::{
    CreateWorkspaceRequest, MembershipChange, ProjectServiceError, StarChange,
};
use tokio::runtime::Runtime;

#[rstest]
fn creator_becomes_admin_of_the_new_workspace(
    runtime: io::Result<Runtime>,
    state: AppState,
) {
    let rt = runtime.expect("runtime");
    let owner = user(1);
    let workspace = rt
        .block_on(
            state
                .workspaces
                .create(&owner, CreateWorkspaceRequest::new("Design Ops")),
        )
        .expect("create workspace");

    assert_eq!(workspace.slug().map(|slug| slug.as_str()), Some("Design-Ops"));
    let members = rt
        .block_on(state.workspaces.members(workspace.id()))
        .expect("members");
    assert_eq!(members.len(), 1);
    assert!(members.iter().all(|member| member.is_admin()));
    let mine = rt.block_on(state.workspaces.mine(&owner)).expect("mine");
    assert_eq!(mine.len(), 1);
}

#[rstest]
fn joining_a_workspace_grants_access_to_public_projects(
    runtime: io::Result<Runtime>,
    state: AppState,
) {
    let rt = runtime.expect("runtime");
    let owner = user(1);
    let teammate = user(2);
    let (workspace, project) = seed_project(&rt, &state, &owner, false).expect("seed");
    let uid = project.id().to_string();

    let before = rt.block_on(state.projects.find_for_actor(&teammate, &uid));
    assert!(matches!(before, Err(ProjectServiceError::NotFound(_))));

    let change = rt
        .block_on(
            state
                .workspaces
                .toggle_member(&owner, workspace.id(), teammate.user_id()),
        )
        .expect("add member");
    assert!(matches!(change, MembershipChange::Added(_)));

    let found = rt
        .block_on(state.projects.find_for_actor(&teammate, &uid))
        .expect("member sees project");
    assert_eq!(found.id(), project.id());
    let memberships = rt
        .block_on(state.workspaces.memberships(&teammate))
        .expect("memberships");
    assert_eq!(memberships.len(), 1);
    assert!(rt.block_on(state.workspaces.mine(&teammate)).expect("mine").is_empty());
}

#[rstest]
fn leaving_a_workspace_revokes_access(runtime: io::Result<Runtime>, state: AppState) {
    let rt = runtime.expect("runtime");
    let owner = user(1);
    let teammate = user(2);
    let (workspace, project) = seed_project(&rt, &state, &owner, false).expect("seed");

    for _ in 0..2 {
        rt.block_on(
            state
                .workspaces
                .toggle_member(&owner, workspace.id(), teammate.user_id()),
        )
        .expect("toggle member");
    }

    let after = rt.block_on(
        state
            .projects
            .find_for_actor(&teammate, &project.id().to_string()),
    );
    assert!(matches!(after, Err(ProjectServiceError::NotFound(_))));
}

#[rstest]
fn private_projects_are_hidden_from_other_members(
    runtime: io::Result<Runtime>,
    state: AppState,
) {
    let rt = runtime.expect("runtime");
    let owner = user(1);
    let teammate = user(2);
    let operator = admin(3);
    let (workspace, project) = seed_project(&rt, &state, &owner, true).expect("seed");
    for member in [&teammate, &operator] {
        rt.block_on(
            state
                .workspaces
                .toggle_member(&owner, workspace.id(), member.user_id()),
        )
        .expect("add member");
    }
    let uid = project.id().to_string();

    let denied = rt.block_on(state.projects.find_for_actor(&teammate, &uid));
    assert!(matches!(denied, Err(ProjectServiceError::Forbidden { .. })));
    let listed = rt
        .block_on(state.projects.list_for_workspace(&teammate, workspace.id()))
        .expect("list projects");
    assert!(listed.is_empty());

    let seen = rt
        .block_on(state.projects.find_for_actor(&operator, &uid))
        .expect("admin sees private project");
    assert_eq!(seen.id(), project.id());
}

#[rstest]
fn starring_twice_unstars(runtime: io::Result<Runtime>, state: AppState) {
    let rt = runtime.expect("runtime");
    let owner = user(1);
    let (_, project) = seed_project(&rt, &state, &owner, false).expect("seed");

    let first = rt
        .block_on(state.projects.toggle_star(&owner, project.id()))
        .expect("star");
    assert_eq!(first, StarChange::Starred);
    let starred = rt.block_on(state.projects.starred(&owner)).expect("starred");
    assert_eq!(starred.len(), 1);

    let second = rt
        .block_on(state.projects.toggle_star(&owner, project.id()))
        .expect("unstar");
    assert_eq!(second, StarChange::Unstarred);
    assert!(rt.block_on(state.projects.starred(&owner)).expect("starred").is_empty());
}
