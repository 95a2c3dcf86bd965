//! Shared test helpers for in-memory integration tests.

#![expect(
    clippy::expect_used,
    reason = "Test helpers use expect for assertion clarity"
)]

use rstest::fixture;
use std::io;
use taskboard::http::state::AppState;
use taskboard::identity::{Actor, GlobalRole, UserId};
use taskboard::workspace::{
    domain::{Project, Workspace},
    services::{CreateProjectRequest, CreateWorkspaceRequest},
};
use tokio::runtime::Runtime;

/// Boxed error used by fallible helpers.
pub type HelperError = Box<dyn std::error::Error + Send + Sync>;

/// Provides a tokio runtime for async operations in tests.
///
/// # Errors
///
/// Returns an error if the runtime cannot be created.
#[fixture]
pub fn runtime() -> io::Result<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}

/// Provides freshly wired in-memory services for each test.
#[fixture]
pub fn state() -> AppState {
    AppState::in_memory()
}

/// Regular user with the given identifier.
///
/// # Panics
///
/// Panics when `id` is not positive.
#[must_use]
pub fn user(id: i64) -> Actor {
    Actor::user(UserId::new(id).expect("valid user id"))
}

/// Global administrator with the given identifier.
///
/// # Panics
///
/// Panics when `id` is not positive.
#[must_use]
pub fn admin(id: i64) -> Actor {
    Actor::new(UserId::new(id).expect("valid user id"), GlobalRole::Admin)
}

/// Creates a workspace owned by `owner` holding one project.
///
/// # Errors
///
/// Returns an error if either create call fails.
pub fn seed_project(
    rt: &Runtime,
    state: &AppState,
    owner: &Actor,
    is_private: bool,
) -> Result<(Workspace, Project), HelperError> {
    let workspace = rt.block_on(
        state
            .workspaces
            .create(owner, CreateWorkspaceRequest::new("Platform team")),
    )?;
    let project = rt.block_on(state.projects.create(
        owner,
        CreateProjectRequest::new(workspace.id(), "Release train").private(is_private),
    ))?;
    Ok((workspace, project))
}
