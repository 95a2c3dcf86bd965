//! Axum handlers grouped by resource.

pub mod board;
pub mod health;
pub mod project;
pub mod workspace;

use super::{error::ApiErrorResponse, state::AppState};
use crate::identity::Actor;
use crate::workspace::domain::Project;

/// Loads a project the caller may access, by id or slug.
pub(crate) async fn accessible_project(
    state: &AppState,
    actor: &Actor,
    uid: &str,
) -> Result<Project, ApiErrorResponse> {
    Ok(state.projects.find_for_actor(actor, uid).await?)
}
