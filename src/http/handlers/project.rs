//! Project, visibility, and star handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use super::accessible_project;
use crate::http::{
    dto::{
        ChangeWorkspaceBody, CreateProjectBody, DeletedResponse, ProjectResponse, StarResponse,
        UpdateProjectBody, path_id, required,
    },
    error::ApiErrorResponse,
    extract::ApiJson,
    state::AppState,
};
use crate::identity::Actor;
use crate::workspace::{
    domain::{ProjectId, WorkspaceId},
    services::{CreateProjectRequest, StarChange, UpdateProjectRequest},
};

fn workspace_id(value: i64) -> Result<WorkspaceId, ApiErrorResponse> {
    WorkspaceId::new(value).map_err(|err| ApiErrorResponse::validation(err.to_string()))
}

fn project_id(value: i64) -> Result<ProjectId, ApiErrorResponse> {
    ProjectId::new(value).map_err(|err| ApiErrorResponse::validation(err.to_string()))
}

/// `POST /json/project/create`
///
/// # Errors
///
/// 400 for an invalid title and 403 when the caller is not a member.
pub async fn create(
    State(state): State<AppState>,
    actor: Actor,
    ApiJson(body): ApiJson<CreateProjectBody>,
) -> Result<(StatusCode, Json<ProjectResponse>), ApiErrorResponse> {
    let workspace = workspace_id(required(&body.workspace_id, "workspace_id")?)?;
    let request = CreateProjectRequest::new(workspace, body.title).private(body.is_private);
    let project = state.projects.create(&actor, request).await?;
    Ok((StatusCode::CREATED, Json(ProjectResponse::from(&project))))
}

/// `GET /json/projects/all/{workspace_id}`
///
/// # Errors
///
/// 403 when the caller is not a member of the workspace.
pub async fn list_for_workspace(
    State(state): State<AppState>,
    actor: Actor,
    Path(raw_id): Path<String>,
) -> Result<Json<Vec<ProjectResponse>>, ApiErrorResponse> {
    let workspace = workspace_id(path_id(&raw_id, "workspace_id")?)?;
    let projects = state.projects.list_for_workspace(&actor, workspace).await?;
    Ok(Json(projects.iter().map(ProjectResponse::from).collect()))
}

/// `GET /json/project/{uid}`
///
/// Opening a project records it among the caller's recent projects.
///
/// # Errors
///
/// 404 for unknown or foreign projects and 403 for hidden private ones.
pub async fn find(
    State(state): State<AppState>,
    actor: Actor,
    Path(uid): Path<String>,
) -> Result<Json<ProjectResponse>, ApiErrorResponse> {
    let project = state.projects.open(&actor, &uid).await?;
    Ok(Json(ProjectResponse::from(&project)))
}

/// `GET /json/projects/recent`
///
/// # Errors
///
/// 500 when the store fails.
pub async fn recent(
    State(state): State<AppState>,
    actor: Actor,
) -> Result<Json<Vec<ProjectResponse>>, ApiErrorResponse> {
    let projects = state.projects.recent(&actor).await?;
    Ok(Json(projects.iter().map(ProjectResponse::from).collect()))
}

/// `DELETE /project/destroy/{id}`
///
/// Removes the project with its stars, recent entries, lists, and tasks.
///
/// # Errors
///
/// 404 for an unknown project and 403 unless the caller owns or
/// administers it.
pub async fn destroy(
    State(state): State<AppState>,
    actor: Actor,
    Path(raw_id): Path<String>,
) -> Result<Json<DeletedResponse>, ApiErrorResponse> {
    let id = project_id(path_id(&raw_id, "id")?)?;
    state.projects.delete(&actor, id).await?;
    state.tasks.purge_project(id).await?;
    Ok(Json(DeletedResponse { deleted: true }))
}

/// `POST /project/update/{id}`
///
/// # Errors
///
/// 403 unless the caller owns or administers the project.
pub async fn update(
    State(state): State<AppState>,
    actor: Actor,
    Path(raw_id): Path<String>,
    ApiJson(body): ApiJson<UpdateProjectBody>,
) -> Result<Json<ProjectResponse>, ApiErrorResponse> {
    let id = project_id(path_id(&raw_id, "id")?)?;
    let mut request = UpdateProjectRequest::new();
    if let Some(title) = body.title {
        request = request.with_title(title);
    }
    if let Some(is_private) = body.is_private {
        request = request.with_private(is_private);
    }
    let project = state.projects.update(&actor, id, request).await?;
    Ok(Json(ProjectResponse::from(&project)))
}

/// `POST /json/workspace/change`
///
/// # Errors
///
/// 403 when the caller is not a member of the target workspace.
pub async fn change_workspace(
    State(state): State<AppState>,
    actor: Actor,
    ApiJson(body): ApiJson<ChangeWorkspaceBody>,
) -> Result<Json<ProjectResponse>, ApiErrorResponse> {
    let project = project_id(required(&body.project_id, "project_id")?)?;
    let workspace = workspace_id(required(&body.workspace_id, "workspace_id")?)?;
    accessible_project(&state, &actor, &project.to_string()).await?;
    let moved = state
        .projects
        .change_workspace(&actor, project, workspace)
        .await?;
    Ok(Json(ProjectResponse::from(&moved)))
}

/// `POST /json/p/starred/save/{project_id}`
///
/// # Errors
///
/// 404 for an unknown project and 403 for a hidden private one.
pub async fn toggle_star(
    State(state): State<AppState>,
    actor: Actor,
    Path(raw_id): Path<String>,
) -> Result<Json<StarResponse>, ApiErrorResponse> {
    let project = project_id(path_id(&raw_id, "project_id")?)?;
    accessible_project(&state, &actor, &project.to_string()).await?;
    let change = state.projects.toggle_star(&actor, project).await?;
    Ok(Json(StarResponse {
        starred: matches!(change, StarChange::Starred),
    }))
}

/// `GET /json/projects/star`
///
/// # Errors
///
/// 500 when the store fails.
pub async fn starred(
    State(state): State<AppState>,
    actor: Actor,
) -> Result<Json<Vec<ProjectResponse>>, ApiErrorResponse> {
    let projects = state.projects.starred(&actor).await?;
    Ok(Json(projects.iter().map(ProjectResponse::from).collect()))
}
