//! Workspace and membership handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::http::{
    dto::{
        CreateWorkspaceBody, DeletedResponse, MemberResponse, MembershipResponse,
        RenameWorkspaceBody, ToggleMemberBody, WorkspaceResponse, path_id, required,
    },
    error::ApiErrorResponse,
    extract::ApiJson,
    state::AppState,
};
use crate::identity::{Actor, UserId};
use crate::workspace::{
    domain::WorkspaceId,
    services::{CreateWorkspaceRequest, MembershipChange},
};

fn workspace_id(value: i64) -> Result<WorkspaceId, ApiErrorResponse> {
    WorkspaceId::new(value).map_err(|err| ApiErrorResponse::validation(err.to_string()))
}

/// `POST /json/workspace/create`
///
/// # Errors
///
/// 400 for an invalid name.
pub async fn create(
    State(state): State<AppState>,
    actor: Actor,
    ApiJson(body): ApiJson<CreateWorkspaceBody>,
) -> Result<(StatusCode, Json<WorkspaceResponse>), ApiErrorResponse> {
    let workspace = state
        .workspaces
        .create(&actor, CreateWorkspaceRequest::new(body.name))
        .await?;
    Ok((StatusCode::CREATED, Json(WorkspaceResponse::from(&workspace))))
}

/// `POST /json/workspace/update/{id}`
///
/// # Errors
///
/// 403 unless the caller administers the workspace.
pub async fn rename(
    State(state): State<AppState>,
    actor: Actor,
    Path(raw_id): Path<String>,
    ApiJson(body): ApiJson<RenameWorkspaceBody>,
) -> Result<Json<WorkspaceResponse>, ApiErrorResponse> {
    let id = workspace_id(path_id(&raw_id, "id")?)?;
    let workspace = state.workspaces.rename(&actor, id, &body.name).await?;
    Ok(Json(WorkspaceResponse::from(&workspace)))
}

/// `DELETE /workspace/destroy/{id}`
///
/// Removes the workspace with its members, projects, and their boards.
///
/// # Errors
///
/// 404 for an unknown workspace and 403 unless the caller administers it.
pub async fn destroy(
    State(state): State<AppState>,
    actor: Actor,
    Path(raw_id): Path<String>,
) -> Result<Json<DeletedResponse>, ApiErrorResponse> {
    let id = workspace_id(path_id(&raw_id, "id")?)?;
    state.workspaces.delete(&actor, id).await?;
    for project in state.projects.purge_workspace(id).await? {
        state.tasks.purge_project(project).await?;
    }
    Ok(Json(DeletedResponse { deleted: true }))
}

/// `POST /json/workspace/member/add`
///
/// Adds the user when absent and removes the membership otherwise.
///
/// # Errors
///
/// 403 unless the caller administers the workspace and 400 when the last
/// admin would be removed.
pub async fn toggle_member(
    State(state): State<AppState>,
    actor: Actor,
    ApiJson(body): ApiJson<ToggleMemberBody>,
) -> Result<Json<MembershipResponse>, ApiErrorResponse> {
    let id = workspace_id(required(&body.workspace_id, "workspace_id")?)?;
    let user_id = UserId::new(required(&body.user_id, "user_id")?)
        .map_err(|err| ApiErrorResponse::validation(err.to_string()))?;
    let response = match state.workspaces.toggle_member(&actor, id, user_id).await? {
        MembershipChange::Added(member) => MembershipResponse {
            status: "added".to_owned(),
            member: Some(MemberResponse::from(&member)),
        },
        MembershipChange::Removed => MembershipResponse {
            status: "removed".to_owned(),
            member: None,
        },
    };
    Ok(Json(response))
}

/// `GET /json/workspaces/mine`
///
/// # Errors
///
/// 500 when the store fails.
pub async fn mine(
    State(state): State<AppState>,
    actor: Actor,
) -> Result<Json<Vec<WorkspaceResponse>>, ApiErrorResponse> {
    let workspaces = state.workspaces.mine(&actor).await?;
    Ok(Json(workspaces.iter().map(WorkspaceResponse::from).collect()))
}

/// `GET /json/workspaces/all`
///
/// # Errors
///
/// 500 when the store fails.
pub async fn memberships(
    State(state): State<AppState>,
    actor: Actor,
) -> Result<Json<Vec<WorkspaceResponse>>, ApiErrorResponse> {
    let workspaces = state.workspaces.memberships(&actor).await?;
    Ok(Json(workspaces.iter().map(WorkspaceResponse::from).collect()))
}

/// `GET /json/workspace/{uid}`
///
/// # Errors
///
/// 404 when no workspace has that id or slug.
pub async fn find(
    State(state): State<AppState>,
    _actor: Actor,
    Path(uid): Path<String>,
) -> Result<Json<WorkspaceResponse>, ApiErrorResponse> {
    let workspace = state.workspaces.find(&uid).await?;
    Ok(Json(WorkspaceResponse::from(&workspace)))
}

/// `GET /json/workspace/{uid}/members`
///
/// # Errors
///
/// 404 for an unknown workspace.
pub async fn members(
    State(state): State<AppState>,
    _actor: Actor,
    Path(uid): Path<String>,
) -> Result<Json<Vec<MemberResponse>>, ApiErrorResponse> {
    let workspace = state.workspaces.find(&uid).await?;
    let members = state.workspaces.members(workspace.id()).await?;
    Ok(Json(members.iter().map(MemberResponse::from).collect()))
}
