//! Board list, task, and reorder handlers.
//!
//! Every handler resolves the owning project through
//! [`accessible_project`] before touching board data.

use std::collections::BTreeSet;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::debug;

use super::accessible_project;
use crate::board::{
    domain::{BoardListId, Task, TaskId},
    services::{CreateTaskRequest, TaskLifecycleError, TaskMoveRequest, UpdateTaskRequest},
};
use crate::http::{
    dto::{
        CountResponse, CreateListBody, CreateTaskBody, DeletedResponse, ListResponse,
        ReorderBody, TaskOrderEntry, TaskResponse, UpdateTaskBody, UpdatedResponse, optional,
        path_id, present, required,
    },
    error::{ApiErrorResponse, FieldError},
    extract::ApiJson,
    state::AppState,
};
use crate::identity::Actor;

fn task_id(value: i64) -> Result<TaskId, ApiErrorResponse> {
    TaskId::new(value).map_err(|err| ApiErrorResponse::validation(err.to_string()))
}

fn list_id(value: i64) -> Result<BoardListId, ApiErrorResponse> {
    BoardListId::new(value).map_err(|err| ApiErrorResponse::validation(err.to_string()))
}

/// Loads a task and checks the caller may access its project.
async fn accessible_task(
    state: &AppState,
    actor: &Actor,
    uid: &str,
) -> Result<Task, ApiErrorResponse> {
    let task = state.tasks.find_task(uid).await?;
    accessible_project(state, actor, &task.project_id().to_string()).await?;
    Ok(task)
}

/// `POST /json/project/{project_id}/lists`
///
/// # Errors
///
/// 400 for an invalid title.
pub async fn create_list(
    State(state): State<AppState>,
    actor: Actor,
    Path(project_uid): Path<String>,
    ApiJson(body): ApiJson<CreateListBody>,
) -> Result<(StatusCode, Json<ListResponse>), ApiErrorResponse> {
    let project = accessible_project(&state, &actor, &project_uid).await?;
    let list = state
        .tasks
        .create_list(&actor, project.id(), &body.title)
        .await?;
    Ok((StatusCode::CREATED, Json(ListResponse::from(&list))))
}

/// `GET /json/project/{project_id}/lists`
///
/// # Errors
///
/// 404 when the project is unknown to the caller.
pub async fn lists(
    State(state): State<AppState>,
    actor: Actor,
    Path(project_uid): Path<String>,
) -> Result<Json<Vec<ListResponse>>, ApiErrorResponse> {
    let project = accessible_project(&state, &actor, &project_uid).await?;
    let summaries = state.tasks.lists_for_project(project.id()).await?;
    Ok(Json(summaries.iter().map(ListResponse::from).collect()))
}

/// `GET /json/project/{project_id}/lists/{list_id}/tasks`
///
/// # Errors
///
/// 404 when the list is not part of the project.
pub async fn tasks_in_list(
    State(state): State<AppState>,
    actor: Actor,
    Path((project_uid, raw_list)): Path<(String, String)>,
) -> Result<Json<Vec<TaskResponse>>, ApiErrorResponse> {
    let project = accessible_project(&state, &actor, &project_uid).await?;
    let list = list_id(path_id(&raw_list, "list_id")?)?;
    let tasks = state.tasks.tasks_in_list(project.id(), list).await?;
    Ok(Json(tasks.iter().map(TaskResponse::from).collect()))
}

/// `POST /json/task/create`
///
/// # Errors
///
/// 400 for an invalid title and 404 when the list is not in the project.
pub async fn create_task(
    State(state): State<AppState>,
    actor: Actor,
    ApiJson(body): ApiJson<CreateTaskBody>,
) -> Result<(StatusCode, Json<TaskResponse>), ApiErrorResponse> {
    let raw_project = required(&body.project_id, "project_id")?;
    let list = list_id(required(&body.list_id, "list_id")?)?;
    let project = accessible_project(&state, &actor, &raw_project.to_string()).await?;

    let mut request = CreateTaskRequest::new(project.id(), list, body.title);
    if let Some(description) = body.description {
        request = request.with_description(description);
    }
    let task = state.tasks.create_task(&actor, request).await?;
    Ok((StatusCode::CREATED, Json(TaskResponse::from(&task))))
}

/// `GET /json/task/{uid}`
///
/// # Errors
///
/// 404 when no accessible task has that id or slug.
pub async fn find_task(
    State(state): State<AppState>,
    actor: Actor,
    Path(uid): Path<String>,
) -> Result<Json<TaskResponse>, ApiErrorResponse> {
    let task = accessible_task(&state, &actor, &uid).await?;
    Ok(Json(TaskResponse::from(&task)))
}

/// `POST /json/task/update/{id}`
///
/// # Errors
///
/// 400 for an invalid title and 404 for an unknown task.
pub async fn update_task(
    State(state): State<AppState>,
    actor: Actor,
    Path(raw_id): Path<String>,
    ApiJson(body): ApiJson<UpdateTaskBody>,
) -> Result<Json<TaskResponse>, ApiErrorResponse> {
    let id = task_id(path_id(&raw_id, "id")?)?;
    accessible_task(&state, &actor, &id.to_string()).await?;

    let mut request = UpdateTaskRequest::new();
    if let Some(title) = body.title {
        request = request.with_title(title);
    }
    if let Some(description) = body.description {
        request = request.with_description(description);
    }
    if let Some(is_archived) = body.is_archived {
        request = request.with_archived(is_archived);
    }
    let task = state.tasks.update_task(id, request).await?;
    Ok(Json(TaskResponse::from(&task)))
}

/// `DELETE /json/task/{id}`
///
/// # Errors
///
/// 404 for an unknown task.
pub async fn delete_task(
    State(state): State<AppState>,
    actor: Actor,
    Path(raw_id): Path<String>,
) -> Result<Json<DeletedResponse>, ApiErrorResponse> {
    let id = task_id(path_id(&raw_id, "id")?)?;
    accessible_task(&state, &actor, &id.to_string()).await?;
    let deleted = state.tasks.delete_task(id).await?;
    Ok(Json(DeletedResponse { deleted }))
}

/// `GET /json/list/{id}/count`
///
/// # Errors
///
/// 404 for an unknown list.
pub async fn count_in_list(
    State(state): State<AppState>,
    actor: Actor,
    Path(raw_id): Path<String>,
) -> Result<Json<CountResponse>, ApiErrorResponse> {
    let list = state.tasks.find_list(list_id(path_id(&raw_id, "id")?)?).await?;
    accessible_project(&state, &actor, &list.project_id().to_string()).await?;
    let count = state.tasks.count_in_list(list.id()).await?;
    Ok(Json(CountResponse { count }))
}

/// `GET /json/project/{project_id}/archived`
///
/// # Errors
///
/// 404 when the project is unknown to the caller.
pub async fn archived(
    State(state): State<AppState>,
    actor: Actor,
    Path(project_uid): Path<String>,
) -> Result<Json<Vec<TaskResponse>>, ApiErrorResponse> {
    let project = accessible_project(&state, &actor, &project_uid).await?;
    let tasks = state.tasks.archived_tasks(project.id()).await?;
    Ok(Json(tasks.iter().map(TaskResponse::from).collect()))
}

/// `POST /json/tasks/order`
///
/// Writes explicit `{id, order}` pairs. Unknown ids are skipped.
///
/// # Errors
///
/// 400 when any entry is malformed; nothing is written in that case.
pub async fn update_orders(
    State(state): State<AppState>,
    actor: Actor,
    ApiJson(entries): ApiJson<Vec<TaskOrderEntry>>,
) -> Result<Json<UpdatedResponse>, ApiErrorResponse> {
    let mut assignments = Vec::with_capacity(entries.len());
    let mut failures = Vec::new();
    for (index, entry) in entries.iter().enumerate() {
        let id = entry.id.value(&format!("[{index}].id"));
        let order = entry.order.value(&format!("[{index}].order"));
        match (id, order) {
            (Ok(raw_id), Ok(raw_order)) => match TaskId::new(raw_id) {
                Ok(valid) => assignments.push((valid, raw_order)),
                Err(err) => failures.push(FieldError::new(format!("[{index}].id"), err.to_string())),
            },
            (id_result, order_result) => {
                failures.extend(id_result.err());
                failures.extend(order_result.err());
            }
        }
    }
    if !failures.is_empty() {
        return Err(ApiErrorResponse::invalid_fields(failures));
    }

    let mut checked = BTreeSet::new();
    for (id, _) in &assignments {
        match state.tasks.find_task(&id.to_string()).await {
            Ok(task) => {
                if checked.insert(task.project_id()) {
                    accessible_project(&state, &actor, &task.project_id().to_string()).await?;
                }
            }
            Err(TaskLifecycleError::NotFound(_)) => debug!(task_id = %id, "order for unknown task skipped"),
            Err(err) => return Err(err.into()),
        }
    }

    let updated = state.tasks.update_orders(&assignments).await?;
    Ok(Json(UpdatedResponse::rows(updated)))
}

/// `POST /json/project/{project_id}/task-list`
///
/// Applies a drag-and-drop move and re-densifies every affected list.
///
/// # Errors
///
/// 400 for a malformed body and 404 when either list is not part of the
/// project or the moving task cannot be found.
pub async fn reorder(
    State(state): State<AppState>,
    actor: Actor,
    Path(project_uid): Path<String>,
    ApiJson(body): ApiJson<ReorderBody>,
) -> Result<Json<UpdatedResponse>, ApiErrorResponse> {
    let project = accessible_project(&state, &actor, &project_uid).await?;
    let request = move_request(&body)?;
    let outcome = state.reorder.apply(project.id(), request).await?;
    Ok(Json(UpdatedResponse::rows(outcome.updated)))
}

fn move_request(body: &ReorderBody) -> Result<TaskMoveRequest, ApiErrorResponse> {
    let destination_list = list_id(present(body.new_list.as_ref(), "new_list")?)?;
    let to = present(body.to.as_ref(), "to")?;
    let moving = optional(body.task_id.as_ref(), "task_id")?
        .map(task_id)
        .transpose()?;

    if body.is_move {
        let task = moving.ok_or_else(|| {
            ApiErrorResponse::invalid_fields(vec![FieldError::new(
                "task_id",
                "required when is_move is true",
            )])
        })?;
        let source_raw = optional(body.previous_list.as_ref(), "previous_list")?.ok_or_else(|| {
            ApiErrorResponse::invalid_fields(vec![FieldError::new(
                "previous_list",
                "required when is_move is true",
            )])
        })?;
        let source_list = list_id(source_raw)?;
        return Ok(TaskMoveRequest::across_lists(
            task,
            source_list,
            destination_list,
            to,
        ));
    }

    if let Some(task) = moving {
        return Ok(TaskMoveRequest::within_list_by_id(destination_list, task, to));
    }
    let from = optional(body.from.as_ref(), "from")?.ok_or_else(|| {
        ApiErrorResponse::invalid_fields(vec![FieldError::new(
            "from",
            "either from or task_id is required",
        )])
    })?;
    Ok(TaskMoveRequest::within_list(destination_list, from, to))
}
