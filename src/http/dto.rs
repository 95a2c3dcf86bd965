//! Request and response bodies of the JSON API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::{ApiErrorResponse, FieldError};
use crate::board::{
    domain::{BoardList, Task},
    services::ListSummary,
};
use crate::workspace::domain::{Project, TeamMember, Workspace};

/// Integer field sent either as a JSON number or as a numeric string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    /// `42`
    Number(i64),
    /// `"42"`
    Text(String),
    /// Any other JSON value, rejected when read.
    Other(serde_json::Value),
}

impl NumericInput {
    /// Returns the integer value, naming `field` when it is not one.
    ///
    /// # Errors
    ///
    /// Returns a [`FieldError`] when the text form is not an integer.
    pub fn value(&self, field: &str) -> Result<i64, FieldError> {
        match self {
            Self::Number(value) => Ok(*value),
            Self::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| FieldError::new(field, "expected an integer")),
            Self::Other(_) => Err(FieldError::new(field, "expected an integer")),
        }
    }
}

/// Parses a required numeric field into a 400 on failure.
pub(crate) fn required(input: &NumericInput, field: &str) -> Result<i64, ApiErrorResponse> {
    input
        .value(field)
        .map_err(|err| ApiErrorResponse::invalid_fields(vec![err]))
}

/// Parses a numeric field that must be present into a 400 on failure.
pub(crate) fn present(
    input: Option<&NumericInput>,
    field: &str,
) -> Result<i64, ApiErrorResponse> {
    input.map_or_else(
        || {
            Err(ApiErrorResponse::invalid_fields(vec![FieldError::new(
                field,
                "is required",
            )]))
        },
        |value| required(value, field),
    )
}

/// Parses an optional numeric field into a 400 on failure.
pub(crate) fn optional(
    input: Option<&NumericInput>,
    field: &str,
) -> Result<Option<i64>, ApiErrorResponse> {
    input.map(|value| required(value, field)).transpose()
}

/// Parses a numeric path segment into a 400 on failure.
pub(crate) fn path_id(raw: &str, field: &str) -> Result<i64, ApiErrorResponse> {
    raw.trim().parse().map_err(|_| {
        ApiErrorResponse::invalid_fields(vec![FieldError::new(field, "expected an integer")])
    })
}

/// `POST /json/workspace/create`
#[derive(Debug, Clone, Deserialize)]
pub struct CreateWorkspaceBody {
    /// Display name.
    pub name: String,
}

/// `POST /json/workspace/update/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct RenameWorkspaceBody {
    /// New display name.
    pub name: String,
}

/// `POST /json/workspace/member/add`
#[derive(Debug, Clone, Deserialize)]
pub struct ToggleMemberBody {
    /// Workspace being changed.
    pub workspace_id: NumericInput,
    /// User added or removed.
    pub user_id: NumericInput,
}

/// `POST /json/project/create`
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProjectBody {
    /// Owning workspace.
    pub workspace_id: NumericInput,
    /// Project title.
    pub title: String,
    /// Restricts visibility to the owner and admins.
    #[serde(default)]
    pub is_private: bool,
}

/// `POST /project/update/{id}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProjectBody {
    /// New title.
    pub title: Option<String>,
    /// New privacy flag.
    pub is_private: Option<bool>,
}

/// `POST /json/workspace/change`
#[derive(Debug, Clone, Deserialize)]
pub struct ChangeWorkspaceBody {
    /// Project being moved.
    pub project_id: NumericInput,
    /// Target workspace.
    pub workspace_id: NumericInput,
}

/// `POST /json/project/{project_id}/lists`
#[derive(Debug, Clone, Deserialize)]
pub struct CreateListBody {
    /// List title.
    pub title: String,
}

/// `POST /json/task/create`
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTaskBody {
    /// Owning project.
    pub project_id: NumericInput,
    /// List the task is appended to.
    pub list_id: NumericInput,
    /// Task title.
    pub title: String,
    /// Optional free text.
    pub description: Option<String>,
}

/// `POST /json/task/update/{id}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTaskBody {
    /// New title.
    pub title: Option<String>,
    /// New description; empty clears it.
    pub description: Option<String>,
    /// Archive flag.
    pub is_archived: Option<bool>,
}

/// One entry of `POST /json/tasks/order`.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskOrderEntry {
    /// Task identifier.
    pub id: NumericInput,
    /// New 1-based order.
    pub order: NumericInput,
}

/// `POST /json/project/{project_id}/task-list`
#[derive(Debug, Clone, Deserialize)]
pub struct ReorderBody {
    /// `true` when the task changes lists.
    #[serde(default)]
    pub is_move: bool,
    /// Moving task; required for cross-list moves.
    pub task_id: Option<NumericInput>,
    /// List the task leaves on a cross-list move.
    pub previous_list: Option<NumericInput>,
    /// List the task ends up in; required.
    pub new_list: Option<NumericInput>,
    /// Current 1-based position for within-list moves.
    pub from: Option<NumericInput>,
    /// Destination 1-based position; required.
    pub to: Option<NumericInput>,
}

/// Health probe body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `ok`.
    pub status: String,
    /// Crate version.
    pub version: String,
}

/// A workspace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceResponse {
    /// Identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// URL slug.
    pub slug: Option<String>,
    /// Creator.
    pub owner_id: i64,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl From<&Workspace> for WorkspaceResponse {
    fn from(workspace: &Workspace) -> Self {
        Self {
            id: workspace.id().value(),
            name: workspace.name().as_str().to_owned(),
            slug: workspace.slug().map(|slug| slug.as_str().to_owned()),
            owner_id: workspace.owner().value(),
            created_at: workspace.created_at(),
        }
    }
}

/// A workspace membership.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberResponse {
    /// Workspace identifier.
    pub workspace_id: i64,
    /// Member identifier.
    pub user_id: i64,
    /// `admin` or `member`.
    pub role: String,
    /// Who added the member.
    pub added_by: i64,
    /// When the member was added.
    pub created_at: DateTime<Utc>,
}

impl From<&TeamMember> for MemberResponse {
    fn from(member: &TeamMember) -> Self {
        Self {
            workspace_id: member.workspace_id().value(),
            user_id: member.user_id().value(),
            role: member.role().as_str().to_owned(),
            added_by: member.added_by().value(),
            created_at: member.created_at(),
        }
    }
}

/// Outcome of a member toggle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembershipResponse {
    /// `added` or `removed`.
    pub status: String,
    /// The new membership when one was added.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member: Option<MemberResponse>,
}

/// A project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectResponse {
    /// Identifier.
    pub id: i64,
    /// Owning workspace.
    pub workspace_id: i64,
    /// Title.
    pub title: String,
    /// URL slug.
    pub slug: Option<String>,
    /// Visibility flag.
    pub is_private: bool,
    /// Creator.
    pub owner_id: i64,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last change.
    pub updated_at: DateTime<Utc>,
}

impl From<&Project> for ProjectResponse {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id().value(),
            workspace_id: project.workspace_id().value(),
            title: project.title().as_str().to_owned(),
            slug: project.slug().map(|slug| slug.as_str().to_owned()),
            is_private: project.is_private(),
            owner_id: project.owner().value(),
            created_at: project.created_at(),
            updated_at: project.updated_at(),
        }
    }
}

/// Outcome of a star toggle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StarResponse {
    /// Whether the project is now starred.
    pub starred: bool,
}

/// A board list, with its task count when listed per project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse {
    /// Identifier.
    pub id: i64,
    /// Owning project.
    pub project_id: i64,
    /// Title.
    pub title: String,
    /// Number of tasks in the list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_count: Option<u64>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl From<&BoardList> for ListResponse {
    fn from(list: &BoardList) -> Self {
        Self {
            id: list.id().value(),
            project_id: list.project_id().value(),
            title: list.title().as_str().to_owned(),
            task_count: None,
            created_at: list.created_at(),
        }
    }
}

impl From<&ListSummary> for ListResponse {
    fn from(summary: &ListSummary) -> Self {
        Self {
            task_count: Some(summary.task_count),
            ..Self::from(&summary.list)
        }
    }
}

/// A task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskResponse {
    /// Identifier.
    pub id: i64,
    /// Owning project.
    pub project_id: i64,
    /// Containing list.
    pub list_id: i64,
    /// Title.
    pub title: String,
    /// Free text.
    pub description: Option<String>,
    /// HTML-safe slug.
    pub slug: Option<String>,
    /// 1-based position within the list.
    pub order: i32,
    /// Archive flag.
    pub is_archived: bool,
    /// Creator.
    pub created_by: i64,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last change.
    pub updated_at: DateTime<Utc>,
}

impl From<&Task> for TaskResponse {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id().value(),
            project_id: task.project_id().value(),
            list_id: task.list_id().value(),
            title: task.title().as_str().to_owned(),
            description: task.description().map(ToOwned::to_owned),
            slug: task.slug().map(|slug| slug.as_str().to_owned()),
            order: task.order().value(),
            is_archived: task.is_archived(),
            created_by: task.created_by().value(),
            created_at: task.created_at(),
            updated_at: task.updated_at(),
        }
    }
}

/// Task count of a list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountResponse {
    /// Number of tasks.
    pub count: u64,
}

/// Outcome of a delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletedResponse {
    /// Whether a row was removed.
    pub deleted: bool,
}

/// Outcome of a batched order write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatedResponse {
    /// Always `true` on success.
    pub success: bool,
    /// Rows rewritten.
    pub updated: u64,
}

impl UpdatedResponse {
    /// Successful write of `updated` rows.
    #[must_use]
    pub const fn rows(updated: u64) -> Self {
        Self {
            success: true,
            updated,
        }
    }
}
