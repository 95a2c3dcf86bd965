//! JSON error responses and the mapping from service errors.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use tracing::error;

use crate::board::{
    domain::ReorderError,
    ports::{BoardListRepositoryError, TaskRepositoryError},
    services::{TaskLifecycleError, TaskReorderError},
};
use crate::workspace::{
    ports::{ProjectRepositoryError, WorkspaceRepositoryError},
    services::{ProjectServiceError, WorkspaceServiceError},
};

/// Error body returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Stable error code for programmatic handling.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Field-level failures for validation errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

impl ApiError {
    /// Creates an error body without field details.
    #[must_use]
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }
}

/// A single rejected request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Name of the offending field.
    pub field: String,
    /// What is wrong with it.
    pub message: String,
}

impl FieldError {
    /// Creates a field error.
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Status code paired with an [`ApiError`] body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiErrorResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// Response body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// Creates a response from parts.
    #[must_use]
    pub const fn new(status: StatusCode, error: ApiError) -> Self {
        Self { status, error }
    }

    /// 400 with a plain validation message.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            ApiError::new("VALIDATION_ERROR", message),
        )
    }

    /// 400 listing the fields that failed.
    #[must_use]
    pub fn invalid_fields(details: Vec<FieldError>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            ApiError {
                code: "VALIDATION_ERROR".to_owned(),
                message: "Validation failed".to_owned(),
                details: Some(details),
            },
        )
    }

    /// 401 for a missing or malformed identity.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            ApiError::new("UNAUTHORIZED", message),
        )
    }

    /// 403 for a failed ownership or membership check.
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, ApiError::new("FORBIDDEN", message))
    }

    /// 404 for an unknown entity.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", message))
    }

    /// 500 that logs `source` and hides it from the client.
    #[must_use]
    pub fn internal(source: &dyn StdError) -> Self {
        error!(error = %source, "request failed");
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::new("INTERNAL_ERROR", "An internal error occurred"),
        )
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<JsonRejection> for ApiErrorResponse {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

impl From<WorkspaceRepositoryError> for ApiErrorResponse {
    fn from(err: WorkspaceRepositoryError) -> Self {
        match err {
            WorkspaceRepositoryError::NotFound(_) => Self::not_found(err.to_string()),
            WorkspaceRepositoryError::DuplicateMember { .. } => Self::validation(err.to_string()),
            WorkspaceRepositoryError::Persistence(_) => Self::internal(&err),
        }
    }
}

impl From<ProjectRepositoryError> for ApiErrorResponse {
    fn from(err: ProjectRepositoryError) -> Self {
        match err {
            ProjectRepositoryError::NotFound(_) => Self::not_found(err.to_string()),
            ProjectRepositoryError::Persistence(_) => Self::internal(&err),
        }
    }
}

impl From<TaskRepositoryError> for ApiErrorResponse {
    fn from(err: TaskRepositoryError) -> Self {
        match err {
            TaskRepositoryError::NotFound(_) | TaskRepositoryError::ListNotFound(_) => {
                Self::not_found(err.to_string())
            }
            TaskRepositoryError::Persistence(_) => Self::internal(&err),
        }
    }
}

impl From<BoardListRepositoryError> for ApiErrorResponse {
    fn from(err: BoardListRepositoryError) -> Self {
        Self::internal(&err)
    }
}

impl From<WorkspaceServiceError> for ApiErrorResponse {
    fn from(err: WorkspaceServiceError) -> Self {
        match err {
            WorkspaceServiceError::Domain(domain) => Self::validation(domain.to_string()),
            WorkspaceServiceError::Repository(repository) => repository.into(),
            WorkspaceServiceError::NotFound(_) => Self::not_found(err.to_string()),
            WorkspaceServiceError::NotAdmin { .. } => Self::forbidden(err.to_string()),
            WorkspaceServiceError::LastAdmin { .. } => Self::validation(err.to_string()),
        }
    }
}

impl From<ProjectServiceError> for ApiErrorResponse {
    fn from(err: ProjectServiceError) -> Self {
        match err {
            ProjectServiceError::Domain(domain) => Self::validation(domain.to_string()),
            ProjectServiceError::Repository(repository) => repository.into(),
            ProjectServiceError::Workspaces(repository) => repository.into(),
            ProjectServiceError::NotFound(_) | ProjectServiceError::WorkspaceNotFound(_) => {
                Self::not_found(err.to_string())
            }
            ProjectServiceError::NotMember { .. } | ProjectServiceError::Forbidden { .. } => {
                Self::forbidden(err.to_string())
            }
        }
    }
}

impl From<TaskLifecycleError> for ApiErrorResponse {
    fn from(err: TaskLifecycleError) -> Self {
        match err {
            TaskLifecycleError::Domain(domain) => Self::validation(domain.to_string()),
            TaskLifecycleError::Repository(repository) => repository.into(),
            TaskLifecycleError::Lists(repository) => repository.into(),
            TaskLifecycleError::NotFound(_)
            | TaskLifecycleError::UnknownList(_)
            | TaskLifecycleError::ListNotFound { .. } => Self::not_found(err.to_string()),
        }
    }
}

impl From<TaskReorderError> for ApiErrorResponse {
    fn from(err: TaskReorderError) -> Self {
        match err {
            TaskReorderError::Plan(ReorderError::Order(domain)) => {
                Self::validation(domain.to_string())
            }
            TaskReorderError::Plan(plan) => Self::not_found(plan.to_string()),
            TaskReorderError::ListNotFound { .. } => Self::not_found(err.to_string()),
            TaskReorderError::Repository(repository) => repository.into(),
            TaskReorderError::Lists(repository) => repository.into(),
            TaskReorderError::LockPoisoned(_) => Self::internal(&err),
        }
    }
}
