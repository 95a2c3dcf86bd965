//! Error types for workspace domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing workspace domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorkspaceDomainError {
    /// The workspace identifier is not a positive integer.
    #[error("invalid workspace id {0}, expected a positive integer")]
    InvalidWorkspaceId(i64),

    /// The project identifier is not a positive integer.
    #[error("invalid project id {0}, expected a positive integer")]
    InvalidProjectId(i64),

    /// The workspace name is empty after trimming.
    #[error("workspace name must not be empty")]
    EmptyWorkspaceName,

    /// The workspace name exceeds the column width.
    #[error("workspace name exceeds {max} characters")]
    WorkspaceNameTooLong {
        /// Maximum accepted length.
        max: usize,
    },

    /// The project title is empty after trimming.
    #[error("project title must not be empty")]
    EmptyProjectTitle,

    /// The project title exceeds the column width.
    #[error("project title exceeds {max} characters")]
    ProjectTitleTooLong {
        /// Maximum accepted length.
        max: usize,
    },
}

/// Error returned while parsing member roles from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown member role: {0}")]
pub struct ParseMemberRoleError(pub String);
