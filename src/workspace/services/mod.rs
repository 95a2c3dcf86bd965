//! Application services for workspace, membership, and project orchestration.

mod project;
mod workspace;

pub use project::{
    CreateProjectRequest, ProjectService, ProjectServiceError, ProjectServiceResult,
    RECENT_PROJECTS_LIMIT, StarChange, UpdateProjectRequest,
};
pub use workspace::{
    CreateWorkspaceRequest, MembershipChange, WorkspaceService, WorkspaceServiceError,
    WorkspaceServiceResult,
};
