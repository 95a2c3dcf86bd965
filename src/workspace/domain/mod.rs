//! Domain model for workspaces, their members, and projects.

mod error;
mod ids;
mod member;
mod project;
mod workspace;

pub use error::{ParseMemberRoleError, WorkspaceDomainError};
pub use ids::{ProjectId, WorkspaceId};
pub use member::{MemberRole, TeamMember};
pub use project::{NewProject, PersistedProjectData, Project, ProjectTitle};
pub use workspace::{NewWorkspace, PersistedWorkspaceData, Workspace, WorkspaceName};
