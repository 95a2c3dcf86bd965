//! Port contracts for workspace and project persistence.

pub mod project;
pub mod workspace;

pub use project::{ProjectRepository, ProjectRepositoryError, ProjectRepositoryResult};
pub use workspace::{WorkspaceRepository, WorkspaceRepositoryError, WorkspaceRepositoryResult};
