//! In-memory workspace and project repositories.

mod project;
mod workspace;

pub use project::InMemoryProjectRepository;
pub use workspace::InMemoryWorkspaceRepository;
