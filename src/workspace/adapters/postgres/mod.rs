//! `PostgreSQL` adapters for workspace and project persistence.

mod models;
mod project;
mod schema;
mod workspace;

pub use project::PostgresProjectRepository;
pub use workspace::{PostgresWorkspaceRepository, WorkspacePgPool};
