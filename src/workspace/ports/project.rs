//! Repository port for projects and per-user stars.

use crate::identity::UserId;
use crate::slug::Slug;
use crate::workspace::domain::{NewProject, Project, ProjectId, WorkspaceId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for project repository operations.
pub type ProjectRepositoryResult<T> = Result<T, ProjectRepositoryError>;

/// Project persistence contract.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Stores a new project and returns it with its assigned identifier.
    ///
    /// The returned project has no slug yet.
    async fn insert(&self, project: &NewProject) -> ProjectRepositoryResult<Project>;

    /// Persists the final slug of a project.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::NotFound`] when the project does not
    /// exist.
    async fn assign_slug(&self, id: ProjectId, slug: &Slug) -> ProjectRepositoryResult<()>;

    /// Returns whether any project already carries `slug`.
    async fn slug_exists(&self, slug: &Slug) -> ProjectRepositoryResult<bool>;

    /// Persists title, privacy, and workspace changes.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::NotFound`] when the project does not
    /// exist.
    async fn update(&self, project: &Project) -> ProjectRepositoryResult<()>;

    /// Removes a project with its stars and recent entries, returning whether
    /// it existed.
    async fn delete(&self, id: ProjectId) -> ProjectRepositoryResult<bool>;

    /// Removes every project of a workspace and returns their identifiers.
    async fn delete_for_workspace(
        &self,
        workspace_id: WorkspaceId,
    ) -> ProjectRepositoryResult<Vec<ProjectId>>;

    /// Finds a project by identifier.
    async fn find_by_id(&self, id: ProjectId) -> ProjectRepositoryResult<Option<Project>>;

    /// Finds a project by slug.
    async fn find_by_slug(&self, slug: &str) -> ProjectRepositoryResult<Option<Project>>;

    /// Returns the projects of a workspace, oldest first.
    async fn for_workspace(&self, workspace_id: WorkspaceId)
    -> ProjectRepositoryResult<Vec<Project>>;

    /// Stars the project for `user_id`, or removes the star when present.
    ///
    /// Returns `true` when the project is starred afterwards.
    async fn toggle_star(
        &self,
        user_id: UserId,
        project_id: ProjectId,
    ) -> ProjectRepositoryResult<bool>;

    /// Returns the projects starred by `user_id`.
    async fn starred_by(&self, user_id: UserId) -> ProjectRepositoryResult<Vec<Project>>;

    /// Records that `user_id` opened the project at `opened_at`, replacing
    /// any earlier entry for the pair.
    async fn record_opened(
        &self,
        user_id: UserId,
        project_id: ProjectId,
        opened_at: DateTime<Utc>,
    ) -> ProjectRepositoryResult<()>;

    /// Returns the projects opened by `user_id`, most recent first.
    async fn recent_for(&self, user_id: UserId) -> ProjectRepositoryResult<Vec<Project>>;
}

/// Errors returned by project repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ProjectRepositoryError {
    /// The project was not found.
    #[error("project not found: {0}")]
    NotFound(ProjectId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ProjectRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
