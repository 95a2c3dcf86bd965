//! Repository port for workspaces and their membership lists.

use crate::identity::UserId;
use crate::slug::Slug;
use crate::workspace::domain::{NewWorkspace, TeamMember, Workspace, WorkspaceId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for workspace repository operations.
pub type WorkspaceRepositoryResult<T> = Result<T, WorkspaceRepositoryError>;

/// Workspace persistence contract.
#[async_trait]
pub trait WorkspaceRepository: Send + Sync {
    /// Stores a new workspace and returns it with its assigned identifier.
    ///
    /// The returned workspace has no slug yet.
    async fn insert(&self, workspace: &NewWorkspace) -> WorkspaceRepositoryResult<Workspace>;

    /// Persists the final slug of a workspace.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceRepositoryError::NotFound`] when the workspace does
    /// not exist.
    async fn assign_slug(&self, id: WorkspaceId, slug: &Slug) -> WorkspaceRepositoryResult<()>;

    /// Returns whether any workspace already carries `slug`.
    async fn slug_exists(&self, slug: &Slug) -> WorkspaceRepositoryResult<bool>;

    /// Persists name changes to an existing workspace.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceRepositoryError::NotFound`] when the workspace does
    /// not exist.
    async fn update(&self, workspace: &Workspace) -> WorkspaceRepositoryResult<()>;

    /// Removes a workspace and its memberships, returning whether it existed.
    async fn delete(&self, id: WorkspaceId) -> WorkspaceRepositoryResult<bool>;

    /// Finds a workspace by identifier.
    async fn find_by_id(&self, id: WorkspaceId) -> WorkspaceRepositoryResult<Option<Workspace>>;

    /// Finds a workspace by slug.
    async fn find_by_slug(&self, slug: &str) -> WorkspaceRepositoryResult<Option<Workspace>>;

    /// Returns workspaces owned by `owner`, oldest first.
    async fn owned_by(&self, owner: UserId) -> WorkspaceRepositoryResult<Vec<Workspace>>;

    /// Returns workspaces in which `user_id` is a member, oldest first.
    async fn member_workspaces(&self, user_id: UserId)
    -> WorkspaceRepositoryResult<Vec<Workspace>>;

    /// Adds a membership.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceRepositoryError::DuplicateMember`] when the user is
    /// already a member of the workspace.
    async fn add_member(&self, member: &TeamMember) -> WorkspaceRepositoryResult<()>;

    /// Removes a membership, returning whether one existed.
    async fn remove_member(
        &self,
        workspace_id: WorkspaceId,
        user_id: UserId,
    ) -> WorkspaceRepositoryResult<bool>;

    /// Finds the membership of `user_id` in `workspace_id`.
    async fn find_member(
        &self,
        workspace_id: WorkspaceId,
        user_id: UserId,
    ) -> WorkspaceRepositoryResult<Option<TeamMember>>;

    /// Returns all members of a workspace in insertion order.
    async fn members(&self, workspace_id: WorkspaceId)
    -> WorkspaceRepositoryResult<Vec<TeamMember>>;
}

/// Errors returned by workspace repository implementations.
#[derive(Debug, Clone, Error)]
pub enum WorkspaceRepositoryError {
    /// The workspace was not found.
    #[error("workspace not found: {0}")]
    NotFound(WorkspaceId),

    /// The membership already exists.
    #[error("user {user_id} is already a member of workspace {workspace_id}")]
    DuplicateMember {
        /// Workspace identifier.
        workspace_id: WorkspaceId,
        /// User identifier.
        user_id: UserId,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl WorkspaceRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
