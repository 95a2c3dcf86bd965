//! Service layer for workspaces and their membership lists.

use crate::identity::{Actor, UserId};
use crate::slug::{Slug, SlugStyle, numeric_uid, resolve_slug};
use crate::workspace::{
    domain::{
        MemberRole, NewWorkspace, TeamMember, Workspace, WorkspaceDomainError, WorkspaceId,
        WorkspaceName,
    },
    ports::{WorkspaceRepository, WorkspaceRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Request payload for creating a workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateWorkspaceRequest {
    name: String,
}

impl CreateWorkspaceRequest {
    /// Creates a request with the workspace name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Outcome of toggling a user's membership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MembershipChange {
    /// The user was not a member and has been added.
    Added(TeamMember),
    /// The user was a member and has been removed.
    Removed,
}

/// Service-level errors for workspace operations.
#[derive(Debug, Error)]
pub enum WorkspaceServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] WorkspaceDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] WorkspaceRepositoryError),
    /// No workspace matches the lookup key.
    #[error("workspace not found: {0}")]
    NotFound(String),
    /// The caller does not administer the workspace.
    #[error("user {user_id} is not an admin of workspace {workspace_id}")]
    NotAdmin {
        /// Workspace identifier.
        workspace_id: WorkspaceId,
        /// Caller identifier.
        user_id: UserId,
    },
    /// Removing the member would leave the workspace without an admin.
    #[error("user {user_id} is the last admin of workspace {workspace_id}")]
    LastAdmin {
        /// Workspace identifier.
        workspace_id: WorkspaceId,
        /// Admin being removed.
        user_id: UserId,
    },
}

/// Result type for workspace service operations.
pub type WorkspaceServiceResult<T> = Result<T, WorkspaceServiceError>;

/// Workspace orchestration service.
pub struct WorkspaceService<R, C>
where
    R: WorkspaceRepository + ?Sized,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> Clone for WorkspaceService<R, C>
where
    R: WorkspaceRepository + ?Sized,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R, C> WorkspaceService<R, C>
where
    R: WorkspaceRepository + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a new workspace service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Creates a workspace owned by the caller and makes the caller its admin.
    ///
    /// The slug is derived from the name with the URL variant and suffixed
    /// with the new identifier when another workspace already holds it.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceServiceError::Domain`] for an invalid name or
    /// [`WorkspaceServiceError::Repository`] when persistence fails.
    pub async fn create(
        &self,
        actor: &Actor,
        request: CreateWorkspaceRequest,
    ) -> WorkspaceServiceResult<Workspace> {
        let name = WorkspaceName::new(request.name)?;
        let new_workspace = NewWorkspace::new(name, actor.user_id(), &*self.clock);
        let stored = self.repository.insert(&new_workspace).await?;

        let base = Slug::derive(SlugStyle::Url, stored.name().as_str());
        let collides = self.repository.slug_exists(&base).await?;
        let slug = resolve_slug(base, collides, stored.id());
        self.repository.assign_slug(stored.id(), &slug).await?;

        let admin = TeamMember::new(
            stored.id(),
            actor.user_id(),
            MemberRole::Admin,
            actor.user_id(),
            &*self.clock,
        );
        self.repository.add_member(&admin).await?;

        info!(
            workspace_id = %stored.id(),
            user_id = %actor.user_id(),
            slug = %slug,
            "workspace created"
        );
        Ok(stored.with_slug(slug))
    }

    /// Renames a workspace. Only workspace admins may rename.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceServiceError::NotFound`] for an unknown workspace and
    /// [`WorkspaceServiceError::NotAdmin`] when the caller is not an admin.
    pub async fn rename(
        &self,
        actor: &Actor,
        id: WorkspaceId,
        name: &str,
    ) -> WorkspaceServiceResult<Workspace> {
        let new_name = WorkspaceName::new(name)?;
        let mut workspace = self.require_workspace(id).await?;
        self.require_admin(actor, id).await?;
        workspace.rename(new_name);
        self.repository.update(&workspace).await?;
        info!(workspace_id = %id, user_id = %actor.user_id(), "workspace renamed");
        Ok(workspace)
    }

    /// Deletes a workspace and its memberships. Only workspace admins may
    /// delete; the caller removes the workspace's projects separately.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceServiceError::NotFound`] for an unknown workspace and
    /// [`WorkspaceServiceError::NotAdmin`] when the caller is not an admin.
    pub async fn delete(
        &self,
        actor: &Actor,
        id: WorkspaceId,
    ) -> WorkspaceServiceResult<Workspace> {
        let workspace = self.require_workspace(id).await?;
        self.require_admin(actor, id).await?;
        if !self.repository.delete(id).await? {
            return Err(WorkspaceServiceError::NotFound(id.to_string()));
        }
        info!(workspace_id = %id, user_id = %actor.user_id(), "workspace deleted");
        Ok(workspace)
    }

    /// Adds `user_id` as a member, or removes the membership when it exists.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceServiceError::NotFound`] for an unknown workspace,
    /// [`WorkspaceServiceError::NotAdmin`] when the caller is not an admin and
    /// [`WorkspaceServiceError::LastAdmin`] when the removal would leave the
    /// workspace without an admin.
    pub async fn toggle_member(
        &self,
        actor: &Actor,
        workspace_id: WorkspaceId,
        user_id: UserId,
    ) -> WorkspaceServiceResult<MembershipChange> {
        self.require_workspace(workspace_id).await?;
        self.require_admin(actor, workspace_id).await?;

        let existing = self.repository.find_member(workspace_id, user_id).await?;
        if existing.as_ref().is_some_and(TeamMember::is_admin) {
            self.require_other_admin(workspace_id, user_id).await?;
        }

        if self.repository.remove_member(workspace_id, user_id).await? {
            info!(workspace_id = %workspace_id, user_id = %user_id, "member removed");
            return Ok(MembershipChange::Removed);
        }

        let member = TeamMember::new(
            workspace_id,
            user_id,
            MemberRole::Member,
            actor.user_id(),
            &*self.clock,
        );
        self.repository.add_member(&member).await?;
        info!(workspace_id = %workspace_id, user_id = %user_id, "member added");
        Ok(MembershipChange::Added(member))
    }

    /// Finds a workspace by numeric id or by slug.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceServiceError::NotFound`] when nothing matches.
    pub async fn find(&self, uid: &str) -> WorkspaceServiceResult<Workspace> {
        if let Some(id) = numeric_uid(uid) {
            let by_id = self
                .repository
                .find_by_id(WorkspaceId::from_persisted(id))
                .await?;
            if let Some(workspace) = by_id {
                return Ok(workspace);
            }
        }
        self.repository
            .find_by_slug(uid)
            .await?
            .ok_or_else(|| WorkspaceServiceError::NotFound(uid.to_owned()))
    }

    /// Returns the workspaces owned by the caller.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceServiceError::Repository`] when lookup fails.
    pub async fn mine(&self, actor: &Actor) -> WorkspaceServiceResult<Vec<Workspace>> {
        Ok(self.repository.owned_by(actor.user_id()).await?)
    }

    /// Returns the workspaces the caller is a member of.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceServiceError::Repository`] when lookup fails.
    pub async fn memberships(&self, actor: &Actor) -> WorkspaceServiceResult<Vec<Workspace>> {
        Ok(self.repository.member_workspaces(actor.user_id()).await?)
    }

    /// Returns the members of a workspace.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceServiceError::NotFound`] for an unknown workspace.
    pub async fn members(
        &self,
        workspace_id: WorkspaceId,
    ) -> WorkspaceServiceResult<Vec<TeamMember>> {
        self.require_workspace(workspace_id).await?;
        Ok(self.repository.members(workspace_id).await?)
    }

    async fn require_workspace(&self, id: WorkspaceId) -> WorkspaceServiceResult<Workspace> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| WorkspaceServiceError::NotFound(id.to_string()))
    }

    async fn require_other_admin(
        &self,
        workspace_id: WorkspaceId,
        user_id: UserId,
    ) -> WorkspaceServiceResult<()> {
        let members = self.repository.members(workspace_id).await?;
        let other_admin = members
            .iter()
            .any(|member| member.is_admin() && member.user_id() != user_id);
        if other_admin {
            return Ok(());
        }
        Err(WorkspaceServiceError::LastAdmin {
            workspace_id,
            user_id,
        })
    }

    async fn require_admin(&self, actor: &Actor, id: WorkspaceId) -> WorkspaceServiceResult<()> {
        let member = self.repository.find_member(id, actor.user_id()).await?;
        if member.as_ref().is_some_and(TeamMember::is_admin) {
            return Ok(());
        }
        Err(WorkspaceServiceError::NotAdmin {
            workspace_id: id,
            user_id: actor.user_id(),
        })
    }
}
