//! Service layer for projects, their visibility, and per-user stars.

use crate::identity::{Actor, UserId};
use crate::slug::{Slug, SlugStyle, numeric_uid, resolve_slug};
use crate::workspace::{
    domain::{
        NewProject, Project, ProjectId, ProjectTitle, TeamMember, Workspace,
        WorkspaceDomainError, WorkspaceId,
    },
    ports::{
        ProjectRepository, ProjectRepositoryError, WorkspaceRepository, WorkspaceRepositoryError,
    },
};
use mockable::Clock;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Number of entries returned by [`ProjectService::recent`].
pub const RECENT_PROJECTS_LIMIT: usize = 10;

/// Request payload for creating a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateProjectRequest {
    workspace_id: WorkspaceId,
    title: String,
    is_private: bool,
}

impl CreateProjectRequest {
    /// Creates a public project request.
    #[must_use]
    pub fn new(workspace_id: WorkspaceId, title: impl Into<String>) -> Self {
        Self {
            workspace_id,
            title: title.into(),
            is_private: false,
        }
    }

    /// Marks the project as private.
    #[must_use]
    pub const fn private(mut self, is_private: bool) -> Self {
        self.is_private = is_private;
        self
    }
}

/// Request payload for updating a project; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateProjectRequest {
    title: Option<String>,
    is_private: Option<bool>,
}

impl UpdateProjectRequest {
    /// Creates an empty update.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a new title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the privacy flag.
    #[must_use]
    pub const fn with_private(mut self, is_private: bool) -> Self {
        self.is_private = Some(is_private);
        self
    }
}

/// Outcome of toggling a star.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StarChange {
    /// The project is now starred by the caller.
    Starred,
    /// The caller's star has been removed.
    Unstarred,
}

/// Service-level errors for project operations.
#[derive(Debug, Error)]
pub enum ProjectServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] WorkspaceDomainError),
    /// Project repository operation failed.
    #[error(transparent)]
    Repository(#[from] ProjectRepositoryError),
    /// Workspace repository operation failed.
    #[error(transparent)]
    Workspaces(#[from] WorkspaceRepositoryError),
    /// No project matches the lookup key.
    #[error("project not found: {0}")]
    NotFound(String),
    /// The referenced workspace does not exist.
    #[error("workspace not found: {0}")]
    WorkspaceNotFound(WorkspaceId),
    /// The caller is not a member of the workspace.
    #[error("user {user_id} is not a member of workspace {workspace_id}")]
    NotMember {
        /// Workspace identifier.
        workspace_id: WorkspaceId,
        /// Caller identifier.
        user_id: UserId,
    },
    /// The caller may not see or change the project.
    #[error("user {user_id} may not access project {project_id}")]
    Forbidden {
        /// Project identifier.
        project_id: ProjectId,
        /// Caller identifier.
        user_id: UserId,
    },
}

/// Result type for project service operations.
pub type ProjectServiceResult<T> = Result<T, ProjectServiceError>;

/// Project orchestration service.
pub struct ProjectService<P, W, C>
where
    P: ProjectRepository + ?Sized,
    W: WorkspaceRepository + ?Sized,
    C: Clock + Send + Sync,
{
    projects: Arc<P>,
    workspaces: Arc<W>,
    clock: Arc<C>,
}

impl<P, W, C> Clone for ProjectService<P, W, C>
where
    P: ProjectRepository + ?Sized,
    W: WorkspaceRepository + ?Sized,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            projects: Arc::clone(&self.projects),
            workspaces: Arc::clone(&self.workspaces),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<P, W, C> ProjectService<P, W, C>
where
    P: ProjectRepository + ?Sized,
    W: WorkspaceRepository + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a new project service.
    #[must_use]
    pub const fn new(projects: Arc<P>, workspaces: Arc<W>, clock: Arc<C>) -> Self {
        Self {
            projects,
            workspaces,
            clock,
        }
    }

    /// Creates a project inside a workspace the caller belongs to.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::Domain`] for an invalid title,
    /// [`ProjectServiceError::WorkspaceNotFound`] for an unknown workspace and
    /// [`ProjectServiceError::NotMember`] when the caller is not a member.
    pub async fn create(
        &self,
        actor: &Actor,
        request: CreateProjectRequest,
    ) -> ProjectServiceResult<Project> {
        let title = ProjectTitle::new(request.title)?;
        self.require_member(actor, request.workspace_id).await?;

        let new_project = NewProject::new(
            request.workspace_id,
            title,
            request.is_private,
            actor.user_id(),
            &*self.clock,
        );
        let stored = self.projects.insert(&new_project).await?;

        let base = Slug::derive(SlugStyle::Url, stored.title().as_str());
        let collides = self.projects.slug_exists(&base).await?;
        let slug = resolve_slug(base, collides, stored.id());
        self.projects.assign_slug(stored.id(), &slug).await?;

        info!(
            project_id = %stored.id(),
            workspace_id = %stored.workspace_id(),
            user_id = %actor.user_id(),
            slug = %slug,
            "project created"
        );
        Ok(stored.with_slug(slug))
    }

    /// Finds a project by numeric id or slug within the caller's workspaces.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::NotFound`] when nothing matches or the
    /// caller is not a member of the owning workspace, and
    /// [`ProjectServiceError::Forbidden`] for a private project the caller
    /// neither owns nor administers.
    pub async fn find_for_actor(&self, actor: &Actor, uid: &str) -> ProjectServiceResult<Project> {
        let project = self
            .lookup(uid)
            .await?
            .ok_or_else(|| ProjectServiceError::NotFound(uid.to_owned()))?;
        let membership = self
            .workspaces
            .find_member(project.workspace_id(), actor.user_id())
            .await?;
        if membership.is_none() {
            return Err(ProjectServiceError::NotFound(uid.to_owned()));
        }
        if !project.is_visible_to(actor) {
            return Err(ProjectServiceError::Forbidden {
                project_id: project.id(),
                user_id: actor.user_id(),
            });
        }
        Ok(project)
    }

    /// Finds a project like [`Self::find_for_actor`] and records that the
    /// caller opened it.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Self::find_for_actor`].
    pub async fn open(&self, actor: &Actor, uid: &str) -> ProjectServiceResult<Project> {
        let project = self.find_for_actor(actor, uid).await?;
        self.projects
            .record_opened(actor.user_id(), project.id(), self.clock.utc())
            .await?;
        Ok(project)
    }

    /// Returns the projects the caller opened most recently, newest first.
    ///
    /// Projects outside the caller's workspaces, and private projects the
    /// caller may no longer see, are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::Repository`] or
    /// [`ProjectServiceError::Workspaces`] when lookup fails.
    pub async fn recent(&self, actor: &Actor) -> ProjectServiceResult<Vec<Project>> {
        let memberships: HashSet<WorkspaceId> = self
            .workspaces
            .member_workspaces(actor.user_id())
            .await?
            .iter()
            .map(Workspace::id)
            .collect();
        let recent = self.projects.recent_for(actor.user_id()).await?;
        Ok(recent
            .into_iter()
            .filter(|project| {
                memberships.contains(&project.workspace_id()) && project.is_visible_to(actor)
            })
            .take(RECENT_PROJECTS_LIMIT)
            .collect())
    }

    /// Returns the projects of a workspace visible to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::NotMember`] when the caller is not a
    /// member of the workspace.
    pub async fn list_for_workspace(
        &self,
        actor: &Actor,
        workspace_id: WorkspaceId,
    ) -> ProjectServiceResult<Vec<Project>> {
        self.require_member(actor, workspace_id).await?;
        let projects = self.projects.for_workspace(workspace_id).await?;
        Ok(projects
            .into_iter()
            .filter(|project| project.is_visible_to(actor))
            .collect())
    }

    /// Updates the title and privacy flag. The slug is never regenerated.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::Forbidden`] unless the caller owns the
    /// project, administers its workspace, or is a global admin.
    pub async fn update(
        &self,
        actor: &Actor,
        id: ProjectId,
        request: UpdateProjectRequest,
    ) -> ProjectServiceResult<Project> {
        let title = request.title.map(ProjectTitle::new).transpose()?;
        let mut project = self.require_project(id).await?;
        self.require_editor(actor, &project).await?;

        if let Some(new_title) = title {
            project.retitle(new_title, &*self.clock);
        }
        if let Some(is_private) = request.is_private {
            project.set_private(is_private, &*self.clock);
        }
        self.projects.update(&project).await?;
        info!(project_id = %id, user_id = %actor.user_id(), "project updated");
        Ok(project)
    }

    /// Deletes a project with its stars and recent entries. The same callers
    /// that may update a project may delete it; the caller removes the
    /// project's board separately.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::NotFound`] for an unknown project and
    /// [`ProjectServiceError::Forbidden`] for any other caller.
    pub async fn delete(&self, actor: &Actor, id: ProjectId) -> ProjectServiceResult<Project> {
        let project = self.require_project(id).await?;
        self.require_editor(actor, &project).await?;
        if !self.projects.delete(id).await? {
            return Err(ProjectServiceError::NotFound(id.to_string()));
        }
        info!(project_id = %id, user_id = %actor.user_id(), "project deleted");
        Ok(project)
    }

    /// Removes the projects of a deleted workspace and returns their
    /// identifiers.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::Repository`] when persistence fails.
    pub async fn purge_workspace(
        &self,
        workspace_id: WorkspaceId,
    ) -> ProjectServiceResult<Vec<ProjectId>> {
        let removed = self.projects.delete_for_workspace(workspace_id).await?;
        info!(
            workspace_id = %workspace_id,
            projects = removed.len(),
            "workspace projects purged"
        );
        Ok(removed)
    }

    /// Moves a project to another workspace the caller belongs to.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::NotFound`] for an unknown project and
    /// [`ProjectServiceError::NotMember`] when the caller is not a member of
    /// the target workspace.
    pub async fn change_workspace(
        &self,
        actor: &Actor,
        project_id: ProjectId,
        workspace_id: WorkspaceId,
    ) -> ProjectServiceResult<Project> {
        let mut project = self.require_project(project_id).await?;
        self.require_member(actor, workspace_id).await?;
        project.move_to_workspace(workspace_id, &*self.clock);
        self.projects.update(&project).await?;
        info!(
            project_id = %project_id,
            workspace_id = %workspace_id,
            user_id = %actor.user_id(),
            "project moved to workspace"
        );
        Ok(project)
    }

    /// Stars the project for the caller, or removes an existing star.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::NotFound`] for an unknown project.
    pub async fn toggle_star(
        &self,
        actor: &Actor,
        project_id: ProjectId,
    ) -> ProjectServiceResult<StarChange> {
        let starred = self
            .projects
            .toggle_star(actor.user_id(), project_id)
            .await
            .map_err(|err| match err {
                ProjectRepositoryError::NotFound(id) => ProjectServiceError::NotFound(id.to_string()),
                other => ProjectServiceError::Repository(other),
            })?;
        if starred {
            Ok(StarChange::Starred)
        } else {
            Ok(StarChange::Unstarred)
        }
    }

    /// Returns the projects starred by the caller.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::Repository`] when lookup fails.
    pub async fn starred(&self, actor: &Actor) -> ProjectServiceResult<Vec<Project>> {
        Ok(self.projects.starred_by(actor.user_id()).await?)
    }

    async fn lookup(&self, uid: &str) -> ProjectServiceResult<Option<Project>> {
        if let Some(id) = numeric_uid(uid) {
            let by_id = self.projects.find_by_id(ProjectId::from_persisted(id)).await?;
            if by_id.is_some() {
                return Ok(by_id);
            }
        }
        Ok(self.projects.find_by_slug(uid).await?)
    }

    async fn require_project(&self, id: ProjectId) -> ProjectServiceResult<Project> {
        self.projects
            .find_by_id(id)
            .await?
            .ok_or_else(|| ProjectServiceError::NotFound(id.to_string()))
    }

    async fn require_member(
        &self,
        actor: &Actor,
        workspace_id: WorkspaceId,
    ) -> ProjectServiceResult<TeamMember> {
        if self.workspaces.find_by_id(workspace_id).await?.is_none() {
            return Err(ProjectServiceError::WorkspaceNotFound(workspace_id));
        }
        self.workspaces
            .find_member(workspace_id, actor.user_id())
            .await?
            .ok_or(ProjectServiceError::NotMember {
                workspace_id,
                user_id: actor.user_id(),
            })
    }

    async fn require_editor(&self, actor: &Actor, project: &Project) -> ProjectServiceResult<()> {
        if actor.is_admin() || project.owner() == actor.user_id() {
            return Ok(());
        }
        let membership = self
            .workspaces
            .find_member(project.workspace_id(), actor.user_id())
            .await?;
        if membership.as_ref().is_some_and(TeamMember::is_admin) {
            return Ok(());
        }
        Err(ProjectServiceError::Forbidden {
            project_id: project.id(),
            user_id: actor.user_id(),
        })
    }
}
