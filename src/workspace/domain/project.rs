//! Project aggregate and its validated title.

use super::{ProjectId, WorkspaceDomainError, WorkspaceId};
use crate::identity::{Actor, UserId};
use crate::slug::Slug;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum project title length, matching the `VARCHAR(150)` column.
const MAX_TITLE_LENGTH: usize = 150;

/// Trimmed, non-empty project title.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectTitle(String);

impl ProjectTitle {
    /// Creates a validated project title.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceDomainError::EmptyProjectTitle`] when the value is
    /// blank or [`WorkspaceDomainError::ProjectTitleTooLong`] when it exceeds
    /// 150 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, WorkspaceDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(WorkspaceDomainError::EmptyProjectTitle);
        }
        if normalized.chars().count() > MAX_TITLE_LENGTH {
            return Err(WorkspaceDomainError::ProjectTitleTooLong {
                max: MAX_TITLE_LENGTH,
            });
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the title as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A project that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    workspace_id: WorkspaceId,
    title: ProjectTitle,
    is_private: bool,
    owner: UserId,
    created_at: DateTime<Utc>,
}

impl NewProject {
    /// Prepares a project inside `workspace_id`.
    #[must_use]
    pub fn new(
        workspace_id: WorkspaceId,
        title: ProjectTitle,
        is_private: bool,
        owner: UserId,
        clock: &impl Clock,
    ) -> Self {
        Self {
            workspace_id,
            title,
            is_private,
            owner,
            created_at: clock.utc(),
        }
    }

    /// Returns the owning workspace.
    #[must_use]
    pub const fn workspace_id(&self) -> WorkspaceId {
        self.workspace_id
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &ProjectTitle {
        &self.title
    }

    /// Returns whether the project is private.
    #[must_use]
    pub const fn is_private(&self) -> bool {
        self.is_private
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn owner(&self) -> UserId {
        self.owner
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Project aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    id: ProjectId,
    workspace_id: WorkspaceId,
    title: ProjectTitle,
    slug: Option<Slug>,
    is_private: bool,
    owner: UserId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedProjectData {
    /// Persisted identifier.
    pub id: ProjectId,
    /// Persisted owning workspace.
    pub workspace_id: WorkspaceId,
    /// Persisted title.
    pub title: ProjectTitle,
    /// Persisted slug; absent between insert and slug assignment.
    pub slug: Option<Slug>,
    /// Persisted privacy flag.
    pub is_private: bool,
    /// Persisted owner.
    pub owner: UserId,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Reconstructs a project from storage.
    #[must_use]
    pub fn from_persisted(data: PersistedProjectData) -> Self {
        Self {
            id: data.id,
            workspace_id: data.workspace_id,
            title: data.title,
            slug: data.slug,
            is_private: data.is_private,
            owner: data.owner,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn id(&self) -> ProjectId {
        self.id
    }

    /// Returns the owning workspace.
    #[must_use]
    pub const fn workspace_id(&self) -> WorkspaceId {
        self.workspace_id
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &ProjectTitle {
        &self.title
    }

    /// Returns the slug once assigned.
    #[must_use]
    pub const fn slug(&self) -> Option<&Slug> {
        self.slug.as_ref()
    }

    /// Returns whether the project is private.
    #[must_use]
    pub const fn is_private(&self) -> bool {
        self.is_private
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn owner(&self) -> UserId {
        self.owner
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns whether `actor` may see this project once workspace membership
    /// has been established. Private projects are limited to global admins
    /// and the owner.
    #[must_use]
    pub fn is_visible_to(&self, actor: &Actor) -> bool {
        !self.is_private || actor.is_admin() || actor.user_id() == self.owner
    }

    /// Returns the project carrying its final slug.
    #[must_use]
    pub fn with_slug(mut self, slug: Slug) -> Self {
        self.slug = Some(slug);
        self
    }

    /// Changes the title. The slug is left as it was.
    pub fn retitle(&mut self, title: ProjectTitle, clock: &impl Clock) {
        self.title = title;
        self.touch(clock);
    }

    /// Changes the privacy flag.
    pub fn set_private(&mut self, is_private: bool, clock: &impl Clock) {
        self.is_private = is_private;
        self.touch(clock);
    }

    /// Moves the project to another workspace.
    pub fn move_to_workspace(&mut self, workspace_id: WorkspaceId, clock: &impl Clock) {
        self.workspace_id = workspace_id;
        self.touch(clock);
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
