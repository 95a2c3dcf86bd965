//! Workspace aggregate and its validated name.

use super::{WorkspaceDomainError, WorkspaceId};
use crate::identity::UserId;
use crate::slug::Slug;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum workspace name length, matching the `VARCHAR(150)` column.
const MAX_NAME_LENGTH: usize = 150;

/// Trimmed, non-empty workspace name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkspaceName(String);

impl WorkspaceName {
    /// Creates a validated workspace name.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceDomainError::EmptyWorkspaceName`] when the value is
    /// blank or [`WorkspaceDomainError::WorkspaceNameTooLong`] when it exceeds
    /// 150 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, WorkspaceDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(WorkspaceDomainError::EmptyWorkspaceName);
        }
        if normalized.chars().count() > MAX_NAME_LENGTH {
            return Err(WorkspaceDomainError::WorkspaceNameTooLong {
                max: MAX_NAME_LENGTH,
            });
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkspaceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A workspace that has not been stored yet and has no identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWorkspace {
    name: WorkspaceName,
    owner: UserId,
    created_at: DateTime<Utc>,
}

impl NewWorkspace {
    /// Prepares a workspace owned by `owner`.
    #[must_use]
    pub fn new(name: WorkspaceName, owner: UserId, clock: &impl Clock) -> Self {
        Self {
            name,
            owner,
            created_at: clock.utc(),
        }
    }

    /// Returns the workspace name.
    #[must_use]
    pub const fn name(&self) -> &WorkspaceName {
        &self.name
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

/// Workspace aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    id: WorkspaceId,
    name: WorkspaceName,
    slug: Option<Slug>,
    owner: UserId,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedWorkspaceData {
    /// Persisted identifier.
    pub id: WorkspaceId,
    /// Persisted name.
    pub name: WorkspaceName,
    /// Persisted slug; absent between insert and slug assignment.
    pub slug: Option<Slug>,
    /// Persisted owner.
    pub owner: UserId,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Workspace {
    /// Reconstructs a workspace from storage.
    #[must_use]
    pub fn from_persisted(data: PersistedWorkspaceData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            slug: data.slug,
            owner: data.owner,
            created_at: data.created_at,
        }
    }

    /// Returns the workspace identifier.
    #[must_use]
    pub const fn id(&self) -> WorkspaceId {
        self.id
    }

    /// Returns the workspace name.
    #[must_use]
    pub const fn name(&self) -> &WorkspaceName {
        &self.name
    }

    /// Returns the slug once assigned.
    #[must_use]
    pub const fn slug(&self) -> Option<&Slug> {
        self.slug.as_ref()
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

    /// Returns the workspace carrying its final slug.
    #[must_use]
    pub fn with_slug(mut self, slug: Slug) -> Self {
        self.slug = Some(slug);
        self
    }

    /// Renames the workspace. The slug is left as it was.
    pub fn rename(&mut self, name: WorkspaceName) {
        self.name = name;
    }
}
