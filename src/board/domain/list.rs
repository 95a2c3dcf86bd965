//! Board lists (columns) that own an ordering of tasks.

use super::{BoardDomainError, BoardListId};
use crate::workspace::domain::ProjectId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Maximum list title length, matching the `VARCHAR(150)` column.
const MAX_TITLE_LENGTH: usize = 150;

/// Trimmed, non-empty list title.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListTitle(String);

impl ListTitle {
    /// Creates a validated list title.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyListTitle`] when the value is blank or
    /// [`BoardDomainError::ListTitleTooLong`] when it exceeds 150 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, BoardDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(BoardDomainError::EmptyListTitle);
        }
        if normalized.chars().count() > MAX_TITLE_LENGTH {
            return Err(BoardDomainError::ListTitleTooLong {
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

/// A list that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBoardList {
    project_id: ProjectId,
    title: ListTitle,
    created_at: DateTime<Utc>,
}

impl NewBoardList {
    /// Prepares a list inside `project_id`.
    #[must_use]
    pub fn new(project_id: ProjectId, title: ListTitle, clock: &impl Clock) -> Self {
        Self {
            project_id,
            title,
            created_at: clock.utc(),
        }
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &ListTitle {
        &self.title
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Stored board list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardList {
    id: BoardListId,
    project_id: ProjectId,
    title: ListTitle,
    created_at: DateTime<Utc>,
}

impl BoardList {
    /// Reconstructs a list from storage.
    #[must_use]
    pub const fn from_persisted(
        id: BoardListId,
        project_id: ProjectId,
        title: ListTitle,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            project_id,
            title,
            created_at,
        }
    }

    /// Returns the list identifier.
    #[must_use]
    pub const fn id(&self) -> BoardListId {
        self.id
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &ListTitle {
        &self.title
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
