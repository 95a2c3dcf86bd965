//! Task aggregate, its title, and its position within a list.

use super::{BoardDomainError, BoardListId, TaskId};
use crate::identity::UserId;
use crate::slug::Slug;
use crate::workspace::domain::ProjectId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum task title length, matching the `VARCHAR(255)` column.
const MAX_TITLE_LENGTH: usize = 255;

/// Trimmed, non-empty task title.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskTitle(String);

impl TaskTitle {
    /// Creates a validated task title.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyTaskTitle`] when the value is blank or
    /// [`BoardDomainError::TaskTitleTooLong`] when it exceeds 255 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, BoardDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(BoardDomainError::EmptyTaskTitle);
        }
        if normalized.chars().count() > MAX_TITLE_LENGTH {
            return Err(BoardDomainError::TaskTitleTooLong {
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

impl fmt::Display for TaskTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 1-based display position of a task within its list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskOrder(i32);

impl TaskOrder {
    /// Position of the first task in a list.
    pub const FIRST: Self = Self(1);

    /// Creates a validated order value.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::InvalidOrder`] when the value is not
    /// positive or does not fit the storage column.
    pub fn new(value: i64) -> Result<Self, BoardDomainError> {
        i32::try_from(value)
            .ok()
            .filter(|order| *order > 0)
            .map(Self)
            .ok_or(BoardDomainError::InvalidOrder(value))
    }

    /// Wraps an order read back from storage.
    #[must_use]
    pub const fn from_persisted(value: i32) -> Self {
        Self(value)
    }

    /// Returns the dense 1-based order for a zero-based sequence index.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::InvalidOrder`] when the index does not fit
    /// the storage column.
    pub fn from_index(index: usize) -> Result<Self, BoardDomainError> {
        let position = i64::try_from(index)
            .ok()
            .and_then(|value| value.checked_add(1))
            .unwrap_or(i64::MAX);
        Self::new(position)
    }

    /// Returns the order that follows this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub const fn value(self) -> i32 {
        self.0
    }
}

impl fmt::Display for TaskOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A task that has not been stored yet.
///
/// Its order is assigned by the repository on insert: one past the highest
/// order currently in the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    project_id: ProjectId,
    list_id: BoardListId,
    title: TaskTitle,
    description: Option<String>,
    created_by: UserId,
    created_at: DateTime<Utc>,
}

impl NewTask {
    /// Prepares a task for `list_id`.
    #[must_use]
    pub fn new(
        project_id: ProjectId,
        list_id: BoardListId,
        title: TaskTitle,
        created_by: UserId,
        clock: &impl Clock,
    ) -> Self {
        Self {
            project_id,
            list_id,
            title,
            description: None,
            created_by,
            created_at: clock.utc(),
        }
    }

    /// Sets the task description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the target list.
    #[must_use]
    pub const fn list_id(&self) -> BoardListId {
        self.list_id
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the creating user.
    #[must_use]
    pub const fn created_by(&self) -> UserId {
        self.created_by
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    project_id: ProjectId,
    list_id: BoardListId,
    title: TaskTitle,
    description: Option<String>,
    slug: Option<Slug>,
    order: TaskOrder,
    is_archived: bool,
    created_by: UserId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted identifier.
    pub id: TaskId,
    /// Persisted owning project.
    pub project_id: ProjectId,
    /// Persisted list.
    pub list_id: BoardListId,
    /// Persisted title.
    pub title: TaskTitle,
    /// Persisted description.
    pub description: Option<String>,
    /// Persisted slug; absent between insert and slug assignment.
    pub slug: Option<Slug>,
    /// Persisted position within the list.
    pub order: TaskOrder,
    /// Persisted archive flag.
    pub is_archived: bool,
    /// Persisted creator.
    pub created_by: UserId,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Reconstructs a task from storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            project_id: data.project_id,
            list_id: data.list_id,
            title: data.title,
            description: data.description,
            slug: data.slug,
            order: data.order,
            is_archived: data.is_archived,
            created_by: data.created_by,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the list currently holding the task.
    #[must_use]
    pub const fn list_id(&self) -> BoardListId {
        self.list_id
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the slug once assigned.
    #[must_use]
    pub const fn slug(&self) -> Option<&Slug> {
        self.slug.as_ref()
    }

    /// Returns the position within the list.
    #[must_use]
    pub const fn order(&self) -> TaskOrder {
        self.order
    }

    /// Returns whether the task is archived.
    #[must_use]
    pub const fn is_archived(&self) -> bool {
        self.is_archived
    }

    /// Returns the creating user.
    #[must_use]
    pub const fn created_by(&self) -> UserId {
        self.created_by
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

    /// Returns the task carrying its final slug.
    #[must_use]
    pub fn with_slug(mut self, slug: Slug) -> Self {
        self.slug = Some(slug);
        self
    }

    /// Returns the task placed at `order` inside `list_id`.
    #[must_use]
    pub fn placed(mut self, list_id: BoardListId, order: TaskOrder) -> Self {
        self.list_id = list_id;
        self.order = order;
        self
    }

    /// Changes the title. The slug is left as it was.
    pub fn retitle(&mut self, title: TaskTitle, clock: &impl Clock) {
        self.title = title;
        self.touch(clock);
    }

    /// Replaces the description; an empty value clears it.
    pub fn describe(&mut self, description: &str, clock: &impl Clock) {
        let trimmed = description.trim();
        self.description = (!trimmed.is_empty()).then(|| trimmed.to_owned());
        self.touch(clock);
    }

    /// Archives or restores the task.
    pub fn set_archived(&mut self, is_archived: bool, clock: &impl Clock) {
        self.is_archived = is_archived;
        self.touch(clock);
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
