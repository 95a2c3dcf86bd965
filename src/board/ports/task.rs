//! Repository port for tasks and their ordering.

use crate::board::domain::{BoardListId, NewTask, Task, TaskId, TaskOrder, TaskPlacement};
use crate::slug::Slug;
use crate::workspace::domain::ProjectId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Explicit order for one task, as sent by the bulk order endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderAssignment {
    /// Task to update.
    pub task_id: TaskId,
    /// New order value.
    pub order: TaskOrder,
}

/// Task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task at the end of its list and returns it with its
    /// assigned identifier and order.
    ///
    /// The returned task has no slug yet.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::ListNotFound`] when the list does not
    /// exist in the store.
    async fn insert(&self, task: &NewTask) -> TaskRepositoryResult<Task>;

    /// Persists the final slug of a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn assign_slug(&self, id: TaskId, slug: &Slug) -> TaskRepositoryResult<()>;

    /// Returns whether any task already carries `slug`.
    async fn slug_exists(&self, slug: &Slug) -> TaskRepositoryResult<bool>;

    /// Persists title, description, and archive changes. List membership and
    /// order are not written here.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn update(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Deletes a task, returning whether a row was removed.
    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<bool>;

    /// Finds a task by identifier.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Finds a task by slug.
    async fn find_by_slug(&self, slug: &str) -> TaskRepositoryResult<Option<Task>>;

    /// Returns the number of tasks in a list.
    async fn count_in_list(&self, list_id: BoardListId) -> TaskRepositoryResult<u64>;

    /// Returns the archived tasks of a project.
    async fn archived_for_project(&self, project_id: ProjectId) -> TaskRepositoryResult<Vec<Task>>;

    /// Returns the tasks of a list within a project, ordered by position.
    async fn tasks_in_list(
        &self,
        project_id: ProjectId,
        list_id: BoardListId,
    ) -> TaskRepositoryResult<Vec<Task>>;

    /// Returns the task ids of a list within a project, ordered by position
    /// and then by id.
    async fn list_task_ids(
        &self,
        project_id: ProjectId,
        list_id: BoardListId,
    ) -> TaskRepositoryResult<Vec<TaskId>>;

    /// Writes list membership and order for every placement in one batch.
    ///
    /// Returns the number of rows updated.
    async fn apply_placements(&self, placements: &[TaskPlacement]) -> TaskRepositoryResult<u64>;

    /// Writes explicit orders for every assignment in one batch.
    ///
    /// Returns the number of rows updated; unknown ids are skipped.
    async fn update_orders(&self, assignments: &[OrderAssignment]) -> TaskRepositoryResult<u64>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The target list was not found.
    #[error("list not found: {0}")]
    ListNotFound(BoardListId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
