//! Service layer for board lists and task creation, lookup, and editing.

use crate::board::{
    domain::{
        BoardDomainError, BoardList, BoardListId, ListTitle, NewBoardList, NewTask, Task, TaskId,
        TaskOrder, TaskTitle,
    },
    ports::{
        BoardListRepository, BoardListRepositoryError, OrderAssignment, TaskRepository,
        TaskRepositoryError,
    },
};
use crate::identity::Actor;
use crate::slug::{Slug, SlugStyle, numeric_uid, resolve_slug};
use crate::workspace::domain::ProjectId;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    project_id: ProjectId,
    list_id: BoardListId,
    title: String,
    description: Option<String>,
}

impl CreateTaskRequest {
    /// Creates a request with the required fields.
    #[must_use]
    pub fn new(project_id: ProjectId, list_id: BoardListId, title: impl Into<String>) -> Self {
        Self {
            project_id,
            list_id,
            title: title.into(),
            description: None,
        }
    }

    /// Sets the task description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Request payload for editing a task; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTaskRequest {
    title: Option<String>,
    description: Option<String>,
    archived: Option<bool>,
}

impl UpdateTaskRequest {
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

    /// Sets a new description; an empty value clears it.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Archives or restores the task.
    #[must_use]
    pub const fn with_archived(mut self, archived: bool) -> Self {
        self.archived = Some(archived);
        self
    }
}

/// A board list together with the number of tasks it holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSummary {
    /// The list.
    pub list: BoardList,
    /// Number of tasks in the list.
    pub task_count: u64,
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] BoardDomainError),
    /// Task repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// List repository operation failed.
    #[error(transparent)]
    Lists(#[from] BoardListRepositoryError),
    /// No task matches the lookup key.
    #[error("task not found: {0}")]
    NotFound(String),
    /// No list has the identifier.
    #[error("list not found: {0}")]
    UnknownList(BoardListId),
    /// The list does not exist in the project.
    #[error("list {list_id} not found in project {project_id}")]
    ListNotFound {
        /// Project identifier.
        project_id: ProjectId,
        /// List identifier.
        list_id: BoardListId,
    },
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
pub struct TaskLifecycleService<T, L, C>
where
    T: TaskRepository + ?Sized,
    L: BoardListRepository + ?Sized,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    lists: Arc<L>,
    clock: Arc<C>,
}

impl<T, L, C> Clone for TaskLifecycleService<T, L, C>
where
    T: TaskRepository + ?Sized,
    L: BoardListRepository + ?Sized,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            tasks: Arc::clone(&self.tasks),
            lists: Arc::clone(&self.lists),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<T, L, C> TaskLifecycleService<T, L, C>
where
    T: TaskRepository + ?Sized,
    L: BoardListRepository + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(tasks: Arc<T>, lists: Arc<L>, clock: Arc<C>) -> Self {
        Self {
            tasks,
            lists,
            clock,
        }
    }

    /// Creates a board list inside a project.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] for an invalid title or
    /// [`TaskLifecycleError::Lists`] when persistence fails.
    pub async fn create_list(
        &self,
        actor: &Actor,
        project_id: ProjectId,
        title: &str,
    ) -> TaskLifecycleResult<BoardList> {
        let list_title = ListTitle::new(title)?;
        let new_list = NewBoardList::new(project_id, list_title, &*self.clock);
        let list = self.lists.insert(&new_list).await?;
        info!(
            list_id = %list.id(),
            project_id = %project_id,
            user_id = %actor.user_id(),
            "list created"
        );
        Ok(list)
    }

    /// Returns the lists of a project with their task counts.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when a lookup fails.
    pub async fn lists_for_project(
        &self,
        project_id: ProjectId,
    ) -> TaskLifecycleResult<Vec<ListSummary>> {
        let lists = self.lists.for_project(project_id).await?;
        let mut summaries = Vec::with_capacity(lists.len());
        for list in lists {
            let task_count = self.tasks.count_in_list(list.id()).await?;
            summaries.push(ListSummary { list, task_count });
        }
        Ok(summaries)
    }

    /// Returns a list by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::UnknownList`] when no list matches.
    pub async fn find_list(&self, list_id: BoardListId) -> TaskLifecycleResult<BoardList> {
        self.lists
            .find_by_id(list_id)
            .await?
            .ok_or(TaskLifecycleError::UnknownList(list_id))
    }

    /// Creates a task at the end of its list.
    ///
    /// The slug is derived from the title with the HTML variant and suffixed
    /// with the new identifier when another task already holds it.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] for an invalid title and
    /// [`TaskLifecycleError::ListNotFound`] when the list is not part of the
    /// project.
    pub async fn create_task(
        &self,
        actor: &Actor,
        request: CreateTaskRequest,
    ) -> TaskLifecycleResult<Task> {
        let title = TaskTitle::new(request.title)?;
        self.require_list(request.project_id, request.list_id).await?;

        let mut new_task = NewTask::new(
            request.project_id,
            request.list_id,
            title,
            actor.user_id(),
            &*self.clock,
        );
        if let Some(description) = request.description {
            new_task = new_task.with_description(description);
        }
        let stored = self.tasks.insert(&new_task).await?;

        let base = Slug::derive(SlugStyle::Html, stored.title().as_str());
        let collides = self.tasks.slug_exists(&base).await?;
        let slug = resolve_slug(base, collides, stored.id());
        self.tasks.assign_slug(stored.id(), &slug).await?;

        info!(
            task_id = %stored.id(),
            list_id = %stored.list_id(),
            project_id = %stored.project_id(),
            order = %stored.order(),
            "task created"
        );
        Ok(stored.with_slug(slug))
    }

    /// Finds a task by numeric id or by slug.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when nothing matches.
    pub async fn find_task(&self, uid: &str) -> TaskLifecycleResult<Task> {
        if let Some(id) = numeric_uid(uid) {
            if let Some(task) = self.tasks.find_by_id(TaskId::from_persisted(id)).await? {
                return Ok(task);
            }
        }
        self.tasks
            .find_by_slug(uid)
            .await?
            .ok_or_else(|| TaskLifecycleError::NotFound(uid.to_owned()))
    }

    /// Edits the title, description, or archive flag. The slug and the
    /// task's position are never touched.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] for an invalid title and
    /// [`TaskLifecycleError::NotFound`] for an unknown task.
    pub async fn update_task(
        &self,
        id: TaskId,
        request: UpdateTaskRequest,
    ) -> TaskLifecycleResult<Task> {
        let title = request.title.map(TaskTitle::new).transpose()?;
        let mut task = self.require_task(id).await?;

        if let Some(new_title) = title {
            task.retitle(new_title, &*self.clock);
        }
        if let Some(description) = request.description {
            task.describe(&description, &*self.clock);
        }
        if let Some(archived) = request.archived {
            task.set_archived(archived, &*self.clock);
        }
        self.tasks.update(&task).await?;
        debug!(task_id = %id, "task updated");
        Ok(task)
    }

    /// Deletes a task, returning whether it existed.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when persistence fails.
    pub async fn delete_task(&self, id: TaskId) -> TaskLifecycleResult<bool> {
        let removed = self.tasks.delete(id).await?;
        if removed {
            info!(task_id = %id, "task deleted");
        }
        Ok(removed)
    }

    /// Removes every list and task of a deleted project, returning the
    /// number of lists removed.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Lists`] when persistence fails.
    pub async fn purge_project(&self, project_id: ProjectId) -> TaskLifecycleResult<u64> {
        let removed = self.lists.delete_for_project(project_id).await?;
        info!(project_id = %project_id, lists = removed, "project board purged");
        Ok(removed)
    }

    /// Returns the number of tasks in a list.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when lookup fails.
    pub async fn count_in_list(&self, list_id: BoardListId) -> TaskLifecycleResult<u64> {
        Ok(self.tasks.count_in_list(list_id).await?)
    }

    /// Returns the archived tasks of a project.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when lookup fails.
    pub async fn archived_tasks(&self, project_id: ProjectId) -> TaskLifecycleResult<Vec<Task>> {
        Ok(self.tasks.archived_for_project(project_id).await?)
    }

    /// Returns the tasks of a list in display order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::ListNotFound`] when the list is not part
    /// of the project.
    pub async fn tasks_in_list(
        &self,
        project_id: ProjectId,
        list_id: BoardListId,
    ) -> TaskLifecycleResult<Vec<Task>> {
        self.require_list(project_id, list_id).await?;
        Ok(self.tasks.tasks_in_list(project_id, list_id).await?)
    }

    /// Writes explicit `(task, order)` pairs in one batch.
    ///
    /// Returns the number of rows updated.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] when any order is not a
    /// positive integer; nothing is written in that case.
    pub async fn update_orders(
        &self,
        assignments: &[(TaskId, i64)],
    ) -> TaskLifecycleResult<u64> {
        let validated = assignments
            .iter()
            .map(|(task_id, order)| {
                TaskOrder::new(*order).map(|valid| OrderAssignment {
                    task_id: *task_id,
                    order: valid,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let updated = self.tasks.update_orders(&validated).await?;
        debug!(updated, "task orders rewritten");
        Ok(updated)
    }

    async fn require_task(&self, id: TaskId) -> TaskLifecycleResult<Task> {
        self.tasks
            .find_by_id(id)
            .await?
            .ok_or_else(|| TaskLifecycleError::NotFound(id.to_string()))
    }

    async fn require_list(
        &self,
        project_id: ProjectId,
        list_id: BoardListId,
    ) -> TaskLifecycleResult<BoardList> {
        self.lists
            .find_by_id(list_id)
            .await?
            .filter(|list| list.project_id() == project_id)
            .ok_or(TaskLifecycleError::ListNotFound {
                project_id,
                list_id,
            })
    }
}
