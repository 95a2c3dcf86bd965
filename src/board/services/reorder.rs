//! Service layer for drag-and-drop task moves.

use crate::board::{
    domain::{
        BoardListId, ReorderError, TaskId, TaskLocator, TaskPlacement,
        reorder::{plan_across_lists, plan_within_list},
    },
    ports::{BoardListRepository, BoardListRepositoryError, TaskRepository, TaskRepositoryError},
};
use crate::workspace::domain::ProjectId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::{debug, info};

/// A move described by the board client.
///
/// Positions are 1-based and may be out of range; the destination is
/// clamped to the nearest valid slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskMoveRequest {
    /// Reorder inside one list.
    WithinList {
        /// List being reordered.
        list_id: BoardListId,
        /// How the moving task is found.
        locator: TaskLocator,
        /// Destination position.
        to: i64,
    },
    /// Move a task from one list into another.
    AcrossLists {
        /// Task being moved.
        task_id: TaskId,
        /// List the task leaves.
        source_list: BoardListId,
        /// List the task joins.
        destination_list: BoardListId,
        /// Destination position.
        to: i64,
    },
}

impl TaskMoveRequest {
    /// Moves the task currently at position `from` to position `to`.
    #[must_use]
    pub const fn within_list(list_id: BoardListId, from: i64, to: i64) -> Self {
        Self::WithinList {
            list_id,
            locator: TaskLocator::Position(from),
            to,
        }
    }

    /// Moves `task_id` to position `to` inside its list.
    #[must_use]
    pub const fn within_list_by_id(list_id: BoardListId, task_id: TaskId, to: i64) -> Self {
        Self::WithinList {
            list_id,
            locator: TaskLocator::Id(task_id),
            to,
        }
    }

    /// Moves `task_id` from `source_list` to position `to` of
    /// `destination_list`. Identical lists degrade to a within-list move.
    #[must_use]
    pub const fn across_lists(
        task_id: TaskId,
        source_list: BoardListId,
        destination_list: BoardListId,
        to: i64,
    ) -> Self {
        if source_list.value() == destination_list.value() {
            return Self::within_list_by_id(destination_list, task_id, to);
        }
        Self::AcrossLists {
            task_id,
            source_list,
            destination_list,
            to,
        }
    }
}

/// Result of an applied move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReorderOutcome {
    /// Number of task rows rewritten by the batch.
    pub updated: u64,
}

/// Service-level errors for task moves.
#[derive(Debug, Error)]
pub enum TaskReorderError {
    /// The move could not be planned.
    #[error(transparent)]
    Plan(#[from] ReorderError),
    /// A list named by the move does not exist in the project.
    #[error("list {list_id} not found in project {project_id}")]
    ListNotFound {
        /// Project the move was addressed to.
        project_id: ProjectId,
        /// Missing or foreign list.
        list_id: BoardListId,
    },
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// List repository operation failed.
    #[error(transparent)]
    Lists(#[from] BoardListRepositoryError),
    /// The per-list lock table is unusable.
    #[error("list lock table poisoned: {0}")]
    LockPoisoned(String),
}

/// Result type for task reorder operations.
pub type TaskReorderResult<T> = Result<T, TaskReorderError>;

/// Process-local serialization point per list.
///
/// Entries live only while some move holds or waits for them.
#[derive(Debug, Default)]
struct ListLocks {
    locks: Mutex<HashMap<BoardListId, Arc<AsyncMutex<()>>>>,
}

/// Guards over every list of one move. Dropping it releases the lists and
/// forgets locks nobody else is waiting on.
struct HeldLists<'a> {
    table: &'a ListLocks,
    list_ids: Vec<BoardListId>,
    guards: Vec<OwnedMutexGuard<()>>,
}

impl Drop for HeldLists<'_> {
    fn drop(&mut self) {
        self.guards.clear();
        self.table.evict_idle(&self.list_ids);
    }
}

impl ListLocks {
    fn handle(&self, list_id: BoardListId) -> TaskReorderResult<Arc<AsyncMutex<()>>> {
        let mut locks = self
            .locks
            .lock()
            .map_err(|err| TaskReorderError::LockPoisoned(err.to_string()))?;
        Ok(Arc::clone(locks.entry(list_id).or_default()))
    }

    /// Locks every list in ascending id order.
    async fn acquire(&self, list_ids: &[BoardListId]) -> TaskReorderResult<HeldLists<'_>> {
        let mut ordered = list_ids.to_vec();
        ordered.sort_unstable();
        ordered.dedup();
        let mut held = HeldLists {
            table: self,
            list_ids: Vec::with_capacity(ordered.len()),
            guards: Vec::with_capacity(ordered.len()),
        };
        for list_id in ordered {
            let handle = self.handle(list_id)?;
            held.list_ids.push(list_id);
            held.guards.push(handle.lock_owned().await);
        }
        Ok(held)
    }

    /// Removes entries whose only reference is the table itself.
    ///
    /// Handles are cloned under the table lock, so a count of one means no
    /// move holds or awaits that list.
    fn evict_idle(&self, list_ids: &[BoardListId]) {
        let Ok(mut locks) = self.locks.lock() else {
            return;
        };
        for list_id in list_ids {
            if locks
                .get(list_id)
                .is_some_and(|handle| Arc::strong_count(handle) == 1)
            {
                locks.remove(list_id);
            }
        }
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.locks.lock().map_or(0, |locks| locks.len())
    }
}

/// Task reorder orchestration service.
pub struct TaskReorderService<R, L>
where
    R: TaskRepository + ?Sized,
    L: BoardListRepository + ?Sized,
{
    repository: Arc<R>,
    lists: Arc<L>,
    locks: Arc<ListLocks>,
}

impl<R, L> Clone for TaskReorderService<R, L>
where
    R: TaskRepository + ?Sized,
    L: BoardListRepository + ?Sized,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            lists: Arc::clone(&self.lists),
            locks: Arc::clone(&self.locks),
        }
    }
}

impl<R, L> TaskReorderService<R, L>
where
    R: TaskRepository + ?Sized,
    L: BoardListRepository + ?Sized,
{
    /// Creates a new reorder service.
    #[must_use]
    pub fn new(repository: Arc<R>, lists: Arc<L>) -> Self {
        Self {
            repository,
            lists,
            locks: Arc::new(ListLocks::default()),
        }
    }

    /// Applies a move and re-densifies the orders of every affected list.
    ///
    /// Both list sequences are read scoped by `project_id`, the new
    /// placements are computed and then written in one batch while the
    /// affected lists are locked.
    ///
    /// # Errors
    ///
    /// Returns [`TaskReorderError::ListNotFound`] when either list is unknown
    /// or belongs to another project, and [`TaskReorderError::Plan`] when the
    /// moving task cannot be located. Nothing is written in either case.
    pub async fn apply(
        &self,
        project_id: ProjectId,
        request: TaskMoveRequest,
    ) -> TaskReorderResult<ReorderOutcome> {
        let updated = match request {
            TaskMoveRequest::WithinList {
                list_id,
                locator,
                to,
            } => {
                self.require_list(project_id, list_id).await?;
                let _held = self.locks.acquire(&[list_id]).await?;
                let sequence = self.repository.list_task_ids(project_id, list_id).await?;
                let plan = plan_within_list(list_id, &sequence, locator, to)?;
                self.write(&plan).await?
            }
            TaskMoveRequest::AcrossLists {
                task_id,
                source_list,
                destination_list,
                to,
            } => {
                self.require_list(project_id, source_list).await?;
                self.require_list(project_id, destination_list).await?;
                let _held = self
                    .locks
                    .acquire(&[source_list, destination_list])
                    .await?;
                let source = self
                    .repository
                    .list_task_ids(project_id, source_list)
                    .await?;
                let destination = self
                    .repository
                    .list_task_ids(project_id, destination_list)
                    .await?;
                let plan = plan_across_lists(
                    task_id,
                    source_list,
                    &source,
                    destination_list,
                    &destination,
                    to,
                )?;
                info!(
                    task_id = %task_id,
                    source_list = %source_list,
                    destination_list = %destination_list,
                    project_id = %project_id,
                    "task moved across lists"
                );
                self.write(&plan).await?
            }
        };
        Ok(ReorderOutcome { updated })
    }

    async fn require_list(
        &self,
        project_id: ProjectId,
        list_id: BoardListId,
    ) -> TaskReorderResult<()> {
        let list = self.lists.find_by_id(list_id).await?;
        if list.is_some_and(|found| found.project_id() == project_id) {
            return Ok(());
        }
        Err(TaskReorderError::ListNotFound {
            project_id,
            list_id,
        })
    }

    async fn write(&self, plan: &[TaskPlacement]) -> TaskReorderResult<u64> {
        let updated = self.repository.apply_placements(plan).await?;
        debug!(planned = plan.len(), updated, "placements applied");
        Ok(updated)
    }
}
