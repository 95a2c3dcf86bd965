//! In-memory board repository backing both list and task ports.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::board::{
    domain::{
        BoardList, BoardListId, NewBoardList, NewTask, PersistedTaskData, Task, TaskId, TaskOrder,
        TaskPlacement,
    },
    ports::{
        BoardListRepository, BoardListRepositoryError, BoardListRepositoryResult,
        OrderAssignment, TaskRepository, TaskRepositoryError, TaskRepositoryResult,
    },
};
use crate::slug::Slug;
use crate::workspace::domain::ProjectId;

/// Thread-safe in-memory board repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBoardRepository {
    state: Arc<RwLock<InMemoryBoardState>>,
}

#[derive(Debug, Default)]
struct InMemoryBoardState {
    last_list_id: i64,
    last_task_id: i64,
    lists: BTreeMap<BoardListId, BoardList>,
    tasks: HashMap<TaskId, Task>,
}

impl InMemoryBoardState {
    fn ordered_in_list(&self, project_id: ProjectId, list_id: BoardListId) -> Vec<&Task> {
        let mut tasks: Vec<&Task> = self
            .tasks
            .values()
            .filter(|task| task.project_id() == project_id && task.list_id() == list_id)
            .collect();
        tasks.sort_by_key(|task| (task.order(), task.id()));
        tasks
    }
}

impl InMemoryBoardRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, InMemoryBoardState>, std::io::Error> {
        self.state
            .read()
            .map_err(|err| std::io::Error::other(err.to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, InMemoryBoardState>, std::io::Error> {
        self.state
            .write()
            .map_err(|err| std::io::Error::other(err.to_string()))
    }
}

#[async_trait]
impl BoardListRepository for InMemoryBoardRepository {
    async fn insert(&self, list: &NewBoardList) -> BoardListRepositoryResult<BoardList> {
        let mut state = self.write().map_err(BoardListRepositoryError::persistence)?;
        state.last_list_id += 1;
        let id = BoardListId::from_persisted(state.last_list_id);
        let stored = BoardList::from_persisted(
            id,
            list.project_id(),
            list.title().clone(),
            list.created_at(),
        );
        state.lists.insert(id, stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: BoardListId) -> BoardListRepositoryResult<Option<BoardList>> {
        let state = self.read().map_err(BoardListRepositoryError::persistence)?;
        Ok(state.lists.get(&id).cloned())
    }

    async fn for_project(
        &self,
        project_id: ProjectId,
    ) -> BoardListRepositoryResult<Vec<BoardList>> {
        let state = self.read().map_err(BoardListRepositoryError::persistence)?;
        Ok(state
            .lists
            .values()
            .filter(|list| list.project_id() == project_id)
            .cloned()
            .collect())
    }

    async fn delete_for_project(&self, project_id: ProjectId) -> BoardListRepositoryResult<u64> {
        let mut state = self.write().map_err(BoardListRepositoryError::persistence)?;
        state.tasks.retain(|_, task| task.project_id() != project_id);
        let before = state.lists.len();
        state.lists.retain(|_, list| list.project_id() != project_id);
        u64::try_from(before - state.lists.len()).map_err(BoardListRepositoryError::persistence)
    }
}

#[async_trait]
impl TaskRepository for InMemoryBoardRepository {
    async fn insert(&self, task: &NewTask) -> TaskRepositoryResult<Task> {
        let mut state = self.write().map_err(TaskRepositoryError::persistence)?;
        if !state.lists.contains_key(&task.list_id()) {
            return Err(TaskRepositoryError::ListNotFound(task.list_id()));
        }
        let order = state
            .tasks
            .values()
            .filter(|existing| existing.list_id() == task.list_id())
            .map(Task::order)
            .max()
            .map_or(TaskOrder::FIRST, TaskOrder::next);

        state.last_task_id += 1;
        let id = TaskId::from_persisted(state.last_task_id);
        let stored = Task::from_persisted(PersistedTaskData {
            id,
            project_id: task.project_id(),
            list_id: task.list_id(),
            title: task.title().clone(),
            description: task.description().map(ToOwned::to_owned),
            slug: None,
            order,
            is_archived: false,
            created_by: task.created_by(),
            created_at: task.created_at(),
            updated_at: task.created_at(),
        });
        state.tasks.insert(id, stored.clone());
        Ok(stored)
    }

    async fn assign_slug(&self, id: TaskId, slug: &Slug) -> TaskRepositoryResult<()> {
        let mut state = self.write().map_err(TaskRepositoryError::persistence)?;
        let stored = state
            .tasks
            .remove(&id)
            .ok_or(TaskRepositoryError::NotFound(id))?;
        state.tasks.insert(id, stored.with_slug(slug.clone()));
        Ok(())
    }

    async fn slug_exists(&self, slug: &Slug) -> TaskRepositoryResult<bool> {
        let state = self.read().map_err(TaskRepositoryError::persistence)?;
        Ok(state.tasks.values().any(|task| task.slug() == Some(slug)))
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.write().map_err(TaskRepositoryError::persistence)?;
        let stored = state
            .tasks
            .get_mut(&task.id())
            .ok_or(TaskRepositoryError::NotFound(task.id()))?;
        let list_id = stored.list_id();
        let order = stored.order();
        let slug = stored.slug().cloned();
        let mut replacement = task.clone().placed(list_id, order);
        if let Some(persisted_slug) = slug {
            replacement = replacement.with_slug(persisted_slug);
        }
        *stored = replacement;
        Ok(())
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<bool> {
        let mut state = self.write().map_err(TaskRepositoryError::persistence)?;
        Ok(state.tasks.remove(&id).is_some())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.read().map_err(TaskRepositoryError::persistence)?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> TaskRepositoryResult<Option<Task>> {
        let state = self.read().map_err(TaskRepositoryError::persistence)?;
        Ok(state
            .tasks
            .values()
            .filter(|task| task.slug().is_some_and(|value| value.as_str() == slug))
            .min_by_key(|task| task.id())
            .cloned())
    }

    async fn count_in_list(&self, list_id: BoardListId) -> TaskRepositoryResult<u64> {
        let state = self.read().map_err(TaskRepositoryError::persistence)?;
        let count = state
            .tasks
            .values()
            .filter(|task| task.list_id() == list_id)
            .count();
        u64::try_from(count).map_err(TaskRepositoryError::persistence)
    }

    async fn archived_for_project(&self, project_id: ProjectId) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.read().map_err(TaskRepositoryError::persistence)?;
        let mut archived: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| task.project_id() == project_id && task.is_archived())
            .cloned()
            .collect();
        archived.sort_by_key(Task::id);
        Ok(archived)
    }

    async fn tasks_in_list(
        &self,
        project_id: ProjectId,
        list_id: BoardListId,
    ) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.read().map_err(TaskRepositoryError::persistence)?;
        Ok(state
            .ordered_in_list(project_id, list_id)
            .into_iter()
            .cloned()
            .collect())
    }

    async fn list_task_ids(
        &self,
        project_id: ProjectId,
        list_id: BoardListId,
    ) -> TaskRepositoryResult<Vec<TaskId>> {
        let state = self.read().map_err(TaskRepositoryError::persistence)?;
        Ok(state
            .ordered_in_list(project_id, list_id)
            .into_iter()
            .map(Task::id)
            .collect())
    }

    async fn apply_placements(&self, placements: &[TaskPlacement]) -> TaskRepositoryResult<u64> {
        let mut state = self.write().map_err(TaskRepositoryError::persistence)?;
        let mut updated: u64 = 0;
        for placement in placements {
            if let Some(stored) = state.tasks.remove(&placement.task_id) {
                state.tasks.insert(
                    placement.task_id,
                    stored.placed(placement.list_id, placement.order),
                );
                updated += 1;
            }
        }
        Ok(updated)
    }

    async fn update_orders(&self, assignments: &[OrderAssignment]) -> TaskRepositoryResult<u64> {
        let mut state = self.write().map_err(TaskRepositoryError::persistence)?;
        let mut updated: u64 = 0;
        for assignment in assignments {
            if let Some(stored) = state.tasks.remove(&assignment.task_id) {
                let list_id = stored.list_id();
                state
                    .tasks
                    .insert(assignment.task_id, stored.placed(list_id, assignment.order));
                updated += 1;
            }
        }
        Ok(updated)
    }
}
