//! `PostgreSQL` repository implementation for board lists and tasks.

use super::{
    models::{BoardListRow, NewBoardListRow, NewTaskRow, TaskRow},
    schema::{board_lists, tasks},
};
use crate::board::{
    domain::{
        BoardList, BoardListId, ListTitle, NewBoardList, NewTask, PersistedTaskData, Task, TaskId,
        TaskOrder, TaskPlacement, TaskTitle,
    },
    ports::{
        BoardListRepository, BoardListRepositoryError, BoardListRepositoryResult,
        OrderAssignment, TaskRepository, TaskRepositoryError, TaskRepositoryResult,
    },
};
use crate::identity::UserId;
use crate::slug::Slug;
use crate::workspace::domain::ProjectId;
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::Error as DieselError;
use diesel::sql_types::{Array, BigInt, Integer};

/// `PostgreSQL` connection pool type used by board adapters.
pub type BoardPgPool = Pool<ConnectionManager<PgConnection>>;

/// Moves every placed task in one statement.
const APPLY_PLACEMENTS_SQL: &str = concat!(
    "UPDATE tasks AS t ",
    "SET list_id = p.list_id, sort_order = p.sort_order, updated_at = NOW() ",
    "FROM unnest($1::int8[], $2::int8[], $3::int4[]) AS p(id, list_id, sort_order) ",
    "WHERE t.id = p.id",
);

/// Rewrites explicit orders in one statement.
const UPDATE_ORDERS_SQL: &str = concat!(
    "UPDATE tasks AS t ",
    "SET sort_order = p.sort_order, updated_at = NOW() ",
    "FROM unnest($1::int8[], $2::int4[]) AS p(id, sort_order) ",
    "WHERE t.id = p.id",
);

/// `PostgreSQL`-backed board repository.
#[derive(Debug, Clone)]
pub struct PostgresBoardRepository {
    pool: BoardPgPool,
}

impl PostgresBoardRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: BoardPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }

    async fn run_blocking_lists<F, T>(&self, f: F) -> BoardListRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> BoardListRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(BoardListRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(BoardListRepositoryError::persistence)?
    }
}

#[async_trait]
impl BoardListRepository for PostgresBoardRepository {
    async fn insert(&self, list: &NewBoardList) -> BoardListRepositoryResult<BoardList> {
        let new_row = NewBoardListRow {
            project_id: list.project_id().value(),
            title: list.title().as_str().to_owned(),
            created_at: list.created_at(),
        };
        self.run_blocking_lists(move |connection| {
            let row = diesel::insert_into(board_lists::table)
                .values(&new_row)
                .returning(BoardListRow::as_returning())
                .get_result(connection)
                .map_err(BoardListRepositoryError::persistence)?;
            row_to_list(row)
        })
        .await
    }

    async fn find_by_id(&self, id: BoardListId) -> BoardListRepositoryResult<Option<BoardList>> {
        self.run_blocking_lists(move |connection| {
            let row = board_lists::table
                .find(id.value())
                .select(BoardListRow::as_select())
                .first::<BoardListRow>(connection)
                .optional()
                .map_err(BoardListRepositoryError::persistence)?;
            row.map(row_to_list).transpose()
        })
        .await
    }

    async fn for_project(
        &self,
        project_id: ProjectId,
    ) -> BoardListRepositoryResult<Vec<BoardList>> {
        self.run_blocking_lists(move |connection| {
            board_lists::table
                .filter(board_lists::project_id.eq(project_id.value()))
                .order(board_lists::id.asc())
                .select(BoardListRow::as_select())
                .load::<BoardListRow>(connection)
                .map_err(BoardListRepositoryError::persistence)?
                .into_iter()
                .map(row_to_list)
                .collect()
        })
        .await
    }

    async fn delete_for_project(&self, project_id: ProjectId) -> BoardListRepositoryResult<u64> {
        self.run_blocking_lists(move |connection| {
            let removed = connection
                .transaction::<_, DieselError, _>(|tx| {
                    diesel::delete(tasks::table.filter(tasks::project_id.eq(project_id.value())))
                        .execute(tx)?;
                    diesel::delete(
                        board_lists::table.filter(board_lists::project_id.eq(project_id.value())),
                    )
                    .execute(tx)
                })
                .map_err(BoardListRepositoryError::persistence)?;
            u64::try_from(removed).map_err(BoardListRepositoryError::persistence)
        })
        .await
    }
}

#[async_trait]
impl TaskRepository for PostgresBoardRepository {
    async fn insert(&self, task: &NewTask) -> TaskRepositoryResult<Task> {
        let list_id = task.list_id();
        let mut new_row = NewTaskRow {
            project_id: task.project_id().value(),
            list_id: list_id.value(),
            title: task.title().as_str().to_owned(),
            description: task.description().map(ToOwned::to_owned),
            sort_order: TaskOrder::FIRST.value(),
            is_archived: false,
            created_by: task.created_by().value(),
            created_at: task.created_at(),
            updated_at: task.created_at(),
        };
        self.run_blocking(move |connection| {
            let inserted = connection
                .transaction::<_, DieselError, _>(|tx| {
                    // Row lock on the list serializes concurrent appends.
                    let locked = board_lists::table
                        .find(list_id.value())
                        .select(board_lists::id)
                        .for_update()
                        .first::<i64>(tx)
                        .optional()?;
                    if locked.is_none() {
                        return Ok(None);
                    }
                    let highest = tasks::table
                        .filter(tasks::list_id.eq(list_id.value()))
                        .select(diesel::dsl::max(tasks::sort_order))
                        .get_result::<Option<i32>>(tx)?;
                    new_row.sort_order = highest.map_or(TaskOrder::FIRST.value(), |order| {
                        order.saturating_add(1)
                    });
                    diesel::insert_into(tasks::table)
                        .values(&new_row)
                        .returning(TaskRow::as_returning())
                        .get_result(tx)
                        .map(Some)
                })
                .map_err(TaskRepositoryError::persistence)?;
            let row = inserted.ok_or(TaskRepositoryError::ListNotFound(list_id))?;
            row_to_task(row)
        })
        .await
    }

    async fn assign_slug(&self, id: TaskId, slug: &Slug) -> TaskRepositoryResult<()> {
        let value = slug.as_str().to_owned();
        self.run_blocking(move |connection| {
            let affected = diesel::update(tasks::table.find(id.value()))
                .set(tasks::slug.eq(value))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if affected == 0 {
                return Err(TaskRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn slug_exists(&self, slug: &Slug) -> TaskRepositoryResult<bool> {
        let value = slug.as_str().to_owned();
        self.run_blocking(move |connection| {
            diesel::select(diesel::dsl::exists(tasks::table.filter(tasks::slug.eq(value))))
                .get_result(connection)
                .map_err(TaskRepositoryError::persistence)
        })
        .await
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let id = task.id();
        let title = task.title().as_str().to_owned();
        let description = task.description().map(ToOwned::to_owned);
        let is_archived = task.is_archived();
        let updated_at = task.updated_at();
        self.run_blocking(move |connection| {
            let affected = diesel::update(tasks::table.find(id.value()))
                .set((
                    tasks::title.eq(title),
                    tasks::description.eq(description),
                    tasks::is_archived.eq(is_archived),
                    tasks::updated_at.eq(updated_at),
                ))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if affected == 0 {
                return Err(TaskRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<bool> {
        self.run_blocking(move |connection| {
            let removed = diesel::delete(tasks::table.find(id.value()))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            Ok(removed > 0)
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .find(id.value())
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn find_by_slug(&self, slug: &str) -> TaskRepositoryResult<Option<Task>> {
        let value = slug.to_owned();
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::slug.eq(value))
                .order(tasks::id.asc())
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn count_in_list(&self, list_id: BoardListId) -> TaskRepositoryResult<u64> {
        self.run_blocking(move |connection| {
            let count = tasks::table
                .filter(tasks::list_id.eq(list_id.value()))
                .count()
                .get_result::<i64>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            u64::try_from(count).map_err(TaskRepositoryError::persistence)
        })
        .await
    }

    async fn archived_for_project(&self, project_id: ProjectId) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            tasks::table
                .filter(tasks::project_id.eq(project_id.value()))
                .filter(tasks::is_archived.eq(true))
                .order(tasks::id.asc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?
                .into_iter()
                .map(row_to_task)
                .collect()
        })
        .await
    }

    async fn tasks_in_list(
        &self,
        project_id: ProjectId,
        list_id: BoardListId,
    ) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            tasks::table
                .filter(tasks::project_id.eq(project_id.value()))
                .filter(tasks::list_id.eq(list_id.value()))
                .order((tasks::sort_order.asc(), tasks::id.asc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?
                .into_iter()
                .map(row_to_task)
                .collect()
        })
        .await
    }

    async fn list_task_ids(
        &self,
        project_id: ProjectId,
        list_id: BoardListId,
    ) -> TaskRepositoryResult<Vec<TaskId>> {
        self.run_blocking(move |connection| {
            let ids = tasks::table
                .filter(tasks::project_id.eq(project_id.value()))
                .filter(tasks::list_id.eq(list_id.value()))
                .order((tasks::sort_order.asc(), tasks::id.asc()))
                .select(tasks::id)
                .load::<i64>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            Ok(ids.into_iter().map(TaskId::from_persisted).collect())
        })
        .await
    }

    async fn apply_placements(&self, placements: &[TaskPlacement]) -> TaskRepositoryResult<u64> {
        if placements.is_empty() {
            return Ok(0);
        }
        let ids: Vec<i64> = placements.iter().map(|p| p.task_id.value()).collect();
        let lists: Vec<i64> = placements.iter().map(|p| p.list_id.value()).collect();
        let orders: Vec<i32> = placements.iter().map(|p| p.order.value()).collect();
        self.run_blocking(move |connection| {
            let updated = diesel::sql_query(APPLY_PLACEMENTS_SQL)
                .bind::<Array<BigInt>, _>(ids)
                .bind::<Array<BigInt>, _>(lists)
                .bind::<Array<Integer>, _>(orders)
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            u64::try_from(updated).map_err(TaskRepositoryError::persistence)
        })
        .await
    }

    async fn update_orders(&self, assignments: &[OrderAssignment]) -> TaskRepositoryResult<u64> {
        if assignments.is_empty() {
            return Ok(0);
        }
        let ids: Vec<i64> = assignments.iter().map(|a| a.task_id.value()).collect();
        let orders: Vec<i32> = assignments.iter().map(|a| a.order.value()).collect();
        self.run_blocking(move |connection| {
            let updated = diesel::sql_query(UPDATE_ORDERS_SQL)
                .bind::<Array<BigInt>, _>(ids)
                .bind::<Array<Integer>, _>(orders)
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            u64::try_from(updated).map_err(TaskRepositoryError::persistence)
        })
        .await
    }
}

fn row_to_list(row: BoardListRow) -> BoardListRepositoryResult<BoardList> {
    let title = ListTitle::new(row.title).map_err(BoardListRepositoryError::persistence)?;
    Ok(BoardList::from_persisted(
        BoardListId::from_persisted(row.id),
        ProjectId::from_persisted(row.project_id),
        title,
        row.created_at,
    ))
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        project_id,
        list_id,
        title,
        description,
        slug,
        sort_order,
        is_archived,
        created_by,
        created_at,
        updated_at,
    } = row;
    let data = PersistedTaskData {
        id: TaskId::from_persisted(id),
        project_id: ProjectId::from_persisted(project_id),
        list_id: BoardListId::from_persisted(list_id),
        title: TaskTitle::new(title).map_err(TaskRepositoryError::persistence)?,
        description,
        slug: slug.map(Slug::from_persisted),
        order: TaskOrder::from_persisted(sort_order),
        is_archived,
        created_by: UserId::new(created_by).map_err(TaskRepositoryError::persistence)?,
        created_at,
        updated_at,
    };
    Ok(Task::from_persisted(data))
}
