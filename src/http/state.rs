//! Shared application state handed to every handler.

use std::sync::Arc;

use mockable::DefaultClock;

use crate::board::{
    adapters::{memory::InMemoryBoardRepository, postgres::PostgresBoardRepository},
    ports::{BoardListRepository, TaskRepository},
    services::{TaskLifecycleService, TaskReorderService},
};
use crate::workspace::{
    adapters::{
        memory::{InMemoryProjectRepository, InMemoryWorkspaceRepository},
        postgres::{PostgresProjectRepository, PostgresWorkspaceRepository, WorkspacePgPool},
    },
    ports::{ProjectRepository, WorkspaceRepository},
    services::{ProjectService, WorkspaceService},
};

/// Workspace service over a dynamically chosen repository.
pub type Workspaces = WorkspaceService<dyn WorkspaceRepository, DefaultClock>;

/// Project service over dynamically chosen repositories.
pub type Projects = ProjectService<dyn ProjectRepository, dyn WorkspaceRepository, DefaultClock>;

/// Task lifecycle service over dynamically chosen repositories.
pub type Tasks = TaskLifecycleService<dyn TaskRepository, dyn BoardListRepository, DefaultClock>;

/// Reorder service over dynamically chosen repositories.
pub type Reorder = TaskReorderService<dyn TaskRepository, dyn BoardListRepository>;

/// Services shared across requests.
#[derive(Clone)]
pub struct AppState {
    /// Workspace and membership operations.
    pub workspaces: Workspaces,
    /// Project operations.
    pub projects: Projects,
    /// List and task lifecycle operations.
    pub tasks: Tasks,
    /// Drag-and-drop moves.
    pub reorder: Reorder,
}

impl AppState {
    /// Wires the services over the given repositories.
    #[must_use]
    pub fn new(
        workspaces: Arc<dyn WorkspaceRepository>,
        projects: Arc<dyn ProjectRepository>,
        tasks: Arc<dyn TaskRepository>,
        lists: Arc<dyn BoardListRepository>,
    ) -> Self {
        let clock = Arc::new(DefaultClock);
        Self {
            workspaces: WorkspaceService::new(Arc::clone(&workspaces), Arc::clone(&clock)),
            projects: ProjectService::new(projects, workspaces, Arc::clone(&clock)),
            tasks: TaskLifecycleService::new(Arc::clone(&tasks), Arc::clone(&lists), clock),
            reorder: TaskReorderService::new(tasks, lists),
        }
    }

    /// State backed by process-local memory.
    #[must_use]
    pub fn in_memory() -> Self {
        let board = Arc::new(InMemoryBoardRepository::new());
        Self::new(
            Arc::new(InMemoryWorkspaceRepository::new()),
            Arc::new(InMemoryProjectRepository::new()),
            Arc::clone(&board) as Arc<dyn TaskRepository>,
            board,
        )
    }

    /// State backed by `PostgreSQL` through one shared pool.
    #[must_use]
    pub fn postgres(pool: &WorkspacePgPool) -> Self {
        let board = Arc::new(PostgresBoardRepository::new(pool.clone()));
        Self::new(
            Arc::new(PostgresWorkspaceRepository::new(pool.clone())),
            Arc::new(PostgresProjectRepository::new(pool.clone())),
            Arc::clone(&board) as Arc<dyn TaskRepository>,
            board,
        )
    }
}
