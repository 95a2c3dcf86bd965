//! Shared world state for task reordering BDD scenarios.

#![expect(
    clippy::expect_used,
    reason = "Test helpers use expect for assertion clarity"
)]

use std::collections::HashMap;
use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use taskboard::board::{
    adapters::memory::InMemoryBoardRepository,
    domain::{BoardList, TaskId},
    services::{ReorderOutcome, TaskLifecycleService, TaskReorderError, TaskReorderService},
};
use taskboard::identity::{Actor, UserId};
use taskboard::workspace::domain::ProjectId;

/// Lifecycle service type used by the BDD world.
pub type TestLifecycle =
    TaskLifecycleService<InMemoryBoardRepository, InMemoryBoardRepository, DefaultClock>;

/// Scenario world for reorder behaviour tests.
pub struct BoardWorld {
    pub lifecycle: TestLifecycle,
    pub reorder: TaskReorderService<InMemoryBoardRepository, InMemoryBoardRepository>,
    pub actor: Actor,
    pub project_id: ProjectId,
    pub lists: HashMap<String, BoardList>,
    pub tasks: HashMap<String, TaskId>,
    pub last_move: Option<Result<ReorderOutcome, TaskReorderError>>,
}

impl BoardWorld {
    /// Creates a world with an empty board.
    ///
    /// # Panics
    ///
    /// Never in practice; the scenario user id is a fixed positive value.
    #[must_use]
    pub fn new() -> Self {
        let repository = Arc::new(InMemoryBoardRepository::new());
        Self {
            lifecycle: TaskLifecycleService::new(
                Arc::clone(&repository),
                Arc::clone(&repository),
                Arc::new(DefaultClock),
            ),
            reorder: TaskReorderService::new(Arc::clone(&repository), repository),
            actor: Actor::user(UserId::new(1).expect("valid user id")),
            project_id: ProjectId::from_persisted(1),
            lists: HashMap::new(),
            tasks: HashMap::new(),
            last_move: None,
        }
    }

    /// Returns the list registered under `title`.
    pub fn list(&self, title: &str) -> Result<&BoardList, eyre::Report> {
        self.lists
            .get(title)
            .ok_or_else(|| eyre::eyre!("no list named {title} in scenario world"))
    }

    /// Returns the task registered under `title`.
    pub fn task(&self, title: &str) -> Result<TaskId, eyre::Report> {
        self.tasks
            .get(title)
            .copied()
            .ok_or_else(|| eyre::eyre!("no task named {title} in scenario world"))
    }
}

impl Default for BoardWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> BoardWorld {
    BoardWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
