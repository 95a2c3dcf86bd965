//! Repository port for board lists.

use crate::board::domain::{BoardList, BoardListId, NewBoardList};
use crate::workspace::domain::ProjectId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for board list repository operations.
pub type BoardListRepositoryResult<T> = Result<T, BoardListRepositoryError>;

/// Board list persistence contract.
#[async_trait]
pub trait BoardListRepository: Send + Sync {
    /// Stores a new list and returns it with its assigned identifier.
    async fn insert(&self, list: &NewBoardList) -> BoardListRepositoryResult<BoardList>;

    /// Finds a list by identifier.
    async fn find_by_id(&self, id: BoardListId) -> BoardListRepositoryResult<Option<BoardList>>;

    /// Returns the lists of a project in creation order.
    async fn for_project(&self, project_id: ProjectId)
    -> BoardListRepositoryResult<Vec<BoardList>>;

    /// Removes every list of a project together with its tasks, returning
    /// the number of lists removed.
    async fn delete_for_project(&self, project_id: ProjectId) -> BoardListRepositoryResult<u64>;
}

/// Errors returned by board list repository implementations.
#[derive(Debug, Clone, Error)]
pub enum BoardListRepositoryError {
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl BoardListRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
