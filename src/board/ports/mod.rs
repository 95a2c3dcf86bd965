//! Port contracts for board list and task persistence.

pub mod list;
pub mod task;

pub use list::{BoardListRepository, BoardListRepositoryError, BoardListRepositoryResult};
pub use task::{OrderAssignment, TaskRepository, TaskRepositoryError, TaskRepositoryResult};
