//! Domain model for board lists, tasks, and task reordering.

mod error;
mod ids;
mod list;
pub mod reorder;
mod task;

pub use error::BoardDomainError;
pub use ids::{BoardListId, TaskId};
pub use list::{BoardList, ListTitle, NewBoardList};
pub use reorder::{ReorderError, TaskLocator, TaskPlacement};
pub use task::{NewTask, PersistedTaskData, Task, TaskOrder, TaskTitle};
