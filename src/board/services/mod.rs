//! Application services for board lists, tasks, and reordering.

mod lifecycle;
mod reorder;

pub use lifecycle::{
    CreateTaskRequest, ListSummary, TaskLifecycleError, TaskLifecycleResult, TaskLifecycleService,
    UpdateTaskRequest,
};
pub use reorder::{
    ReorderOutcome, TaskMoveRequest, TaskReorderError, TaskReorderResult, TaskReorderService,
};
