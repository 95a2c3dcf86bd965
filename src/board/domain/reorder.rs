//! Dense 1-based reordering of tasks after a drag-and-drop move.
//!
//! Planning is pure: callers fetch the current task sequence of each affected
//! list (ordered by `order`), ask for a plan, and persist the returned
//! placements in one batched write. Every task of every affected list gets a
//! placement so the result is always contiguous, even when the stored orders
//! had gaps before the move.

use super::{BoardDomainError, BoardListId, TaskId, TaskOrder};
use thiserror::Error;

/// Target list and order of one task after a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskPlacement {
    /// Task being placed.
    pub task_id: TaskId,
    /// List that holds the task afterwards.
    pub list_id: BoardListId,
    /// Dense 1-based order within that list.
    pub order: TaskOrder,
}

/// How the moving task is located inside its current list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskLocator {
    /// Locate by identifier.
    Id(TaskId),
    /// Locate by current 1-based position.
    Position(i64),
}

/// Errors raised while planning a move.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReorderError {
    /// The moving task is not part of the fetched sequence.
    #[error("task {0} is not in the affected lists")]
    TaskNotFound(TaskId),

    /// No task sits at the requested source position.
    #[error("list {list_id} has no task at position {position}")]
    PositionNotFound {
        /// List that was searched.
        list_id: BoardListId,
        /// Requested 1-based position.
        position: i64,
    },

    /// The resulting sequence cannot be represented as task orders.
    #[error(transparent)]
    Order(#[from] BoardDomainError),
}

/// Plans a reorder inside a single list.
///
/// `sequence` lists the task ids of `list_id` by current order. The located
/// task is removed and reinserted at `destination` (1-based, clamped into
/// `[1, len + 1]` where `len` excludes the moving task).
///
/// # Errors
///
/// Returns [`ReorderError::TaskNotFound`] or
/// [`ReorderError::PositionNotFound`] when the moving task cannot be located.
pub fn plan_within_list(
    list_id: BoardListId,
    sequence: &[TaskId],
    locator: TaskLocator,
    destination: i64,
) -> Result<Vec<TaskPlacement>, ReorderError> {
    let index = locate(list_id, sequence, locator)?;
    let mut reordered = sequence.to_vec();
    let moving = reordered.remove(index);
    let target = insertion_index(destination, reordered.len());
    reordered.insert(target, moving);
    dense_placements(list_id, &reordered)
}

/// Plans a move of `task_id` from `source_list` into `destination_list`.
///
/// The destination sequence is expected to include the moving task already.
/// When it does not but the source sequence still holds the task, it is
/// appended to the destination first, so the returned placements also
/// rewrite its list. The source list is re-densified without the task.
///
/// # Errors
///
/// Returns [`ReorderError::TaskNotFound`] when the task is in neither
/// sequence.
pub fn plan_across_lists(
    task_id: TaskId,
    source_list: BoardListId,
    source_sequence: &[TaskId],
    destination_list: BoardListId,
    destination_sequence: &[TaskId],
    destination: i64,
) -> Result<Vec<TaskPlacement>, ReorderError> {
    let in_source = source_sequence.contains(&task_id);
    let mut reordered = destination_sequence.to_vec();
    if !reordered.contains(&task_id) {
        if !in_source {
            return Err(ReorderError::TaskNotFound(task_id));
        }
        reordered.push(task_id);
    }

    let index = locate(destination_list, &reordered, TaskLocator::Id(task_id))?;
    let moving = reordered.remove(index);
    let target = insertion_index(destination, reordered.len());
    reordered.insert(target, moving);

    let remaining: Vec<TaskId> = source_sequence
        .iter()
        .copied()
        .filter(|id| *id != task_id)
        .collect();

    let mut placements = dense_placements(destination_list, &reordered)?;
    placements.extend(dense_placements(source_list, &remaining)?);
    Ok(placements)
}

fn locate(
    list_id: BoardListId,
    sequence: &[TaskId],
    locator: TaskLocator,
) -> Result<usize, ReorderError> {
    match locator {
        TaskLocator::Id(task_id) => sequence
            .iter()
            .position(|id| *id == task_id)
            .ok_or(ReorderError::TaskNotFound(task_id)),
        TaskLocator::Position(position) => usize::try_from(position)
            .ok()
            .and_then(|one_based| one_based.checked_sub(1))
            .filter(|index| *index < sequence.len())
            .ok_or(ReorderError::PositionNotFound { list_id, position }),
    }
}

/// Converts a 1-based destination into an insertion index for a sequence of
/// `len` remaining tasks.
fn insertion_index(destination: i64, len: usize) -> usize {
    let upper = i64::try_from(len).map_or(i64::MAX, |value| value.saturating_add(1));
    let clamped = destination.clamp(1, upper);
    usize::try_from(clamped.saturating_sub(1)).map_or(len, |index| index.min(len))
}

fn dense_placements(
    list_id: BoardListId,
    sequence: &[TaskId],
) -> Result<Vec<TaskPlacement>, ReorderError> {
    sequence
        .iter()
        .enumerate()
        .map(|(index, task_id)| -> Result<TaskPlacement, ReorderError> {
            Ok(TaskPlacement {
                task_id: *task_id,
                list_id,
                order: TaskOrder::from_index(index)?,
            })
        })
        .collect()
}
