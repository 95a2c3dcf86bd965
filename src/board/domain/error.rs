//! Error types for board domain validation.

use thiserror::Error;

/// Errors returned while constructing board domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoardDomainError {
    /// The task identifier is not a positive integer.
    #[error("invalid task id {0}, expected a positive integer")]
    InvalidTaskId(i64),

    /// The list identifier is not a positive integer.
    #[error("invalid list id {0}, expected a positive integer")]
    InvalidListId(i64),

    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTaskTitle,

    /// The task title exceeds the column width.
    #[error("task title exceeds {max} characters")]
    TaskTitleTooLong {
        /// Maximum accepted length.
        max: usize,
    },

    /// The list title is empty after trimming.
    #[error("list title must not be empty")]
    EmptyListTitle,

    /// The list title exceeds the column width.
    #[error("list title exceeds {max} characters")]
    ListTitleTooLong {
        /// Maximum accepted length.
        max: usize,
    },

    /// A task order must be a positive 32-bit integer.
    #[error("invalid task order {0}, expected a positive integer")]
    InvalidOrder(i64),
}
