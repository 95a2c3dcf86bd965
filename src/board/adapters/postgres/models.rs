//! Diesel row models for board persistence.

use super::schema::{board_lists, tasks};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for board lists.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = board_lists)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BoardListRow {
    pub id: i64,
    pub project_id: i64,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

/// Insert model for board lists.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = board_lists)]
pub struct NewBoardListRow {
    pub project_id: i64,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

/// Query result row for tasks.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Internal task identifier.
    pub id: i64,
    /// Owning project.
    pub project_id: i64,
    /// Current list.
    pub list_id: i64,
    /// Title.
    pub title: String,
    /// Description.
    pub description: Option<String>,
    /// Slug once assigned.
    pub slug: Option<String>,
    /// Position within the list.
    pub sort_order: i32,
    /// Archive flag.
    pub is_archived: bool,
    /// Creating user.
    pub created_by: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for tasks.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    pub project_id: i64,
    pub list_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub sort_order: i32,
    pub is_archived: bool,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
