//! Diesel row models for workspace persistence.

use super::schema::{projects, recent_projects, starred_projects, team_members, workspaces};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for workspaces.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = workspaces)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct WorkspaceRow {
    pub id: i64,
    pub name: String,
    pub slug: Option<String>,
    pub owner_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Insert model for workspaces.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = workspaces)]
pub struct NewWorkspaceRow {
    pub name: String,
    pub owner_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Query and insert row for memberships.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = team_members)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TeamMemberRow {
    pub workspace_id: i64,
    pub user_id: i64,
    pub role: String,
    pub added_by: i64,
    pub created_at: DateTime<Utc>,
}

/// Query result row for projects.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = projects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProjectRow {
    pub id: i64,
    pub workspace_id: i64,
    pub title: String,
    pub slug: Option<String>,
    pub is_private: bool,
    pub owner_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert model for projects.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = projects)]
pub struct NewProjectRow {
    pub workspace_id: i64,
    pub title: String,
    pub is_private: bool,
    pub owner_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert model for stars.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = starred_projects)]
pub struct StarRow {
    pub user_id: i64,
    pub project_id: i64,
}

/// Upsert model for recently opened projects.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = recent_projects)]
pub struct RecentProjectRow {
    pub user_id: i64,
    pub project_id: i64,
    pub opened_at: DateTime<Utc>,
}
