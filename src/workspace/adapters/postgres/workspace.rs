//! `PostgreSQL` repository implementation for workspaces and memberships.

use super::{
    models::{NewWorkspaceRow, TeamMemberRow, WorkspaceRow},
    schema::{team_members, workspaces},
};
use crate::identity::UserId;
use crate::slug::Slug;
use crate::workspace::{
    domain::{
        MemberRole, NewWorkspace, PersistedWorkspaceData, TeamMember, Workspace, WorkspaceId,
        WorkspaceName,
    },
    ports::{WorkspaceRepository, WorkspaceRepositoryError, WorkspaceRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type shared by the application adapters.
pub type WorkspacePgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed workspace repository.
#[derive(Debug, Clone)]
pub struct PostgresWorkspaceRepository {
    pool: WorkspacePgPool,
}

impl PostgresWorkspaceRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: WorkspacePgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> WorkspaceRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> WorkspaceRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(WorkspaceRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(WorkspaceRepositoryError::persistence)?
    }
}

#[async_trait]
impl WorkspaceRepository for PostgresWorkspaceRepository {
    async fn insert(&self, workspace: &NewWorkspace) -> WorkspaceRepositoryResult<Workspace> {
        let new_row = NewWorkspaceRow {
            name: workspace.name().as_str().to_owned(),
            owner_id: workspace.owner().value(),
            created_at: workspace.created_at(),
        };
        self.run_blocking(move |connection| {
            let row = diesel::insert_into(workspaces::table)
                .values(&new_row)
                .returning(WorkspaceRow::as_returning())
                .get_result(connection)
                .map_err(WorkspaceRepositoryError::persistence)?;
            row_to_workspace(row)
        })
        .await
    }

    async fn assign_slug(&self, id: WorkspaceId, slug: &Slug) -> WorkspaceRepositoryResult<()> {
        let value = slug.as_str().to_owned();
        self.run_blocking(move |connection| {
            let affected = diesel::update(workspaces::table.find(id.value()))
                .set(workspaces::slug.eq(value))
                .execute(connection)
                .map_err(WorkspaceRepositoryError::persistence)?;
            if affected == 0 {
                return Err(WorkspaceRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn slug_exists(&self, slug: &Slug) -> WorkspaceRepositoryResult<bool> {
        let value = slug.as_str().to_owned();
        self.run_blocking(move |connection| {
            diesel::select(diesel::dsl::exists(
                workspaces::table.filter(workspaces::slug.eq(value)),
            ))
            .get_result(connection)
            .map_err(WorkspaceRepositoryError::persistence)
        })
        .await
    }

    async fn update(&self, workspace: &Workspace) -> WorkspaceRepositoryResult<()> {
        let id = workspace.id();
        let name = workspace.name().as_str().to_owned();
        self.run_blocking(move |connection| {
            let affected = diesel::update(workspaces::table.find(id.value()))
                .set(workspaces::name.eq(name))
                .execute(connection)
                .map_err(WorkspaceRepositoryError::persistence)?;
            if affected == 0 {
                return Err(WorkspaceRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: WorkspaceId) -> WorkspaceRepositoryResult<bool> {
        self.run_blocking(move |connection| {
            let removed = diesel::delete(workspaces::table.find(id.value()))
                .execute(connection)
                .map_err(WorkspaceRepositoryError::persistence)?;
            Ok(removed > 0)
        })
        .await
    }

    async fn find_by_id(&self, id: WorkspaceId) -> WorkspaceRepositoryResult<Option<Workspace>> {
        self.run_blocking(move |connection| {
            let row = workspaces::table
                .find(id.value())
                .select(WorkspaceRow::as_select())
                .first::<WorkspaceRow>(connection)
                .optional()
                .map_err(WorkspaceRepositoryError::persistence)?;
            row.map(row_to_workspace).transpose()
        })
        .await
    }

    async fn find_by_slug(&self, slug: &str) -> WorkspaceRepositoryResult<Option<Workspace>> {
        let value = slug.to_owned();
        self.run_blocking(move |connection| {
            let row = workspaces::table
                .filter(workspaces::slug.eq(value))
                .order(workspaces::id.asc())
                .select(WorkspaceRow::as_select())
                .first::<WorkspaceRow>(connection)
                .optional()
                .map_err(WorkspaceRepositoryError::persistence)?;
            row.map(row_to_workspace).transpose()
        })
        .await
    }

    async fn owned_by(&self, owner: UserId) -> WorkspaceRepositoryResult<Vec<Workspace>> {
        self.run_blocking(move |connection| {
            workspaces::table
                .filter(workspaces::owner_id.eq(owner.value()))
                .order(workspaces::id.asc())
                .select(WorkspaceRow::as_select())
                .load::<WorkspaceRow>(connection)
                .map_err(WorkspaceRepositoryError::persistence)?
                .into_iter()
                .map(row_to_workspace)
                .collect()
        })
        .await
    }

    async fn member_workspaces(
        &self,
        user_id: UserId,
    ) -> WorkspaceRepositoryResult<Vec<Workspace>> {
        self.run_blocking(move |connection| {
            let memberships = team_members::table
                .filter(team_members::user_id.eq(user_id.value()))
                .select(team_members::workspace_id);
            workspaces::table
                .filter(workspaces::id.eq_any(memberships))
                .order(workspaces::id.asc())
                .select(WorkspaceRow::as_select())
                .load::<WorkspaceRow>(connection)
                .map_err(WorkspaceRepositoryError::persistence)?
                .into_iter()
                .map(row_to_workspace)
                .collect()
        })
        .await
    }

    async fn add_member(&self, member: &TeamMember) -> WorkspaceRepositoryResult<()> {
        let workspace_id = member.workspace_id();
        let user_id = member.user_id();
        let row = TeamMemberRow {
            workspace_id: workspace_id.value(),
            user_id: user_id.value(),
            role: member.role().as_str().to_owned(),
            added_by: member.added_by().value(),
            created_at: member.created_at(),
        };
        self.run_blocking(move |connection| {
            diesel::insert_into(team_members::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        WorkspaceRepositoryError::DuplicateMember {
                            workspace_id,
                            user_id,
                        }
                    }
                    _ => WorkspaceRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn remove_member(
        &self,
        workspace_id: WorkspaceId,
        user_id: UserId,
    ) -> WorkspaceRepositoryResult<bool> {
        self.run_blocking(move |connection| {
            let removed = diesel::delete(
                team_members::table
                    .filter(team_members::workspace_id.eq(workspace_id.value()))
                    .filter(team_members::user_id.eq(user_id.value())),
            )
            .execute(connection)
            .map_err(WorkspaceRepositoryError::persistence)?;
            Ok(removed > 0)
        })
        .await
    }

    async fn find_member(
        &self,
        workspace_id: WorkspaceId,
        user_id: UserId,
    ) -> WorkspaceRepositoryResult<Option<TeamMember>> {
        self.run_blocking(move |connection| {
            let row = team_members::table
                .find((workspace_id.value(), user_id.value()))
                .select(TeamMemberRow::as_select())
                .first::<TeamMemberRow>(connection)
                .optional()
                .map_err(WorkspaceRepositoryError::persistence)?;
            row.map(row_to_member).transpose()
        })
        .await
    }

    async fn members(
        &self,
        workspace_id: WorkspaceId,
    ) -> WorkspaceRepositoryResult<Vec<TeamMember>> {
        self.run_blocking(move |connection| {
            team_members::table
                .filter(team_members::workspace_id.eq(workspace_id.value()))
                .order(team_members::created_at.asc())
                .select(TeamMemberRow::as_select())
                .load::<TeamMemberRow>(connection)
                .map_err(WorkspaceRepositoryError::persistence)?
                .into_iter()
                .map(row_to_member)
                .collect()
        })
        .await
    }
}

fn row_to_workspace(row: WorkspaceRow) -> WorkspaceRepositoryResult<Workspace> {
    let WorkspaceRow {
        id,
        name,
        slug,
        owner_id,
        created_at,
    } = row;
    let data = PersistedWorkspaceData {
        id: WorkspaceId::from_persisted(id),
        name: WorkspaceName::new(name).map_err(WorkspaceRepositoryError::persistence)?,
        slug: slug.map(Slug::from_persisted),
        owner: UserId::new(owner_id).map_err(WorkspaceRepositoryError::persistence)?,
        created_at,
    };
    Ok(Workspace::from_persisted(data))
}

fn row_to_member(row: TeamMemberRow) -> WorkspaceRepositoryResult<TeamMember> {
    let role =
        MemberRole::try_from(row.role.as_str()).map_err(WorkspaceRepositoryError::persistence)?;
    Ok(TeamMember::from_persisted(
        WorkspaceId::from_persisted(row.workspace_id),
        UserId::new(row.user_id).map_err(WorkspaceRepositoryError::persistence)?,
        role,
        UserId::new(row.added_by).map_err(WorkspaceRepositoryError::persistence)?,
        row.created_at,
    ))
}
