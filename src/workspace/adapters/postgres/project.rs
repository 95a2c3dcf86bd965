//! `PostgreSQL` repository implementation for projects and stars.

use super::{
    models::{NewProjectRow, ProjectRow, RecentProjectRow, StarRow},
    schema::{projects, recent_projects, starred_projects},
    workspace::WorkspacePgPool,
};
use crate::identity::UserId;
use crate::slug::Slug;
use crate::workspace::{
    domain::{NewProject, PersistedProjectData, Project, ProjectId, ProjectTitle, WorkspaceId},
    ports::{ProjectRepository, ProjectRepositoryError, ProjectRepositoryResult},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::Error as DieselError;

enum StarToggle {
    Added,
    Removed,
    MissingProject,
}

/// `PostgreSQL`-backed project repository.
#[derive(Debug, Clone)]
pub struct PostgresProjectRepository {
    pool: WorkspacePgPool,
}

impl PostgresProjectRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: WorkspacePgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> ProjectRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ProjectRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(ProjectRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(ProjectRepositoryError::persistence)?
    }
}

#[async_trait]
impl ProjectRepository for PostgresProjectRepository {
    async fn insert(&self, project: &NewProject) -> ProjectRepositoryResult<Project> {
        let new_row = NewProjectRow {
            workspace_id: project.workspace_id().value(),
            title: project.title().as_str().to_owned(),
            is_private: project.is_private(),
            owner_id: project.owner().value(),
            created_at: project.created_at(),
            updated_at: project.created_at(),
        };
        self.run_blocking(move |connection| {
            let row = diesel::insert_into(projects::table)
                .values(&new_row)
                .returning(ProjectRow::as_returning())
                .get_result(connection)
                .map_err(ProjectRepositoryError::persistence)?;
            row_to_project(row)
        })
        .await
    }

    async fn assign_slug(&self, id: ProjectId, slug: &Slug) -> ProjectRepositoryResult<()> {
        let value = slug.as_str().to_owned();
        self.run_blocking(move |connection| {
            let affected = diesel::update(projects::table.find(id.value()))
                .set(projects::slug.eq(value))
                .execute(connection)
                .map_err(ProjectRepositoryError::persistence)?;
            if affected == 0 {
                return Err(ProjectRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn slug_exists(&self, slug: &Slug) -> ProjectRepositoryResult<bool> {
        let value = slug.as_str().to_owned();
        self.run_blocking(move |connection| {
            diesel::select(diesel::dsl::exists(
                projects::table.filter(projects::slug.eq(value)),
            ))
            .get_result(connection)
            .map_err(ProjectRepositoryError::persistence)
        })
        .await
    }

    async fn update(&self, project: &Project) -> ProjectRepositoryResult<()> {
        let id = project.id();
        let workspace_id = project.workspace_id().value();
        let title = project.title().as_str().to_owned();
        let is_private = project.is_private();
        let updated_at = project.updated_at();
        self.run_blocking(move |connection| {
            let affected = diesel::update(projects::table.find(id.value()))
                .set((
                    projects::workspace_id.eq(workspace_id),
                    projects::title.eq(title),
                    projects::is_private.eq(is_private),
                    projects::updated_at.eq(updated_at),
                ))
                .execute(connection)
                .map_err(ProjectRepositoryError::persistence)?;
            if affected == 0 {
                return Err(ProjectRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: ProjectId) -> ProjectRepositoryResult<bool> {
        self.run_blocking(move |connection| {
            let removed = diesel::delete(projects::table.find(id.value()))
                .execute(connection)
                .map_err(ProjectRepositoryError::persistence)?;
            Ok(removed > 0)
        })
        .await
    }

    async fn delete_for_workspace(
        &self,
        workspace_id: WorkspaceId,
    ) -> ProjectRepositoryResult<Vec<ProjectId>> {
        self.run_blocking(move |connection| {
            let removed: Vec<i64> = diesel::delete(
                projects::table.filter(projects::workspace_id.eq(workspace_id.value())),
            )
            .returning(projects::id)
            .get_results(connection)
            .map_err(ProjectRepositoryError::persistence)?;
            Ok(removed.into_iter().map(ProjectId::from_persisted).collect())
        })
        .await
    }

    async fn find_by_id(&self, id: ProjectId) -> ProjectRepositoryResult<Option<Project>> {
        self.run_blocking(move |connection| {
            let row = projects::table
                .find(id.value())
                .select(ProjectRow::as_select())
                .first::<ProjectRow>(connection)
                .optional()
                .map_err(ProjectRepositoryError::persistence)?;
            row.map(row_to_project).transpose()
        })
        .await
    }

    async fn find_by_slug(&self, slug: &str) -> ProjectRepositoryResult<Option<Project>> {
        let value = slug.to_owned();
        self.run_blocking(move |connection| {
            let row = projects::table
                .filter(projects::slug.eq(value))
                .order(projects::id.asc())
                .select(ProjectRow::as_select())
                .first::<ProjectRow>(connection)
                .optional()
                .map_err(ProjectRepositoryError::persistence)?;
            row.map(row_to_project).transpose()
        })
        .await
    }

    async fn for_workspace(
        &self,
        workspace_id: WorkspaceId,
    ) -> ProjectRepositoryResult<Vec<Project>> {
        self.run_blocking(move |connection| {
            projects::table
                .filter(projects::workspace_id.eq(workspace_id.value()))
                .order(projects::id.asc())
                .select(ProjectRow::as_select())
                .load::<ProjectRow>(connection)
                .map_err(ProjectRepositoryError::persistence)?
                .into_iter()
                .map(row_to_project)
                .collect()
        })
        .await
    }

    async fn toggle_star(
        &self,
        user_id: UserId,
        project_id: ProjectId,
    ) -> ProjectRepositoryResult<bool> {
        self.run_blocking(move |connection| {
            let outcome = connection
                .transaction::<_, DieselError, _>(|tx| {
                    let removed = diesel::delete(
                        starred_projects::table
                            .filter(starred_projects::user_id.eq(user_id.value()))
                            .filter(starred_projects::project_id.eq(project_id.value())),
                    )
                    .execute(tx)?;
                    if removed > 0 {
                        return Ok(StarToggle::Removed);
                    }

                    let exists: bool = diesel::select(diesel::dsl::exists(
                        projects::table.find(project_id.value()),
                    ))
                    .get_result(tx)?;
                    if !exists {
                        return Ok(StarToggle::MissingProject);
                    }

                    diesel::insert_into(starred_projects::table)
                        .values(&StarRow {
                            user_id: user_id.value(),
                            project_id: project_id.value(),
                        })
                        .execute(tx)?;
                    Ok(StarToggle::Added)
                })
                .map_err(ProjectRepositoryError::persistence)?;
            match outcome {
                StarToggle::Added => Ok(true),
                StarToggle::Removed => Ok(false),
                StarToggle::MissingProject => Err(ProjectRepositoryError::NotFound(project_id)),
            }
        })
        .await
    }

    async fn starred_by(&self, user_id: UserId) -> ProjectRepositoryResult<Vec<Project>> {
        self.run_blocking(move |connection| {
            let starred = starred_projects::table
                .filter(starred_projects::user_id.eq(user_id.value()))
                .select(starred_projects::project_id);
            projects::table
                .filter(projects::id.eq_any(starred))
                .order(projects::id.asc())
                .select(ProjectRow::as_select())
                .load::<ProjectRow>(connection)
                .map_err(ProjectRepositoryError::persistence)?
                .into_iter()
                .map(row_to_project)
                .collect()
        })
        .await
    }

    async fn record_opened(
        &self,
        user_id: UserId,
        project_id: ProjectId,
        opened_at: DateTime<Utc>,
    ) -> ProjectRepositoryResult<()> {
        let row = RecentProjectRow {
            user_id: user_id.value(),
            project_id: project_id.value(),
            opened_at,
        };
        self.run_blocking(move |connection| {
            let exists: bool =
                diesel::select(diesel::dsl::exists(projects::table.find(project_id.value())))
                    .get_result(connection)
                    .map_err(ProjectRepositoryError::persistence)?;
            if !exists {
                return Err(ProjectRepositoryError::NotFound(project_id));
            }
            diesel::insert_into(recent_projects::table)
                .values(&row)
                .on_conflict((recent_projects::user_id, recent_projects::project_id))
                .do_update()
                .set(recent_projects::opened_at.eq(opened_at))
                .execute(connection)
                .map_err(ProjectRepositoryError::persistence)?;
            Ok(())
        })
        .await
    }

    async fn recent_for(&self, user_id: UserId) -> ProjectRepositoryResult<Vec<Project>> {
        self.run_blocking(move |connection| {
            recent_projects::table
                .inner_join(projects::table)
                .filter(recent_projects::user_id.eq(user_id.value()))
                .order((recent_projects::opened_at.desc(), projects::id.desc()))
                .select(ProjectRow::as_select())
                .load::<ProjectRow>(connection)
                .map_err(ProjectRepositoryError::persistence)?
                .into_iter()
                .map(row_to_project)
                .collect()
        })
        .await
    }
}

fn row_to_project(row: ProjectRow) -> ProjectRepositoryResult<Project> {
    let ProjectRow {
        id,
        workspace_id,
        title,
        slug,
        is_private,
        owner_id,
        created_at,
        updated_at,
    } = row;
    let data = PersistedProjectData {
        id: ProjectId::from_persisted(id),
        workspace_id: WorkspaceId::from_persisted(workspace_id),
        title: ProjectTitle::new(title).map_err(ProjectRepositoryError::persistence)?,
        slug: slug.map(Slug::from_persisted),
        is_private,
        owner: UserId::new(owner_id).map_err(ProjectRepositoryError::persistence)?,
        created_at,
        updated_at,
    };
    Ok(Project::from_persisted(data))
}
