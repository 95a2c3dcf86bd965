//! In-memory project repository including per-user stars.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::identity::UserId;
use crate::slug::Slug;
use crate::workspace::{
    domain::{NewProject, PersistedProjectData, Project, ProjectId, WorkspaceId},
    ports::{ProjectRepository, ProjectRepositoryError, ProjectRepositoryResult},
};

/// Thread-safe in-memory project repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProjectRepository {
    state: Arc<RwLock<InMemoryProjectState>>,
}

#[derive(Debug, Default)]
struct InMemoryProjectState {
    last_id: i64,
    projects: BTreeMap<ProjectId, Project>,
    stars: BTreeSet<(UserId, ProjectId)>,
    opened: BTreeMap<(UserId, ProjectId), DateTime<Utc>>,
}

impl InMemoryProjectState {
    fn forget(&mut self, id: ProjectId) -> bool {
        self.stars.retain(|(_, starred)| *starred != id);
        self.opened.retain(|(_, opened), _| *opened != id);
        self.projects.remove(&id).is_some()
    }
}

impl InMemoryProjectRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> ProjectRepositoryResult<RwLockReadGuard<'_, InMemoryProjectState>> {
        self.state.read().map_err(|err| {
            ProjectRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> ProjectRepositoryResult<RwLockWriteGuard<'_, InMemoryProjectState>> {
        self.state.write().map_err(|err| {
            ProjectRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn insert(&self, project: &NewProject) -> ProjectRepositoryResult<Project> {
        let mut state = self.write()?;
        state.last_id += 1;
        let id = ProjectId::from_persisted(state.last_id);
        let stored = Project::from_persisted(PersistedProjectData {
            id,
            workspace_id: project.workspace_id(),
            title: project.title().clone(),
            slug: None,
            is_private: project.is_private(),
            owner: project.owner(),
            created_at: project.created_at(),
            updated_at: project.created_at(),
        });
        state.projects.insert(id, stored.clone());
        Ok(stored)
    }

    async fn assign_slug(&self, id: ProjectId, slug: &Slug) -> ProjectRepositoryResult<()> {
        let mut state = self.write()?;
        let stored = state
            .projects
            .remove(&id)
            .ok_or(ProjectRepositoryError::NotFound(id))?;
        state.projects.insert(id, stored.with_slug(slug.clone()));
        Ok(())
    }

    async fn slug_exists(&self, slug: &Slug) -> ProjectRepositoryResult<bool> {
        let state = self.read()?;
        Ok(state
            .projects
            .values()
            .any(|project| project.slug() == Some(slug)))
    }

    async fn update(&self, project: &Project) -> ProjectRepositoryResult<()> {
        let mut state = self.write()?;
        let stored = state
            .projects
            .get_mut(&project.id())
            .ok_or(ProjectRepositoryError::NotFound(project.id()))?;
        let persisted = stored.slug().cloned();
        *stored = persisted.map_or_else(
            || project.clone(),
            |persisted_slug| project.clone().with_slug(persisted_slug),
        );
        Ok(())
    }

    async fn delete(&self, id: ProjectId) -> ProjectRepositoryResult<bool> {
        let mut state = self.write()?;
        Ok(state.forget(id))
    }

    async fn delete_for_workspace(
        &self,
        workspace_id: WorkspaceId,
    ) -> ProjectRepositoryResult<Vec<ProjectId>> {
        let mut state = self.write()?;
        let doomed: Vec<ProjectId> = state
            .projects
            .values()
            .filter(|project| project.workspace_id() == workspace_id)
            .map(Project::id)
            .collect();
        for id in &doomed {
            state.forget(*id);
        }
        Ok(doomed)
    }

    async fn find_by_id(&self, id: ProjectId) -> ProjectRepositoryResult<Option<Project>> {
        let state = self.read()?;
        Ok(state.projects.get(&id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> ProjectRepositoryResult<Option<Project>> {
        let state = self.read()?;
        Ok(state
            .projects
            .values()
            .find(|project| project.slug().is_some_and(|value| value.as_str() == slug))
            .cloned())
    }

    async fn for_workspace(
        &self,
        workspace_id: WorkspaceId,
    ) -> ProjectRepositoryResult<Vec<Project>> {
        let state = self.read()?;
        Ok(state
            .projects
            .values()
            .filter(|project| project.workspace_id() == workspace_id)
            .cloned()
            .collect())
    }

    async fn toggle_star(
        &self,
        user_id: UserId,
        project_id: ProjectId,
    ) -> ProjectRepositoryResult<bool> {
        let mut state = self.write()?;
        if !state.projects.contains_key(&project_id) {
            return Err(ProjectRepositoryError::NotFound(project_id));
        }
        let key = (user_id, project_id);
        if state.stars.remove(&key) {
            return Ok(false);
        }
        state.stars.insert(key);
        Ok(true)
    }

    async fn starred_by(&self, user_id: UserId) -> ProjectRepositoryResult<Vec<Project>> {
        let state = self.read()?;
        Ok(state
            .stars
            .iter()
            .filter(|(starring_user, _)| *starring_user == user_id)
            .filter_map(|(_, project_id)| state.projects.get(project_id).cloned())
            .collect())
    }

    async fn record_opened(
        &self,
        user_id: UserId,
        project_id: ProjectId,
        opened_at: DateTime<Utc>,
    ) -> ProjectRepositoryResult<()> {
        let mut state = self.write()?;
        if !state.projects.contains_key(&project_id) {
            return Err(ProjectRepositoryError::NotFound(project_id));
        }
        state.opened.insert((user_id, project_id), opened_at);
        Ok(())
    }

    async fn recent_for(&self, user_id: UserId) -> ProjectRepositoryResult<Vec<Project>> {
        let state = self.read()?;
        let mut opened: Vec<(DateTime<Utc>, ProjectId)> = state
            .opened
            .iter()
            .filter(|((opener, _), _)| *opener == user_id)
            .map(|((_, project_id), at)| (*at, *project_id))
            .collect();
        opened.sort_by_key(|entry| Reverse(*entry));
        Ok(opened
            .into_iter()
            .filter_map(|(_, project_id)| state.projects.get(&project_id).cloned())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::InMemoryProjectRepository;
    use crate::identity::UserId;
    use crate::workspace::{
        domain::{NewProject, Project, ProjectTitle, WorkspaceId},
        ports::ProjectRepository,
    };
    use chrono::{DateTime, Utc};
    use mockable::DefaultClock;
    use rstest::rstest;

    fn user(value: i64) -> UserId {
        UserId::new(value).expect("valid user id")
    }

    fn at(seconds: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(seconds, 0).expect("valid timestamp")
    }

    async fn stored(
        repository: &InMemoryProjectRepository,
        workspace: i64,
        title: &str,
    ) -> Project {
        let new_project = NewProject::new(
            WorkspaceId::new(workspace).expect("valid workspace id"),
            ProjectTitle::new(title).expect("valid title"),
            false,
            user(1),
            &DefaultClock,
        );
        repository
            .insert(&new_project)
            .await
            .expect("insert should succeed")
    }

    fn titles(projects: &[Project]) -> Vec<&str> {
        projects
            .iter()
            .map(|project| project.title().as_str())
            .collect()
    }

    #[rstest]
    #[tokio::test]
    async fn reopening_moves_a_project_to_the_front() {
        let repository = InMemoryProjectRepository::new();
        let alpha = stored(&repository, 1, "Alpha").await;
        let beta = stored(&repository, 1, "Beta").await;

        for (project, seconds) in [(&alpha, 10), (&beta, 20), (&alpha, 30)] {
            repository
                .record_opened(user(1), project.id(), at(seconds))
                .await
                .expect("record should succeed");
        }

        let recent = repository.recent_for(user(1)).await.expect("lookup");
        assert_eq!(titles(&recent), ["Alpha", "Beta"]);
        let others = repository.recent_for(user(2)).await.expect("lookup");
        assert!(others.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn deleting_a_workspace_forgets_its_projects() {
        let repository = InMemoryProjectRepository::new();
        let doomed = stored(&repository, 1, "Doomed").await;
        let kept = stored(&repository, 2, "Kept").await;
        repository
            .toggle_star(user(1), doomed.id())
            .await
            .expect("star should succeed");
        repository
            .record_opened(user(1), doomed.id(), at(10))
            .await
            .expect("record should succeed");

        let removed = repository
            .delete_for_workspace(WorkspaceId::new(1).expect("valid workspace id"))
            .await
            .expect("delete should succeed");

        assert_eq!(removed, [doomed.id()]);
        assert!(repository.starred_by(user(1)).await.expect("lookup").is_empty());
        assert!(repository.recent_for(user(1)).await.expect("lookup").is_empty());
        assert!(
            repository
                .find_by_id(kept.id())
                .await
                .expect("lookup")
                .is_some()
        );
        assert!(!repository.delete(doomed.id()).await.expect("delete"));
    }
}
