//! In-memory workspace repository.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::identity::UserId;
use crate::slug::Slug;
use crate::workspace::{
    domain::{NewWorkspace, PersistedWorkspaceData, TeamMember, Workspace, WorkspaceId},
    ports::{WorkspaceRepository, WorkspaceRepositoryError, WorkspaceRepositoryResult},
};

/// Thread-safe in-memory workspace repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWorkspaceRepository {
    state: Arc<RwLock<InMemoryWorkspaceState>>,
}

#[derive(Debug, Default)]
struct InMemoryWorkspaceState {
    last_id: i64,
    workspaces: BTreeMap<WorkspaceId, Workspace>,
    members: Vec<TeamMember>,
}

impl InMemoryWorkspaceRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> WorkspaceRepositoryResult<RwLockReadGuard<'_, InMemoryWorkspaceState>> {
        self.state.read().map_err(|err| {
            WorkspaceRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> WorkspaceRepositoryResult<RwLockWriteGuard<'_, InMemoryWorkspaceState>> {
        self.state.write().map_err(|err| {
            WorkspaceRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

#[async_trait]
impl WorkspaceRepository for InMemoryWorkspaceRepository {
    async fn insert(&self, workspace: &NewWorkspace) -> WorkspaceRepositoryResult<Workspace> {
        let mut state = self.write()?;
        state.last_id += 1;
        let id = WorkspaceId::from_persisted(state.last_id);
        let stored = Workspace::from_persisted(PersistedWorkspaceData {
            id,
            name: workspace.name().clone(),
            slug: None,
            owner: workspace.owner(),
            created_at: workspace.created_at(),
        });
        state.workspaces.insert(id, stored.clone());
        Ok(stored)
    }

    async fn assign_slug(&self, id: WorkspaceId, slug: &Slug) -> WorkspaceRepositoryResult<()> {
        let mut state = self.write()?;
        let stored = state
            .workspaces
            .remove(&id)
            .ok_or(WorkspaceRepositoryError::NotFound(id))?;
        state.workspaces.insert(id, stored.with_slug(slug.clone()));
        Ok(())
    }

    async fn slug_exists(&self, slug: &Slug) -> WorkspaceRepositoryResult<bool> {
        let state = self.read()?;
        Ok(state
            .workspaces
            .values()
            .any(|workspace| workspace.slug() == Some(slug)))
    }

    async fn update(&self, workspace: &Workspace) -> WorkspaceRepositoryResult<()> {
        let mut state = self.write()?;
        let stored = state
            .workspaces
            .get_mut(&workspace.id())
            .ok_or(WorkspaceRepositoryError::NotFound(workspace.id()))?;
        stored.rename(workspace.name().clone());
        Ok(())
    }

    async fn delete(&self, id: WorkspaceId) -> WorkspaceRepositoryResult<bool> {
        let mut state = self.write()?;
        state.members.retain(|member| member.workspace_id() != id);
        Ok(state.workspaces.remove(&id).is_some())
    }

    async fn find_by_id(&self, id: WorkspaceId) -> WorkspaceRepositoryResult<Option<Workspace>> {
        let state = self.read()?;
        Ok(state.workspaces.get(&id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> WorkspaceRepositoryResult<Option<Workspace>> {
        let state = self.read()?;
        Ok(state
            .workspaces
            .values()
            .find(|workspace| workspace.slug().is_some_and(|value| value.as_str() == slug))
            .cloned())
    }

    async fn owned_by(&self, owner: UserId) -> WorkspaceRepositoryResult<Vec<Workspace>> {
        let state = self.read()?;
        Ok(state
            .workspaces
            .values()
            .filter(|workspace| workspace.owner() == owner)
            .cloned()
            .collect())
    }

    async fn member_workspaces(
        &self,
        user_id: UserId,
    ) -> WorkspaceRepositoryResult<Vec<Workspace>> {
        let state = self.read()?;
        Ok(state
            .workspaces
            .values()
            .filter(|workspace| {
                state.members.iter().any(|member| {
                    member.workspace_id() == workspace.id() && member.user_id() == user_id
                })
            })
            .cloned()
            .collect())
    }

    async fn add_member(&self, member: &TeamMember) -> WorkspaceRepositoryResult<()> {
        let mut state = self.write()?;
        let duplicate = state.members.iter().any(|existing| {
            existing.workspace_id() == member.workspace_id()
                && existing.user_id() == member.user_id()
        });
        if duplicate {
            return Err(WorkspaceRepositoryError::DuplicateMember {
                workspace_id: member.workspace_id(),
                user_id: member.user_id(),
            });
        }
        state.members.push(member.clone());
        Ok(())
    }

    async fn remove_member(
        &self,
        workspace_id: WorkspaceId,
        user_id: UserId,
    ) -> WorkspaceRepositoryResult<bool> {
        let mut state = self.write()?;
        let before = state.members.len();
        state.members.retain(|member| {
            !(member.workspace_id() == workspace_id && member.user_id() == user_id)
        });
        Ok(state.members.len() < before)
    }

    async fn find_member(
        &self,
        workspace_id: WorkspaceId,
        user_id: UserId,
    ) -> WorkspaceRepositoryResult<Option<TeamMember>> {
        let state = self.read()?;
        Ok(state
            .members
            .iter()
            .find(|member| member.workspace_id() == workspace_id && member.user_id() == user_id)
            .cloned())
    }

    async fn members(
        &self,
        workspace_id: WorkspaceId,
    ) -> WorkspaceRepositoryResult<Vec<TeamMember>> {
        let state = self.read()?;
        Ok(state
            .members
            .iter()
            .filter(|member| member.workspace_id() == workspace_id)
            .cloned()
            .collect())
    }
}
