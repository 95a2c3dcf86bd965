//! Workspace membership.

use super::{ParseMemberRoleError, WorkspaceId};
use crate::identity::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Role a user holds inside one workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    /// May rename the workspace and manage members.
    Admin,
    /// Regular collaborator.
    Member,
}

impl MemberRole {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Member => "member",
        }
    }
}

impl TryFrom<&str> for MemberRole {
    type Error = ParseMemberRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "member" => Ok(Self::Member),
            _ => Err(ParseMemberRoleError(value.to_owned())),
        }
    }
}

/// Membership of a user in a workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    workspace_id: WorkspaceId,
    user_id: UserId,
    role: MemberRole,
    added_by: UserId,
    created_at: DateTime<Utc>,
}

impl TeamMember {
    /// Creates a membership record.
    #[must_use]
    pub fn new(
        workspace_id: WorkspaceId,
        user_id: UserId,
        role: MemberRole,
        added_by: UserId,
        clock: &impl Clock,
    ) -> Self {
        Self {
            workspace_id,
            user_id,
            role,
            added_by,
            created_at: clock.utc(),
        }
    }

    /// Reconstructs a membership from storage.
    #[must_use]
    pub const fn from_persisted(
        workspace_id: WorkspaceId,
        user_id: UserId,
        role: MemberRole,
        added_by: UserId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            workspace_id,
            user_id,
            role,
            added_by,
            created_at,
        }
    }

    /// Returns the workspace identifier.
    #[must_use]
    pub const fn workspace_id(&self) -> WorkspaceId {
        self.workspace_id
    }

    /// Returns the member's user identifier.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the member role.
    #[must_use]
    pub const fn role(&self) -> MemberRole {
        self.role
    }

    /// Returns the user who added this member.
    #[must_use]
    pub const fn added_by(&self) -> UserId {
        self.added_by
    }

    /// Returns when the membership was created.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns whether the member administers the workspace.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, MemberRole::Admin)
    }
}
