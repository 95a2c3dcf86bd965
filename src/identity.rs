//! Caller identity threaded explicitly into every operation that needs it.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Numeric identifier of an application user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Creates a validated user identifier.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidUserId`] when the value is not
    /// positive.
    pub const fn new(value: i64) -> Result<Self, IdentityError> {
        if value <= 0 {
            return Err(IdentityError::InvalidUserId(value));
        }
        Ok(Self(value))
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Application-wide role of the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlobalRole {
    /// Administrator; may see private projects.
    Admin,
    /// Regular user.
    #[default]
    User,
}

impl GlobalRole {
    /// Parses a role header value; anything but `admin` is a regular user.
    #[must_use]
    pub fn from_header(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("admin") {
            Self::Admin
        } else {
            Self::User
        }
    }
}

/// The authenticated caller of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    user_id: UserId,
    role: GlobalRole,
}

impl Actor {
    /// Creates an actor with an explicit role.
    #[must_use]
    pub const fn new(user_id: UserId, role: GlobalRole) -> Self {
        Self { user_id, role }
    }

    /// Creates a regular (non-admin) actor.
    #[must_use]
    pub const fn user(user_id: UserId) -> Self {
        Self::new(user_id, GlobalRole::User)
    }

    /// Returns the caller's user identifier.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the caller's global role.
    #[must_use]
    pub const fn role(&self) -> GlobalRole {
        self.role
    }

    /// Returns whether the caller is a global administrator.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, GlobalRole::Admin)
    }
}

/// Errors raised while constructing identity values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityError {
    /// The user identifier is not a positive integer.
    #[error("invalid user id {0}, expected a positive integer")]
    InvalidUserId(i64),
}

#[cfg(test)]
mod tests {
    use super::{Actor, GlobalRole, IdentityError, UserId};
    use rstest::rstest;

    #[rstest]
    #[case(0)]
    #[case(-4)]
    fn non_positive_user_ids_are_rejected(#[case] value: i64) {
        assert_eq!(UserId::new(value), Err(IdentityError::InvalidUserId(value)));
    }

    #[rstest]
    #[case("admin", GlobalRole::Admin)]
    #[case(" Admin ", GlobalRole::Admin)]
    #[case("member", GlobalRole::User)]
    #[case("", GlobalRole::User)]
    fn role_header_parsing(#[case] raw: &str, #[case] expected: GlobalRole) {
        assert_eq!(GlobalRole::from_header(raw), expected);
    }

    #[rstest]
    fn user_actor_is_not_admin() {
        let actor = Actor::user(UserId::new(3).expect("valid user id"));
        assert!(!actor.is_admin());
        assert_eq!(actor.user_id().value(), 3);
    }
}
