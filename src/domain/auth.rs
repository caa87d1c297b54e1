use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::employee::Employee;

/// Access level of an employee. Stored as `1` (user) or `2` (admin).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    User,
    Admin,
}

#[derive(Debug, Error)]
#[error("unknown role code {0}")]
pub struct UnknownRole(pub i32);

impl From<Role> for i32 {
    fn from(value: Role) -> Self {
        match value {
            Role::User => 1,
            Role::Admin => 2,
        }
    }
}

impl TryFrom<i32> for Role {
    type Error = UnknownRole;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Role::User),
            2 => Ok(Role::Admin),
            other => Err(UnknownRole(other)),
        }
    }
}

/// Identity of the logged-in employee, kept in the session between requests.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthenticatedEmployee {
    pub id: i32,
    pub name: String,
    pub role: Role,
    pub canteen_id: Option<i32>,
}

impl AuthenticatedEmployee {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Whether the employee works at `canteen_id`.
    pub fn works_at(&self, canteen_id: i32) -> bool {
        self.canteen_id == Some(canteen_id)
    }
}

impl From<&Employee> for AuthenticatedEmployee {
    fn from(value: &Employee) -> Self {
        Self {
            id: value.id,
            name: value.full_name(),
            role: value.role,
            canteen_id: value.canteen_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_codes_round_trip() {
        assert_eq!(i32::from(Role::User), 1);
        assert_eq!(i32::from(Role::Admin), 2);
        assert_eq!(Role::try_from(2).ok(), Some(Role::Admin));
        assert!(Role::try_from(3).is_err());
    }
}
