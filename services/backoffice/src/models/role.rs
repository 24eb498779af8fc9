//! Authorization vocabulary: roles, permissions and the per-role permission set

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A stored or submitted value that does not name a known variant
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Account role. Roles are not ranked: authorization only ever asks whether a
/// role is a member of a required set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Teacher,
    Student,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Teacher, Role::Student];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Teacher => "Teacher",
            Role::Student => "Student",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "role",
                value: s.to_string(),
            })
    }
}

/// Actions a role may be granted on back-office resources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UsersPermissions {
    Add,
    Delete,
    Update,
    Read,
    ReadAll,
}

/// Name used by the role-permission records for a single grant.
pub type Permission = UsersPermissions;

impl UsersPermissions {
    pub const ALL: [UsersPermissions; 5] = [
        UsersPermissions::Add,
        UsersPermissions::Delete,
        UsersPermissions::Update,
        UsersPermissions::Read,
        UsersPermissions::ReadAll,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UsersPermissions::Add => "Add",
            UsersPermissions::Delete => "Delete",
            UsersPermissions::Update => "Update",
            UsersPermissions::Read => "Read",
            UsersPermissions::ReadAll => "ReadAll",
        }
    }
}

impl fmt::Display for UsersPermissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UsersPermissions {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UsersPermissions::ALL
            .into_iter()
            .find(|permission| permission.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "permission",
                value: s.to_string(),
            })
    }
}

/// The permission set bound to one role. There is exactly one record per
/// role and it is always replaced as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePermissions {
    pub role: Role,
    pub permissions: BTreeSet<Permission>,
}

impl RolePermissions {
    pub fn new(role: Role, permissions: impl IntoIterator<Item = Permission>) -> Self {
        Self {
            role,
            permissions: permissions.into_iter().collect(),
        }
    }

    /// Whether every permission in `required` is granted
    pub fn grants_all(&self, required: &[Permission]) -> bool {
        required.iter().all(|p| self.permissions.contains(p))
    }
}

/// Training track chosen at sign-up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormationMode {
    Initial,
    Continuing,
    Apprenticeship,
}

impl FormationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormationMode::Initial => "Initial",
            FormationMode::Continuing => "Continuing",
            FormationMode::Apprenticeship => "Apprenticeship",
        }
    }
}

impl FromStr for FormationMode {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Initial" => Ok(FormationMode::Initial),
            "Continuing" => Ok(FormationMode::Continuing),
            "Apprenticeship" => Ok(FormationMode::Apprenticeship),
            _ => Err(UnknownVariant {
                kind: "formation mode",
                value: s.to_string(),
            }),
        }
    }
}
