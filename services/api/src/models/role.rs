//! Role model and the role policy tables
//!
//! The admin/super_user hierarchy is expressed as data: each requester role
//! maps to the set of roles it may create and the set of accounts it may
//! manage. Services consult these tables instead of comparing strings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of a user account
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
pub enum Role {
    SuperUser,
    Admin,
    Technician,
    Manager,
}

/// Roles allowed to perform writes on most resources
pub const ADMIN_TIER: &[Role] = &[Role::SuperUser, Role::Admin];

impl Role {
    /// Every role, in declaration order
    pub const ALL: &'static [Role] = &[Role::SuperUser, Role::Admin, Role::Technician, Role::Manager];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::SuperUser => "super_user",
            Role::Admin => "admin",
            Role::Technician => "technician",
            Role::Manager => "manager",
        }
    }

    /// Roles this requester may assign to a new account
    pub fn creatable_roles(self) -> &'static [Role] {
        match self {
            Role::SuperUser => &[Role::Admin, Role::Manager, Role::Technician],
            Role::Admin => &[Role::Manager, Role::Technician],
            Role::Technician | Role::Manager => &[],
        }
    }

    /// Roles of existing accounts this requester may update or delete
    pub fn managed_roles(self) -> &'static [Role] {
        match self {
            Role::SuperUser => Role::ALL,
            Role::Admin => &[Role::Manager, Role::Technician],
            Role::Technician | Role::Manager => &[],
        }
    }

    pub fn can_create(self, target: Role) -> bool {
        self.creatable_roles().contains(&target)
    }

    pub fn can_manage(self, target: Role) -> bool {
        self.managed_roles().contains(&target)
    }

    pub fn is_admin_tier(self) -> bool {
        ADMIN_TIER.contains(&self)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
