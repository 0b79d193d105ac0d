use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::permissions::{Permission, RolePermissions};

/// Role of a hub member, ordered by a strictly increasing level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Visitor,
    Member,
    CoManager,
    Admin,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

const VISITOR: RolePermissions = RolePermissions {
    can_view: true,
    ..RolePermissions::NONE
};

const MEMBER: RolePermissions = RolePermissions {
    can_view: true,
    can_download: true,
    can_upload: true,
    ..RolePermissions::NONE
};

const CO_MANAGER: RolePermissions = RolePermissions {
    can_view: true,
    can_download: true,
    can_upload: true,
    can_edit: true,
    can_delete: true,
    can_manage_members: false,
};

const ADMIN: RolePermissions = RolePermissions {
    can_view: true,
    can_download: true,
    can_upload: true,
    can_edit: true,
    can_delete: true,
    can_manage_members: true,
};

impl Role {
    /// Canonical order, lowest level first.
    pub const ALL: [Role; 4] = [Role::Visitor, Role::Member, Role::CoManager, Role::Admin];

    pub fn level(&self) -> u8 {
        match self {
            Role::Visitor => 1,
            Role::Member => 2,
            Role::CoManager => 3,
            Role::Admin => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Visitor => "visitor",
            Role::Member => "member",
            Role::CoManager => "co_manager",
            Role::Admin => "admin",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Role::Visitor => "Visitor",
            Role::Member => "Member",
            Role::CoManager => "Co-Manager",
            Role::Admin => "Admin",
        }
    }

    pub fn permissions(&self) -> RolePermissions {
        match self {
            Role::Visitor => VISITOR,
            Role::Member => MEMBER,
            Role::CoManager => CO_MANAGER,
            Role::Admin => ADMIN,
        }
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions().grants(permission)
    }

    /// Whether this role meets a `required` role by level.
    pub fn can_act_as(&self, required: Role) -> bool {
        self.level() >= required.level()
    }

    /// Lowest role granting `permission`, if any does.
    pub fn minimum_for(permission: Permission) -> Option<Role> {
        Self::ALL.into_iter().find(|r| r.has_permission(permission))
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownRole(wanted.to_string()))
    }
}
