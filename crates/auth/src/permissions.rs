use serde::{Deserialize, Serialize};

/// Capability a role may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    #[serde(rename = "canView")]
    View,
    #[serde(rename = "canDownload")]
    Download,
    #[serde(rename = "canUpload")]
    Upload,
    #[serde(rename = "canEdit")]
    Edit,
    #[serde(rename = "canDelete")]
    Delete,
    #[serde(rename = "canManageMembers")]
    ManageMembers,
}

impl Permission {
    pub const ALL: [Permission; 6] = [
        Permission::View,
        Permission::Download,
        Permission::Upload,
        Permission::Edit,
        Permission::Delete,
        Permission::ManageMembers,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::View => "canView",
            Permission::Download => "canDownload",
            Permission::Upload => "canUpload",
            Permission::Edit => "canEdit",
            Permission::Delete => "canDelete",
            Permission::ManageMembers => "canManageMembers",
        }
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed permission grid of one role.
///
/// Grids are declared per role in [`crate::Role::permissions`], not derived
/// from the level ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RolePermissions {
    pub can_view: bool,
    pub can_download: bool,
    pub can_upload: bool,
    pub can_edit: bool,
    pub can_delete: bool,
    pub can_manage_members: bool,
}

impl RolePermissions {
    pub const NONE: RolePermissions = RolePermissions {
        can_view: false,
        can_download: false,
        can_upload: false,
        can_edit: false,
        can_delete: false,
        can_manage_members: false,
    };

    pub fn grants(&self, permission: Permission) -> bool {
        match permission {
            Permission::View => self.can_view,
            Permission::Download => self.can_download,
            Permission::Upload => self.can_upload,
            Permission::Edit => self.can_edit,
            Permission::Delete => self.can_delete,
            Permission::ManageMembers => self.can_manage_members,
        }
    }

    /// Granted permissions in canonical order.
    pub fn granted(&self) -> Vec<Permission> {
        Permission::ALL
            .into_iter()
            .filter(|p| self.grants(*p))
            .collect()
    }
}
