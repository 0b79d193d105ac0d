//! Wire records exchanged with the backend.
//!
//! Field names follow the backend's camelCase JSON. Document ids arrive as
//! `_id`; they are accepted under either `_id` or `id`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{DepartmentId, RecordId, SavedFolderId, UserId};
use crate::kind::{DocumentType, ResourceKind};

/// Profile of the signed-in user, as returned by register/login and cached
/// alongside the bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(alias = "_id")]
    pub id: UserId,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Raw role id (`visitor`, `member`, `co_manager`, `admin`). Absent means visitor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// A department. Read-only from the client's perspective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    #[serde(alias = "_id")]
    pub id: DepartmentId,
    /// Stable routing key (`design`, `dev`, ...).
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Compact department fields the backend embeds when it populates a reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentSummary {
    #[serde(alias = "_id")]
    pub id: DepartmentId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

/// Reference from a record to its owning department: either a bare id or a
/// populated summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DepartmentRef {
    Id(DepartmentId),
    Populated(DepartmentSummary),
}

impl DepartmentRef {
    pub fn id(&self) -> &DepartmentId {
        match self {
            DepartmentRef::Id(id) => id,
            DepartmentRef::Populated(summary) => &summary.id,
        }
    }
}

impl From<DepartmentId> for DepartmentRef {
    fn from(value: DepartmentId) -> Self {
        DepartmentRef::Id(value)
    }
}

fn default_true() -> bool {
    true
}

/// A project, event, template or guide. All four kinds share this shape.
///
/// Records are soft-deleted through `is_active`; list endpoints exclude
/// inactive records unless asked otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRecord {
    #[serde(alias = "_id")]
    pub id: RecordId,
    pub department: DepartmentRef,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, alias = "views")]
    pub view_count: u64,
}

impl ResourceRecord {
    /// Document type derived from the file URL, falling back to the title.
    pub fn document_type(&self) -> Option<DocumentType> {
        self.file_url
            .as_deref()
            .and_then(DocumentType::from_name)
            .or_else(|| DocumentType::from_name(&self.title))
    }

    pub fn belongs_to(&self, department: &DepartmentId) -> bool {
        self.department.id() == department
    }
}

/// A bookmark of one (department, folder kind) pair in the user's library.
///
/// At most one exists per (owner, department, folder kind); the backend
/// enforces it and the registry reconciles duplicate attempts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedFolder {
    #[serde(alias = "_id")]
    pub id: SavedFolderId,
    pub department: DepartmentRef,
    #[serde(default)]
    pub department_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_slug: Option<String>,
    #[serde(rename = "folderType")]
    pub folder_kind: ResourceKind,
    #[serde(default)]
    pub item_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl SavedFolder {
    pub fn is_for(&self, department: &DepartmentId, kind: ResourceKind) -> bool {
        self.department.id() == department && self.folder_kind == kind
    }
}

/// Payload for bookmarking a folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSavedFolder {
    pub department: DepartmentId,
    pub department_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_slug: Option<String>,
    #[serde(rename = "folderType")]
    pub folder_kind: ResourceKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl NewSavedFolder {
    pub fn for_department(department: &Department, kind: ResourceKind) -> Self {
        Self {
            department: department.id.clone(),
            department_name: department.name.clone(),
            department_slug: Some(department.slug.clone()),
            folder_kind: kind,
            color: None,
        }
    }
}
