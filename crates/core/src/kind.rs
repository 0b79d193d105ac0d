//! Resource kinds and document types.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// One of the four structurally identical record collections a department owns.
///
/// Also used as the "folder kind" of a saved-folder bookmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Projects,
    Events,
    Templates,
    Guides,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Projects,
        ResourceKind::Events,
        ResourceKind::Templates,
        ResourceKind::Guides,
    ];

    /// Collection path segment on the backend (`/projects`, `/events`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Projects => "projects",
            ResourceKind::Events => "events",
            ResourceKind::Templates => "templates",
            ResourceKind::Guides => "guides",
        }
    }

    pub fn singular(&self) -> &'static str {
        match self {
            ResourceKind::Projects => "project",
            ResourceKind::Events => "event",
            ResourceKind::Templates => "template",
            ResourceKind::Guides => "guide",
        }
    }

    /// Capitalised singular form used in backend-style messages ("Project not found").
    pub fn label(&self) -> &'static str {
        match self {
            ResourceKind::Projects => "Project",
            ResourceKind::Events => "Event",
            ResourceKind::Templates => "Template",
            ResourceKind::Guides => "Guide",
        }
    }
}

impl core::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "projects" | "project" => Ok(ResourceKind::Projects),
            "events" | "event" => Ok(ResourceKind::Events),
            "templates" | "template" => Ok(ResourceKind::Templates),
            "guides" | "guide" => Ok(ResourceKind::Guides),
            other => Err(ClientError::invalid_field(
                "kind",
                format!("unknown resource kind '{other}' (expected projects, events, templates or guides)"),
            )),
        }
    }
}

/// Document family used by the "filter by document type" affordance and the
/// upload allow-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Pdf,
    Word,
    Excel,
    PowerPoint,
    Image,
    Archive,
}

impl DocumentType {
    pub const ALL: [DocumentType; 6] = [
        DocumentType::Pdf,
        DocumentType::Word,
        DocumentType::Excel,
        DocumentType::PowerPoint,
        DocumentType::Image,
        DocumentType::Archive,
    ];

    /// File extensions (lowercase, without dot) belonging to this type.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            DocumentType::Pdf => &["pdf"],
            DocumentType::Word => &["doc", "docx"],
            DocumentType::Excel => &["xls", "xlsx"],
            DocumentType::PowerPoint => &["ppt", "pptx"],
            DocumentType::Image => &["jpg", "jpeg", "png", "gif"],
            DocumentType::Archive => &["zip"],
        }
    }

    /// Classify a file name or URL by its extension.
    ///
    /// Query strings and fragments are ignored; matching is case-insensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        let path = name.split(['?', '#']).next().unwrap_or_default();
        let file = path.rsplit('/').next().unwrap_or_default();
        let (stem, ext) = file.rsplit_once('.')?;
        if stem.is_empty() {
            return None;
        }
        let ext = ext.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.extensions().contains(&ext.as_str()))
    }

    /// Classify an upload MIME type. Only the upload allow-list maps to a type.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "application/pdf" => Some(DocumentType::Pdf),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                Some(DocumentType::Word)
            }
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet" => {
                Some(DocumentType::Excel)
            }
            "application/vnd.openxmlformats-officedocument.presentationml.presentation" => {
                Some(DocumentType::PowerPoint)
            }
            "image/jpeg" | "image/png" | "image/gif" => Some(DocumentType::Image),
            "application/zip" => Some(DocumentType::Archive),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Pdf => "pdf",
            DocumentType::Word => "word",
            DocumentType::Excel => "excel",
            DocumentType::PowerPoint => "powerpoint",
            DocumentType::Image => "image",
            DocumentType::Archive => "archive",
        }
    }
}

impl core::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted || t.extensions().contains(&wanted.as_str()))
            .ok_or_else(|| {
                ClientError::invalid_field("type", format!("unknown document type '{wanted}'"))
            })
    }
}
