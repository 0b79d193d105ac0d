//! File upload into a department's resource collection.

use std::path::Path;

use reqwest::Method;
use reqwest::multipart::{Form, Part};

use resourcehub_core::{
    ClientError, ClientResult, DepartmentId, DocumentType, Envelope, FieldError, ResourceKind,
    ResourceRecord,
};

use crate::transport::ApiClient;

pub const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;
pub const MAX_TITLE_CHARS: usize = 200;

const TOO_LARGE: &str = "File size must be less than 50MB";

/// A file to upload plus its metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub department: DepartmentId,
    /// Display title. Blank means "derive from the file name".
    pub title: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadRequest {
    /// Read `path` from disk, inferring the MIME type from its extension.
    pub async fn from_path(
        department: impl Into<DepartmentId>,
        path: impl AsRef<Path>,
        title: Option<String>,
    ) -> ClientResult<Self> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .ok_or_else(|| {
                ClientError::invalid_field("file", format!("'{}' is not a file path", path.display()))
            })?;

        let unreadable = |e: std::io::Error| {
            ClientError::invalid_field("file", format!("could not read '{}': {e}", path.display()))
        };

        // Oversized files are rejected from their metadata, never loaded.
        let size = tokio::fs::metadata(path).await.map_err(unreadable)?.len();
        if size > MAX_UPLOAD_BYTES as u64 {
            return Err(ClientError::invalid_field("file", TOO_LARGE));
        }

        let bytes = tokio::fs::read(path).await.map_err(unreadable)?;

        let content_type = mime_for_name(&file_name)
            .unwrap_or("application/octet-stream")
            .to_string();

        Ok(Self {
            department: department.into(),
            title: title.unwrap_or_default(),
            file_name,
            content_type,
            bytes,
        })
    }

    /// Title that will be sent: the trimmed title, or the file stem when blank.
    pub fn effective_title(&self) -> String {
        let title = self.title.trim();
        if !title.is_empty() {
            return title.to_string();
        }
        match self.file_name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem.to_string(),
            _ => self.file_name.clone(),
        }
    }

    /// Shape checks run before anything touches the network.
    pub fn validate(&self) -> ClientResult<()> {
        let mut fields = Vec::new();

        if self.bytes.is_empty() {
            fields.push(FieldError::new("file", "Please select a file to upload"));
        } else if self.bytes.len() > MAX_UPLOAD_BYTES {
            fields.push(FieldError::new("file", TOO_LARGE));
        }
        if DocumentType::from_mime(&self.content_type).is_none() {
            fields.push(FieldError::new(
                "file",
                "Invalid file type. Only PDF, Word, Excel, PowerPoint, images and ZIP files are allowed",
            ));
        }

        let title = self.effective_title();
        if title.trim().is_empty() {
            fields.push(FieldError::new("title", "Title is required"));
        } else if title.chars().count() > MAX_TITLE_CHARS {
            fields.push(FieldError::new(
                "title",
                format!("Title must be {MAX_TITLE_CHARS} characters or less"),
            ));
        }

        if self.department.as_str().trim().is_empty() {
            fields.push(FieldError::new("department", "Department is required"));
        }

        if fields.is_empty() {
            Ok(())
        } else {
            Err(ClientError::validation(fields))
        }
    }
}

/// MIME type for an allow-listed extension.
pub fn mime_for_name(file_name: &str) -> Option<&'static str> {
    let (_, ext) = file_name.rsplit_once('.')?;
    let mime = match ext.to_ascii_lowercase().as_str() {
        "pdf" => "application/pdf",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "zip" => "application/zip",
        _ => return None,
    };
    Some(mime)
}

#[derive(Debug, Clone)]
pub struct UploadService {
    api: ApiClient,
}

impl UploadService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn upload(&self, kind: ResourceKind, request: UploadRequest) -> ClientResult<ResourceRecord> {
        request.validate()?;

        let title = request.effective_title();
        let size = request.bytes.len();
        let file = Part::bytes(request.bytes)
            .file_name(request.file_name.clone())
            .mime_str(&request.content_type)
            .map_err(|e| ClientError::invalid_field("file", format!("invalid content type: {e}")))?;
        let form = Form::new()
            .text("department", request.department.to_string())
            .text("title", title.clone())
            .part("file", file);

        let http = self
            .api
            .request(Method::POST, &[kind.as_str(), "upload"], "Upload failed")
            .multipart(form);
        let env: Envelope<ResourceRecord> = self.api.send(http).await?;
        let record = env
            .data
            .ok_or_else(|| ClientError::unknown("Upload succeeded but no record was returned"))?;

        tracing::info!(%kind, id = %record.id, size, "file uploaded");
        Ok(record)
    }
}
