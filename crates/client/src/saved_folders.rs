//! Saved-Folder Registry: the signed-in user's library of bookmarked
//! (department, folder kind) pairs.
//!
//! The backend owns duplicate prevention. Every call is scoped to the owner
//! through the bearer token.

use reqwest::Method;
use serde_json::Value;

use resourcehub_core::{
    ClientError, ClientResult, DepartmentId, Envelope, NewSavedFolder, ResourceKind, SavedFolder,
    SavedFolderId,
};

use crate::transport::ApiClient;

const SAVED_FOLDERS: &str = "saved-folders";

/// Result of a save-status lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveStatus {
    pub is_saved: bool,
    pub folder: Option<SavedFolder>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// A new bookmark was created.
    Saved(SavedFolder),
    /// The pair was already in the library; carries the existing bookmark
    /// when the backend returned it.
    AlreadySaved(Option<SavedFolder>),
}

impl SaveOutcome {
    pub fn folder(&self) -> Option<&SavedFolder> {
        match self {
            SaveOutcome::Saved(folder) => Some(folder),
            SaveOutcome::AlreadySaved(folder) => folder.as_ref(),
        }
    }

    pub fn was_created(&self) -> bool {
        matches!(self, SaveOutcome::Saved(_))
    }
}

#[derive(Debug, Clone)]
pub struct SavedFolderRegistry {
    api: ApiClient,
}

impl SavedFolderRegistry {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> ClientResult<Vec<SavedFolder>> {
        let request = self
            .api
            .request(Method::GET, &[SAVED_FOLDERS], "Failed to fetch saved folders");
        let env: Envelope<Vec<SavedFolder>> = self.api.send(request).await?;
        Ok(env.data.unwrap_or_default())
    }

    pub async fn check_if_saved(
        &self,
        department: &DepartmentId,
        kind: ResourceKind,
    ) -> ClientResult<SaveStatus> {
        let request = self
            .api
            .request(
                Method::GET,
                &[SAVED_FOLDERS, "check"],
                "Failed to check save status",
            )
            .query(&[
                ("department", department.to_string()),
                ("folderType", kind.as_str().to_string()),
            ]);
        let body = self.api.send_value(request).await?;
        parse_save_status(&body)
    }

    /// Create a bookmark. A duplicate rejection is not an error: it is
    /// reconciled into [`SaveOutcome::AlreadySaved`].
    pub async fn save(&self, folder: &NewSavedFolder) -> ClientResult<SaveOutcome> {
        let request = self
            .api
            .request(Method::POST, &[SAVED_FOLDERS], "Failed to save folder")
            .json(folder);

        match self.api.send::<SavedFolder>(request).await {
            Ok(env) => {
                let saved = env
                    .data
                    .ok_or_else(|| ClientError::unknown("Saved folder was not returned after save"))?;
                tracing::info!(
                    id = %saved.id,
                    department = %folder.department,
                    kind = %folder.folder_kind,
                    "folder saved"
                );
                Ok(SaveOutcome::Saved(saved))
            }
            Err(err) if is_duplicate_rejection(&err) => {
                tracing::debug!(
                    department = %folder.department,
                    kind = %folder.folder_kind,
                    "folder already saved"
                );
                let status = self
                    .check_if_saved(&folder.department, folder.folder_kind)
                    .await?;
                Ok(SaveOutcome::AlreadySaved(status.folder))
            }
            Err(err) => Err(err),
        }
    }

    /// Check first and only save when the pair is not yet bookmarked.
    pub async fn save_if_absent(&self, folder: &NewSavedFolder) -> ClientResult<SaveOutcome> {
        let status = self
            .check_if_saved(&folder.department, folder.folder_kind)
            .await?;
        if status.is_saved {
            return Ok(SaveOutcome::AlreadySaved(status.folder));
        }
        self.save(folder).await
    }

    pub async fn remove(&self, id: &SavedFolderId) -> ClientResult<()> {
        let request = self.api.request(
            Method::DELETE,
            &[SAVED_FOLDERS, id.as_str()],
            "Failed to remove folder",
        );
        let _: Envelope<Value> = self.api.send(request).await?;
        tracing::info!(%id, "folder removed");
        Ok(())
    }

    /// Ask the backend to recount the folder's items.
    pub async fn refresh_count(&self, id: &SavedFolderId) -> ClientResult<SavedFolder> {
        let request = self.api.request(
            Method::PATCH,
            &[SAVED_FOLDERS, id.as_str(), "count"],
            "Failed to update folder count",
        );
        let env: Envelope<SavedFolder> = self.api.send(request).await?;
        let folder = env.into_data("Saved folder not found")?;
        tracing::debug!(%id, item_count = folder.item_count, "folder count refreshed");
        Ok(folder)
    }
}

/// 409, or a 400 or `success:false` 2xx reply whose message says the folder
/// already exists.
fn is_duplicate_rejection(err: &ClientError) -> bool {
    match err.status() {
        Some(409) => true,
        Some(400 | 200..=299) => err.message().to_ascii_lowercase().contains("already"),
        _ => false,
    }
}

/// `isSaved` may sit at the top level or under `data`; the folder may be
/// `data` itself or `data.folder` / `folder`.
fn parse_save_status(body: &Value) -> ClientResult<SaveStatus> {
    let data = body.get("data").filter(|v| !v.is_null());

    let is_saved = body
        .get("isSaved")
        .or_else(|| data.and_then(|d| d.get("isSaved")))
        .and_then(Value::as_bool);

    let folder_value = data
        .and_then(|d| d.get("folder"))
        .or_else(|| body.get("folder"))
        .filter(|v| !v.is_null())
        .or_else(|| data.filter(|d| d.get("isSaved").is_none()));

    let folder = folder_value
        .map(|v| serde_json::from_value::<SavedFolder>(v.clone()))
        .transpose()
        .map_err(|e| ClientError::unknown(format!("unexpected saved folder shape: {e}")))?;

    let is_saved = match is_saved {
        Some(flag) => flag,
        None if folder.is_some() => true,
        None => {
            return Err(ClientError::unknown(
                "Save status response did not include isSaved",
            ));
        }
    };

    Ok(SaveStatus { is_saved, folder })
}
