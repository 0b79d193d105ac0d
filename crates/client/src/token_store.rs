//! Persisted holder of the bearer token and the cached user profile.
//!
//! Every write is visible to the next read in the same process. There is no
//! client-side expiry: an expired token is only discovered when the backend
//! rejects it.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use resourcehub_core::UserProfile;

/// Process-wide token/profile holder.
pub trait TokenStore: Send + Sync + core::fmt::Debug {
    fn get(&self) -> Option<String>;

    fn set(&self, token: &str);

    fn clear(&self);

    fn cached_profile(&self) -> Option<UserProfile>;

    fn set_cached_profile(&self, profile: &UserProfile);

    fn clear_cached_profile(&self);

    /// Drop both the token and the profile.
    fn clear_all(&self) {
        self.clear();
        self.clear_cached_profile();
    }
}

#[derive(Debug, Error)]
pub enum TokenStoreError {
    #[error("session file io: {0}")]
    Io(#[from] std::io::Error),
    #[error("session file is not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),
}

/// What the store keeps, also the on-disk document shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,
}

// ─────────────────────────────────────────────────────────────────────────────
// In-memory store
// ─────────────────────────────────────────────────────────────────────────────

/// Non-durable store for tests and embedded use.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    inner: RwLock<StoredSession>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(token: impl Into<String>, user: UserProfile) -> Self {
        Self {
            inner: RwLock::new(StoredSession {
                token: Some(token.into()),
                user: Some(user),
            }),
        }
    }

    fn update(&self, f: impl FnOnce(&mut StoredSession)) {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard);
    }

    fn read(&self) -> StoredSession {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<String> {
        self.read().token
    }

    fn set(&self, token: &str) {
        self.update(|s| s.token = Some(token.to_string()));
    }

    fn clear(&self) {
        self.update(|s| s.token = None);
    }

    fn cached_profile(&self) -> Option<UserProfile> {
        self.read().user
    }

    fn set_cached_profile(&self, profile: &UserProfile) {
        self.update(|s| s.user = Some(profile.clone()));
    }

    fn clear_cached_profile(&self) {
        self.update(|s| s.user = None);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Durable store
// ─────────────────────────────────────────────────────────────────────────────

/// JSON-file-backed store that survives restarts.
///
/// The in-memory copy is authoritative within the process; each mutation is
/// written through to disk. Persistence failures are logged, not surfaced.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    inner: RwLock<StoredSession>,
}

impl FileTokenStore {
    /// Open the store at `path`, loading any previously persisted session.
    ///
    /// A missing file is an empty session; an unreadable one is logged and
    /// treated as empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let session = match load(&path) {
            Ok(session) => session,
            Err(err) => {
                tracing::error!("failed to load session file {}: {err}", path.display());
                StoredSession::default()
            }
        };

        Self {
            path,
            inner: RwLock::new(session),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The write lock is held until the file is replaced, so the disk always
    /// ends up with the last in-memory state.
    fn update(&self, f: impl FnOnce(&mut StoredSession)) {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard);

        if let Err(err) = persist(&self.path, &guard) {
            tracing::error!("failed to persist session file {}: {err}", self.path.display());
        }
    }

    fn read(&self) -> StoredSession {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

fn load(path: &Path) -> Result<StoredSession, TokenStoreError> {
    match std::fs::read(path) {
        Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(StoredSession::default()),
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(StoredSession::default()),
        Err(err) => Err(err.into()),
    }
}

fn persist(path: &Path, session: &StoredSession) -> Result<(), TokenStoreError> {
    if session == &StoredSession::default() {
        return match std::fs::remove_file(path) {
            Err(err) if err.kind() != std::io::ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        };
    }

    let parent = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            std::fs::create_dir_all(parent)?;
            parent
        }
        None => Path::new("."),
    };

    // Write-then-rename through a uniquely named sibling: readers never
    // observe a partially written file.
    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    serde_json::to_writer_pretty(&mut tmp, session)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Option<String> {
        self.read().token
    }

    fn set(&self, token: &str) {
        self.update(|s| s.token = Some(token.to_string()));
    }

    fn clear(&self) {
        self.update(|s| s.token = None);
    }

    fn cached_profile(&self) -> Option<UserProfile> {
        self.read().user
    }

    fn set_cached_profile(&self, profile: &UserProfile) {
        self.update(|s| s.user = Some(profile.clone()));
    }

    fn clear_cached_profile(&self) {
        self.update(|s| s.user = None);
    }
}
