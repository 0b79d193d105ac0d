//! Client configuration (environment-driven).

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api/v1";

pub const ENV_API_URL: &str = "RESOURCE_HUB_API_URL";
pub const ENV_STORAGE: &str = "RESOURCE_HUB_STORAGE";
pub const ENV_TIMEOUT_SECS: &str = "RESOURCE_HUB_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base URL, without trailing slash.
    pub api_url: String,
    /// Location of the durable session file.
    pub storage_path: PathBuf,
    /// Per-request timeout. `None` leaves requests unbounded.
    pub request_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            storage_path: default_storage_path(),
            request_timeout: None,
        }
    }
}

impl ClientConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            config = config.with_api_url(url);
        }

        if let Some(path) = lookup(ENV_STORAGE).filter(|v| !v.trim().is_empty()) {
            config.storage_path = PathBuf::from(path);
        }

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            match raw.trim().parse::<u64>() {
                Ok(0) => {}
                Ok(secs) => config.request_timeout = Some(Duration::from_secs(secs)),
                Err(_) => {
                    tracing::warn!("{ENV_TIMEOUT_SECS}={raw:?} is not a number of seconds; ignoring");
                }
            }
        }

        config
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.api_url = url.trim().trim_end_matches('/').to_string();
        self
    }

    pub fn with_storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_path = path.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }
}

/// `<data dir>/resource-hub/session.json`, or a project-local fallback when
/// the platform has no data directory.
pub fn default_storage_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("resource-hub"))
        .unwrap_or_else(|| PathBuf::from(".resource-hub"))
        .join("session.json")
}
