//! Wiring: one token store, one session cell and one HTTP client shared by
//! every service.

use std::sync::Arc;

use resourcehub_core::{ClientResult, ResourceKind};

use crate::config::ClientConfig;
use crate::departments::DepartmentService;
use crate::gateway::AuthGateway;
use crate::guard::AuthorizationGuard;
use crate::loader::FolderLoader;
use crate::resources::ResourceService;
use crate::saved_folders::SavedFolderRegistry;
use crate::session::{SessionCell, SessionContext};
use crate::token_store::{FileTokenStore, TokenStore};
use crate::transport::ApiClient;
use crate::upload::UploadService;

#[derive(Debug, Clone)]
pub struct ResourceHub {
    config: ClientConfig,
    api: ApiClient,
    session: SessionContext,
    guard: AuthorizationGuard,
    loader: FolderLoader,
}

impl ResourceHub {
    /// Hub persisting its session at `config.storage_path`.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let tokens = Arc::new(FileTokenStore::open(config.storage_path.clone()));
        Self::with_token_store(config, tokens)
    }

    pub fn with_token_store(config: ClientConfig, tokens: Arc<dyn TokenStore>) -> ClientResult<Self> {
        let api = ApiClient::new(&config, tokens, SessionCell::default())?;
        let session = SessionContext::new(AuthGateway::new(api.clone()));
        let guard = AuthorizationGuard::new(session.clone());
        let loader = FolderLoader::new(api.clone());

        tracing::debug!(api_url = %api.base_url(), "resource hub ready");
        Ok(Self {
            config,
            api,
            session,
            guard,
            loader,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn guard(&self) -> &AuthorizationGuard {
        &self.guard
    }

    pub fn resources(&self, kind: ResourceKind) -> ResourceService {
        ResourceService::new(kind, self.api.clone())
    }

    pub fn departments(&self) -> DepartmentService {
        DepartmentService::new(self.api.clone())
    }

    pub fn uploads(&self) -> UploadService {
        UploadService::new(self.api.clone())
    }

    pub fn saved_folders(&self) -> SavedFolderRegistry {
        SavedFolderRegistry::new(self.api.clone())
    }

    pub fn folder_loader(&self) -> &FolderLoader {
        &self.loader
    }
}
