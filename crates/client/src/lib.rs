//! `resourcehub-client`: session, authorization and resource access for the
//! resource-hub REST backend.
//!
//! [`ResourceHub`] wires the pieces together; each service can also be built
//! directly from an [`ApiClient`].

pub mod config;
pub mod departments;
pub mod gateway;
pub mod guard;
pub mod hub;
pub mod loader;
pub mod resources;
pub mod saved_folders;
pub mod session;
pub mod token_store;
pub mod transport;
pub mod upload;

pub use config::ClientConfig;
pub use departments::DepartmentService;
pub use gateway::{AuthGateway, AuthPayload};
pub use guard::AuthorizationGuard;
pub use hub::ResourceHub;
pub use loader::{FolderLoader, FolderPage, LoadOutcome};
pub use resources::{
    ListOptions, NewRecord, RecordUpdate, ResourcePage, ResourceService, SortOrder,
    apply_document_filter,
};
pub use saved_folders::{SaveOutcome, SaveStatus, SavedFolderRegistry};
pub use session::{SessionCell, SessionContext, SessionSnapshot, SessionState};
pub use token_store::{FileTokenStore, MemoryTokenStore, StoredSession, TokenStore, TokenStoreError};
pub use transport::ApiClient;
pub use upload::{UploadRequest, UploadService};

pub use resourcehub_auth::{AuthorizationRequest, Decision, DenialKind, Role};
pub use resourcehub_core::{
    ClientError, ClientResult, Department, DepartmentId, DocumentType, NewSavedFolder, RecordId,
    ResourceKind, ResourceRecord, SavedFolder, SavedFolderId, UserProfile,
};
