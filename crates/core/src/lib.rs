//! `resourcehub-core`: shared client-side building blocks.
//!
//! This crate contains the wire records exchanged with the resource-hub
//! backend, strongly-typed identifiers and the client error taxonomy. It does
//! no IO.

pub mod envelope;
pub mod error;
pub mod id;
pub mod kind;
pub mod model;

pub use envelope::{Envelope, Pagination};
pub use error::{ClientError, ClientResult, FieldError};
pub use id::{DepartmentId, RecordId, SavedFolderId, UserId};
pub use kind::{DocumentType, ResourceKind};
pub use model::{
    Department, DepartmentRef, NewSavedFolder, ResourceRecord, SavedFolder, UserProfile,
};
