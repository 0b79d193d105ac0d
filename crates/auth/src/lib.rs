//! `resourcehub-auth`: pure authorization boundary for the resource hub.
//!
//! Holds the static role table, credential shape checks and the
//! authorization decision. No HTTP, no storage.

pub mod authorize;
pub mod credentials;
pub mod permissions;
pub mod roles;

pub use authorize::{
    AuthorizationExplanation, AuthorizationRequest, Decision, DenialKind, effective_role,
    evaluate, explain,
};
pub use credentials::{MIN_PASSWORD_LEN, is_valid_email, is_valid_password, validate_credentials};
pub use permissions::{Permission, RolePermissions};
pub use roles::{Role, UnknownRole};
