//! Client error model.

use serde::Serialize;
use thiserror::Error;

/// Result type used across the client layers.
pub type ClientResult<T> = Result<T, ClientError>;

/// A single rejected input field, reported before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Client-level error.
///
/// Every variant carries a message suitable for direct display. The client
/// only classifies and annotates failures; presenting them is up to the caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Input rejected client-side; the request never reached the network.
    #[error("{message}")]
    Validation {
        message: String,
        fields: Vec<FieldError>,
    },

    /// The backend rejected credentials or the caller's authorization.
    #[error("{message}")]
    Auth { status: u16, message: String },

    /// No response was received.
    #[error("{message}")]
    Network { message: String, detail: String },

    /// A response arrived but reported failure (`success: false` or non-2xx).
    #[error("{message}")]
    Fetch {
        status: Option<u16>,
        message: String,
    },

    /// The requested record does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Anything that fits no other category (malformed bodies and the like).
    #[error("{0}")]
    Unknown(String),
}

impl ClientError {
    /// Build a validation error; the display message joins the field messages.
    pub fn validation(fields: Vec<FieldError>) -> Self {
        let message = fields
            .iter()
            .map(|f| f.message.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        Self::Validation { message, fields }
    }

    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::validation(vec![FieldError::new(field, message)])
    }

    pub fn auth(status: u16, message: impl Into<String>) -> Self {
        Self::Auth {
            status,
            message: message.into(),
        }
    }

    pub fn network(detail: impl Into<String>) -> Self {
        Self::Network {
            message: "Network error. Please check your connection.".to_string(),
            detail: detail.into(),
        }
    }

    pub fn fetch(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Fetch {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::Unknown(message.into())
    }

    /// Human-readable message for direct display.
    pub fn message(&self) -> &str {
        match self {
            Self::Validation { message, .. }
            | Self::Auth { message, .. }
            | Self::Network { message, .. }
            | Self::Fetch { message, .. } => message,
            Self::NotFound(message) | Self::Unknown(message) => message,
        }
    }

    /// HTTP status associated with the failure, when a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Auth { status, .. } => Some(*status),
            Self::Fetch { status, .. } => *status,
            Self::NotFound(_) => Some(404),
            _ => None,
        }
    }

    /// Stable machine-readable code for the error category.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::Auth { .. } => "AUTH_ERROR",
            Self::Network { .. } => "NETWORK_ERROR",
            Self::Fetch { .. } => "FETCH_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Unknown(_) => "UNKNOWN_ERROR",
        }
    }

    /// Per-field detail for validation failures; empty otherwise.
    pub fn fields(&self) -> &[FieldError] {
        match self {
            Self::Validation { fields, .. } => fields,
            _ => &[],
        }
    }

    /// A rejected bearer token: the session should be treated as ended.
    pub fn is_session_invalid(&self) -> bool {
        matches!(self, Self::Auth { status: 401, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_joins_field_messages() {
        let err = ClientError::validation(vec![
            FieldError::new("email", "Please enter a valid email address"),
            FieldError::new("password", "Password must be at least 6 characters"),
        ]);

        assert_eq!(
            err.message(),
            "Please enter a valid email address, Password must be at least 6 characters"
        );
        assert_eq!(err.fields().len(), 2);
        assert_eq!(err.code(), "VALIDATION_ERROR");
        assert_eq!(err.status(), None);
    }

    #[test]
    fn network_error_hides_transport_detail_from_message() {
        let err = ClientError::network("connection refused (os error 111)");
        assert_eq!(err.message(), "Network error. Please check your connection.");
        assert_eq!(err.to_string(), err.message());
    }

    #[test]
    fn only_401_auth_errors_invalidate_the_session() {
        assert!(ClientError::auth(401, "expired").is_session_invalid());
        assert!(!ClientError::auth(403, "forbidden").is_session_invalid());
        assert!(!ClientError::fetch(Some(401), "odd").is_session_invalid());
    }

    #[test]
    fn not_found_reports_404() {
        assert_eq!(ClientError::not_found("Project not found").status(), Some(404));
    }
}
