//! Client error types

use serde_json::Value;
use shared::response::EnvelopeError;
use thiserror::Error;

use crate::config::ConfigError;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend returned a structured error body
    #[error("API error ({status}): {message}")]
    Api {
        status: u16,
        code: Option<Value>,
        message: String,
        details: Option<Value>,
    },

    /// Authentication required
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Permission denied
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Response envelope could not be unwrapped
    #[error("Invalid envelope: {0}")]
    Envelope(#[from] EnvelopeError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Operation not allowed in the current UI state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Operation abandoned because its owner went away
    #[error("Operation cancelled")]
    Cancelled,

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ClientError {
    /// Message suitable for a toast: the backend's own message when it sent
    /// one, otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ClientError::Api { message, .. } if !message.trim().is_empty() => message.clone(),
            ClientError::Validation(message) if !message.trim().is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }

    /// Whether this error came from the backend rejecting the request
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            ClientError::Api { .. }
                | ClientError::Unauthorized(_)
                | ClientError::Forbidden(_)
                | ClientError::NotFound(_)
                | ClientError::Validation(_)
        )
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_backend_text() {
        let err = ClientError::Api {
            status: 409,
            code: None,
            message: "Department name already exists".into(),
            details: None,
        };
        assert_eq!(err.user_message("Update failed"), "Department name already exists");
    }

    #[test]
    fn test_user_message_falls_back() {
        assert_eq!(ClientError::Cancelled.user_message("Update failed"), "Update failed");
        let blank = ClientError::Validation("  ".into());
        assert_eq!(blank.user_message("Update failed"), "Update failed");
    }

    #[test]
    fn test_rejection_classification() {
        assert!(ClientError::NotFound("x".into()).is_rejection());
        assert!(!ClientError::Internal("x".into()).is_rejection());
    }
}
