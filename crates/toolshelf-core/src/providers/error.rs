//! Collaborator error types

use thiserror::Error;

/// Errors that can occur while talking to the catalog, settings or memory backends
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Network/HTTP failure from reqwest
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Transport failure reported by a non-reqwest transport
    #[error("{0}")]
    Transport(String),

    /// Backend answered with a non-success status
    #[error("Backend error ({status}): {}", .message.as_deref().unwrap_or("no details"))]
    Api {
        status: u16,
        message: Option<String>,
    },

    /// Success status but the body was not the expected JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A configured base URL cannot carry path segments
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ProviderError {
    /// Create a backend error
    pub fn api(status: u16, message: Option<String>) -> Self {
        Self::Api { status, message }
    }

    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Whether the request never got a response
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Transport(_))
    }

    /// Backend status code, if the backend answered
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Text to show the user
    ///
    /// Backend failures use their structured message and fall back to
    /// `fallback` when there is none. Everything else uses the error text.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Api {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            Self::Api { .. } => fallback.to_string(),
            Self::Transport(message) | Self::Other(message) => message.clone(),
            other => other.to_string(),
        }
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_backend_text() {
        let err = ProviderError::api(503, Some("Registry offline".to_string()));
        assert_eq!(err.user_message("Failed to fetch registry"), "Registry offline");
        assert_eq!(err.status(), Some(503));
        assert!(!err.is_transport());
    }

    #[test]
    fn test_user_message_fallback() {
        let err = ProviderError::api(500, None);
        assert_eq!(err.user_message("Failed to fetch registry"), "Failed to fetch registry");

        let blank = ProviderError::api(500, Some("  ".to_string()));
        assert_eq!(blank.user_message("Failed to fetch registry"), "Failed to fetch registry");
    }

    #[test]
    fn test_transport_message() {
        let err = ProviderError::transport("connection refused");
        assert!(err.is_transport());
        assert_eq!(err.status(), None);
        assert_eq!(err.user_message("unused"), "connection refused");
    }

    #[test]
    fn test_display() {
        let err = ProviderError::api(404, None);
        assert_eq!(err.to_string(), "Backend error (404): no details");
    }
}
