//! # Client Error Types
//!
//! Error taxonomy for backend calls. Status codes collapse into typed
//! variants so callers match on meaning, not numbers:
//!
//! - `NotFound` is *expected* during exact-match search and falls through
//!   to the next strategy
//! - `Unauthorized` invalidates the session (handled by the embedding shell)
//! - transport errors are retried once before surfacing

use thiserror::Error;

/// Client error type.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed (connect, timeout, TLS, decode).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body didn't match the contract.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Bearer token missing, expired, or revoked.
    #[error("Authentication required")]
    Unauthorized,

    /// Authenticated but not allowed.
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Backend rejected the request payload.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Backend-side failure (5xx or envelope-level failure).
    #[error("Server error: {0}")]
    Server(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// True for the one error the search chain treats as a soft miss.
    #[inline]
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound(_))
    }

    /// Best user-facing message for this error.
    ///
    /// Backend-provided text is surfaced verbatim; transport noise gets a
    /// generic fallback.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Validation(msg) | ClientError::Server(msg) | ClientError::Forbidden(msg)
                if !msg.is_empty() =>
            {
                msg.clone()
            }
            ClientError::Unauthorized => "Session expired. Please sign in again.".to_string(),
            ClientError::NotFound(msg) if !msg.is_empty() => msg.clone(),
            _ => "Something went wrong. Please try again.".to_string(),
        }
    }
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_detection() {
        assert!(ClientError::NotFound("Variant not found".to_string()).is_not_found());
        assert!(!ClientError::Unauthorized.is_not_found());
    }

    #[test]
    fn test_user_message_prefers_backend_text() {
        let err = ClientError::Validation("Insufficient stock for DJ-001".to_string());
        assert_eq!(err.user_message(), "Insufficient stock for DJ-001");

        let err = ClientError::Server(String::new());
        assert_eq!(err.user_message(), "Something went wrong. Please try again.");
    }
}
