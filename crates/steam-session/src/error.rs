//! Authentication error types.
//!
//! Public session operations collapse every failure to "no session"; these
//! errors exist so the reason can be logged before it is collapsed.

use thiserror::Error;

/// Authentication error type.
#[derive(Error, Debug)]
pub enum AuthError {
    /// No session token is stored
    #[error("Not logged in")]
    NotLoggedIn,

    /// The endpoint answered with a non-success HTTP status
    #[error("Rejected by server: HTTP {status} ({body_summary})")]
    Rejected { status: u16, body_summary: String },

    /// The provider callback exchange did not produce a session
    #[error("Callback rejected: {0}")]
    CallbackRejected(String),

    /// The Auth Endpoint reported the token as no longer valid
    #[error("Session invalid: {0}")]
    SessionInvalid(String),

    /// A success response was missing required fields
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The host could not navigate to the provider
    #[error("Navigation failed: {0}")]
    Navigation(String),

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(#[from] hub_storage::StorageError),

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parse error
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl AuthError {
    /// Returns true if the failure looks transient (connectivity, timeout,
    /// 5xx). Only used to enrich logs; nothing in the session core retries.
    pub fn is_transient(&self) -> bool {
        match self {
            AuthError::Rejected { status, .. } => *status >= 500,
            AuthError::Http(e) => {
                if e.is_connect() || e.is_timeout() {
                    return true;
                }
                e.status().is_some_and(|status| status.is_server_error())
            }
            _ => false,
        }
    }
}

/// Result type alias using AuthError.
pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_transient_server_error() {
        let err = AuthError::Rejected {
            status: 503,
            body_summary: "len=0".to_string(),
        };
        assert!(err.is_transient());
    }

    #[test]
    fn test_is_not_transient_unauthorized() {
        let err = AuthError::Rejected {
            status: 401,
            body_summary: "len=25".to_string(),
        };
        assert!(!err.is_transient());
    }

    #[test]
    fn test_is_not_transient_session_invalid() {
        assert!(!AuthError::SessionInvalid("expired".to_string()).is_transient());
        assert!(!AuthError::NotLoggedIn.is_transient());
        assert!(!AuthError::CallbackRejected("success=false".to_string()).is_transient());
    }

    #[test]
    fn test_display_includes_status() {
        let err = AuthError::Rejected {
            status: 401,
            body_summary: "len=3".to_string(),
        };
        assert_eq!(err.to_string(), "Rejected by server: HTTP 401 (len=3)");
    }
}
