//! Error types for the panpath library.

use thiserror::Error;

/// Main error type for panpath operations.
#[derive(Error, Debug)]
pub enum PanError {
    /// A path segment or the final target does not exist.
    #[error("Path not found: {0}")]
    NotFound(String),

    /// The parent of a folder being created does not exist.
    #[error("Parent directory not found: {0}")]
    ParentNotFound(String),

    /// The path resolved to a file where a folder was required.
    #[error("Not a folder: {0}")]
    NotAFolder(String),

    /// No username/password was supplied and none is stored in the settings.
    #[error("Username or password not provided")]
    CredentialsMissing,

    /// The configured `default-path` does not name a folder.
    #[error("Invalid default path: {0}")]
    InvalidDefaultRoot(String),

    /// An entry vanished from its parent listing between two steps of one operation.
    #[error("Stale listing: entry {id} no longer listed under {path}")]
    StaleListing { path: String, id: u64 },

    /// The remote API answered with a non-success code.
    #[error("API error: {code} - {message}")]
    Api { code: i64, message: String },

    /// Local file access failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Network request error.
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid or unexpected response from server.
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    /// A remote call did not finish within the configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// The session actor is no longer running.
    #[error("Session actor stopped")]
    SessionClosed,
}

impl PanError {
    /// Stable category name, for callers that branch on the kind of failure.
    pub fn kind(&self) -> &'static str {
        match self {
            PanError::NotFound(_) => "not_found",
            PanError::ParentNotFound(_) => "parent_not_found",
            PanError::NotAFolder(_) => "not_a_folder",
            PanError::CredentialsMissing => "credentials_missing",
            PanError::InvalidDefaultRoot(_) => "invalid_default_root",
            PanError::StaleListing { .. } => "stale_listing",
            PanError::Api { .. } => "remote_api",
            PanError::Io(_) => "io",
            PanError::Request(_) | PanError::Timeout => "transport",
            PanError::Json(_) | PanError::InvalidResponse(_) => "invalid_response",
            PanError::SessionClosed => "session_closed",
        }
    }

    /// Whether this error reports a missing path.
    pub fn is_not_found(&self) -> bool {
        matches!(self, PanError::NotFound(_))
    }
}

/// Result type alias for panpath operations.
pub type Result<T> = std::result::Result<T, PanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(PanError::NotFound("/a".into()).kind(), "not_found");
        assert_eq!(PanError::ParentNotFound("/a".into()).kind(), "parent_not_found");
        assert_eq!(PanError::NotAFolder("/a".into()).kind(), "not_a_folder");
        assert_eq!(PanError::CredentialsMissing.kind(), "credentials_missing");
        assert_eq!(
            PanError::Api {
                code: 1,
                message: "nope".into(),
            }
            .kind(),
            "remote_api"
        );
        assert_eq!(PanError::Timeout.kind(), "transport");
    }

    #[test]
    fn test_error_messages() {
        let err = PanError::Api {
            code: 5060,
            message: "duplicate".into(),
        };
        assert_eq!(err.to_string(), "API error: 5060 - duplicate");
        assert_eq!(
            PanError::NotFound("/missing/file".into()).to_string(),
            "Path not found: /missing/file"
        );
        assert!(PanError::NotFound("/x".into()).is_not_found());
        assert!(!PanError::CredentialsMissing.is_not_found());
    }
}
