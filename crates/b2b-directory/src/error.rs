//! Error types for the directory client.

use thiserror::Error;

/// Result type alias using `DirectoryError`.
pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Errors that can occur when talking to the directory service.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// Configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// `OAuth2` authentication error.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Microsoft Graph API error.
    #[error("Graph API error ({status}): {code} - {message}")]
    GraphApi {
        status: u16,
        code: String,
        message: String,
    },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// A directory object could not be mapped.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Resource not found.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The application lacks the Graph permissions for the call.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
}

impl DirectoryError {
    /// Returns true if the service rejected an add because the reference is already present.
    ///
    /// Graph answers a duplicate `members/$ref` with a 400 whose message reads
    /// "One or more added object references already exist".
    #[must_use]
    pub fn is_already_exists(&self) -> bool {
        match self {
            DirectoryError::GraphApi {
                status, message, ..
            } => *status == 400 && message.to_lowercase().contains("already exist"),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_already_exists_detection() {
        let err = DirectoryError::GraphApi {
            status: 400,
            code: "Request_BadRequest".to_string(),
            message: "One or more added object references already exist for the following modified properties: 'members'.".to_string(),
        };
        assert!(err.is_already_exists());
    }

    #[test]
    fn test_already_exists_requires_bad_request() {
        let err = DirectoryError::GraphApi {
            status: 500,
            code: "InternalServerError".to_string(),
            message: "already exist".to_string(),
        };
        assert!(!err.is_already_exists());
        assert!(!DirectoryError::NotFound("group".to_string()).is_already_exists());
    }

    #[test]
    fn test_graph_error_display() {
        let err = DirectoryError::GraphApi {
            status: 404,
            code: "Request_ResourceNotFound".to_string(),
            message: "Resource 'abc' does not exist".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Graph API error (404): Request_ResourceNotFound - Resource 'abc' does not exist"
        );
    }
}
