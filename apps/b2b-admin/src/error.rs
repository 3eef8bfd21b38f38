//! CLI error types and exit codes

use b2b_directory::DirectoryError;
use thiserror::Error;

/// Exit status for every failed run.
pub const EXIT_FAILURE: i32 = 1;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Directory request failed: {0}")]
    Directory(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("User '{candidate}' already exists in the directory (matched mail '{existing_mail}')")]
    DuplicateUser {
        candidate: String,
        existing_mail: String,
    },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        EXIT_FAILURE
    }

    /// Print the error to stderr with appropriate formatting
    pub fn print(&self) {
        let use_color = std::env::var("NO_COLOR").is_err();

        if use_color {
            eprintln!("\x1b[31mError:\x1b[0m {}", self);
        } else {
            eprintln!("Error: {}", self);
        }

        if let Some(suggestion) = self.suggestion() {
            if use_color {
                eprintln!("\n\x1b[33mSuggestion:\x1b[0m {}", suggestion);
            } else {
                eprintln!("\nSuggestion: {}", suggestion);
            }
        }
    }

    /// Get a suggested action for this error
    fn suggestion(&self) -> Option<&'static str> {
        match self {
            CliError::AuthenticationFailed(_) => Some(
                "Check --tenant-id, --client-id and --client-secret (or B2B_TENANT_ID, B2B_CLIENT_ID, B2B_CLIENT_SECRET).",
            ),
            CliError::PermissionDenied(_) => Some(
                "Grant the app registration the Graph application permissions logged at connect time and give admin consent.",
            ),
            CliError::DuplicateUser { .. } => Some(
                "Remove existing users from the input file, or rerun with --on-duplicate continue.",
            ),
            _ => None,
        }
    }
}

impl From<DirectoryError> for CliError {
    fn from(e: DirectoryError) -> Self {
        match e {
            DirectoryError::Config(msg) => CliError::Config(msg),
            DirectoryError::Auth(msg) => CliError::AuthenticationFailed(msg),
            DirectoryError::PermissionDenied(msg) => CliError::PermissionDenied(msg),
            DirectoryError::NotFound(msg) => CliError::NotFound(msg),
            other => CliError::Directory(other.to_string()),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Io(format!("JSON error: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_error_exits_one() {
        let errors = [
            CliError::Config("x".to_string()),
            CliError::AuthenticationFailed("x".to_string()),
            CliError::Directory("x".to_string()),
            CliError::Validation("x".to_string()),
            CliError::DuplicateUser {
                candidate: "a@b.com".to_string(),
                existing_mail: "a@b.com".to_string(),
            },
        ];
        for error in errors {
            assert_eq!(error.exit_code(), 1, "{error}");
        }
    }

    #[test]
    fn test_directory_auth_maps_to_authentication_failed() {
        let err: CliError = DirectoryError::Auth("bad secret".to_string()).into();
        assert!(matches!(err, CliError::AuthenticationFailed(_)));
        assert!(err.suggestion().is_some());
    }

    #[test]
    fn test_graph_error_maps_to_directory() {
        let err: CliError = DirectoryError::GraphApi {
            status: 503,
            code: "ServiceUnavailable".to_string(),
            message: "try later".to_string(),
        }
        .into();
        match err {
            CliError::Directory(msg) => assert!(msg.contains("ServiceUnavailable")),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_user_display() {
        let err = CliError::DuplicateUser {
            candidate: "jane@acme.com".to_string(),
            existing_mail: "jane@acme.com".to_string(),
        };
        assert!(err.to_string().contains("already exists"));
    }
}
