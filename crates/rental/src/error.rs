//! Error types for the rental client.
//!
//! This module defines all error types used throughout the crate, providing
//! detailed context for debugging and messages that can be shown to users.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for rental client operations.
#[derive(Error, Debug)]
pub enum Error {
    // === API Errors ===
    /// The backend rejected the request.
    #[error("API request failed ({status}){}", detail(.message))]
    Api {
        /// HTTP status code returned by the backend.
        status: u16,
        /// Response body, or a description when the body was empty.
        message: String,
    },

    /// The HTTP request could not be sent or its response read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered 401; the stored token has been discarded.
    #[error("not authenticated: please log in")]
    Unauthorized,

    // === Session Errors ===
    /// The current user may not open this page.
    #[error("access denied: {route} requires {required}")]
    Forbidden {
        /// Path of the page that was refused.
        route: String,
        /// Human-readable description of the required access.
        required: String,
    },

    /// A bearer token could not be decoded.
    #[error("invalid token: {message}")]
    TokenDecode {
        /// Description of what went wrong.
        message: String,
    },

    /// The stored bearer token has expired.
    #[error("session expired: please log in again")]
    SessionExpired,

    // === Validation Errors ===
    /// User input failed client-side validation.
    #[error("invalid {field}: {message}")]
    Validation {
        /// Name of the offending field.
        field: String,
        /// Description of the problem.
        message: String,
    },

    /// An action is not allowed in the record's current state.
    #[error("{0}")]
    NotAllowed(String),

    /// A page could not load its data.
    #[error("{message}")]
    PageLoad {
        /// What the user is told.
        message: String,
        /// The failure behind it.
        #[source]
        source: Box<Error>,
    },

    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

fn detail(message: &str) -> String {
    if message.trim().is_empty() {
        String::new()
    } else {
        format!(": {message}")
    }
}

/// A specialized Result type for rental client operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create an API error from a status code and response body.
    #[must_use]
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a validation error for a form field.
    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a token decoding error.
    #[must_use]
    pub fn token_decode(message: impl Into<String>) -> Self {
        Self::TokenDecode {
            message: message.into(),
        }
    }

    /// Create a "not allowed in this state" error.
    #[must_use]
    pub fn not_allowed(message: impl Into<String>) -> Self {
        Self::NotAllowed(message.into())
    }

    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Replace a page-load failure with a message for the user, keeping the
    /// backend's own text when it sent one. Login and permission errors are
    /// returned unchanged so callers can still redirect on them.
    #[must_use]
    pub fn page_load(self, fallback: &str) -> Self {
        if self.is_unauthorized() || self.is_forbidden() {
            return self;
        }
        Self::PageLoad {
            message: self.user_message(fallback),
            source: Box::new(self),
        }
    }

    /// Check if this error means the user must log in (again).
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized | Self::SessionExpired)
    }

    /// Check if this error is an access-control refusal.
    #[must_use]
    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::Forbidden { .. } | Self::Api { status: 403, .. })
    }

    /// Check if the backend reported the resource as missing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }

    /// The message to show a user for a failed action.
    ///
    /// Backend error bodies are shown verbatim when present; otherwise the
    /// given fallback is used.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Api { message, .. } if !message.trim().is_empty() => message.clone(),
            Self::Validation { message, .. } => message.clone(),
            Self::NotAllowed(message) | Self::PageLoad { message, .. } => message.clone(),
            Self::Unauthorized | Self::SessionExpired | Self::Forbidden { .. } => self.to_string(),
            _ => fallback.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = Error::api(400, "Vehicle is not available");
        assert_eq!(
            err.to_string(),
            "API request failed (400): Vehicle is not available"
        );
    }

    #[test]
    fn test_api_error_display_without_body() {
        assert_eq!(Error::api(502, "").to_string(), "API request failed (502)");
    }

    #[test]
    fn test_unauthorized_predicates() {
        assert!(Error::Unauthorized.is_unauthorized());
        assert!(Error::SessionExpired.is_unauthorized());
        assert!(!Error::api(500, "boom").is_unauthorized());
    }

    #[test]
    fn test_forbidden_predicates() {
        let err = Error::Forbidden {
            route: "/admin/users".to_string(),
            required: "Administrator".to_string(),
        };
        assert!(err.is_forbidden());
        assert!(Error::api(403, "").is_forbidden());
        assert!(!Error::api(404, "").is_forbidden());
    }

    #[test]
    fn test_page_load_keeps_backend_text() {
        let err = Error::api(500, "").page_load("Failed to fetch users. Please try again.");
        assert_eq!(err.to_string(), "Failed to fetch users. Please try again.");
        assert!(std::error::Error::source(&err).is_some());

        let err = Error::api(400, "Bad page size").page_load("Failed");
        assert_eq!(err.user_message("other"), "Bad page size");

        assert!(Error::Unauthorized.page_load("Failed").is_unauthorized());
    }

    #[test]
    fn test_not_found() {
        assert!(Error::api(404, "Vehicle not found").is_not_found());
        assert!(!Error::Unauthorized.is_not_found());
    }

    #[test]
    fn test_user_message_prefers_backend_body() {
        let err = Error::api(400, "Email already registered");
        assert_eq!(
            err.user_message("Registration failed. Please try again."),
            "Email already registered"
        );
    }

    #[test]
    fn test_user_message_falls_back_on_empty_body() {
        let err = Error::api(500, "  ");
        assert_eq!(
            err.user_message("Login failed. Please try again."),
            "Login failed. Please try again."
        );
        let err = Error::internal("oops");
        assert_eq!(err.user_message("fallback"), "fallback");
    }

    #[test]
    fn test_validation_error_display() {
        let err = Error::validation("email", "Email is invalid");
        assert_eq!(err.to_string(), "invalid email: Email is invalid");
        assert_eq!(err.user_message("x"), "Email is invalid");
    }

    #[test]
    fn test_token_decode_display() {
        let err = Error::token_decode("expected three segments");
        assert!(err.to_string().contains("three segments"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_from_rusqlite_error() {
        let result = rusqlite::Connection::open_with_flags(
            "/nonexistent/path/db.sqlite",
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        );
        if let Err(sqlite_err) = result {
            let err: Error = sqlite_err.into();
            assert!(matches!(err, Error::DatabaseQuery(_)));
        }
    }

    #[test]
    fn test_database_migration_error_display() {
        let err = Error::DatabaseMigration {
            message: "version mismatch".to_string(),
        };
        assert!(err.to_string().contains("version mismatch"));
    }

    #[test]
    fn test_directory_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden"));
    }
}
