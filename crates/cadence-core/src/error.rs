//! Error types for meeting session operations.

use std::path::PathBuf;

use thiserror::Error;

/// Comprehensive error type for all session operations.
///
/// Nothing here is fatal to the process: the front-end reports the error and
/// the in-memory session stays as it was before the rejected operation.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    Validation { field: String, reason: String },
    /// Malformed or mismatching import documents
    #[error("Import failed: {message}")]
    Import { message: String },
    /// A participant attempted a facilitator-only action
    #[error("Not permitted: {action} is only available to the facilitator")]
    PermissionDenied { action: String },
    /// The command does not apply to the current state
    #[error("Cannot {action} while {state}")]
    InvalidTransition { action: String, state: String },
    /// A destructive operation was requested without confirmation
    #[error("Confirmation required: {action}")]
    ConfirmationRequired { action: String },
    /// Store connection or query errors
    #[error("Storage error: {message}")]
    Storage {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// The store refused the operation (quota exceeded, unavailable)
    #[error("Storage unavailable: {message}")]
    StorageUnavailable { message: String },
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Builder for creating input validation errors.
pub struct ValidationErrorBuilder {
    field: String,
}

impl ValidationErrorBuilder {
    /// Create a new validation error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> SessionError {
        SessionError::Validation {
            field: self.field,
            reason: reason.into(),
        }
    }
}

/// Builder for creating storage errors with context.
pub struct StorageErrorBuilder {
    message: String,
}

impl StorageErrorBuilder {
    /// Create a new storage error builder with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source(self, source: rusqlite::Error) -> SessionError {
        SessionError::Storage {
            message: self.message,
            source,
        }
    }
}

impl SessionError {
    /// Creates a builder for input validation errors.
    pub fn validation(field: impl Into<String>) -> ValidationErrorBuilder {
        ValidationErrorBuilder::new(field)
    }

    /// Creates a builder for storage errors.
    pub fn storage(message: impl Into<String>) -> StorageErrorBuilder {
        StorageErrorBuilder::new(message)
    }

    /// Creates an import error.
    pub fn import(message: impl Into<String>) -> Self {
        SessionError::Import {
            message: message.into(),
        }
    }

    /// Creates a permission error for a facilitator-only action.
    pub fn permission_denied(action: impl Into<String>) -> Self {
        SessionError::PermissionDenied {
            action: action.into(),
        }
    }

    /// Creates an invalid transition error.
    pub fn invalid_transition(action: impl Into<String>, state: impl Into<String>) -> Self {
        SessionError::InvalidTransition {
            action: action.into(),
            state: state.into(),
        }
    }

    /// Whether this error came from the backing store.
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            SessionError::Storage { .. } | SessionError::StorageUnavailable { .. }
        )
    }
}

/// Specialized extension trait for store-related Results.
pub trait StorageResultExt<T> {
    /// Map store errors with a message.
    fn storage_context(self, message: &str) -> Result<T>;
}

impl<T> StorageResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn storage_context(self, message: &str) -> Result<T> {
        self.map_err(|e| SessionError::storage(message).with_source(e))
    }
}

/// Result type alias for session operations
pub type Result<T> = std::result::Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_builder() {
        let err = SessionError::validation("title").with_reason("Title cannot be empty");
        assert_eq!(
            err.to_string(),
            "Invalid input for field 'title': Title cannot be empty"
        );
    }

    #[test]
    fn test_permission_denied_message() {
        let err = SessionError::permission_denied("start timer");
        assert!(err.to_string().contains("start timer"));
        assert!(err.to_string().contains("facilitator"));
    }

    #[test]
    fn test_storage_context() {
        let result: std::result::Result<(), rusqlite::Error> =
            Err(rusqlite::Error::QueryReturnedNoRows);
        let err = result.storage_context("Failed to read key").unwrap_err();
        assert!(err.is_storage());
        assert!(err.to_string().contains("Failed to read key"));
    }
}
