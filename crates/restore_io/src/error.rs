//! Error types for restore_io crate.
//!
//! Covers decoding backup files, the backup directory and JSON summaries.

use thiserror::Error;

/// Main error type for restore_io operations.
#[derive(Error, Debug)]
pub enum BackupError {
    /// Malformed or truncated backup data
    #[error("Format error: {0}")]
    Format(String),

    /// Missing backup
    #[error("Backup not found: {0}")]
    NotFound(String),

    /// File system errors
    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    Context {
        context: String,
        source: Box<BackupError>,
    },
}

/// Result type alias for restore_io operations.
pub type Result<T> = std::result::Result<T, BackupError>;

impl BackupError {
    /// Creates a new format error.
    #[must_use]
    pub fn format<S: Into<String>>(msg: S) -> Self {
        Self::Format(msg.into())
    }

    /// Creates a new not found error.
    #[must_use]
    pub fn not_found<S: Into<String>>(id: S) -> Self {
        Self::NotFound(id.into())
    }

    /// Creates a new validation error.
    #[must_use]
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Self::Validation(msg.into())
    }

    /// Wraps an error with additional context.
    #[must_use]
    pub fn with_context<S: Into<String>>(self, context: S) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// True for malformed data, looking through context wrappers.
    pub fn is_format(&self) -> bool {
        match self {
            Self::Format(_) => true,
            Self::Context { source, .. } => source.is_format(),
            _ => false,
        }
    }

    /// True for a missing backup, looking through context wrappers.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound(_) => true,
            Self::Context { source, .. } => source.is_not_found(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BackupError::format("truncated at byte 12");
        assert_eq!(err.to_string(), "Format error: truncated at byte 12");
    }

    #[test]
    fn test_error_context() {
        let err = BackupError::not_found("2024-01-01 00-00-00").with_context("loading backup");
        assert!(err.to_string().contains("loading backup"));
        assert!(err.is_not_found());
        assert!(!err.is_format());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: BackupError = io_err.into();
        assert!(matches!(err, BackupError::FileSystem(_)));
    }
}
