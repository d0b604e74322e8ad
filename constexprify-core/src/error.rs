//! Typed error handling for constexprify.
//!
//! Provides structured errors that library consumers can match on,
//! with full context about what went wrong and where.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for constexprify operations.
///
/// Note the analysis itself never errors: legality-check failures are
/// expected "not eligible" outcomes, not members of this enum. These errors
/// cover the surrounding machinery only (loading a unit, configuration,
/// applying fix-its).
#[derive(Error, Debug)]
pub enum ConstexprifyError {
    /// I/O error when reading/writing files
    #[error("I/O error at {path}: {message}")]
    Io {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Malformed translation-unit JSON
    #[error("Invalid translation unit in {path}: {message}")]
    Json { path: PathBuf, message: String },

    /// Configuration file errors
    #[error("Config error at {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// Fix-it application errors
    #[error("Fix error: {message}")]
    Fix { message: String },

    /// Invalid argument provided
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Generic internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ConstexprifyError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create a config error.
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a fix error.
    pub fn fix(message: impl Into<String>) -> Self {
        Self::Fix {
            message: message.into(),
        }
    }

    /// Create an invalid-argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Check if this is a recoverable error (the caller can continue with
    /// defaults).
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Config { .. })
    }

    /// Get the path associated with this error, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. } => Some(path),
            Self::Json { path, .. } => Some(path),
            Self::Config { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Convenience type alias for constexprify results.
pub type ConstexprifyResult<T> = Result<T, ConstexprifyError>;

/// Extension trait for converting std::io::Error with path context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    fn with_path(self, path: impl Into<PathBuf>) -> ConstexprifyResult<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> ConstexprifyResult<T> {
        self.map_err(|e| ConstexprifyError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error() {
        let err = ConstexprifyError::io(
            PathBuf::from("/test/unit.json"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        );
        assert!(matches!(err, ConstexprifyError::Io { .. }));
        assert_eq!(err.path(), Some(&PathBuf::from("/test/unit.json")));
        assert!(err.to_string().contains("/test/unit.json"));
    }

    #[test]
    fn test_is_recoverable() {
        assert!(ConstexprifyError::config("/x.toml", "bad key").is_recoverable());
        assert!(!ConstexprifyError::fix("offset out of range").is_recoverable());
    }

    #[test]
    fn test_io_result_ext() {
        let result: std::io::Result<()> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"));
        let wrapped = result.with_path("/missing/unit.json");
        assert!(wrapped.is_err());
    }
}
