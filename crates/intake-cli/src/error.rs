//! Error types and handling for the CLI
//!
//! This module provides error types and utilities for handling
//! the failure modes of the CLI application.

use intake_schemas::LoaderError;
use std::io;
use std::path::PathBuf;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for CLI operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error (file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error from intake-core
    #[error("{0}")]
    Core(#[from] intake_core::Error),

    /// Definition or data file could not be read
    #[error("{0}")]
    Loader(#[from] LoaderError),

    /// File not found
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid argument combination or data shape
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    /// The data did not satisfy the data set
    #[error("Validation failed for {} field(s)", fields)]
    ValidationFailed { fields: usize },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Generic error with context
    #[error("{message}")]
    Other { message: String },
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an invalid arguments error
    pub fn invalid_args(message: impl Into<String>) -> Self {
        Self::InvalidArgs(message.into())
    }

    /// Create a generic error with message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io(_) => 1,
            Self::Core(_) => 2,
            Self::FileNotFound { .. } => 3,
            Self::Loader(_) => 4,
            Self::Config(_) => 5,
            Self::InvalidArgs(_) => 6,
            Self::ValidationFailed { .. } => 7,
            Self::Json(_) => 12,
            Self::Yaml(_) => 13,
            Self::Other { .. } => 99,
        }
    }

    /// Check if this error should display usage help
    pub fn should_show_help(&self) -> bool {
        matches!(self, Self::InvalidArgs(_))
    }
}

/// Format an error for display to the user
pub fn format_error(error: &Error, use_color: bool) -> String {
    if use_color {
        use colored::Colorize;
        format!("{} {}", "Error:".red().bold(), error)
    } else {
        format!("Error: {}", error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct_for_validation() {
        assert_eq!(Error::ValidationFailed { fields: 2 }.exit_code(), 7);
        assert_eq!(Error::invalid_args("bad").exit_code(), 6);
        assert_ne!(Error::other("x").exit_code(), 0);
    }

    #[test]
    fn test_help_only_for_argument_errors() {
        assert!(Error::invalid_args("bad").should_show_help());
        assert!(!Error::config("bad").should_show_help());
    }

    #[test]
    fn test_format_error_without_color() {
        let message = format_error(&Error::ValidationFailed { fields: 1 }, false);
        assert_eq!(message, "Error: Validation failed for 1 field(s)");
    }

    #[test]
    fn test_loader_errors_convert() {
        let err: Error = LoaderError::unsupported_format(PathBuf::from("data.txt")).into();
        assert_eq!(err.exit_code(), 4);
    }
}
