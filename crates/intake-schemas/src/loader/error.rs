//! Error types for schema and document loading
//!
//! Copyright (c) 2025 Intake Team
//! Licensed under the Apache-2.0 license

use std::path::PathBuf;
use thiserror::Error;

/// Result type for loader operations
pub type LoaderResult<T> = Result<T, LoaderError>;

/// Everything that can go wrong turning a file into a schema or document
#[derive(Error, Debug)]
pub enum LoaderError {
    /// File I/O errors
    #[error("Failed to read file '{path}': {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// YAML parsing errors
    #[error("Failed to parse YAML file '{path}': {source}")]
    YamlParseError {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// JSON parsing errors
    #[error("Failed to parse JSON file '{path}': {source}")]
    JsonParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Unsupported file format
    #[error("Unsupported file format for '{path}'. Expected .yaml, .yml, or .json")]
    UnsupportedFormat { path: PathBuf },

    /// Parsed content is not a valid schema declaration
    #[error("Invalid schema in '{path}': {reason}")]
    InvalidSchema { path: PathBuf, reason: String },
}

impl LoaderError {
    /// Create an I/O error with path context
    pub fn io_error(path: PathBuf, error: std::io::Error) -> Self {
        Self::IoError {
            path,
            source: error,
        }
    }

    /// Create a YAML parsing error with path context
    pub fn yaml_parse_error(path: PathBuf, error: serde_yaml::Error) -> Self {
        Self::YamlParseError {
            path,
            source: error,
        }
    }

    /// Create a JSON parsing error with path context
    pub fn json_parse_error(path: PathBuf, error: serde_json::Error) -> Self {
        Self::JsonParseError {
            path,
            source: error,
        }
    }

    pub fn unsupported_format(path: PathBuf) -> Self {
        Self::UnsupportedFormat { path }
    }

    pub fn invalid_schema(path: PathBuf, reason: impl Into<String>) -> Self {
        Self::InvalidSchema {
            path,
            reason: reason.into(),
        }
    }

    /// Path of the file that failed to load
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::IoError { path, .. }
            | Self::YamlParseError { path, .. }
            | Self::JsonParseError { path, .. }
            | Self::UnsupportedFormat { path }
            | Self::InvalidSchema { path, .. } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let path = PathBuf::from("pupils.yaml");

        let io_err = LoaderError::io_error(
            path.clone(),
            std::io::Error::new(std::io::ErrorKind::NotFound, "File not found"),
        );
        assert!(matches!(io_err, LoaderError::IoError { .. }));
        assert_eq!(io_err.path(), &path);

        let invalid = LoaderError::invalid_schema(path.clone(), "unknown variant `text`");
        assert_eq!(
            invalid.to_string(),
            "Invalid schema in 'pupils.yaml': unknown variant `text`"
        );
    }
}
