//! Error types for the Intake core library
//!
//! Validation failures come through unchanged from `intake-schemas`; the rest
//! cover the limiter and file handling around data sets.

use intake_schemas::{LoaderError, ValidationError};
use std::time::Duration;
use thiserror::Error;

/// Main error type for Intake operations
#[derive(Error, Debug)]
pub enum Error {
    /// A record failed schema validation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Configuration errors, such as unreachable limiter storage
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// A rate limit was exhausted
    #[error("Rate limit exceeded for '{key}', retry after {retry_after:?}")]
    RateLimited { key: String, retry_after: Duration },

    /// Schema or document file could not be loaded
    #[error(transparent)]
    Loader(#[from] LoaderError),

    /// JSON parsing and serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic internal error with context
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// The validation error, if this is one
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Error::Validation(err) => Some(err),
            _ => None,
        }
    }
}

// Conversion implementations
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Internal {
            message: err.to_string(),
            source: err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_schemas::ErrorSet;

    #[test]
    fn test_error_display() {
        let err = Error::configuration("Invalid or inaccessible storage configuration");
        assert_eq!(
            err.to_string(),
            "Configuration error: Invalid or inaccessible storage configuration"
        );
    }

    #[test]
    fn test_validation_passes_through() {
        let mut errors = ErrorSet::new();
        errors.add("age", "required field");
        let err: Error = ValidationError::SchemaViolation(errors).into();

        assert_eq!(err.to_string(), "Validation failed: age: required field");
        assert!(err.as_validation().is_some());
    }
}
