//! Logging utilities for the Intake CLI
//!
//! This module provides:
//! - Session ID generation and tracking
//! - Performance timing spans
//! - Structured logging setup in compact, full or JSON format

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::IsTerminal;
use std::sync::OnceLock;
use tracing::{field, Span};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Global session ID for the current invocation
static SESSION_ID: OnceLock<String> = OnceLock::new();

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter
    pub level: String,
    /// Output format: compact, full, json
    pub format: LogFormat,
    /// Colorize console output
    pub console: bool,
    /// Include thread IDs
    pub thread_ids: bool,
    /// Include file and line numbers
    pub source_location: bool,
    /// Per-module levels, e.g. `intake_core: trace`
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub module_filter: BTreeMap<String, String>,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Compact format for everyday use
    Compact,
    /// Full format with all details
    Full,
    /// JSON structured format
    Json,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Compact,
            console: true,
            thread_ids: false,
            source_location: false,
            module_filter: BTreeMap::new(),
        }
    }
}

impl LoggingConfig {
    /// Raise the level for each `-v`; no flag keeps the configured level
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        match verbosity {
            0 => {}
            1 => {
                self.level = "info".to_string();
            }
            2 => {
                self.level = "debug".to_string();
                self.source_location = true;
            }
            _ => {
                self.level = "trace".to_string();
                self.format = LogFormat::Full;
                self.source_location = true;
                self.thread_ids = true;
            }
        }
        self
    }

    /// Apply environment overrides
    pub fn merge_with_env(&mut self) {
        // RUST_LOG takes precedence
        if let Ok(rust_log) = std::env::var("RUST_LOG") {
            self.level = rust_log;
        }

        if let Ok(format) = std::env::var("INTAKE_LOG_FORMAT") {
            match format.to_lowercase().as_str() {
                "compact" => self.format = LogFormat::Compact,
                "full" => self.format = LogFormat::Full,
                "json" => self.format = LogFormat::Json,
                _ => eprintln!("Warning: invalid log format '{}', using {:?}", format, self.format),
            }
        }

        if let Ok(console) = std::env::var("INTAKE_LOG_CONSOLE") {
            self.console = console.to_lowercase() == "true" || console == "1";
        }
    }
}

/// Initialize the global logging system.
///
/// Logs go to stderr so stdout carries only command output.
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let env_filter = create_env_filter(&config)?;
    let ansi = config.console && std::io::stderr().is_terminal();

    // One arm per format; the builders have different types
    let installed = match config.format {
        LogFormat::Compact => {
            let subscriber = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_ansi(ansi)
                .with_thread_ids(config.thread_ids)
                .with_file(config.source_location)
                .with_line_number(config.source_location)
                .compact()
                .finish();
            tracing::subscriber::set_global_default(subscriber)
        }
        LogFormat::Json => {
            let subscriber = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_ansi(false)
                .with_thread_ids(config.thread_ids)
                .with_file(config.source_location)
                .with_line_number(config.source_location)
                .json()
                .finish();
            tracing::subscriber::set_global_default(subscriber)
        }
        LogFormat::Full => {
            let subscriber = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_ansi(ansi)
                .with_thread_ids(config.thread_ids)
                .with_file(config.source_location)
                .with_line_number(config.source_location)
                .finish();
            tracing::subscriber::set_global_default(subscriber)
        }
    };
    installed.map_err(|e| Error::other(format!("Failed to initialize logging: {}", e)))?;

    let session_id = generate_session_id();
    SESSION_ID
        .set(session_id.clone())
        .map_err(|_| Error::other("Session ID already set"))?;

    tracing::debug!(
        session_id = %session_id,
        config = ?config,
        "Logging system initialized"
    );

    Ok(())
}

/// Create environment filter based on configuration
fn create_env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    let mut filter =
        EnvFilter::try_new(&config.level).map_err(|e| Error::config(format!("Invalid log level '{}': {}", config.level, e)))?;

    for (module, level) in &config.module_filter {
        filter = filter.add_directive(
            format!("{}={}", module, level)
                .parse()
                .map_err(|e| Error::config(format!("Invalid filter directive: {}", e)))?,
        );
    }

    Ok(filter)
}

/// Generate a unique ID for this invocation
pub fn generate_session_id() -> String {
    format!("run_{}", Uuid::new_v4().simple())
}

/// Get the current session ID
pub fn current_session_id() -> Option<&'static str> {
    SESSION_ID.get().map(|s| s.as_str())
}

/// Create a span carrying the session ID and a duration slot
pub fn create_operation_span(operation: &str, details: Option<&str>) -> Span {
    tracing::info_span!(
        "operation",
        operation = operation,
        session_id = current_session_id().unwrap_or("unknown"),
        details = details.unwrap_or(""),
        duration_ms = field::Empty,
    )
}

/// Performance timing utilities
pub mod timing {
    use std::time::{Duration, Instant};
    use tracing::Span;

    /// A timer that logs its duration when dropped
    pub struct Timer {
        start: Instant,
        span: Span,
        operation: String,
    }

    impl Timer {
        pub fn new(operation: &str) -> Self {
            Self {
                start: Instant::now(),
                span: super::create_operation_span(operation, None),
                operation: operation.to_string(),
            }
        }

        pub fn with_details(operation: &str, details: &str) -> Self {
            Self {
                start: Instant::now(),
                span: super::create_operation_span(operation, Some(details)),
                operation: operation.to_string(),
            }
        }

        /// Get elapsed time without finishing the timer
        pub fn elapsed(&self) -> Duration {
            self.start.elapsed()
        }
    }

    impl Drop for Timer {
        fn drop(&mut self) {
            let duration = self.start.elapsed();
            self.span.record("duration_ms", duration.as_millis() as u64);

            tracing::debug!(
                operation = %self.operation,
                duration_ms = duration.as_millis() as u64,
                "Operation completed"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_config_with_verbosity() {
        let config = LoggingConfig::default().with_verbosity(0);
        assert_eq!(config.level, "warn");
        assert!(!config.source_location);

        let config = LoggingConfig::default().with_verbosity(2);
        assert_eq!(config.level, "debug");
        assert!(config.source_location);

        let config = LoggingConfig::default().with_verbosity(3);
        assert_eq!(config.level, "trace");
        assert_eq!(config.format, LogFormat::Full);
        assert!(config.thread_ids);
    }

    #[test]
    fn test_configured_level_survives_without_flags() {
        let config = LoggingConfig {
            level: "intake_core=debug".to_string(),
            ..LoggingConfig::default()
        };
        assert_eq!(config.with_verbosity(0).level, "intake_core=debug");
    }

    #[test]
    fn test_session_ids_are_unique() {
        let a = generate_session_id();
        let b = generate_session_id();
        assert!(a.starts_with("run_"));
        assert_eq!(a.len(), "run_".len() + 32);
        assert_ne!(a, b);
    }

    #[test]
    fn test_env_filter_accepts_module_levels() {
        let mut config = LoggingConfig::default();
        config
            .module_filter
            .insert("intake_core".to_string(), "trace".to_string());
        assert!(create_env_filter(&config).is_ok());
    }

    #[test]
    fn test_timer_measures_elapsed() {
        let timer = timing::Timer::with_details("test", "unit");
        std::thread::sleep(std::time::Duration::from_millis(2));
        assert!(timer.elapsed() >= std::time::Duration::from_millis(2));
    }

    #[test]
    fn test_format_deserializes_lowercase() {
        let config: LoggingConfig = serde_json::from_str(r#"{"format": "json"}"#).unwrap();
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.level, "warn");
    }
}
