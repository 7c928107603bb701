//! Configuration management for the CLI
//!
//! This module handles loading configuration from:
//! - Default values
//! - Configuration files (YAML/JSON)
//! - Environment variables (`INTAKE_CONFIG`, logging overrides)

use crate::cli::OutputFormat;
use crate::error::{Error, Result};
use crate::logging::LoggingConfig;
use intake_schemas::loader::{load_document, Format};
use intake_schemas::{Validator, ValidatorConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Baseline validator switches for every data set
    pub validator: ValidatorConfig,

    /// Logging settings
    pub logging: LoggingConfig,

    /// Output settings
    pub output: OutputConfig,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format
    pub format: OutputFormat,

    /// Use colored output when the terminal supports it
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Human,
            color: true,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let value = match load_document(path)? {
            // an empty YAML file means all defaults
            serde_json::Value::Null => serde_json::Value::Object(Default::default()),
            value => value,
        };
        serde_json::from_value(value)
            .map_err(|e| Error::config(format!("{}: {}", path.display(), e)))
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        for path in Self::default_config_paths() {
            if path.exists() {
                match Self::from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        eprintln!("Warning: Failed to load config from {}: {}", path.display(), e);
                    }
                }
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file or default locations
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        match file {
            Some(path) => Self::from_file(path),
            None => Self::load(),
        }
    }

    /// Default configuration file paths, in lookup order
    pub fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(".intake.yaml"), PathBuf::from(".intake.json")];

        if let Some(config_dir) = dirs::config_dir() {
            let intake_dir = config_dir.join("intake");
            paths.push(intake_dir.join("config.yaml"));
            paths.push(intake_dir.join("config.json"));
        }

        if let Some(home_dir) = dirs::home_dir() {
            paths.push(home_dir.join(".intake.yaml"));
            paths.push(home_dir.join(".intake.json"));
        }

        paths
    }

    /// The baseline validator described by this configuration
    pub fn validator(&self) -> Arc<Validator> {
        if self.validator == ValidatorConfig::default() {
            Validator::shared()
        } else {
            Arc::new(Validator::new(self.validator))
        }
    }

    /// Serialize in the format implied by the file extension
    pub fn to_string_for(&self, path: &Path) -> Result<String> {
        match Format::from_path(path)? {
            Format::Yaml => Ok(serde_yaml::to_string(self)?),
            Format::Json => Ok(serde_json::to_string_pretty(self)?),
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.to_string_for(path)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile, TempDir};

    fn temp_file(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let file = temp_file(".yaml", "validator:\n  allow_unknown: true\noutput:\n  format: json-pretty\n");
        let config = Config::from_file(file.path()).unwrap();

        assert!(config.validator.allow_unknown);
        assert!(!config.validator.require_all);
        assert_eq!(config.output.format, OutputFormat::JsonPretty);
        assert!(config.output.color);
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_empty_mapping_is_default() {
        let file = temp_file(".yml", "{}\n");
        assert_eq!(Config::from_file(file.path()).unwrap(), Config::default());
    }

    #[test]
    fn test_json_config() {
        let file = temp_file(".json", r#"{"validator": {"purge_unknown": true}}"#);
        let config = Config::from_file(file.path()).unwrap();
        assert!(config.validator.purge_unknown);
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let file = temp_file(".toml", "validator = {}");
        assert!(matches!(Config::from_file(file.path()), Err(Error::Loader(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load_with_file(Some(Path::new("/nonexistent/intake.yaml"))).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }

    #[test]
    fn test_bad_field_is_config_error() {
        let file = temp_file(".yaml", "validator:\n  allow_unknown: sometimes\n");
        assert!(matches!(Config::from_file(file.path()), Err(Error::Config(_))));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.yaml");

        let mut config = Config::default();
        config.validator.require_all = true;
        config.save(&path).unwrap();

        assert_eq!(Config::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_default_validator_is_shared() {
        assert!(Arc::ptr_eq(&Config::default().validator(), &Validator::shared()));

        let mut config = Config::default();
        config.validator.allow_unknown = true;
        assert!(config.validator().config().allow_unknown);
    }

    #[test]
    fn test_project_paths_come_first() {
        let paths = Config::default_config_paths();
        assert_eq!(paths[0], PathBuf::from(".intake.yaml"));
        assert_eq!(paths[1], PathBuf::from(".intake.json"));
    }
}
