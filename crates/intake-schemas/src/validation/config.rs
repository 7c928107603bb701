//! Validator configuration and per data set overrides
//!
//! Copyright (c) 2025 Intake Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};

/// The five switches that shape how a record is validated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Keep fields the schema does not declare
    pub allow_unknown: bool,
    /// Accept null values without checking them
    pub ignore_none_values: bool,
    /// Drop read-only fields instead of rejecting them
    pub purge_readonly: bool,
    /// Drop undeclared fields, whatever `allow_unknown` says
    pub purge_unknown: bool,
    /// Treat every field without its own `required` flag as required
    pub require_all: bool,
}

impl ValidatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_allow_unknown(mut self, value: bool) -> Self {
        self.allow_unknown = value;
        self
    }

    pub fn with_ignore_none_values(mut self, value: bool) -> Self {
        self.ignore_none_values = value;
        self
    }

    pub fn with_purge_readonly(mut self, value: bool) -> Self {
        self.purge_readonly = value;
        self
    }

    pub fn with_purge_unknown(mut self, value: bool) -> Self {
        self.purge_unknown = value;
        self
    }

    pub fn with_require_all(mut self, value: bool) -> Self {
        self.require_all = value;
        self
    }
}

/// Tri-state overrides declared by a data set.
///
/// `None` leaves the validator's own setting alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_unknown: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_none_values: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purge_readonly: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purge_unknown: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub require_all: Option<bool>,
}

impl ConfigOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no override is set
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Layer the set overrides on top of `base`
    pub fn apply(&self, base: ValidatorConfig) -> ValidatorConfig {
        ValidatorConfig {
            allow_unknown: self.allow_unknown.unwrap_or(base.allow_unknown),
            ignore_none_values: self.ignore_none_values.unwrap_or(base.ignore_none_values),
            purge_readonly: self.purge_readonly.unwrap_or(base.purge_readonly),
            purge_unknown: self.purge_unknown.unwrap_or(base.purge_unknown),
            require_all: self.require_all.unwrap_or(base.require_all),
        }
    }

    /// Combine two override sets; values set in `other` win
    pub fn merge(&self, other: &ConfigOverrides) -> ConfigOverrides {
        ConfigOverrides {
            allow_unknown: other.allow_unknown.or(self.allow_unknown),
            ignore_none_values: other.ignore_none_values.or(self.ignore_none_values),
            purge_readonly: other.purge_readonly.or(self.purge_readonly),
            purge_unknown: other.purge_unknown.or(self.purge_unknown),
            require_all: other.require_all.or(self.require_all),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_overrides_keep_baseline() {
        let base = ValidatorConfig::new().with_allow_unknown(true).with_require_all(true);
        let overrides = ConfigOverrides {
            require_all: Some(false),
            purge_unknown: Some(true),
            ..Default::default()
        };

        let effective = overrides.apply(base);
        assert!(effective.allow_unknown);
        assert!(!effective.require_all);
        assert!(effective.purge_unknown);
        assert!(!effective.ignore_none_values);
    }

    #[test]
    fn test_merge_prefers_other() {
        let declared = ConfigOverrides {
            allow_unknown: Some(true),
            require_all: Some(true),
            ..Default::default()
        };
        let cli = ConfigOverrides {
            allow_unknown: Some(false),
            ..Default::default()
        };

        let merged = declared.merge(&cli);
        assert_eq!(merged.allow_unknown, Some(false));
        assert_eq!(merged.require_all, Some(true));
        assert!(ConfigOverrides::new().is_empty());
        assert!(!merged.is_empty());
    }

    #[test]
    fn test_deserialize_partial() {
        let config: ValidatorConfig = serde_json::from_str(r#"{"purge_unknown": true}"#).unwrap();
        assert_eq!(config, ValidatorConfig::new().with_purge_unknown(true));

        let overrides: ConfigOverrides = serde_json::from_str(r#"{"allow_unknown": false}"#).unwrap();
        assert_eq!(overrides.allow_unknown, Some(false));
        assert_eq!(overrides.require_all, None);
    }
}
