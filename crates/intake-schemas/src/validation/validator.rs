//! The record validator
//!
//! A [`Validator`] is an immutable configuration value. Validating a record
//! never writes to it, so one validator can be shared freely across data sets
//! and threads; callers that need different switches derive a new validator
//! with [`Validator::with_config`].
//!
//! Copyright (c) 2025 Intake Team
//! Licensed under the Apache-2.0 license

use crate::record::Record;
use crate::schema::{FieldRule, Schema};
use crate::validation::config::ValidatorConfig;
use crate::validation::error::{ErrorSet, ValidationError};
use crate::value::Value;
use std::sync::{Arc, OnceLock};

pub const UNKNOWN_FIELD: &str = "unknown field";
pub const REQUIRED_FIELD: &str = "required field";
pub const READONLY_FIELD: &str = "field is read-only";
pub const NULL_NOT_ALLOWED: &str = "null value not allowed";

static SHARED: OnceLock<Arc<Validator>> = OnceLock::new();

/// Validates records against a schema under one configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validator {
    config: ValidatorConfig,
}

/// What to do with a field after its rules ran
enum Outcome {
    Keep(Value),
    Drop,
    Reject(String),
}

impl Validator {
    pub fn new(config: ValidatorConfig) -> Self {
        Self { config }
    }

    /// Process-wide default validator, created on first use
    pub fn shared() -> Arc<Validator> {
        Arc::clone(SHARED.get_or_init(|| Arc::new(Validator::default())))
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// A validator identical to this one but with `config`
    pub fn with_config(&self, config: ValidatorConfig) -> Validator {
        Validator { config }
    }

    /// Validate and normalize `document` against `schema`.
    ///
    /// Every field is checked before deciding, so a rejection carries the
    /// complete error set.
    pub fn validate(&self, schema: &Schema, document: &Record) -> Result<Record, ValidationError> {
        let mut output = Record::new();
        let mut errors = ErrorSet::new();

        for (field, value) in document {
            let outcome = match schema.get(field) {
                Some(rule) => self.normalize_field(rule, value.clone()),
                None => self.unknown_field(value.clone()),
            };
            match outcome {
                Outcome::Keep(value) => {
                    output.insert(field.clone(), value);
                }
                Outcome::Drop => {}
                Outcome::Reject(message) => errors.add(field.clone(), message),
            }
        }

        for (field, rule) in schema {
            if document.contains_key(field) || rule.readonly {
                continue;
            }
            if rule.required.unwrap_or(self.config.require_all) {
                errors.add(field.clone(), REQUIRED_FIELD);
            }
        }

        errors.into_result().map(|()| output)
    }

    fn unknown_field(&self, value: Value) -> Outcome {
        if self.config.purge_unknown {
            Outcome::Drop
        } else if self.config.allow_unknown {
            Outcome::Keep(value)
        } else {
            Outcome::Reject(UNKNOWN_FIELD.to_string())
        }
    }

    fn normalize_field(&self, rule: &FieldRule, value: Value) -> Outcome {
        if rule.readonly {
            return if self.config.purge_readonly {
                Outcome::Drop
            } else {
                Outcome::Reject(READONLY_FIELD.to_string())
            };
        }

        let value = match rule.coerce {
            Some(coercion) => match coercion.apply(value) {
                Ok(coerced) => coerced,
                Err(err) => return Outcome::Reject(format!("cannot be coerced: {}", err)),
            },
            None => value,
        };

        if value.is_null() {
            return if self.config.ignore_none_values || rule.nullable {
                Outcome::Keep(value)
            } else {
                Outcome::Reject(NULL_NOT_ALLOWED.to_string())
            };
        }

        if let Some(field_type) = rule.field_type {
            if !field_type.accepts(&value) {
                return Outcome::Reject(format!("must be of {} type", field_type));
            }
        }

        if let Some(check) = rule.check_with {
            if let Err(message) = check.check(&value) {
                return Outcome::Reject(message);
            }
        }

        Outcome::Keep(value)
    }
}
