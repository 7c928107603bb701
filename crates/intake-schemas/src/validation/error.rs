//! Validation error types
//!
//! Copyright (c) 2025 Intake Team
//! Licensed under the Apache-2.0 license

use crate::value::Value;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Field name to the ordered messages raised against it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorSet {
    errors: BTreeMap<String, Vec<String>>,
}

impl ErrorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message against a field
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.entry(field.into()).or_default().push(message.into());
    }

    /// Messages raised against `field`, empty when it passed
    pub fn messages(&self, field: &str) -> &[String] {
        self.errors.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    /// Fields with at least one message
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    /// Number of failing fields
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Vec<String>> {
        self.errors.iter()
    }

    pub fn into_inner(self) -> BTreeMap<String, Vec<String>> {
        self.errors
    }

    /// Render as a JSON object of field to message list
    pub fn to_json(&self) -> JsonValue {
        JsonValue::Object(
            self.errors
                .iter()
                .map(|(field, messages)| {
                    (
                        field.clone(),
                        JsonValue::Array(messages.iter().cloned().map(JsonValue::String).collect()),
                    )
                })
                .collect(),
        )
    }

    /// Ok if nothing was recorded, otherwise a schema violation
    pub fn into_result(self) -> Result<(), ValidationError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::SchemaViolation(self))
        }
    }
}

impl fmt::Display for ErrorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, messages)) in self.errors.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", field, messages.join(", "))?;
        }
        Ok(())
    }
}

/// Why a record was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// One or more fields broke the schema
    #[error("Validation failed: {0}")]
    SchemaViolation(ErrorSet),

    /// Input that should have been a mapping was something else
    #[error("Input is not a document: expected a mapping, found {found}")]
    NotADocument { found: String },
}

impl ValidationError {
    pub fn not_a_document(value: &Value) -> Self {
        Self::NotADocument {
            found: value.type_name().to_string(),
        }
    }

    /// The field errors, when this is a schema violation
    pub fn errors(&self) -> Option<&ErrorSet> {
        match self {
            Self::SchemaViolation(errors) => Some(errors),
            Self::NotADocument { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_set_collects_per_field() {
        let mut errors = ErrorSet::new();
        assert!(errors.clone().into_result().is_ok());

        errors.add("age", "must be of integer type");
        errors.add("name", "required field");
        errors.add("age", "cannot be coerced: 'x' is not a valid integer");

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.messages("age").len(), 2);
        assert!(errors.messages("uuid").is_empty());
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["age", "name"]);
        assert_eq!(
            errors.to_string(),
            "age: must be of integer type, cannot be coerced: 'x' is not a valid integer; name: required field"
        );
    }

    #[test]
    fn test_into_result() {
        let mut errors = ErrorSet::new();
        errors.add("a", "unknown field");
        let err = errors.into_result().unwrap_err();
        assert_eq!(err.errors().unwrap().messages("a"), ["unknown field".to_string()]);
        assert_eq!(err.to_string(), "Validation failed: a: unknown field");
    }

    #[test]
    fn test_not_a_document() {
        let err = ValidationError::not_a_document(&Value::from(3));
        assert_eq!(err, ValidationError::NotADocument { found: "integer".to_string() });
        assert!(err.errors().is_none());
    }
}
