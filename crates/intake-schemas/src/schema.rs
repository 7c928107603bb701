//! Schema declarations: field name to field rule
//!
//! A schema is declared once per data set and never changes afterwards. The
//! declaration surface mirrors the one used in definition files:
//!
//! ```yaml
//! pupil_uuid: { type: string, check_with: uuid }
//! forename: { type: string, coerce: to_string }
//! attendance: { type: float, nullable: true, coerce: to_nullable_float }
//! ```
//!
//! Copyright (c) 2025 Intake Team
//! Licensed under the Apache-2.0 license

use crate::check::FormatCheck;
use crate::coerce::CoercionRule;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

/// Declared type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Integer,
    Float,
    /// Integer or float
    Number,
    Boolean,
    Date,
    Datetime,
    List,
    Dict,
}

impl FieldType {
    pub fn name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Float => "float",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::Datetime => "datetime",
            FieldType::List => "list",
            FieldType::Dict => "dict",
        }
    }

    /// Whether `value` satisfies this type
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (FieldType::String, Value::String(_)) => true,
            (FieldType::Integer, Value::Integer(_)) => true,
            (FieldType::Float, Value::Float(_)) => true,
            (FieldType::Number, Value::Integer(_) | Value::Float(_)) => true,
            (FieldType::Boolean, Value::Bool(_)) => true,
            (FieldType::Date, Value::Date(_)) => true,
            (FieldType::Datetime, Value::DateTime(_) | Value::ZonedDateTime(_)) => true,
            (FieldType::List, Value::List(_)) => true,
            (FieldType::Dict, Value::Map(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Rules for a single field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldRule {
    /// Declared type; unconstrained when absent
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<FieldType>,

    #[serde(default)]
    pub nullable: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coerce: Option<CoercionRule>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_with: Option<FormatCheck>,

    #[serde(default)]
    pub readonly: bool,

    /// Per-field override of the validator's `require_all`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
}

impl FieldRule {
    /// An unconstrained field
    pub fn new() -> Self {
        Self::default()
    }

    /// A field of the given type
    pub fn of(field_type: FieldType) -> Self {
        Self {
            field_type: Some(field_type),
            ..Self::default()
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn coerce(mut self, rule: CoercionRule) -> Self {
        self.coerce = Some(rule);
        self
    }

    pub fn check_with(mut self, check: FormatCheck) -> Self {
        self.check_with = Some(check);
        self
    }

    pub fn readonly(mut self) -> Self {
        self.readonly = true;
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }
}

/// Field name to field rule
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    fields: BTreeMap<String, FieldRule>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, builder style
    pub fn field(mut self, name: impl Into<String>, rule: FieldRule) -> Self {
        self.fields.insert(name.into(), rule);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldRule> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, FieldRule> {
        self.fields.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Build a schema from its JSON declaration
    pub fn from_json(value: JsonValue) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }

    /// Build a schema from YAML text
    pub fn from_yaml_str(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }
}

impl FromIterator<(String, FieldRule)> for Schema {
    fn from_iter<I: IntoIterator<Item = (String, FieldRule)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = (&'a String, &'a FieldRule);
    type IntoIter = btree_map::Iter<'a, String, FieldRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
