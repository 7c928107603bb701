//! Records: the mapping type that validation consumes and produces
//!
//! Copyright (c) 2025 Intake Team
//! Licensed under the Apache-2.0 license

use crate::validation::error::ValidationError;
use crate::value::Value;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::ops::Index;

/// Mapping capability shared by every record type.
///
/// Implementors decide what happens to a value on the way in; readers only
/// ever see what was stored.
pub trait Mapping {
    /// Get the value stored under `key`
    fn get(&self, key: &str) -> Option<&Value>;

    /// Store a value, returning the previous one
    fn insert(&mut self, key: String, value: Value) -> Option<Value>;

    /// Remove and return the value under `key`
    fn remove(&mut self, key: &str) -> Option<Value>;

    /// Number of stored fields
    fn len(&self) -> usize;

    /// Iterate over (key, value) pairs in key order
    fn entries(&self) -> Box<dyn Iterator<Item = (&String, &Value)> + '_>;

    /// Store `value` only if `key` is absent, then return the stored value
    fn set_default(&mut self, key: String, value: Value) -> &Value;

    fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Store every pair from `entries`
    fn update<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (String, Value)>,
        Self: Sized,
    {
        for (key, value) in entries {
            self.insert(key, value);
        }
    }
}

/// A validated (or raw) record: field name to value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, Value>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from a JSON value, which must be an object
    pub fn from_json(value: JsonValue) -> Result<Self, ValidationError> {
        match value {
            JsonValue::Object(map) => Ok(map
                .into_iter()
                .map(|(k, v)| (k, Value::from(v)))
                .collect()),
            other => Err(ValidationError::not_a_document(&Value::from(other))),
        }
    }

    /// Build a record from a [`Value`], which must be a mapping
    pub fn from_value(value: Value) -> Result<Self, ValidationError> {
        match value {
            Value::Map(fields) => Ok(Self { fields }),
            other => Err(ValidationError::not_a_document(&other)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.fields.iter()
    }

    pub fn keys(&self) -> btree_map::Keys<'_, String, Value> {
        self.fields.keys()
    }

    pub fn values(&self) -> btree_map::Values<'_, String, Value> {
        self.fields.values()
    }

    /// Store `value` only if `key` is absent, then return the stored value
    pub fn set_default(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &Value {
        self.fields.entry(key.into()).or_insert_with(|| value.into())
    }

    /// Unwrap into the underlying map
    pub fn into_inner(self) -> BTreeMap<String, Value> {
        self.fields
    }

    /// Render as a JSON object
    pub fn to_json(&self) -> JsonValue {
        JsonValue::Object(
            self.fields
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }

    /// Deserialize the record into a typed structure
    pub fn into_typed<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_value(self.to_json())
    }
}

impl Mapping for Record {
    fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    fn insert(&mut self, key: String, value: Value) -> Option<Value> {
        self.fields.insert(key, value)
    }

    fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.remove(key)
    }

    fn len(&self) -> usize {
        self.fields.len()
    }

    fn entries(&self) -> Box<dyn Iterator<Item = (&String, &Value)> + '_> {
        Box::new(self.fields.iter())
    }

    fn set_default(&mut self, key: String, value: Value) -> &Value {
        self.fields.entry(key).or_insert(value)
    }
}

impl Index<&str> for Record {
    type Output = Value;

    fn index(&self, key: &str) -> &Value {
        match self.fields.get(key) {
            Some(value) => value,
            None => panic!("no field named '{}' in record", key),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<K, V> Extend<(K, V)> for Record
where
    K: Into<String>,
    V: Into<Value>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.fields.insert(k.into(), v.into());
        }
    }
}

impl IntoIterator for Record {
    type Item = (String, Value);
    type IntoIter = btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

impl From<BTreeMap<String, Value>> for Record {
    fn from(fields: BTreeMap<String, Value>) -> Self {
        Self { fields }
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Map(record.fields)
    }
}
