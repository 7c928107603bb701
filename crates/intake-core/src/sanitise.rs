//! HTML sanitisation for records built from user input
//!
//! [`SanitisedRecord`] funnels every assignment through one chokepoint that
//! cleans string values, so markup is neutralised the moment it is stored
//! and whether or not the record is ever validated.
//!
//! Cleaning happens in two passes. Tags outside [`ALLOWED_TAGS`] are escaped
//! into plain text, then [`ammonia`] parses what is left, drops attributes
//! outside [`ALLOWED_ATTRIBUTES`] and balances the surviving tags.
//!
//! Copyright (c) 2025 Intake Team
//! Licensed under the Apache-2.0 license

use crate::data_set::DataSet;
use ammonia::{Builder, UrlRelative};
use intake_schemas::{Mapping, Record, ValidationError, Value};
use regex::{Captures, Regex};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{HashMap, HashSet};
use std::ops::Deref;
use std::sync::OnceLock;

/// Tags that survive sanitisation
pub const ALLOWED_TAGS: [&str; 12] = [
    "a",
    "abbr",
    "acronym",
    "b",
    "blockquote",
    "code",
    "em",
    "i",
    "li",
    "ol",
    "strong",
    "ul",
];

/// Attributes kept on allowed tags; every other attribute is dropped
pub const ALLOWED_ATTRIBUTES: [(&str, &[&str]); 3] = [
    ("a", &["href", "title"]),
    ("abbr", &["title"]),
    ("acronym", &["title"]),
];

/// URL schemes accepted in `href`
pub const ALLOWED_PROTOCOLS: [&str; 3] = ["http", "https", "mailto"];

static TAG_REGEX: OnceLock<Regex> = OnceLock::new();
static CLEANER: OnceLock<Builder<'static>> = OnceLock::new();

fn tag_regex() -> &'static Regex {
    TAG_REGEX.get_or_init(|| Regex::new(r"</?([a-zA-Z][a-zA-Z0-9]*)[^<>]*>?").unwrap())
}

fn cleaner() -> &'static Builder<'static> {
    CLEANER.get_or_init(|| {
        let attributes: HashMap<&str, HashSet<&str>> = ALLOWED_ATTRIBUTES
            .iter()
            .map(|(tag, names)| (*tag, names.iter().copied().collect()))
            .collect();

        let mut builder = Builder::empty();
        builder
            .tags(ALLOWED_TAGS.iter().copied().collect())
            .tag_attributes(attributes)
            .url_schemes(ALLOWED_PROTOCOLS.iter().copied().collect())
            .url_relative(UrlRelative::PassThrough)
            .link_rel(None)
            .strip_comments(true);
        builder
    })
}

/// Cleans markup in text, keeping whitelisted tags
pub struct Sanitiser;

impl Sanitiser {
    /// Sanitise a string.
    ///
    /// Already sanitised text comes back unchanged.
    pub fn clean(input: &str) -> String {
        let escaped = escape_disallowed_tags(input);
        cleaner().clean(&escaped).to_string()
    }

    /// Sanitise a value; only strings are touched
    pub fn clean_value(value: Value) -> Value {
        match value {
            Value::String(text) => Value::String(Self::clean(&text)),
            other => other,
        }
    }
}

// disallowed tags become text instead of being stripped with their content
fn escape_disallowed_tags(input: &str) -> String {
    tag_regex()
        .replace_all(input, |caps: &Captures| {
            let tag = &caps[0];
            let name = caps[1].to_ascii_lowercase();
            if ALLOWED_TAGS.contains(&name.as_str()) {
                tag.to_string()
            } else {
                tag.replace('<', "&lt;").replace('>', "&gt;")
            }
        })
        .into_owned()
}

/// A record whose string values are sanitised on every assignment
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SanitisedRecord {
    inner: Record,
}

impl SanitisedRecord {
    pub fn new() -> Self {
        Self::default()
    }

    // every write goes through here
    fn store(&mut self, key: String, value: Value) -> Option<Value> {
        self.inner.insert(key, Sanitiser::clean_value(value))
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.store(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.inner.remove(key)
    }

    /// Store every pair from `entries`
    pub fn update<I, K, V>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        for (key, value) in entries {
            self.store(key.into(), value.into());
        }
    }

    /// Store `value` only if `key` is absent, then return the stored value
    pub fn set_default(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &Value {
        self.inner
            .set_default(key, Sanitiser::clean_value(value.into()))
    }

    pub fn as_record(&self) -> &Record {
        &self.inner
    }

    pub fn into_record(self) -> Record {
        self.inner
    }
}

impl Deref for SanitisedRecord {
    type Target = Record;

    fn deref(&self) -> &Record {
        &self.inner
    }
}

impl Mapping for SanitisedRecord {
    fn get(&self, key: &str) -> Option<&Value> {
        self.inner.get(key)
    }

    fn insert(&mut self, key: String, value: Value) -> Option<Value> {
        self.store(key, value)
    }

    fn remove(&mut self, key: &str) -> Option<Value> {
        self.inner.remove(key)
    }

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn entries(&self) -> Box<dyn Iterator<Item = (&String, &Value)> + '_> {
        Box::new(self.inner.iter())
    }

    fn set_default(&mut self, key: String, value: Value) -> &Value {
        SanitisedRecord::set_default(self, key, value)
    }
}

impl From<Record> for SanitisedRecord {
    fn from(record: Record) -> Self {
        let mut sanitised = Self::new();
        sanitised.update(record);
        sanitised
    }
}

impl From<SanitisedRecord> for Record {
    fn from(record: SanitisedRecord) -> Self {
        record.inner
    }
}

impl<K, V> FromIterator<(K, V)> for SanitisedRecord
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut sanitised = Self::new();
        sanitised.update(iter);
        sanitised
    }
}

impl<K, V> Extend<(K, V)> for SanitisedRecord
where
    K: Into<String>,
    V: Into<Value>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.update(iter);
    }
}

impl PartialEq<Record> for SanitisedRecord {
    fn eq(&self, other: &Record) -> bool {
        &self.inner == other
    }
}

impl<'de> Deserialize<'de> for SanitisedRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Record::deserialize(deserializer).map(Self::from)
    }
}

/// A data set whose records escape markup in string values
pub type SanitisedDataSet = DataSet<SanitisedRecord>;

impl DataSet<SanitisedRecord> {
    /// Validate and clean request data
    pub fn validate(&self, request_data: &Record) -> Result<SanitisedRecord, ValidationError> {
        self.validate_object(request_data)
    }
}
