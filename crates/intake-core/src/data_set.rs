//! Schema-bound data sets
//!
//! A [`DataSet`] ties a schema to a set of validator overrides and exposes
//! the validation entry points used at request boundaries: single records,
//! lists of records, and API envelopes carrying their payload under `data`.
//!
//! Each call computes its own effective configuration from the validator's
//! baseline and the data set's overrides. Nothing is written back, so data
//! sets sharing a validator never observe each other's settings.
//!
//! Copyright (c) 2025 Intake Team
//! Licensed under the Apache-2.0 license

use crate::error::Result;
use intake_schemas::loader::{load_document, schema_from_value, LoaderError};
use intake_schemas::{
    ConfigOverrides, Record, Schema, ValidationError, Validator, ValidatorConfig, Value,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, trace};

/// Key holding the payload of an API envelope
pub const ENVELOPE_KEY: &str = "data";

/// On-disk declaration of a data set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataSetDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub schema: Schema,

    #[serde(flatten)]
    pub overrides: ConfigOverrides,
}

/// A schema plus validator overrides, yielding records of type `R`
pub struct DataSet<R = Record> {
    name: String,
    schema: Arc<Schema>,
    overrides: ConfigOverrides,
    validator: Arc<Validator>,
    _record: PhantomData<fn() -> R>,
}

impl<R> Clone for DataSet<R> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            schema: Arc::clone(&self.schema),
            overrides: self.overrides,
            validator: Arc::clone(&self.validator),
            _record: PhantomData,
        }
    }
}

impl<R> fmt::Debug for DataSet<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataSet")
            .field("name", &self.name)
            .field("fields", &self.schema.len())
            .field("overrides", &self.overrides)
            .field("validator", &self.validator.config())
            .finish()
    }
}

impl<R: From<Record>> DataSet<R> {
    /// Create a data set using the shared default validator
    pub fn new(name: impl Into<String>, schema: impl Into<Arc<Schema>>) -> Self {
        Self {
            name: name.into(),
            schema: schema.into(),
            overrides: ConfigOverrides::default(),
            validator: Validator::shared(),
            _record: PhantomData,
        }
    }

    /// Create a data set from its declaration
    pub fn from_definition(definition: DataSetDefinition, default_name: &str) -> Self {
        let name = definition
            .name
            .unwrap_or_else(|| default_name.to_string());
        Self::new(name, definition.schema).with_overrides(definition.overrides)
    }

    /// Load a data set definition (or a bare schema) from a YAML or JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let value = load_document(path)?;
        let default_name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("data_set");

        let definition = if value.get("schema").is_some() {
            serde_json::from_value::<DataSetDefinition>(value)
                .map_err(|e| LoaderError::invalid_schema(path.to_path_buf(), e.to_string()))?
        } else {
            DataSetDefinition {
                name: None,
                schema: schema_from_value(value, path)?,
                overrides: ConfigOverrides::default(),
            }
        };

        debug!(
            "Loaded data set definition '{}' with {} fields from {}",
            definition.name.as_deref().unwrap_or(default_name),
            definition.schema.len(),
            path.display()
        );
        Ok(Self::from_definition(definition, default_name))
    }

    pub fn allow_unknown(mut self, value: bool) -> Self {
        self.overrides.allow_unknown = Some(value);
        self
    }

    pub fn ignore_none_values(mut self, value: bool) -> Self {
        self.overrides.ignore_none_values = Some(value);
        self
    }

    pub fn purge_readonly(mut self, value: bool) -> Self {
        self.overrides.purge_readonly = Some(value);
        self
    }

    pub fn purge_unknown(mut self, value: bool) -> Self {
        self.overrides.purge_unknown = Some(value);
        self
    }

    pub fn require_all(mut self, value: bool) -> Self {
        self.overrides.require_all = Some(value);
        self
    }

    /// Replace every override at once
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Use `validator` as this data set's baseline
    pub fn with_validator(mut self, validator: Arc<Validator>) -> Self {
        self.validator = validator;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn overrides(&self) -> &ConfigOverrides {
        &self.overrides
    }

    pub fn overrides_mut(&mut self) -> &mut ConfigOverrides {
        &mut self.overrides
    }

    pub fn validator(&self) -> &Arc<Validator> {
        &self.validator
    }

    /// Replace this data set's validator, and with it the baseline configuration
    pub fn set_validator(&mut self, validator: Arc<Validator>) {
        debug!(
            "Data set '{}' switched validator baseline to {:?}",
            self.name,
            validator.config()
        );
        self.validator = validator;
    }

    /// Configuration a validation call would run under right now
    pub fn effective_config(&self) -> ValidatorConfig {
        self.overrides.apply(*self.validator.config())
    }

    fn call_validator(&self) -> Validator {
        self.validator.with_config(self.effective_config())
    }

    /// Validate a single record
    pub fn validate_object(&self, object: &Record) -> std::result::Result<R, ValidationError> {
        let validator = self.call_validator();
        trace!("Validating record against data set '{}'", self.name);
        self.run(&validator, object)
    }

    /// Validate records in order, stopping at the first invalid one
    pub fn validate_objects<'a, I>(&self, objects: I) -> std::result::Result<Vec<R>, ValidationError>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let validator = self.call_validator();
        let mut collection = Vec::new();

        for (index, object) in objects.into_iter().enumerate() {
            match self.run(&validator, object) {
                Ok(record) => collection.push(record),
                Err(err) => {
                    debug!(
                        "Data set '{}' rejected item {} after {} accepted",
                        self.name,
                        index,
                        collection.len()
                    );
                    return Err(err);
                }
            }
        }

        Ok(collection)
    }

    /// Validate the first item of an envelope's `data`.
    ///
    /// Returns an empty record when there is nothing to validate.
    pub fn validate_one(&self, envelope: &Record) -> std::result::Result<R, ValidationError> {
        let first = match envelope.get(ENVELOPE_KEY) {
            Some(data) if carries_no_data(data) => None,
            Some(Value::List(items)) => items.first(),
            Some(item) => Some(item),
            None => None,
        };

        match first {
            Some(item) => self.validate_object(&Record::from_value(item.clone())?),
            None => {
                trace!("Envelope for data set '{}' carries no data", self.name);
                Ok(R::from(Record::new()))
            }
        }
    }

    /// Validate every item of an envelope's `data`
    pub fn validate_many(&self, envelope: &Record) -> std::result::Result<Vec<R>, ValidationError> {
        let items = envelope_items(envelope)?;
        self.validate_objects(&items)
    }

    fn run(&self, validator: &Validator, object: &Record) -> std::result::Result<R, ValidationError> {
        match validator.validate(&self.schema, object) {
            Ok(record) => Ok(R::from(record)),
            Err(err) => {
                if let Some(errors) = err.errors() {
                    debug!(
                        "Data set '{}' rejected record: {} invalid field(s)",
                        self.name,
                        errors.len()
                    );
                }
                Err(err)
            }
        }
    }
}

/// Records held under an envelope's `data` key
fn envelope_items(envelope: &Record) -> std::result::Result<Vec<Record>, ValidationError> {
    match envelope.get(ENVELOPE_KEY) {
        None => Ok(Vec::new()),
        Some(data) if carries_no_data(data) => Ok(Vec::new()),
        Some(Value::List(items)) => items.iter().cloned().map(Record::from_value).collect(),
        Some(item) => Ok(vec![Record::from_value(item.clone())?]),
    }
}

/// Whether an envelope's `data` is blank: null, false, zero or an empty
/// string, list or mapping
fn carries_no_data(data: &Value) -> bool {
    match data {
        Value::Null | Value::Bool(false) | Value::Integer(0) => true,
        Value::Float(number) => *number == 0.0,
        Value::String(text) => text.is_empty(),
        Value::List(items) => items.is_empty(),
        Value::Map(entries) => entries.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_schemas::{FieldRule, FieldType};
    use serde_json::json;

    fn pupils() -> DataSet {
        DataSet::new(
            "pupils",
            Schema::new().field("name", FieldRule::of(FieldType::String)),
        )
    }

    fn envelope(value: serde_json::Value) -> Record {
        Record::from_json(value).unwrap()
    }

    #[test]
    fn test_effective_config_layers_overrides() {
        let base = Arc::new(Validator::new(ValidatorConfig::new().with_require_all(true)));
        let data_set = pupils().allow_unknown(true).with_validator(base);

        let config = data_set.effective_config();
        assert!(config.allow_unknown);
        assert!(config.require_all);
    }

    #[test]
    fn test_validate_one_accepts_single_mapping() {
        let record = pupils()
            .validate_one(&envelope(json!({"data": {"name": "Ada"}})))
            .unwrap();
        assert_eq!(record["name"], Value::from("Ada"));
    }

    #[test]
    fn test_validate_one_ignores_trailing_items() {
        let record = pupils()
            .validate_one(&envelope(json!({"data": [{"name": "Ada"}, 7]})))
            .unwrap();
        assert_eq!(record.len(), 1);
    }

    #[test]
    fn test_non_mapping_items_are_rejected() {
        let err = pupils()
            .validate_many(&envelope(json!({"data": [{"name": "Ada"}, "Grace"]})))
            .unwrap_err();
        assert_eq!(err, ValidationError::NotADocument { found: "string".to_string() });

        let err = pupils()
            .validate_one(&envelope(json!({"data": [42]})))
            .unwrap_err();
        assert!(matches!(err, ValidationError::NotADocument { .. }));
    }

    #[test]
    fn test_null_data_is_empty() {
        assert!(pupils()
            .validate_many(&envelope(json!({"data": null})))
            .unwrap()
            .is_empty());
        assert!(pupils()
            .validate_one(&envelope(json!({"data": []})))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_blank_data_is_empty_even_when_fields_are_required() {
        let data_set = pupils().require_all(true);

        for data in [json!({}), json!(""), json!(false), json!(0)] {
            let blank = envelope(json!({ "data": data }));
            assert!(data_set.validate_one(&blank).unwrap().is_empty(), "{:?}", blank);
            assert!(data_set.validate_many(&blank).unwrap().is_empty(), "{:?}", blank);
        }
    }

    #[test]
    fn test_scalar_data_is_rejected() {
        let err = pupils()
            .validate_many(&envelope(json!({"data": "Grace"})))
            .unwrap_err();
        assert!(matches!(err, ValidationError::NotADocument { .. }));
    }

    #[test]
    fn test_definition_deserializes_flattened_overrides() {
        let definition: DataSetDefinition = serde_json::from_value(json!({
            "name": "contacts",
            "allow_unknown": true,
            "schema": {"email": {"type": "string"}}
        }))
        .unwrap();

        assert_eq!(definition.name.as_deref(), Some("contacts"));
        assert_eq!(definition.overrides.allow_unknown, Some(true));
        assert_eq!(definition.overrides.require_all, None);

        let data_set: DataSet = DataSet::from_definition(definition, "fallback");
        assert_eq!(data_set.name(), "contacts");
        assert!(data_set.effective_config().allow_unknown);
    }
}
