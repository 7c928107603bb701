//! Validator tests for every coercion rule and the UUID check
//!
//! Each case declares a small schema, validates a raw document with the
//! default configuration and compares the normalized record.

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::json;
use intake_schemas::{
    load_schema, FieldRule, FieldType, Record, Schema, Validator, ValidatorConfig, Value,
};

fn schema(value: serde_json::Value) -> Schema {
    Schema::from_json(value).unwrap()
}

fn record(value: serde_json::Value) -> Record {
    Record::from_json(value).unwrap()
}

fn assert_normalizes(schema: &Schema, data: Record, expected: Record) {
    let result = Validator::shared().validate(schema, &data);
    assert!(result.is_ok(), "Should be valid: {:?}", result);
    assert_eq!(result.unwrap(), expected);
}

#[cfg(test)]
mod coercion_rules {
    use super::*;

    #[test]
    fn test_uuids() {
        let schema = schema(json!({"string_1": {"type": "string", "check_with": "uuid"}}));
        let data = record(json!({"string_1": "7c674878-e544-431c-8c11-f11565299cac"}));

        assert_normalizes(&schema, data.clone(), data);
    }

    #[test]
    fn test_to_string() {
        let schema = schema(json!({
            "string_1": {"type": "string", "coerce": "to_string"},
            "string_2": {"type": "string", "coerce": "to_string"},
            "string_3": {"type": "string", "coerce": "to_string"},
        }));
        let data = record(json!({
            "string_1": "This is a normal string",
            "string_2": "None",
            "string_3": null,
        }));
        let expected = record(json!({
            "string_1": "This is a normal string",
            "string_2": "",
            "string_3": "",
        }));

        assert_normalizes(&schema, data, expected);
    }

    #[test]
    fn test_to_nullable_string() {
        let rule = json!({"type": "string", "nullable": true, "coerce": "to_nullable_string"});
        let schema = schema(json!({
            "string_1": rule, "string_2": rule, "string_3": rule, "string_4": rule,
        }));
        let data = record(json!({
            "string_1": "This is a normal string",
            "string_2": "None",
            "string_3": null,
            "string_4": "",
        }));
        let expected = record(json!({
            "string_1": "This is a normal string",
            "string_2": null,
            "string_3": null,
            "string_4": null,
        }));

        assert_normalizes(&schema, data, expected);
    }

    #[test]
    fn test_to_integer() {
        let rule = json!({"type": "integer", "coerce": "to_integer"});
        let schema = schema(json!({"integer_1": rule, "integer_2": rule, "integer_3": rule}));
        let data = record(json!({"integer_1": 12345, "integer_2": "None", "integer_3": null}));
        let expected = record(json!({"integer_1": 12345, "integer_2": 0, "integer_3": 0}));

        assert_normalizes(&schema, data, expected);
    }

    #[test]
    fn test_to_nullable_integer() {
        let rule = json!({"type": "integer", "nullable": true, "coerce": "to_nullable_integer"});
        let schema = schema(json!({
            "integer_1": rule, "integer_2": rule, "integer_3": rule, "integer_4": rule,
        }));
        let data = record(json!({
            "integer_1": 12345,
            "integer_2": "None",
            "integer_3": null,
            "integer_4": "",
        }));
        let expected = record(json!({
            "integer_1": 12345,
            "integer_2": null,
            "integer_3": null,
            "integer_4": null,
        }));

        assert_normalizes(&schema, data, expected);
    }

    #[test]
    fn test_to_boolean() {
        let rule = json!({"type": "boolean", "coerce": "to_bool"});
        let names = ["boolean_1", "boolean_2", "boolean_3", "boolean_4", "boolean_5", "boolean_6", "boolean_7"];
        let schema: Schema = names
            .iter()
            .map(|name| (name.to_string(), serde_json::from_value(rule.clone()).unwrap()))
            .collect();
        let data = record(json!({
            "boolean_1": true,
            "boolean_2": "True",
            "boolean_3": "",
            "boolean_4": "False",
            "boolean_5": false,
            "boolean_6": "None",
            "boolean_7": null,
        }));
        let expected = record(json!({
            "boolean_1": true,
            "boolean_2": true,
            "boolean_3": false,
            "boolean_4": false,
            "boolean_5": false,
            "boolean_6": false,
            "boolean_7": false,
        }));

        assert_normalizes(&schema, data, expected);
    }

    #[test]
    fn test_to_float() {
        let rule = json!({"type": "float", "coerce": "to_float"});
        let schema = schema(json!({"float_1": rule, "float_2": rule, "float_3": rule, "float_4": rule}));
        let data = record(json!({"float_1": 0.0005, "float_2": "", "float_3": "None", "float_4": null}));
        let expected = record(json!({"float_1": 0.0005, "float_2": 0.0, "float_3": 0.0, "float_4": 0.0}));

        assert_normalizes(&schema, data, expected);
    }

    #[test]
    fn test_to_nullable_float() {
        let rule = json!({"type": "float", "nullable": true, "coerce": "to_nullable_float"});
        let schema = schema(json!({"float_1": rule, "float_2": rule, "float_3": rule, "float_4": rule}));
        let data = record(json!({"float_1": 0.0005, "float_2": "", "float_3": null, "float_4": "None"}));
        let expected = record(json!({"float_1": 0.0005, "float_2": null, "float_3": null, "float_4": null}));

        assert_normalizes(&schema, data, expected);
    }

    #[test]
    fn test_to_date() {
        let schema = schema(json!({
            "string_1": {"type": "date", "nullable": true, "coerce": "to_date"},
            "string_2": {"type": "date", "coerce": "to_date"},
        }));
        let data = record(json!({"string_1": "This is a normal string", "string_2": "1900-01-31"}));

        let mut expected = Record::new();
        expected.insert("string_1", Value::Null);
        expected.insert("string_2", NaiveDate::from_ymd_opt(1900, 1, 31).unwrap());

        assert_normalizes(&schema, data, expected);
    }

    #[test]
    fn test_to_datetime() {
        let schema = schema(json!({
            "string_1": {"type": "datetime", "nullable": true, "coerce": "to_datetime"},
            "string_2": {"type": "datetime", "coerce": "to_datetime"},
        }));
        let data = record(json!({
            "string_1": "This is a normal string",
            "string_2": "1900-01-31T09:30:00.532649",
        }));

        let mut expected = Record::new();
        expected.insert("string_1", Value::Null);
        expected.insert(
            "string_2",
            NaiveDateTime::parse_from_str("1900-01-31 09:30:00.532649", "%Y-%m-%d %H:%M:%S%.f").unwrap(),
        );

        assert_normalizes(&schema, data, expected);
    }

    #[test]
    fn test_unparsable_date_without_nullable_is_rejected() {
        let schema = schema(json!({"start": {"type": "date", "coerce": "to_date"}}));
        let err = Validator::shared()
            .validate(&schema, &record(json!({"start": "31/01/1900"})))
            .unwrap_err();
        assert_eq!(
            err.errors().unwrap().messages("start"),
            ["null value not allowed".to_string()]
        );
    }
}

#[cfg(test)]
mod field_policies {
    use super::*;

    #[test]
    fn test_invalid_uuid_reports_on_field() {
        let schema = schema(json!({"pupil_uuid": {"type": "string", "check_with": "uuid"}}));
        let err = Validator::shared()
            .validate(&schema, &record(json!({"pupil_uuid": "not-a-uuid"})))
            .unwrap_err();

        let errors = err.errors().unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.messages("pupil_uuid"), ["Must be a UUID".to_string()]);
    }

    #[test]
    fn test_unknown_field_rejected_by_default() {
        let schema = Schema::new().field("name", FieldRule::of(FieldType::String));
        let data = record(json!({"name": "Ada", "nickname": "Countess"}));

        let err = Validator::shared().validate(&schema, &data).unwrap_err();
        assert_eq!(err.errors().unwrap().messages("nickname"), ["unknown field".to_string()]);
    }

    #[test]
    fn test_allow_unknown_keeps_field_unchanged() {
        let schema = Schema::new().field("name", FieldRule::of(FieldType::String));
        let data = record(json!({"name": "Ada", "nickname": {"short": "A"}}));

        let validator = Validator::new(ValidatorConfig::new().with_allow_unknown(true));
        assert_eq!(validator.validate(&schema, &data).unwrap(), data);
    }

    #[test]
    fn test_purge_unknown_wins_over_allow_unknown() {
        let schema = Schema::new().field("name", FieldRule::of(FieldType::String));
        let data = record(json!({"name": "Ada", "nickname": "Countess"}));

        let validator = Validator::new(
            ValidatorConfig::new()
                .with_allow_unknown(true)
                .with_purge_unknown(true),
        );
        assert_eq!(
            validator.validate(&schema, &data).unwrap(),
            record(json!({"name": "Ada"}))
        );
    }

    #[test]
    fn test_require_all() {
        let schema = schema(json!({
            "name": {"type": "string"},
            "age": {"type": "integer"},
        }));
        let data = record(json!({"name": "Ada"}));

        assert!(Validator::shared().validate(&schema, &data).is_ok());

        let strict = Validator::new(ValidatorConfig::new().with_require_all(true));
        let err = strict.validate(&schema, &data).unwrap_err();
        assert_eq!(err.errors().unwrap().messages("age"), ["required field".to_string()]);
    }

    #[test]
    fn test_output_keys_are_sorted() {
        let schema = schema(json!({"b": {}, "a": {}, "c": {}}));
        let output = Validator::shared()
            .validate(&schema, &record(json!({"c": 1, "a": 2, "b": 3})))
            .unwrap();
        assert_eq!(output.keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }
}

#[cfg(test)]
mod schema_files {
    use super::*;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    fn temp_file(suffix: &str) -> NamedTempFile {
        Builder::new().suffix(suffix).tempfile().unwrap()
    }

    #[test]
    fn test_load_bare_yaml_schema() {
        let mut file = temp_file(".yaml");
        writeln!(file, "pupil_uuid:\n  type: string\n  check_with: uuid").unwrap();

        let schema = load_schema(file.path()).unwrap();
        assert!(schema.contains("pupil_uuid"));
    }

    #[test]
    fn test_load_definition_json_schema() {
        let mut file = temp_file(".json");
        write!(
            file,
            r#"{{"name": "pupils", "allow_unknown": true, "schema": {{"age": {{"type": "integer"}}}}}}"#
        )
        .unwrap();

        let schema = load_schema(file.path()).unwrap();
        assert_eq!(schema.names().collect::<Vec<_>>(), vec!["age"]);
    }

    #[test]
    fn test_unknown_rule_is_descriptive() {
        let mut file = temp_file(".yaml");
        writeln!(file, "age:\n  type: integer\n  coerce: to_age").unwrap();

        let err = load_schema(file.path()).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Invalid schema"), "{}", message);
        assert!(message.contains("to_age"), "{}", message);
    }
}
