//! Shared fixtures for data set tests

#![allow(dead_code)]

use intake_core::schemas::Schema;
use intake_core::Record;
use serde_json::json;

pub const PUPIL_UUID: &str = "7c674878-e544-431c-8c11-f11565299cac";

/// Schema exercising every coercion rule alongside the UUID check
pub fn shared_schema() -> Schema {
    Schema::from_json(json!({
        "key_string": {"type": "string", "coerce": "to_string"},
        "key_none_string": {"type": "string", "nullable": true, "coerce": "to_string"},
        "key_nullable_string": {"type": "string", "nullable": true, "coerce": "to_nullable_string"},
        "key_uuid_string": {"type": "string", "check_with": "uuid"},
        "key_integer": {"type": "integer", "coerce": "to_integer"},
        "key_none_integer": {"type": "integer", "nullable": true, "coerce": "to_integer"},
        "key_nullable_integer": {"type": "integer", "nullable": true, "coerce": "to_nullable_integer"},
        "key_bool": {"type": "boolean", "coerce": "to_bool"},
        "key_none_bool": {"type": "boolean", "nullable": true, "coerce": "to_bool"},
        "key_float": {"type": "float", "coerce": "to_float"},
        "key_none_float": {"type": "float", "coerce": "to_float"},
        "key_nullable_float": {"type": "float", "nullable": true, "coerce": "to_nullable_float"},
    }))
    .unwrap()
}

/// Schema with a single UUID field
pub fn uuid_schema() -> Schema {
    Schema::from_json(json!({"string_1": {"type": "string", "check_with": "uuid"}})).unwrap()
}

/// Schema mixing strings, integers, booleans and floats
pub fn mixed_schema() -> Schema {
    Schema::from_json(json!({
        "string_1": {"type": "string", "check_with": "uuid"},
        "string_2": {"type": "string", "coerce": "to_string"},
        "string_3": {"type": "string", "nullable": true, "coerce": "to_nullable_string"},
        "integer_1": {"type": "integer", "coerce": "to_integer"},
        "integer_2": {"type": "integer", "nullable": true, "coerce": "to_nullable_integer"},
        "boolean_1": {"coerce": "to_bool"},
        "float_1": {"type": "float", "coerce": "to_float"},
        "float_2": {"type": "float", "nullable": true, "coerce": "to_nullable_float"},
    }))
    .unwrap()
}

pub fn record(value: serde_json::Value) -> Record {
    Record::from_json(value).unwrap()
}
