//! Loading schemas and documents from YAML or JSON files
//!
//! A schema file is either a bare field map or a data set definition with
//! the field map under a `schema` key:
//!
//! ```yaml
//! name: pupils
//! allow_unknown: true
//! schema:
//!   pupil_uuid: { type: string, check_with: uuid }
//! ```
//!
//! Copyright (c) 2025 Intake Team
//! Licensed under the Apache-2.0 license

pub mod error;
pub mod parser;

pub use error::{LoaderError, LoaderResult};
pub use parser::{Format, SchemaParser};

use crate::schema::Schema;
use serde_json::Value;
use std::path::Path;

/// Read a file into a JSON value
pub fn load_document(path: &Path) -> LoaderResult<Value> {
    SchemaParser::new().parse_file(path)
}

/// Read a schema from a bare schema file or a data set definition
pub fn load_schema(path: &Path) -> LoaderResult<Schema> {
    let value = load_document(path)?;
    schema_from_value(value, path)
}

/// Build a schema from parsed content, unwrapping a `schema` key if present
pub fn schema_from_value(value: Value, path: &Path) -> LoaderResult<Schema> {
    let declaration = match value {
        Value::Object(mut map) if map.contains_key("schema") => map
            .remove("schema")
            .unwrap_or(Value::Null),
        Value::Object(map) => Value::Object(map),
        other => {
            return Err(LoaderError::invalid_schema(
                path.to_path_buf(),
                format!("expected a mapping at the root, found {}", json_type(&other)),
            ))
        }
    };

    Schema::from_json(declaration)
        .map_err(|e| LoaderError::invalid_schema(path.to_path_buf(), e.to_string()))
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "mapping",
    }
}
