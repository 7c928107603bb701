//! Schema-driven validation of records
//!
//! Per field present in the input the validator applies, in order: the
//! unknown-field policy, the read-only policy, coercion, nullability, the
//! type check and finally the format check. Schema fields missing from the
//! input are then checked against `required` and `require_all`.
//!
//! Copyright (c) 2025 Intake Team
//! Licensed under the Apache-2.0 license

pub mod config;
pub mod error;
pub mod validator;

pub use config::{ConfigOverrides, ValidatorConfig};
pub use error::{ErrorSet, ValidationError};
pub use validator::Validator;

use crate::record::Record;
use crate::schema::Schema;

/// Validate one document under an explicit configuration
///
/// # Examples
///
/// ```rust
/// use intake_schemas::{validate, FieldRule, FieldType, CoercionRule, Record, Schema, ValidatorConfig, Value};
///
/// let schema = Schema::new().field(
///     "age",
///     FieldRule::of(FieldType::Integer).coerce(CoercionRule::ToInteger),
/// );
/// let document: Record = [("age", "12")].into_iter().collect();
///
/// let record = validate(&document, &schema, ValidatorConfig::default()).unwrap();
/// assert_eq!(record["age"], Value::Integer(12));
/// ```
pub fn validate(
    document: &Record,
    schema: &Schema,
    config: ValidatorConfig,
) -> Result<Record, ValidationError> {
    Validator::new(config).validate(schema, document)
}
