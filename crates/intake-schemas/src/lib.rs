//! Intake Schemas - schema declarations, coercion rules and the record validator
//!
//! This crate turns loosely typed request input into clean, typed records:
//! - **Coercion**: normalize stringified numbers, booleans, dates and
//!   `"None"` placeholders into canonical values
//! - **Format checks**: field-level checks beyond type (UUIDs)
//! - **Validation**: unknown-field, read-only and required-field policies with
//!   a complete per-field error set on rejection
//! - **Loading**: schemas declared in YAML or JSON files
//!
//! ## Quick Start
//!
//! ```rust
//! use intake_schemas::{
//!     CoercionRule, FieldRule, FieldType, FormatCheck, Record, Schema, Validator, Value,
//! };
//!
//! let schema = Schema::new()
//!     .field("pupil_uuid", FieldRule::of(FieldType::String).check_with(FormatCheck::Uuid))
//!     .field("attending", FieldRule::of(FieldType::Boolean).coerce(CoercionRule::ToBool));
//!
//! let input: Record = [
//!     ("pupil_uuid", "7c674878-e544-431c-8c11-f11565299cac"),
//!     ("attending", "True"),
//! ]
//! .into_iter()
//! .collect();
//!
//! let record = Validator::shared().validate(&schema, &input).unwrap();
//! assert_eq!(record["attending"], Value::Bool(true));
//! ```
//!
//! Copyright (c) 2025 Intake Team
//! Licensed under the Apache-2.0 license

pub mod check;
pub mod coerce;
pub mod loader;
pub mod record;
pub mod schema;
pub mod validation;
pub mod value;

// Re-export commonly used types for convenience
pub use check::FormatCheck;
pub use coerce::{CoercionError, CoercionRule};
pub use loader::{load_schema, LoaderError, LoaderResult};
pub use record::{Mapping, Record};
pub use schema::{FieldRule, FieldType, Schema};
pub use validation::{
    validate, ConfigOverrides, ErrorSet, ValidationError, Validator, ValidatorConfig,
};
pub use value::Value;
