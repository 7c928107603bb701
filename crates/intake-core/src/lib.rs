//! Intake Core - schema-bound data sets for request boundaries
//!
//! This crate builds on `intake-schemas` to provide the pieces services use
//! directly when accepting input.
//!
//! # Main Components
//!
//! - **Data sets**: a schema plus validator overrides with single, batch and
//!   envelope validation entry points
//! - **Sanitised data sets**: records that escape markup in string values on
//!   every assignment
//! - **Limiter**: rate-limit permits over a storage backend with a startup
//!   health check and optional in-memory fallback
//! - **Error Handling**: error types using `thiserror` and `anyhow`
//!
//! # Example
//!
//! ```rust
//! use intake_core::{DataSet, Record};
//! use intake_core::schemas::{CoercionRule, FieldRule, FieldType, Schema, Value};
//! use serde_json::json;
//!
//! let contacts: DataSet = DataSet::new(
//!     "contacts",
//!     Schema::new().field(
//!         "age",
//!         FieldRule::of(FieldType::Integer).nullable().coerce(CoercionRule::ToNullableInteger),
//!     ),
//! )
//! .allow_unknown(true);
//!
//! let response = Record::from_json(json!({"data": [{"age": "", "email": "a@b.c"}]})).unwrap();
//! let records = contacts.validate_many(&response).unwrap();
//! assert_eq!(records[0]["age"], Value::Null);
//! ```

pub mod data_set;
pub mod error;
pub mod limiter;
pub mod sanitise;

pub use intake_schemas as schemas;

// Re-export main types for convenience
pub use data_set::{DataSet, DataSetDefinition};
pub use error::{Error, Result};
pub use intake_schemas::{Mapping, Record, ValidationError, Validator, ValidatorConfig};
pub use limiter::{Acquire, Limiter, LimiterConfig, MemoryStorage, RateLimit, Storage};
pub use sanitise::{SanitisedDataSet, SanitisedRecord, Sanitiser};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
