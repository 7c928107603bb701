//! Validation command handler and related utilities

use crate::cli::{ValidateArgs, ValidationMode};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use intake_core::{DataSet, SanitisedRecord};
use intake_schemas::loader::load_document;
use intake_schemas::{Record, ValidationError, Value};
use serde_json::Value as JsonValue;
use tracing::{debug, info, instrument, warn};

/// Data file contents, shaped for the requested mode
#[derive(Debug)]
enum Input {
    Object(Record),
    Objects(Vec<Record>),
    One(Record),
    Many(Record),
}

/// Records accepted by the data set
#[derive(Debug, PartialEq)]
enum Validated {
    One(Record),
    Many(Vec<Record>),
}

/// Handle the validate command
#[instrument(skip(args, config, output), fields(data = %args.data.display(), mode = args.mode.name(), sanitise = args.sanitise))]
pub fn handle_validate(args: ValidateArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::with_details("validate_command", &format!("data: {}", args.data.display()));

    for path in [&args.schema, &args.data] {
        if !path.exists() {
            return Err(Error::FileNotFound { path: path.clone() });
        }
    }

    output.info(&format!(
        "Validating {} against {}",
        args.data.display(),
        args.schema.display()
    ))?;

    let input = {
        let _load_timer = Timer::new("data_loading");
        read_input(args.mode, load_document(&args.data)?)?
    };

    let result = if args.sanitise {
        let data_set = prepare::<SanitisedRecord>(&args, config)?;
        run_data_set(&data_set, input)
    } else {
        let data_set = prepare::<Record>(&args, config)?;
        run_data_set(&data_set, input)
    };

    report(result, output)
}

/// Load the definition and layer the command-line overrides on top
fn prepare<R: From<Record>>(args: &ValidateArgs, config: &Config) -> Result<DataSet<R>> {
    let data_set = DataSet::<R>::load(&args.schema)?;
    let overrides = data_set.overrides().merge(&args.overrides.to_overrides());
    let data_set = data_set
        .with_overrides(overrides)
        .with_validator(config.validator());

    debug!(
        "Data set '{}' runs with {:?}",
        data_set.name(),
        data_set.effective_config()
    );
    Ok(data_set)
}

fn read_input(mode: ValidationMode, value: JsonValue) -> Result<Input> {
    if mode == ValidationMode::Objects {
        return match value {
            JsonValue::Array(items) => items
                .into_iter()
                .map(Record::from_json)
                .collect::<std::result::Result<Vec<_>, _>>()
                .map(Input::Objects)
                .map_err(|e| shape_error(mode, e)),
            other => Err(Error::invalid_args(format!(
                "--mode objects expects a list of mappings, found {}",
                Value::from(other).type_name()
            ))),
        };
    }

    let record = Record::from_json(value).map_err(|e| shape_error(mode, e))?;
    Ok(match mode {
        ValidationMode::One => Input::One(record),
        ValidationMode::Many => Input::Many(record),
        _ => Input::Object(record),
    })
}

fn shape_error(mode: ValidationMode, error: ValidationError) -> Error {
    Error::invalid_args(format!("--mode {}: {}", mode.name(), error))
}

fn run_data_set<R>(data_set: &DataSet<R>, input: Input) -> std::result::Result<Validated, ValidationError>
where
    R: From<Record> + Into<Record>,
{
    let timer = Timer::with_details("validation", data_set.name());

    let result = match input {
        Input::Object(record) => data_set.validate_object(&record).map(|r| Validated::One(r.into())),
        Input::One(envelope) => data_set.validate_one(&envelope).map(|r| Validated::One(r.into())),
        Input::Objects(records) => data_set.validate_objects(&records).map(into_records),
        Input::Many(envelope) => data_set.validate_many(&envelope).map(into_records),
    };

    debug!(
        elapsed_us = timer.elapsed().as_micros() as u64,
        "Data set '{}' finished validating",
        data_set.name()
    );
    result
}

fn into_records<R: Into<Record>>(records: Vec<R>) -> Validated {
    Validated::Many(records.into_iter().map(Into::into).collect())
}

fn report(result: std::result::Result<Validated, ValidationError>, output: &mut OutputWriter) -> Result<()> {
    match result {
        Ok(Validated::One(record)) => {
            info!("Record accepted with {} field(s)", record.len());
            output.success("✓ Record is valid")?;
            output.record(&record)
        }
        Ok(Validated::Many(records)) => {
            info!("{} record(s) accepted", records.len());
            output.success(&format!("✓ {} record(s) valid", records.len()))?;
            output.records(&records)
        }
        Err(ValidationError::SchemaViolation(errors)) => {
            warn!("Validation failed on {} field(s)", errors.len());
            output.error("✗ Validation failed")?;
            output.errors(&errors)?;
            Err(Error::ValidationFailed { fields: errors.len() })
        }
        Err(err @ ValidationError::NotADocument { .. }) => Err(Error::invalid_args(err.to_string())),
    }
}
