//! Output formatting and writing utilities
//!
//! Records and error sets are rendered either for people (aligned
//! `field: value` blocks) or as JSON/YAML for other programs.

use crate::cli::OutputFormat;
use crate::error::Result;
use colored::Colorize;
use intake_schemas::validation::ErrorSet;
use intake_schemas::{Record, Value};
use serde::Serialize;
use std::io::{self, Write};
use tracing::{debug, trace};

/// Formatting for each output format
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Format one validated record
    fn format_record(&self, record: &Record) -> Result<String>;

    /// Format a list of validated records
    fn format_records(&self, records: &[Record]) -> Result<String>;

    /// Format the per-field errors of a rejected record
    fn format_errors(&self, errors: &ErrorSet) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty | OutputFormat::Human => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
        }
    }

    fn format_record(&self, record: &Record) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_record_human(record)),
            _ => self.format(record),
        }
    }

    fn format_records(&self, records: &[Record]) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_records_human(records)),
            _ => self.format(&records),
        }
    }

    fn format_errors(&self, errors: &ErrorSet) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_errors_human(errors)),
            _ => self.format(&serde_json::json!({ "errors": errors })),
        }
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    quiet: bool,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer on stdout
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool) -> Self {
        Self::with_writer(format, use_color, quiet, Box::new(io::stdout()))
    }

    /// Create an output writer with a custom writer
    pub fn with_writer(format: OutputFormat, use_color: bool, quiet: bool, writer: Box<dyn Write>) -> Self {
        Self {
            format,
            use_color,
            quiet,
            writer,
        }
    }

    /// Write raw output
    pub fn write(&mut self, content: &str) -> Result<()> {
        write!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write an info message
    pub fn info(&mut self, message: &str) -> Result<()> {
        debug!("Output info: {}", message);

        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&format!("{} {}", "ℹ".blue(), message))
        } else {
            self.writeln(&format!("INFO: {}", message))
        }
    }

    /// Write a success message
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.green().to_string())
        } else {
            self.writeln(message)
        }
    }

    /// Write a warning message
    pub fn warning(&mut self, message: &str) -> Result<()> {
        if self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.yellow().to_string())
        } else {
            self.writeln(&format!("WARNING: {}", message))
        }
    }

    /// Write an error message
    pub fn error(&mut self, message: &str) -> Result<()> {
        if self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.red().to_string())
        } else {
            self.writeln(&format!("ERROR: {}", message))
        }
    }

    pub fn record(&mut self, record: &Record) -> Result<()> {
        trace!("Outputting record with {} field(s)", record.len());
        let formatted = self.format.format_record(record)?;
        self.emit(&formatted)
    }

    pub fn records(&mut self, records: &[Record]) -> Result<()> {
        trace!("Outputting {} record(s)", records.len());
        let formatted = self.format.format_records(records)?;
        self.emit(&formatted)
    }

    /// Write the errors of a rejected record
    pub fn errors(&mut self, errors: &ErrorSet) -> Result<()> {
        let formatted = self.format.format_errors(errors)?;
        if self.use_color && self.format == OutputFormat::Human {
            return self.emit(&formatted.red().to_string());
        }
        self.emit(&formatted)
    }

    fn emit(&mut self, formatted: &str) -> Result<()> {
        if formatted.ends_with('\n') {
            self.write(formatted)
        } else {
            self.writeln(formatted)
        }
    }
}

fn human_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// `field: value` lines, names padded to a common width
pub fn format_record_human(record: &Record) -> String {
    if record.is_empty() {
        return "(empty record)".to_string();
    }

    let width = record.keys().map(|key| key.len()).max().unwrap_or(0);
    record
        .iter()
        .map(|(key, value)| format!("  {:width$}  {}", format!("{}:", key), human_value(value), width = width + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_records_human(records: &[Record]) -> String {
    if records.is_empty() {
        return "No records".to_string();
    }

    records
        .iter()
        .enumerate()
        .map(|(index, record)| format!("Record {}\n{}", index + 1, format_record_human(record)))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn format_errors_human(errors: &ErrorSet) -> String {
    errors
        .iter()
        .flat_map(|(field, messages)| {
            messages
                .iter()
                .map(move |message| format!("  ✗ {}: {}", field, message))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct Captured(Rc<RefCell<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8(self.0.borrow().clone()).unwrap()
        }
    }

    fn writer(format: OutputFormat, quiet: bool) -> (OutputWriter, Captured) {
        let captured = Captured::default();
        let writer = OutputWriter::with_writer(format, false, quiet, Box::new(captured.clone()));
        (writer, captured)
    }

    fn pupil() -> Record {
        Record::from_json(json!({"name": "Ada", "age": 12})).unwrap()
    }

    #[test]
    fn test_human_record_is_aligned() {
        let text = format_record_human(&pupil());
        assert_eq!(text, "  age:   12\n  name:  Ada");
    }

    #[test]
    fn test_human_records_are_numbered() {
        let text = format_records_human(&[pupil(), Record::new()]);
        assert!(text.starts_with("Record 1\n"));
        assert!(text.contains("Record 2\n(empty record)"));
        assert_eq!(format_records_human(&[]), "No records");
    }

    #[test]
    fn test_human_errors_list_every_message() {
        let mut errors = ErrorSet::new();
        errors.add("age", "must be of integer type");
        errors.add("age", "second");
        errors.add("nickname", "unknown field");

        assert_eq!(
            format_errors_human(&errors),
            "  ✗ age: must be of integer type\n  ✗ age: second\n  ✗ nickname: unknown field"
        );
    }

    #[test]
    fn test_json_record_output() {
        let (mut output, captured) = writer(OutputFormat::Json, false);
        output.record(&pupil()).unwrap();
        assert_eq!(captured.text(), "{\"age\":12,\"name\":\"Ada\"}\n");
    }

    #[test]
    fn test_json_errors_are_wrapped() {
        let mut errors = ErrorSet::new();
        errors.add("age", "required field");

        let (mut output, captured) = writer(OutputFormat::Json, false);
        output.errors(&errors).unwrap();
        assert_eq!(captured.text(), "{\"errors\":{\"age\":[\"required field\"]}}\n");
    }

    #[test]
    fn test_yaml_records_output() {
        let (mut output, captured) = writer(OutputFormat::Yaml, false);
        output.records(&[pupil()]).unwrap();
        assert_eq!(captured.text(), "- age: 12\n  name: Ada\n");
    }

    #[test]
    fn test_messages_only_in_human_mode() {
        let (mut output, captured) = writer(OutputFormat::Json, false);
        output.info("hello").unwrap();
        output.success("done").unwrap();
        output.error("bad").unwrap();
        assert!(captured.text().is_empty());

        let (mut output, captured) = writer(OutputFormat::Human, false);
        output.info("hello").unwrap();
        output.error("bad").unwrap();
        assert_eq!(captured.text(), "INFO: hello\nERROR: bad\n");
    }

    #[test]
    fn test_quiet_suppresses_info_but_not_errors() {
        let (mut output, captured) = writer(OutputFormat::Human, true);
        output.info("hello").unwrap();
        output.success("done").unwrap();
        output.error("bad").unwrap();
        assert_eq!(captured.text(), "ERROR: bad\n");
    }
}
