//! Coercion rules for stringified request values
//!
//! Form posts and upstream APIs tend to hand over everything as text, with
//! `""` or the literal `"None"` standing in for a missing value. Each
//! [`CoercionRule`] maps one raw value onto the canonical typed value the
//! schema expects. Numeric conversions that cannot succeed return a
//! [`CoercionError`]; unparsable dates resolve to null instead.
//!
//! Copyright (c) 2025 Intake Team
//! Licensed under the Apache-2.0 license

use crate::value::{Value, DATE_FORMAT};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Named coercion applied to a field before it is checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoercionRule {
    ToString,
    ToNullableString,
    ToInteger,
    ToNullableInteger,
    ToBool,
    ToFloat,
    ToNullableFloat,
    ToDate,
    ToDatetime,
}

/// A value that a rule could not convert
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct CoercionError {
    /// Rule that was being applied
    pub rule: CoercionRule,
    /// Why the conversion failed
    pub reason: String,
}

impl CoercionError {
    fn new(rule: CoercionRule, reason: impl Into<String>) -> Self {
        Self {
            rule,
            reason: reason.into(),
        }
    }
}

impl CoercionRule {
    /// Every rule, in declaration order
    pub const ALL: [CoercionRule; 9] = [
        CoercionRule::ToString,
        CoercionRule::ToNullableString,
        CoercionRule::ToInteger,
        CoercionRule::ToNullableInteger,
        CoercionRule::ToBool,
        CoercionRule::ToFloat,
        CoercionRule::ToNullableFloat,
        CoercionRule::ToDate,
        CoercionRule::ToDatetime,
    ];

    /// Identifier used in schema declarations
    pub fn name(&self) -> &'static str {
        match self {
            CoercionRule::ToString => "to_string",
            CoercionRule::ToNullableString => "to_nullable_string",
            CoercionRule::ToInteger => "to_integer",
            CoercionRule::ToNullableInteger => "to_nullable_integer",
            CoercionRule::ToBool => "to_bool",
            CoercionRule::ToFloat => "to_float",
            CoercionRule::ToNullableFloat => "to_nullable_float",
            CoercionRule::ToDate => "to_date",
            CoercionRule::ToDatetime => "to_datetime",
        }
    }

    /// Apply the rule to a raw value
    pub fn apply(&self, value: Value) -> Result<Value, CoercionError> {
        match self {
            CoercionRule::ToString => Ok(to_string(value)),
            CoercionRule::ToNullableString => Ok(to_nullable_string(value)),
            CoercionRule::ToInteger => to_integer(value),
            CoercionRule::ToNullableInteger => to_nullable_integer(value),
            CoercionRule::ToBool => Ok(to_bool(value)),
            CoercionRule::ToFloat => to_float(value),
            CoercionRule::ToNullableFloat => to_nullable_float(value),
            CoercionRule::ToDate => Ok(to_date(value)),
            CoercionRule::ToDatetime => Ok(to_datetime(value)),
        }
    }
}

impl fmt::Display for CoercionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CoercionRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CoercionRule::ALL
            .iter()
            .copied()
            .find(|rule| rule.name() == s)
            .ok_or_else(|| format!("unknown coercion rule '{}'", s))
    }
}

/// `""`, `"None"` and null all mean "no value"
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty() || s == "None",
        _ => false,
    }
}

pub fn to_string(value: Value) -> Value {
    if is_blank(&value) {
        return Value::String(String::new());
    }
    Value::String(stringify(&value))
}

pub fn to_nullable_string(value: Value) -> Value {
    if is_blank(&value) {
        return Value::Null;
    }
    Value::String(stringify(&value))
}

pub fn to_integer(value: Value) -> Result<Value, CoercionError> {
    if is_blank(&value) {
        return Ok(Value::Integer(0));
    }
    parse_integer(&value)
        .map(Value::Integer)
        .map_err(|reason| CoercionError::new(CoercionRule::ToInteger, reason))
}

pub fn to_nullable_integer(value: Value) -> Result<Value, CoercionError> {
    if is_blank(&value) {
        return Ok(Value::Null);
    }
    parse_integer(&value)
        .map(Value::Integer)
        .map_err(|reason| CoercionError::new(CoercionRule::ToNullableInteger, reason))
}

/// Only the exact text `"True"` becomes true; anything unrecognised is left
/// for the type check to reject.
pub fn to_bool(value: Value) -> Value {
    match value {
        Value::String(ref s) if s == "True" => Value::Bool(true),
        Value::String(ref s) if s.is_empty() || s == "False" || s == "None" => Value::Bool(false),
        Value::Null => Value::Bool(false),
        other => other,
    }
}

pub fn to_float(value: Value) -> Result<Value, CoercionError> {
    if is_blank(&value) {
        return Ok(Value::Float(0.0));
    }
    parse_float(&value)
        .map(Value::Float)
        .map_err(|reason| CoercionError::new(CoercionRule::ToFloat, reason))
}

pub fn to_nullable_float(value: Value) -> Result<Value, CoercionError> {
    if is_blank(&value) {
        return Ok(Value::Null);
    }
    parse_float(&value)
        .map(Value::Float)
        .map_err(|reason| CoercionError::new(CoercionRule::ToNullableFloat, reason))
}

pub fn to_date(value: Value) -> Value {
    match value {
        Value::Date(_) => value,
        Value::String(s) => parse_date(&s).map(Value::Date).unwrap_or(Value::Null),
        _ => Value::Null,
    }
}

pub fn to_datetime(value: Value) -> Value {
    match value {
        Value::DateTime(_) | Value::ZonedDateTime(_) => value,
        Value::String(s) => parse_datetime(&s).unwrap_or(Value::Null),
        _ => Value::Null,
    }
}

/// Render a value as text.
///
/// Booleans read `True`/`False`, integral floats keep a trailing `.0`, dates
/// use ISO-8601 and containers render as JSON.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Float(f) => format_float(*f),
        Value::String(s) => s.clone(),
        Value::Date(_) | Value::DateTime(_) | Value::ZonedDateTime(_) => match value.to_json() {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        },
        Value::List(_) | Value::Map(_) => value.to_json().to_string(),
    }
}

fn format_float(f: f64) -> String {
    if f.is_nan() {
        return "nan".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    // shortest round-trip digits, exponent form outside 1e-4..1e16
    let scientific = format!("{:e}", f);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((mantissa, exponent)) => (mantissa, exponent.parse::<i32>().unwrap_or(0)),
        None => (scientific.as_str(), 0),
    };
    if !(-4..16).contains(&exponent) {
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{}e{}{:02}", mantissa, sign, exponent.abs());
    }

    let text = f.to_string();
    if text.contains('.') {
        text
    } else {
        format!("{}.0", text)
    }
}

/// Integer conversion: integers as-is, booleans as 1/0, finite floats
/// truncated toward zero, decimal text with an optional sign.
pub fn parse_integer(value: &Value) -> Result<i64, String> {
    match value {
        Value::Integer(i) => Ok(*i),
        Value::Bool(b) => Ok(i64::from(*b)),
        Value::Float(f) => {
            if !f.is_finite() {
                return Err(format!("cannot convert float {} to integer", format_float(*f)));
            }
            let truncated = f.trunc();
            // i64::MIN is exactly representable, i64::MAX is not
            if truncated >= -9_223_372_036_854_775_808.0 && truncated < 9_223_372_036_854_775_808.0 {
                Ok(truncated as i64)
            } else {
                Err(format!("{} is out of integer range", format_float(*f)))
            }
        }
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| format!("'{}' is not a valid integer", s)),
        other => Err(format!("{} value is not a valid integer", other.type_name())),
    }
}

pub fn parse_float(value: &Value) -> Result<f64, String> {
    match value {
        Value::Float(f) => Ok(*f),
        Value::Integer(i) => Ok(*i as f64),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("'{}' is not a valid float", s)),
        other => Err(format!("{} value is not a valid float", other.type_name())),
    }
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    if text.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(text, DATE_FORMAT).ok()
}

const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const ZONED_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M%:z",
];

/// Parse an ISO-8601 datetime.
///
/// Inputs carrying `Z` or an `±HH:MM` offset produce a zoned datetime; a bare
/// date is read as midnight.
pub fn parse_datetime(text: &str) -> Option<Value> {
    if let Some(date) = parse_date(text) {
        return date.and_hms_opt(0, 0, 0).map(Value::DateTime);
    }

    let zoned = match text.strip_suffix('Z') {
        Some(stripped) => Some(format!("{}+00:00", stripped)),
        None if has_offset(text) => Some(text.to_string()),
        None => None,
    };

    match zoned {
        Some(text) => ZONED_DATETIME_FORMATS
            .iter()
            .find_map(|fmt| DateTime::parse_from_str(&text, fmt).ok())
            .map(Value::ZonedDateTime),
        None => NAIVE_DATETIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
            .map(Value::DateTime),
    }
}

/// True when the time part ends in `+HH:MM` or `-HH:MM`
fn has_offset(text: &str) -> bool {
    let Some(time) = text.get(11..) else {
        return false;
    };
    time.len() >= 6 && {
        let tail = &time.as_bytes()[time.len() - 6..];
        matches!(tail[0], b'+' | b'-') && tail[3] == b':'
    }
}
