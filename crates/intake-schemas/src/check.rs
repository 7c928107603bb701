//! Format checks run after a field passes its type check
//!
//! Copyright (c) 2025 Intake Team
//! Licensed under the Apache-2.0 license

use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Message registered against a field holding a malformed UUID
pub const UUID_MESSAGE: &str = "Must be a UUID";

/// Named format check declared on a field with `check_with`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatCheck {
    /// Hyphenated, simple, braced or URN UUID text, hyphens anywhere
    Uuid,
}

impl FormatCheck {
    pub fn name(&self) -> &'static str {
        match self {
            FormatCheck::Uuid => "uuid",
        }
    }

    /// Check a value, returning the message to register on failure.
    ///
    /// Null is always accepted; nullability is decided elsewhere.
    pub fn check(&self, value: &Value) -> Result<(), String> {
        if value.is_null() {
            return Ok(());
        }
        match self {
            FormatCheck::Uuid => match value {
                Value::String(text) if is_uuid(text) => Ok(()),
                _ => Err(UUID_MESSAGE.to_string()),
            },
        }
    }
}

/// 32 hex digits once any `urn:`/`uuid:` prefix, surrounding braces and
/// hyphens are removed; hyphen placement is not checked
fn is_uuid(text: &str) -> bool {
    let stripped = text.replace("urn:", "").replace("uuid:", "");
    let hex = stripped.trim_matches(|c| c == '{' || c == '}').replace('-', "");
    hex.len() == 32 && Uuid::parse_str(&hex).is_ok()
}

impl fmt::Display for FormatCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FormatCheck {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uuid" => Ok(FormatCheck::Uuid),
            other => Err(format!("unknown format check '{}'", other)),
        }
    }
}
