//! JSON filter specification parsing.
//!
//! This module implements a JSON form of [`FilterSpec`] for callers that build
//! filters from configuration files or other tools rather than from code.
//!
//! ## Schema
//!
//! ```json
//! {
//!   "type": "code",
//!   "lang": { "pattern": "^(js|javascript)$" },
//!   "depth": 2
//! }
//! ```
//!
//! - An object with a `pattern` member becomes a regex matcher. It may also
//!   carry `"case_insensitive": true`.
//! - Any other value (string, number, bool, null, array) is a literal.
//! - A key omitted from the object imposes no constraint.

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use super::matcher::Matcher;
use super::spec::{compile_pattern, FilterError, FilterSpec};

/// Error type for JSON filter parsing.
#[derive(Debug, Error)]
pub enum JsonFilterError {
    /// JSON parse error.
    #[error("invalid JSON: {0}")]
    ParseError(String),

    /// The top-level value is not a JSON object.
    #[error("filter must be a JSON object, found {found}")]
    NotAnObject { found: String },

    /// A pattern matcher object is malformed.
    #[error("invalid matcher for '{key}': {message}")]
    InvalidMatcher { key: String, message: String },

    /// Invalid regex pattern.
    #[error(transparent)]
    InvalidPattern(#[from] FilterError),
}

/// A pattern matcher in JSON format.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct JsonPattern {
    pattern: String,
    #[serde(default)]
    case_insensitive: bool,
}

/// Parse a filter specification from a JSON string.
///
/// ```
/// use mdtokens_core::filter::parse_filter_json;
///
/// let spec = parse_filter_json(r#"{"type": "code", "lang": {"pattern": "js"}}"#).unwrap();
/// assert_eq!(spec.len(), 2);
/// ```
pub fn parse_filter_json(input: &str) -> Result<FilterSpec, JsonFilterError> {
    let value: Value =
        serde_json::from_str(input).map_err(|e| JsonFilterError::ParseError(e.to_string()))?;
    filter_from_value(value)
}

/// Convert an already parsed JSON value into a filter specification.
pub fn filter_from_value(value: Value) -> Result<FilterSpec, JsonFilterError> {
    match value {
        Value::Object(members) => filter_from_object(members),
        other => Err(JsonFilterError::NotAnObject {
            found: json_type_name(&other).to_string(),
        }),
    }
}

fn filter_from_object(members: Map<String, Value>) -> Result<FilterSpec, JsonFilterError> {
    let mut spec = FilterSpec::new();
    for (key, value) in members {
        let matcher = match value {
            Value::Object(object) => {
                let pattern: JsonPattern = serde_json::from_value(Value::Object(object))
                    .map_err(|e| JsonFilterError::InvalidMatcher {
                        key: key.clone(),
                        message: e.to_string(),
                    })?;
                Matcher::Pattern(compile_pattern(&pattern.pattern, pattern.case_insensitive)?)
            }
            literal => Matcher::Literal(literal),
        };
        spec.insert(key, matcher);
    }
    Ok(spec)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
