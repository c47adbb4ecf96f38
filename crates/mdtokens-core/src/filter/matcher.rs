//! Attribute matchers.
//!
//! A matcher tests a single token attribute. It is one of:
//!
//! - [`Matcher::Any`] - no constraint, every attribute value passes
//! - [`Matcher::Literal`] - strict equality with a JSON value
//! - [`Matcher::Pattern`] - unanchored regex search over the attribute
//!   coerced to a string

use regex::Regex;
use serde_json::Value;

/// A constraint on one token attribute.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Imposes no constraint.
    Any,
    /// Passes iff the attribute is present and strictly equal to the value.
    Literal(Value),
    /// Passes iff the regex matches somewhere in the attribute's string form.
    Pattern(Regex),
}

impl Matcher {
    /// Test an attribute value (`None` when the token lacks the attribute).
    pub fn test(&self, attr: Option<&Value>) -> bool {
        match self {
            Matcher::Any => true,
            Matcher::Pattern(regex) => {
                let haystack = attr.map(coerce_to_string).unwrap_or_default();
                regex.is_match(&haystack)
            }
            Matcher::Literal(expected) => attr.is_some_and(|actual| strict_eq(actual, expected)),
        }
    }
}

impl PartialEq for Matcher {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Matcher::Any, Matcher::Any) => true,
            (Matcher::Literal(a), Matcher::Literal(b)) => a == b,
            (Matcher::Pattern(a), Matcher::Pattern(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

impl From<Regex> for Matcher {
    fn from(regex: Regex) -> Self {
        Matcher::Pattern(regex)
    }
}

impl From<Value> for Matcher {
    fn from(value: Value) -> Self {
        Matcher::Literal(value)
    }
}

impl<T: Into<Matcher>> From<Option<T>> for Matcher {
    fn from(value: Option<T>) -> Self {
        value.map_or(Matcher::Any, Into::into)
    }
}

macro_rules! literal_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Matcher {
                fn from(value: $ty) -> Self {
                    Matcher::Literal(Value::from(value))
                }
            }
        )*
    };
}

literal_from!(&str, String, bool, u8, u32, u64, i32, i64);

/// Equality with number values compared numerically.
fn strict_eq(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Number(a), Value::Number(b)) => a
            .as_f64()
            .zip(b.as_f64())
            .is_some_and(|(a, b)| a.total_cmp(&b).is_eq()),
        _ => actual == expected,
    }
}

/// Coerce an attribute value to the string a pattern is tested against.
///
/// Lists join their elements with `,`; null elements inside lists become empty.
pub fn coerce_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => coerce_to_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}
