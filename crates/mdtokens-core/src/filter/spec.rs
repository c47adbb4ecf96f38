//! Filter specifications and token selection.

use regex::{Regex, RegexBuilder};
use thiserror::Error;

use super::matcher::Matcher;
use crate::token::Token;

/// Error type for building filter specifications.
#[derive(Debug, Error)]
pub enum FilterError {
    /// Invalid regex pattern.
    #[error("invalid regex pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}

/// Compile a pattern matcher.
pub(crate) fn compile_pattern(pattern: &str, case_insensitive: bool) -> Result<Regex, FilterError> {
    RegexBuilder::new(pattern)
        .case_insensitive(case_insensitive)
        .build()
        .map_err(|e| FilterError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })
}

/// A set of attribute constraints, combined with AND.
///
/// Entries keep their insertion order; inserting an existing key replaces its
/// matcher. An empty spec matches every token.
///
/// ```
/// use mdtokens_core::filter::FilterSpec;
/// use mdtokens_core::Token;
///
/// let spec = FilterSpec::new()
///     .with("type", "code")
///     .with_pattern("lang", "^(js|javascript)$")
///     .unwrap();
///
/// let js = Token::Code { lang: Some("js".to_string()), text: "1;".to_string() };
/// let rs = Token::Code { lang: Some("rust".to_string()), text: "1;".to_string() };
/// assert!(spec.matches(&js));
/// assert!(!spec.matches(&rs));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    entries: Vec<(String, Matcher)>,
}

impl FilterSpec {
    /// Create an empty spec.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a constraint, builder style.
    pub fn with(mut self, key: impl Into<String>, matcher: impl Into<Matcher>) -> Self {
        self.insert(key, matcher);
        self
    }

    /// Add a regex constraint, builder style.
    pub fn with_pattern(self, key: impl Into<String>, pattern: &str) -> Result<Self, FilterError> {
        let regex = compile_pattern(pattern, false)?;
        Ok(self.with(key, regex))
    }

    /// Add a constraint, replacing any existing constraint for the same key.
    pub fn insert(&mut self, key: impl Into<String>, matcher: impl Into<Matcher>) {
        let key = key.into();
        let matcher = matcher.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = matcher,
            None => self.entries.push((key, matcher)),
        }
    }

    /// Get the matcher for a key.
    pub fn get(&self, key: &str) -> Option<&Matcher> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, matcher)| matcher)
    }

    /// Number of constraints.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the spec has no constraints.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(key, matcher)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Matcher)> {
        self.entries.iter().map(|(k, m)| (k.as_str(), m))
    }

    /// Check whether a token satisfies every constraint.
    pub fn matches(&self, token: &Token) -> bool {
        self.entries.iter().all(|(key, matcher)| match matcher {
            Matcher::Any => true,
            _ => matcher.test(token.attr(key).as_ref()),
        })
    }
}

impl<K: Into<String>, M: Into<Matcher>> FromIterator<(K, M)> for FilterSpec {
    fn from_iter<I: IntoIterator<Item = (K, M)>>(iter: I) -> Self {
        let mut spec = FilterSpec::new();
        for (key, matcher) in iter {
            spec.insert(key, matcher);
        }
        spec
    }
}

/// Select the tokens matching `spec`, preserving their order.
///
/// With no spec, or an empty one, the tokens are returned unchanged.
pub fn filter_tokens(mut tokens: Vec<Token>, spec: Option<&FilterSpec>) -> Vec<Token> {
    if let Some(spec) = spec.filter(|s| !s.is_empty()) {
        tokens.retain(|token| spec.matches(token));
    }
    tokens
}
