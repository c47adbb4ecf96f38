//! Token filter engine.
//!
//! This module selects markdown tokens by declarative attribute constraints.
//! A [`FilterSpec`] maps attribute names to [`Matcher`]s; a token is selected
//! when every matcher accepts the token's attribute of the same name.
//!
//! ## Usage
//!
//! ```
//! use mdtokens_core::filter::{filter_tokens, FilterSpec};
//! use mdtokens_core::Token;
//!
//! let tokens = vec![
//!     Token::Heading { depth: 1, text: "Title".to_string() },
//!     Token::Code { lang: Some("js".to_string()), text: "1;".to_string() },
//! ];
//!
//! let spec = FilterSpec::new().with("type", "code");
//! let code = filter_tokens(tokens, Some(&spec));
//! assert_eq!(code.len(), 1);
//! ```

mod json;
mod matcher;
mod spec;

// Re-export public API from matcher module
pub use matcher::{coerce_to_string, Matcher};

// Re-export public API from spec module
pub use spec::{filter_tokens, FilterError, FilterSpec};

// Re-export public API from json module
pub use json::{filter_from_value, parse_filter_json, JsonFilterError};
