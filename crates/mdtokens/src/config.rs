//! Lexer configuration.
//!
//! `LexOptions` selects the Markdown extensions recognized by
//! [`MarkdownLexer`](crate::lexer::MarkdownLexer). GFM tables, strikethrough
//! and task lists are on by default; the remaining extensions are opt-in.
//!
//! Options can be loaded from JSON, with missing fields taking their defaults:
//!
//! ```
//! use mdtokens::config::LexOptions;
//!
//! let options = LexOptions::from_json_str(r#"{"footnotes": true}"#).unwrap();
//! assert!(options.footnotes);
//! assert!(options.tables);
//! ```

use pulldown_cmark::Options;
use serde::{Deserialize, Serialize};

/// Markdown extensions enabled while lexing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LexOptions {
    /// GFM pipe tables.
    pub tables: bool,
    /// `~~strikethrough~~` spans.
    pub strikethrough: bool,
    /// `- [x]` task list items.
    pub tasklists: bool,
    /// Footnote references and definitions.
    pub footnotes: bool,
    /// Curly quotes, dashes and ellipses in text.
    pub smart_punctuation: bool,
    /// `# Heading {#id .class}` attribute blocks.
    pub heading_attributes: bool,
}

impl Default for LexOptions {
    fn default() -> Self {
        LexOptions {
            tables: true,
            strikethrough: true,
            tasklists: true,
            footnotes: false,
            smart_punctuation: false,
            heading_attributes: false,
        }
    }
}

impl LexOptions {
    /// Options for plain CommonMark, with every extension disabled.
    pub fn commonmark() -> Self {
        LexOptions {
            tables: false,
            strikethrough: false,
            tasklists: false,
            footnotes: false,
            smart_punctuation: false,
            heading_attributes: false,
        }
    }

    /// Load options from a JSON object.
    pub fn from_json_str(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }

    /// Convert to parser options.
    pub fn to_parser_options(self) -> Options {
        let mut options = Options::empty();
        options.set(Options::ENABLE_TABLES, self.tables);
        options.set(Options::ENABLE_STRIKETHROUGH, self.strikethrough);
        options.set(Options::ENABLE_TASKLISTS, self.tasklists);
        options.set(Options::ENABLE_FOOTNOTES, self.footnotes);
        options.set(Options::ENABLE_SMART_PUNCTUATION, self.smart_punctuation);
        options.set(Options::ENABLE_HEADING_ATTRIBUTES, self.heading_attributes);
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_enables_gfm() {
        let options = LexOptions::default().to_parser_options();
        assert!(options.contains(Options::ENABLE_TABLES));
        assert!(options.contains(Options::ENABLE_STRIKETHROUGH));
        assert!(options.contains(Options::ENABLE_TASKLISTS));
        assert!(!options.contains(Options::ENABLE_FOOTNOTES));
    }

    #[test]
    fn test_commonmark_disables_everything() {
        assert_eq!(LexOptions::commonmark().to_parser_options(), Options::empty());
    }

    #[test]
    fn test_from_json_partial() {
        let options = LexOptions::from_json_str(r#"{"tables": false}"#).unwrap();
        assert_eq!(
            options,
            LexOptions {
                tables: false,
                ..LexOptions::default()
            }
        );
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(LexOptions::from_json_str(r#"{"tables": "yes"}"#).is_err());
    }
}
