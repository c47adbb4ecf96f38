//! Markdown token model.
//!
//! A document is represented as a flat, ordered sequence of block tokens in the
//! style of a marked-like block lexer: container blocks (lists, list items,
//! blockquotes) are expressed as start/end token pairs around their children,
//! leaf blocks (headings, code, paragraphs, tables, HTML) carry their content
//! as attributes.
//!
//! Tokens serialize as internally tagged objects whose `type` member is the
//! token kind:
//!
//! ```json
//! { "type": "code", "lang": "js", "text": "console.log(1);" }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Column alignment of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Center,
    Right,
}

impl Align {
    /// The alignment name as it appears in serialized tokens.
    pub fn as_str(&self) -> &'static str {
        match self {
            Align::Left => "left",
            Align::Center => "center",
            Align::Right => "right",
        }
    }
}

/// A single markdown block token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Token {
    /// ATX or setext heading.
    Heading { depth: u8, text: String },
    /// Fenced or indented code block. `lang` is the first word of the info string.
    Code {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        lang: Option<String>,
        text: String,
    },
    /// Paragraph with its inline source text.
    Paragraph { text: String },
    /// Inline text placed directly inside a tight list item.
    Text { text: String },
    /// Raw HTML block. `pre` is set for `<pre>`, `<script>` and `<style>` blocks.
    Html { pre: bool, text: String },
    /// Thematic break.
    Hr,
    BlockquoteStart,
    BlockquoteEnd,
    /// Start of a list; `start` is the first number of an ordered list.
    ListStart {
        ordered: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        start: Option<u64>,
    },
    /// Start of an item in a tight list.
    ListItemStart {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        checked: Option<bool>,
    },
    /// Start of an item whose content is separated into paragraphs.
    LooseItemStart {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        checked: Option<bool>,
    },
    ListItemEnd,
    ListEnd,
    /// GFM table.
    Table {
        header: Vec<String>,
        align: Vec<Option<Align>>,
        cells: Vec<Vec<String>>,
    },
}

impl Token {
    /// The token kind, i.e. the value of its `type` attribute.
    pub fn kind(&self) -> &'static str {
        match self {
            Token::Heading { .. } => "heading",
            Token::Code { .. } => "code",
            Token::Paragraph { .. } => "paragraph",
            Token::Text { .. } => "text",
            Token::Html { .. } => "html",
            Token::Hr => "hr",
            Token::BlockquoteStart => "blockquote_start",
            Token::BlockquoteEnd => "blockquote_end",
            Token::ListStart { .. } => "list_start",
            Token::ListItemStart { .. } => "list_item_start",
            Token::LooseItemStart { .. } => "loose_item_start",
            Token::ListItemEnd => "list_item_end",
            Token::ListEnd => "list_end",
            Token::Table { .. } => "table",
        }
    }

    /// The text content of the token, for kinds that carry one.
    pub fn text(&self) -> Option<&str> {
        match self {
            Token::Heading { text, .. }
            | Token::Code { text, .. }
            | Token::Paragraph { text }
            | Token::Text { text }
            | Token::Html { text, .. } => Some(text),
            _ => None,
        }
    }

    /// Look up an attribute by name.
    ///
    /// Returns `None` when this kind of token has no such attribute, or when an
    /// optional attribute (e.g. `lang` on an indented code block) is unset.
    /// The `type` attribute is always present.
    pub fn attr(&self, key: &str) -> Option<Value> {
        if key == "type" {
            return Some(Value::from(self.kind()));
        }

        match (self, key) {
            (Token::Heading { depth, .. }, "depth") => Some(Value::from(*depth)),
            (Token::Code { lang, .. }, "lang") => lang.as_deref().map(Value::from),
            (Token::Html { pre, .. }, "pre") => Some(Value::from(*pre)),
            (Token::ListStart { ordered, .. }, "ordered") => Some(Value::from(*ordered)),
            (Token::ListStart { start, .. }, "start") => start.map(Value::from),
            (Token::ListItemStart { checked }, "checked")
            | (Token::LooseItemStart { checked }, "checked") => checked.map(Value::from),
            (Token::Table { header, .. }, "header") => Some(Value::from(header.clone())),
            (Token::Table { align, .. }, "align") => Some(Value::Array(
                align
                    .iter()
                    .map(|a| a.map_or(Value::Null, |a| Value::from(a.as_str())))
                    .collect(),
            )),
            (Token::Table { cells, .. }, "cells") => Some(Value::Array(
                cells.iter().map(|row| Value::from(row.clone())).collect(),
            )),
            (_, "text") => self.text().map(Value::from),
            _ => None,
        }
    }
}
