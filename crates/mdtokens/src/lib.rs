//! mdtokens: markdown files as filterable token streams
//!
//! Tokenizes markdown documents into a flat sequence of typed blocks
//! (headings, code blocks, paragraphs, ...) and selects the blocks matching a
//! declarative filter, e.g. every JavaScript code block across a set of files.
//!
//! ```no_run
//! use mdtokens::FilterSpec;
//!
//! // All tokens of every slide
//! let all = mdtokens::from_files("slides/*.md", None)?;
//!
//! // Only code blocks in "js" or "javascript"
//! let spec = FilterSpec::new()
//!     .with("type", "code")
//!     .with_pattern("lang", "^(js|javascript)$")
//!     .expect("valid pattern");
//! let js = mdtokens::from_files(["slides/*.md"], Some(&spec))?;
//! # let _ = (all, js);
//! # Ok::<(), mdtokens::TokenizeError>(())
//! ```

// Core model and filter engine - re-exported from mdtokens-core
pub use mdtokens_core::filter;
pub use mdtokens_core::token;
pub use mdtokens_core::{filter_tokens, Align, FilterSpec, Matcher, Token};

pub mod config;
pub mod error;
pub mod files;
pub mod lexer;
pub mod tokenizer;

pub use config::LexOptions;
pub use error::TokenizeError;
pub use files::{ExpandError, FileSource, Globs, LocalFiles};
pub use lexer::{LexError, Lexer, MarkdownLexer};
pub use tokenizer::{FileResult, Tokenizer};

/// Tokenize every file matched by `globs`, relative to the current directory.
///
/// `globs` is a single pattern (`"docs/*.md"`) or a list of them
/// (`["docs/*.md", "!docs/drafts/*.md"]`). Returns one [`FileResult`] per
/// matched file, in expansion order.
pub fn from_files(
    globs: impl Globs,
    spec: Option<&FilterSpec>,
) -> Result<Vec<FileResult>, TokenizeError> {
    Tokenizer::default().tokenize_files(globs, spec)
}

/// Tokenize in-memory markdown.
pub fn from_string(
    contents: &str,
    spec: Option<&FilterSpec>,
) -> Result<Vec<Token>, TokenizeError> {
    Tokenizer::default().tokenize_string(contents, spec)
}
