//! Error types for tokenizing markdown files.
//!
//! `TokenizeError` is the single error type returned by the tokenizer. It
//! wraps the failures of its collaborators unchanged:
//!
//! - **Expansion**: a glob pattern could not be resolved
//! - **Read**: an expanded path could not be read
//! - **Lex**: the lexer rejected a file's content
//!
//! There is no partial result: the first failure aborts the whole call.
//! Filtering on an attribute a token lacks is never an error.

use std::io;

use thiserror::Error;

use crate::files::ExpandError;
use crate::lexer::LexError;

/// Error type for tokenizer operations.
#[derive(Debug, Error)]
pub enum TokenizeError {
    /// Glob expansion failed.
    #[error(transparent)]
    Expand(#[from] ExpandError),

    /// Failed to read an expanded file.
    #[error("failed to read file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    /// The lexer failed; `path` is unset for in-memory content.
    #[error("failed to lex {}: {source}", .path.as_deref().unwrap_or("input"))]
    Lex {
        path: Option<String>,
        #[source]
        source: LexError,
    },
}

impl TokenizeError {
    /// The file the error refers to, if any.
    pub fn path(&self) -> Option<&str> {
        match self {
            TokenizeError::Expand(_) => None,
            TokenizeError::Read { path, .. } => Some(path),
            TokenizeError::Lex { path, .. } => path.as_deref(),
        }
    }
}
