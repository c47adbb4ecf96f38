//! Batch tokenization of markdown files.
//!
//! A [`Tokenizer`] owns a [`FileSource`] and a [`Lexer`]. For a list of glob
//! patterns it expands the patterns once, then reads, lexes and filters each
//! file in expansion order, producing one [`FileResult`] per file.
//!
//! ```no_run
//! use mdtokens::{FilterSpec, LocalFiles, MarkdownLexer, Tokenizer};
//!
//! let tokenizer = Tokenizer::new(LocalFiles::new("slides"), MarkdownLexer::default());
//! let spec = FilterSpec::new().with("type", "code").with("lang", "javascript");
//! for result in tokenizer.tokenize_files(["**/*.md"], Some(&spec))? {
//!     println!("{}: {} code block(s)", result.file, result.tokens.len());
//! }
//! # Ok::<(), mdtokens::TokenizeError>(())
//! ```

use mdtokens_core::{filter_tokens, FilterSpec, Token};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::TokenizeError;
use crate::files::{FileSource, Globs, LocalFiles};
use crate::lexer::{Lexer, MarkdownLexer};

/// The tokens of one source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileResult {
    /// Path as reported by the file source.
    pub file: String,
    /// Tokens in document order, after filtering.
    pub tokens: Vec<Token>,
}

/// Tokenizes markdown files through injected file and lexer collaborators.
#[derive(Debug, Clone)]
pub struct Tokenizer<F, L> {
    files: F,
    lexer: L,
}

impl Default for Tokenizer<LocalFiles, MarkdownLexer> {
    /// Local files relative to the current directory, default lexer options.
    fn default() -> Self {
        Tokenizer::new(LocalFiles::default(), MarkdownLexer::default())
    }
}

impl<F: FileSource, L: Lexer> Tokenizer<F, L> {
    pub fn new(files: F, lexer: L) -> Self {
        Tokenizer { files, lexer }
    }

    pub fn files(&self) -> &F {
        &self.files
    }

    pub fn lexer(&self) -> &L {
        &self.lexer
    }

    /// Expand `globs` (one pattern or a list), then read, lex and filter
    /// every matched file.
    ///
    /// Files without matching tokens still produce a `FileResult` with an
    /// empty token list. The first expansion, read or lex failure aborts the
    /// call; no later file is read.
    pub fn tokenize_files(
        &self,
        globs: impl Globs,
        spec: Option<&FilterSpec>,
    ) -> Result<Vec<FileResult>, TokenizeError> {
        let patterns = globs.into_patterns();
        let paths = self.files.expand(&patterns)?;
        debug!("tokenizing {} file(s)", paths.len());

        paths
            .into_iter()
            .map(|file| {
                let contents = self
                    .files
                    .read(&file)
                    .map_err(|source| TokenizeError::Read {
                        path: file.clone(),
                        source,
                    })?;
                trace!("read {} ({} bytes)", file, contents.len());

                let tokens = self
                    .lexer
                    .lex(&contents)
                    .map_err(|source| TokenizeError::Lex {
                        path: Some(file.clone()),
                        source,
                    })?;
                let tokens = self.select(tokens, spec);
                Ok(FileResult { file, tokens })
            })
            .collect()
    }

    /// Lex in-memory markdown and filter the tokens.
    pub fn tokenize_string(
        &self,
        contents: &str,
        spec: Option<&FilterSpec>,
    ) -> Result<Vec<Token>, TokenizeError> {
        let tokens = self
            .lexer
            .lex(contents)
            .map_err(|source| TokenizeError::Lex { path: None, source })?;
        Ok(self.select(tokens, spec))
    }

    fn select(&self, tokens: Vec<Token>, spec: Option<&FilterSpec>) -> Vec<Token> {
        let lexed = tokens.len();
        let tokens = filter_tokens(tokens, spec);
        trace!("selected {} of {} token(s)", tokens.len(), lexed);
        tokens
    }
}
