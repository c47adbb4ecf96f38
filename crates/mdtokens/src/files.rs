//! File discovery and reading.
//!
//! The [`FileSource`] trait expands glob patterns into file paths and reads
//! file contents. [`LocalFiles`] is the default implementation over the local
//! filesystem.
//!
//! ## Pattern Semantics
//!
//! - Patterns are applied in order. A pattern prefixed with `!` removes
//!   previously matched paths; any other pattern appends its matches.
//! - A path is reported once, at the position of its first match.
//! - Matches of a single pattern are sorted by path.
//! - `*` and `?` stop at `/`; `**` crosses directories.
//! - Only regular files are matched. Symlinks are followed, except into
//!   one of their own ancestors.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher};
use thiserror::Error;
use tracing::{debug, trace};
use walkdir::WalkDir;

// ============================================================================
// Error Types
// ============================================================================

/// Error type for glob expansion.
#[derive(Debug, Error)]
pub enum ExpandError {
    /// Malformed glob pattern.
    #[error("invalid glob pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Directory traversal failed.
    #[error("failed to walk '{path}': {message}")]
    Walk { path: String, message: String },
}

// ============================================================================
// File Source Trait
// ============================================================================

/// Expands glob patterns into file paths and reads their contents.
pub trait FileSource {
    /// Resolve patterns into an ordered, deduplicated list of file paths.
    fn expand(&self, patterns: &[String]) -> Result<Vec<String>, ExpandError>;

    /// Read the full text content of a file returned by [`FileSource::expand`].
    fn read(&self, path: &str) -> io::Result<String>;
}

/// One glob pattern or a list of them.
///
/// ```
/// use mdtokens::files::Globs;
///
/// assert_eq!("docs/*.md".into_patterns(), vec!["docs/*.md"]);
/// assert_eq!(["*.md", "!README.md"].into_patterns(), vec!["*.md", "!README.md"]);
/// ```
pub trait Globs {
    fn into_patterns(self) -> Vec<String>;
}

impl Globs for &str {
    fn into_patterns(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl Globs for String {
    fn into_patterns(self) -> Vec<String> {
        vec![self]
    }
}

impl Globs for &String {
    fn into_patterns(self) -> Vec<String> {
        vec![self.clone()]
    }
}

impl<S: AsRef<str>> Globs for &[S] {
    fn into_patterns(self) -> Vec<String> {
        self.iter().map(|s| s.as_ref().to_string()).collect()
    }
}

impl<S: AsRef<str>, const N: usize> Globs for [S; N] {
    fn into_patterns(self) -> Vec<String> {
        self.as_slice().into_patterns()
    }
}

impl<S: AsRef<str>> Globs for Vec<S> {
    fn into_patterns(self) -> Vec<String> {
        self.as_slice().into_patterns()
    }
}

impl<S: AsRef<str>> Globs for &Vec<S> {
    fn into_patterns(self) -> Vec<String> {
        self.as_slice().into_patterns()
    }
}

// ============================================================================
// Local Filesystem
// ============================================================================

/// Files on the local filesystem, with relative patterns resolved against a root.
#[derive(Debug, Clone)]
pub struct LocalFiles {
    root: PathBuf,
}

impl Default for LocalFiles {
    /// Files relative to the current directory.
    fn default() -> Self {
        LocalFiles::new(".")
    }
}

impl LocalFiles {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        LocalFiles { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Sorted matches of a single (non-negated) pattern.
    fn matches(&self, pattern: &str) -> Result<Vec<String>, ExpandError> {
        let matcher = compile_glob(pattern)?;
        let absolute = Path::new(pattern).is_absolute();
        let (base, rest) = split_base(pattern);
        let walk_root = self.root.join(base);

        if !walk_root.exists() {
            trace!("no base directory for pattern {}", pattern);
            return Ok(Vec::new());
        }

        // Without `**` no match can lie deeper than the remaining components.
        let mut walker = WalkDir::new(&walk_root).follow_links(true);
        if !rest.iter().any(|component| component.contains("**")) {
            walker = walker.max_depth(rest.len());
        }

        let mut found = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.loop_ancestor().is_some() => {
                    trace!("skipping symlink loop: {}", e);
                    continue;
                }
                Err(e) => {
                    return Err(ExpandError::Walk {
                        path: walk_root.display().to_string(),
                        message: e.to_string(),
                    });
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let path = if absolute {
                entry.path()
            } else {
                match entry.path().strip_prefix(&self.root) {
                    Ok(p) => p,
                    Err(_) => continue,
                }
            };
            let path = normalize(path);
            if matcher.is_match(&path) {
                found.push(path);
            }
        }

        found.sort();
        Ok(found)
    }
}

impl FileSource for LocalFiles {
    fn expand(&self, patterns: &[String]) -> Result<Vec<String>, ExpandError> {
        let mut files: Vec<String> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for pattern in patterns {
            match pattern.strip_prefix('!') {
                Some(excluded) => {
                    let matcher = compile_glob(excluded)?;
                    files.retain(|f| {
                        let keep = !matcher.is_match(f);
                        if !keep {
                            seen.remove(f);
                        }
                        keep
                    });
                }
                None => {
                    for path in self.matches(pattern)? {
                        if seen.insert(path.clone()) {
                            files.push(path);
                        }
                    }
                }
            }
        }

        debug!(
            "expanded {} pattern(s) to {} file(s)",
            patterns.len(),
            files.len()
        );
        Ok(files)
    }

    fn read(&self, path: &str) -> io::Result<String> {
        fs::read_to_string(self.root.join(path))
    }
}

// ============================================================================
// Pattern Helpers
// ============================================================================

fn compile_glob(pattern: &str) -> Result<GlobMatcher, ExpandError> {
    GlobBuilder::new(strip_dot_slash(pattern))
        .literal_separator(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|e| ExpandError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })
}

fn strip_dot_slash(mut pattern: &str) -> &str {
    while let Some(rest) = pattern.strip_prefix("./") {
        pattern = rest;
    }
    pattern
}

/// Split a pattern into the leading directory components that contain no
/// glob syntax and the remaining components.
fn split_base(pattern: &str) -> (PathBuf, Vec<&str>) {
    let pattern = strip_dot_slash(pattern);
    let mut base = PathBuf::new();
    if pattern.starts_with('/') {
        base.push("/");
    }
    let mut components = pattern.split('/').filter(|c| !c.is_empty()).peekable();
    while let Some(component) =
        components.next_if(|c| !c.contains(['*', '?', '[', '{', '\\']))
    {
        base.push(component);
    }
    (base, components.collect())
}

/// Render a path with `/` separators.
fn normalize(path: &Path) -> String {
    let mut out = String::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::RootDir => out.push('/'),
            other => {
                if !out.is_empty() && !out.ends_with('/') {
                    out.push('/');
                }
                out.push_str(&other.as_os_str().to_string_lossy());
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn workspace(files: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for file in files {
            let path = dir.path().join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, format!("# {}\n", file)).unwrap();
        }
        dir
    }

    fn expand(dir: &TempDir, patterns: &[&str]) -> Vec<String> {
        let patterns: Vec<String> = patterns.iter().map(|p| p.to_string()).collect();
        LocalFiles::new(dir.path()).expand(&patterns).unwrap()
    }

    // =========================================================================
    // Expansion Tests
    // =========================================================================

    #[test]
    fn test_expand_single_directory_glob() {
        let dir = workspace(&["docs/b.md", "docs/a.md", "docs/c.txt", "docs/sub/d.md"]);
        assert_eq!(expand(&dir, &["docs/*.md"]), vec!["docs/a.md", "docs/b.md"]);
    }

    #[test]
    fn test_expand_recursive_glob() {
        let dir = workspace(&["docs/b.md", "docs/a.md", "docs/sub/d.md", "other/e.md"]);
        assert_eq!(
            expand(&dir, &["docs/**/*.md"]),
            vec!["docs/a.md", "docs/b.md", "docs/sub/d.md"]
        );
    }

    #[test]
    fn test_expand_literal_path() {
        let dir = workspace(&["README.md", "docs/a.md"]);
        assert_eq!(expand(&dir, &["README.md"]), vec!["README.md"]);
        assert_eq!(expand(&dir, &["./docs/a.md"]), vec!["docs/a.md"]);
    }

    #[test]
    fn test_expand_missing_path_matches_nothing() {
        let dir = workspace(&["README.md"]);
        assert!(expand(&dir, &["missing.md"]).is_empty());
        assert!(expand(&dir, &["nowhere/**/*.md"]).is_empty());
    }

    #[test]
    fn test_expand_preserves_pattern_order_and_dedupes() {
        let dir = workspace(&["a.md", "b.md", "z/c.md"]);
        assert_eq!(
            expand(&dir, &["z/*.md", "*.md", "b.md"]),
            vec!["z/c.md", "a.md", "b.md"]
        );
    }

    #[test]
    fn test_expand_negated_pattern_excludes() {
        let dir = workspace(&["docs/a.md", "docs/draft-b.md", "docs/c.md"]);
        assert_eq!(
            expand(&dir, &["docs/*.md", "!docs/draft-*.md"]),
            vec!["docs/a.md", "docs/c.md"]
        );
    }

    #[test]
    fn test_expand_skips_directories() {
        let dir = workspace(&["notes.md/inner.txt", "a.md"]);
        assert_eq!(expand(&dir, &["*.md"]), vec!["a.md"]);
    }

    #[test]
    fn test_expand_reexcluded_path_can_return() {
        let dir = workspace(&["a.md", "b.md"]);
        assert_eq!(expand(&dir, &["*.md", "!a.md", "a.md"]), vec!["b.md", "a.md"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_expand_skips_symlink_loops() {
        let dir = workspace(&["a.md", "vendor/pkg/b.md"]);
        std::os::unix::fs::symlink(dir.path().join("vendor"), dir.path().join("vendor/pkg/loop"))
            .unwrap();

        assert_eq!(expand(&dir, &["*.md"]), vec!["a.md"]);
        assert_eq!(expand(&dir, &["vendor/pkg/*.md"]), vec!["vendor/pkg/b.md"]);
        assert_eq!(expand(&dir, &["**/*.md"]), vec!["a.md", "vendor/pkg/b.md"]);
    }

    #[test]
    fn test_expand_absolute_pattern() {
        let dir = workspace(&["docs/a.md"]);
        let pattern = format!("{}/docs/*.md", normalize(dir.path()));
        let files = LocalFiles::default().expand(&[pattern]).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("docs/a.md"));
        assert!(Path::new(&files[0]).is_absolute());
    }

    #[test]
    fn test_expand_invalid_pattern() {
        let dir = workspace(&["a.md"]);
        let result = LocalFiles::new(dir.path()).expand(&["docs/[a.md".to_string()]);
        match result {
            Err(ExpandError::InvalidPattern { pattern, message }) => {
                assert_eq!(pattern, "docs/[a.md");
                assert!(!message.is_empty());
            }
            other => panic!("expected InvalidPattern error, got {:?}", other),
        }
    }

    // =========================================================================
    // Globs Tests
    // =========================================================================

    #[test]
    fn test_globs_single_and_many() {
        assert_eq!("*.md".into_patterns(), vec!["*.md"]);
        assert_eq!(String::from("*.md").into_patterns(), vec!["*.md"]);

        let owned = vec!["a/*.md".to_string(), "!a/x.md".to_string()];
        assert_eq!((&owned).into_patterns(), owned);
        assert_eq!(owned[..].into_patterns(), owned);
        assert_eq!(owned.clone().into_patterns(), owned);
        assert_eq!(["a/*.md", "!a/x.md"].into_patterns(), owned);
        assert!(Vec::<&str>::new().into_patterns().is_empty());
    }

    // =========================================================================
    // Read Tests
    // =========================================================================

    #[test]
    fn test_read_relative_to_root() {
        let dir = workspace(&["docs/a.md"]);
        let content = LocalFiles::new(dir.path()).read("docs/a.md").unwrap();
        assert_eq!(content, "# docs/a.md\n");
    }

    #[test]
    fn test_read_missing_file_errors() {
        let dir = workspace(&[]);
        let err = LocalFiles::new(dir.path()).read("missing.md").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    // =========================================================================
    // Helper Tests
    // =========================================================================

    #[test]
    fn test_split_base() {
        assert_eq!(
            split_base("docs/**/*.md"),
            (PathBuf::from("docs"), vec!["**", "*.md"])
        );
        assert_eq!(
            split_base("./docs/a/*.md"),
            (PathBuf::from("docs/a"), vec!["*.md"])
        );
        assert_eq!(split_base("*.md"), (PathBuf::new(), vec!["*.md"]));
        assert_eq!(
            split_base("docs/readme.md"),
            (PathBuf::from("docs/readme.md"), vec![])
        );
        assert_eq!(
            split_base("/tmp/x/{a,b}.md"),
            (PathBuf::from("/tmp/x"), vec!["{a,b}.md"])
        );
    }
}
