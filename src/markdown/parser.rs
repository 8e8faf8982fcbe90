//! Markdown parser boundary.
//!
//! The parse cache never reads files itself; it asks a [`MarkdownParser`] for a
//! [`ParseOutput`]. [`DefaultMarkdownParser`] reads the file with `tokio::fs`
//! and runs the tokenizer and the citation/anchor extractors. Tests substitute
//! counting or failing parsers through the same trait.

use futures::FutureExt;
use futures::future::BoxFuture;
use std::path::{Path, PathBuf};

use super::reference_extractor::{extract_anchors, extract_citations};
use super::tokenizer::{Token, tokenize};
use crate::core::CiteError;
use crate::models::{Anchor, Citation};

/// Raw result of parsing one markdown file.
#[derive(Debug, Clone)]
pub struct ParseOutput {
    /// Absolute path of the parsed file
    pub file_path: PathBuf,
    /// Full source text
    pub content: String,
    /// Block token tree
    pub tokens: Vec<Token>,
    /// Citations found in the file, in source order
    pub links: Vec<Citation>,
    /// Header and block anchors, in source order
    pub anchors: Vec<Anchor>,
}

/// Turns a file into a [`ParseOutput`].
///
/// The returned future is `'static` so the cache can share one in-flight parse
/// between concurrent callers.
pub trait MarkdownParser: Send + Sync {
    /// Parse the file at `path` (absolute).
    fn parse(&self, path: PathBuf) -> BoxFuture<'static, Result<ParseOutput, CiteError>>;
}

/// Filesystem-backed parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultMarkdownParser;

impl MarkdownParser for DefaultMarkdownParser {
    fn parse(&self, path: PathBuf) -> BoxFuture<'static, Result<ParseOutput, CiteError>> {
        async move {
            let content = tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| CiteError::from_io(&path, &e))?;
            tracing::trace!(target: "parser", "Parsing {} ({} bytes)", path.display(), content.len());
            Ok(parse_content(&path, content))
        }
        .boxed()
    }
}

/// Parse already-loaded content as if it were the file at `path`.
#[must_use]
pub fn parse_content(path: &Path, content: String) -> ParseOutput {
    let tokens = tokenize(&content);
    let links = extract_citations(&content, path);
    let anchors = extract_anchors(&content, &tokens);

    ParseOutput {
        file_path: path.to_path_buf(),
        content,
        tokens,
        links,
        anchors,
    }
}
