//! Single-flight parse cache.
//!
//! [`ParseCache`] guarantees that each markdown file is parsed at most once per
//! cache instance, however many validator or extractor tasks ask for it at the
//! same time. Callers receive a shared [`ParsedDocument`].
//!
//! # Concurrency
//!
//! Entries follow a small state machine keyed by the canonical file path:
//!
//! - **Initial**: no entry (implicit)
//! - [`Pending`](ParseState::Pending): a parse is in flight; its future is
//!   shared, so late arrivals await the same result instead of parsing again
//! - [`Ready`](ParseState::Ready): the document is parsed and reused forever
//!
//! The pending entry is inserted through `DashMap`'s entry API *before* the
//! parse is awaited, so two racing callers can never both start a parse. A
//! failed parse removes its pending entry; the next request starts over.
//!
//! ```text
//! Task A: resolve("a.md") ──┐ inserts Pending, drives the parse
//!                           ├── same shared future, one parser call
//! Task B: resolve("./a.md") ┘ finds Pending, awaits it
//!
//! Task C: resolve("b.md") ──── independent entry, runs concurrently
//! ```
//!
//! # Examples
//!
//! ```rust,no_run
//! use citation_manager::cache::ParseCache;
//!
//! # async fn example() -> Result<(), citation_manager::core::CiteError> {
//! let cache = ParseCache::default();
//! let doc = cache.resolve_parsed_file("notes/guide.md").await?;
//! println!("{} anchors", doc.anchors().len());
//!
//! // Second request is served from memory
//! let again = cache.resolve_parsed_file("notes/../notes/guide.md").await?;
//! assert!(std::sync::Arc::ptr_eq(&doc, &again));
//! # Ok(())
//! # }
//! ```

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::core::CiteError;
use crate::document::ParsedDocument;
use crate::markdown::{DefaultMarkdownParser, MarkdownParser};
use crate::utils::canonical_key;

type ParseFuture = Shared<BoxFuture<'static, Result<Arc<ParsedDocument>, CiteError>>>;

/// Cache entry state.
#[derive(Clone)]
enum ParseState {
    /// A parse is running; awaiting the shared future joins it.
    Pending(ParseFuture),
    /// Parsed document, never evicted.
    Ready(Arc<ParsedDocument>),
}

impl ParseState {
    fn is_pending(&self, future: &ParseFuture) -> bool {
        matches!(self, Self::Pending(pending) if pending.ptr_eq(future))
    }
}

/// Path-keyed cache of parsed documents with single-flight parsing.
///
/// Safe to share across tasks behind an `Arc`.
pub struct ParseCache {
    parser: Arc<dyn MarkdownParser>,
    entries: DashMap<PathBuf, ParseState>,
}

impl std::fmt::Debug for ParseCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParseCache").field("entries", &self.entries.len()).finish()
    }
}

impl Default for ParseCache {
    fn default() -> Self {
        Self::new(Arc::new(DefaultMarkdownParser))
    }
}

impl ParseCache {
    /// Create an empty cache backed by `parser`.
    #[must_use]
    pub fn new(parser: Arc<dyn MarkdownParser>) -> Self {
        Self {
            parser,
            entries: DashMap::new(),
        }
    }

    /// Return the parsed document for `path`, parsing it at most once.
    ///
    /// Paths are normalized to an absolute canonical key first, so `a.md`,
    /// `./a.md` and `/abs/dir/a.md` share one entry.
    ///
    /// # Errors
    ///
    /// - [`CiteError::InvalidArgument`] for an empty path
    /// - whatever the parser reports (missing file, unreadable file); the
    ///   failed entry is evicted so a later call retries
    pub async fn resolve_parsed_file(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<Arc<ParsedDocument>, CiteError> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(CiteError::InvalidArgument {
                reason: "file path must not be empty".to_string(),
            });
        }

        let key = canonical_key(path);

        // The entry guard must be released before awaiting
        let future = match self.entries.entry(key.clone()) {
            Entry::Occupied(entry) => match entry.get() {
                ParseState::Ready(document) => {
                    tracing::trace!(target: "cache", "Cache hit for {}", key.display());
                    return Ok(Arc::clone(document));
                }
                ParseState::Pending(future) => {
                    tracing::debug!(target: "cache", "Joining in-flight parse of {}", key.display());
                    future.clone()
                }
            },
            Entry::Vacant(entry) => {
                tracing::debug!(target: "cache", "Cache miss, parsing {}", key.display());
                let future = self
                    .parser
                    .parse(key.clone())
                    .map(|result| result.map(|output| Arc::new(ParsedDocument::new(output))))
                    .boxed()
                    .shared();
                entry.insert(ParseState::Pending(future.clone()));
                future
            }
        };

        let result = future.clone().await;

        match &result {
            Ok(document) => {
                if let Some(mut state) = self.entries.get_mut(&key) {
                    if state.is_pending(&future) {
                        *state = ParseState::Ready(Arc::clone(document));
                    }
                }
            }
            Err(error) => {
                if self.entries.remove_if(&key, |_, state| state.is_pending(&future)).is_some() {
                    tracing::warn!(target: "cache", "Parse of {} failed: {error}", key.display());
                }
            }
        }

        result
    }

    /// Number of entries, pending and ready.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `path` has a pending or ready entry.
    #[must_use]
    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.entries.contains_key(&canonical_key(path.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::{ParseOutput, parse_content};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Parser that counts calls and can fail a fixed number of times first.
    struct CountingParser {
        calls: Arc<AtomicUsize>,
        failures: usize,
    }

    impl CountingParser {
        fn new(failures: usize) -> (Arc<Self>, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let parser = Arc::new(Self {
                calls: Arc::clone(&calls),
                failures,
            });
            (parser, calls)
        }
    }

    impl MarkdownParser for CountingParser {
        fn parse(&self, path: PathBuf) -> BoxFuture<'static, Result<ParseOutput, CiteError>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            let fail = call < self.failures;
            async move {
                tokio::time::sleep(Duration::from_millis(20)).await;
                if fail {
                    Err(CiteError::ReadError {
                        path: path.display().to_string(),
                        reason: "simulated failure".to_string(),
                    })
                } else {
                    Ok(parse_content(&path, "# Title\n\nBody ^b1\n".to_string()))
                }
            }
            .boxed()
        }
    }

    #[tokio::test]
    async fn test_concurrent_requests_parse_once() {
        let (parser, calls) = CountingParser::new(0);
        let cache = ParseCache::new(parser);

        let requests = (0..8).map(|_| cache.resolve_parsed_file("/vault/a.md"));
        let results = futures::future::join_all(requests).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let first = results[0].as_ref().unwrap();
        for result in &results {
            assert!(Arc::ptr_eq(first, result.as_ref().unwrap()));
        }
    }

    #[tokio::test]
    async fn test_equivalent_spellings_share_entry() {
        let (parser, calls) = CountingParser::new(0);
        let cache = ParseCache::new(parser);

        let a = cache.resolve_parsed_file("/vault/notes/a.md").await.unwrap();
        let b = cache.resolve_parsed_file("/vault/other/../notes/./a.md").await.unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.contains("/vault/notes/a.md"));
    }

    #[tokio::test]
    async fn test_failure_is_evicted_and_retried() {
        let (parser, calls) = CountingParser::new(1);
        let cache = ParseCache::new(parser);

        let first = cache.resolve_parsed_file("/vault/a.md").await;
        assert!(matches!(first, Err(CiteError::ReadError { .. })));
        assert!(cache.is_empty());

        let second = cache.resolve_parsed_file("/vault/a.md").await.unwrap();
        assert_eq!(second.anchors().len(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_waiters_share_failure() {
        let (parser, calls) = CountingParser::new(1);
        let cache = ParseCache::new(parser);

        let (a, b) = tokio::join!(
            cache.resolve_parsed_file("/vault/a.md"),
            cache.resolve_parsed_file("/vault/a.md")
        );
        assert!(a.is_err());
        assert_eq!(a.unwrap_err(), b.unwrap_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_empty_path_rejected() {
        let cache = ParseCache::default();
        let result = cache.resolve_parsed_file("").await;
        assert!(matches!(result, Err(CiteError::InvalidArgument { .. })));
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_missing_file_reports_not_found() {
        let temp = tempfile::tempdir().unwrap();
        let cache = ParseCache::default();
        let result = cache.resolve_parsed_file(temp.path().join("missing.md")).await;
        assert!(matches!(result, Err(CiteError::FileNotFound { .. })));
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_undecodable_file_reports_read_error() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("binary.md");
        std::fs::write(&path, [0xff, 0xfe, 0x00, 0x80]).unwrap();

        let cache = ParseCache::default();
        let result = cache.resolve_parsed_file(&path).await;
        assert!(matches!(result, Err(CiteError::ReadError { .. })));
        assert!(cache.is_empty());
    }
}
