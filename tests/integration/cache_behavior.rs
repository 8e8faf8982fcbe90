//! One parse per file across validation and extraction

use citation_manager::cache::ParseCache;
use citation_manager::core::CiteError;
use citation_manager::extractor::ContentExtractor;
use citation_manager::markdown::{DefaultMarkdownParser, MarkdownParser, ParseOutput};
use citation_manager::models::ExtractionFlags;
use citation_manager::validator::CitationValidator;
use futures::future::{BoxFuture, join_all};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::common::{MarkdownFixture, TestVault};

/// Delegates to the filesystem parser and counts calls.
#[derive(Default)]
struct CountingParser {
    calls: AtomicUsize,
}

impl MarkdownParser for CountingParser {
    fn parse(&self, path: PathBuf) -> BoxFuture<'static, Result<ParseOutput, CiteError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        DefaultMarkdownParser.parse(path)
    }
}

#[tokio::test]
async fn test_validate_then_extract_parses_each_file_once() {
    let vault = TestVault::new().unwrap();
    vault.add(&MarkdownFixture::guide("guide.md")).unwrap();
    let notes = vault.add(&MarkdownFixture::citing("notes.md", "guide.md")).unwrap();

    let parser = Arc::new(CountingParser::default());
    let cache = Arc::new(ParseCache::new(Arc::clone(&parser) as Arc<dyn MarkdownParser>));
    let validator = Arc::new(CitationValidator::new(Arc::clone(&cache), None));
    let extractor = ContentExtractor::new(Arc::clone(&validator));

    validator.validate_file(&notes).await.unwrap();
    extractor
        .extract_links_content(&notes, ExtractionFlags { full_files: true })
        .await
        .unwrap();

    // notes.md and guide.md; missing.md never reaches the parser
    assert_eq!(parser.calls.load(Ordering::SeqCst), 2);
    assert_eq!(cache.len(), 2);
}

#[tokio::test]
async fn test_concurrent_validations_share_parses() {
    let vault = TestVault::new().unwrap();
    vault.add(&MarkdownFixture::guide("guide.md")).unwrap();
    let sources: Vec<PathBuf> = (0..8)
        .map(|i| {
            vault
                .add(&MarkdownFixture::citing(format!("notes{i}.md"), "guide.md"))
                .unwrap()
        })
        .collect();

    let parser = Arc::new(CountingParser::default());
    let cache = Arc::new(ParseCache::new(Arc::clone(&parser) as Arc<dyn MarkdownParser>));
    let validator = CitationValidator::new(Arc::clone(&cache), None);

    let reports = join_all(sources.iter().map(|s| validator.validate_file(s))).await;
    assert!(reports.iter().all(Result::is_ok));

    // Eight sources plus the one shared target
    assert_eq!(parser.calls.load(Ordering::SeqCst), 9);
}
