//! Content extraction end to end

use citation_manager::cache::ParseCache;
use citation_manager::extractor::ContentExtractor;
use citation_manager::lookup::{FileCache, FilenameLookup};
use citation_manager::models::{ExtractionFlags, OutcomeStatus};
use citation_manager::validator::CitationValidator;
use std::sync::Arc;

use crate::common::{MarkdownFixture, TestVault};

fn extractor(lookup: Option<Arc<dyn FilenameLookup>>) -> ContentExtractor {
    let validator = CitationValidator::new(Arc::new(ParseCache::default()), lookup);
    ContentExtractor::new(Arc::new(validator))
}

#[tokio::test]
async fn test_extract_links_default_flags() {
    let vault = TestVault::new().unwrap();
    vault.add(&MarkdownFixture::guide("guide.md")).unwrap();
    let notes = vault.add(&MarkdownFixture::citing("notes.md", "guide.md")).unwrap();

    let result = extractor(None)
        .extract_links_content(&notes, ExtractionFlags::default())
        .await
        .unwrap();

    let statuses: Vec<_> = result.citations.iter().map(|c| c.status).collect();
    assert_eq!(
        statuses,
        vec![
            OutcomeStatus::Success,
            OutcomeStatus::Success,
            OutcomeStatus::Skipped,
            OutcomeStatus::Success,
            OutcomeStatus::Skipped,
        ]
    );
    assert_eq!(result.stats.total_links, 5);
    assert_eq!(result.stats.unique_content, 3);
    assert_eq!(result.stats.duplicate_content_detected, 0);

    assert_eq!(
        result.citations[4].reason,
        "Link failed validation: File not found: missing.md"
    );
    assert!(result.citations[4].content_id.is_none());

    let block_id = result.citations[1].content_id.as_ref().unwrap();
    assert_eq!(
        result.content_index[block_id].content,
        "Call it from anywhere. ^note1"
    );
}

#[tokio::test]
async fn test_extract_full_files_deduplicates_overlaps() {
    let vault = TestVault::new().unwrap();
    vault.add(&MarkdownFixture::guide("guide.md")).unwrap();
    let notes = vault
        .write(
            "notes.md",
            "[a](guide.md)\n[b](./guide.md)\n[c](guide.md#Usage)\n[d](guide.md#Usage)\n",
        )
        .unwrap();

    let result = extractor(None)
        .extract_links_content(&notes, ExtractionFlags { full_files: true })
        .await
        .unwrap();

    assert!(result.citations.iter().all(|c| c.status == OutcomeStatus::Success));
    assert_eq!(result.stats.unique_content, 2);
    assert_eq!(result.stats.duplicate_content_detected, 2);
    assert_eq!(result.citations[0].content_id, result.citations[1].content_id);
    assert_ne!(result.citations[0].content_id, result.citations[2].content_id);

    let total: usize = result
        .citations
        .iter()
        .filter_map(|c| c.content_id.as_ref())
        .map(|id| result.content_index[id].content_length)
        .sum();
    let expected_ratio = result.stats.bytes_saved as f64 / total as f64;
    assert!((result.stats.compression_ratio - expected_ratio).abs() < 1e-9);
}

#[tokio::test]
async fn test_extract_through_scope_lookup() {
    let vault = TestVault::new().unwrap();
    vault.add(&MarkdownFixture::guide("docs/archive/moved.md")).unwrap();
    let notes = vault.write("docs/notes.md", "[it](moved.md#Usage)\n").unwrap();

    let lookup: Arc<dyn FilenameLookup> = Arc::new(FileCache::build(vault.path()));
    let result = extractor(Some(lookup))
        .extract_links_content(&notes, ExtractionFlags::default())
        .await
        .unwrap();

    assert_eq!(result.citations[0].status, OutcomeStatus::Success);
    let entry = result.content_index.values().next().unwrap();
    assert!(entry.content.starts_with("## Usage"));
    assert!(entry.sources[0].target_file.ends_with("docs/archive/moved.md"));
}

#[tokio::test]
async fn test_result_serializes_camel_case() {
    let vault = TestVault::new().unwrap();
    vault.add(&MarkdownFixture::guide("guide.md")).unwrap();
    let notes = vault.write("notes.md", "[a](guide.md#Setup)\n").unwrap();

    let result = extractor(None)
        .extract_links_content(&notes, ExtractionFlags::default())
        .await
        .unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert!(json["contentIndex"].is_object());
    assert_eq!(json["stats"]["totalLinks"], 1);
    assert_eq!(json["citations"][0]["status"], "success");
    assert_eq!(json["citations"][0]["contentId"].as_str().unwrap().len(), 16);
}
