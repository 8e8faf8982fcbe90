//! Citation validation against real files on disk

use citation_manager::cache::ParseCache;
use citation_manager::lookup::{FileCache, FilenameLookup};
use citation_manager::models::{ValidationResult, ValidationStatus};
use citation_manager::validator::CitationValidator;
use std::sync::Arc;

use crate::common::{MarkdownFixture, TestVault};

fn validator(lookup: Option<Arc<dyn FilenameLookup>>) -> CitationValidator {
    CitationValidator::new(Arc::new(ParseCache::default()), lookup)
}

#[tokio::test]
async fn test_validate_mixed_document() {
    let vault = TestVault::new().unwrap();
    vault.add(&MarkdownFixture::guide("docs/guide.md")).unwrap();
    let notes = vault.add(&MarkdownFixture::citing("docs/notes.md", "guide.md")).unwrap();

    let report = validator(None).validate_file(&notes).await.unwrap();

    assert_eq!(report.summary.total, 5);
    assert_eq!(report.summary.valid, 4);
    assert_eq!(report.summary.warnings, 0);
    assert_eq!(report.summary.errors, 1);
    assert!(report.has_errors());

    let broken = &report.citations[4];
    assert_eq!(broken.line, 7);
    assert_eq!(broken.status(), Some(ValidationStatus::Error));
    assert_eq!(
        broken.validation.as_ref().and_then(ValidationResult::message),
        Some("File not found: missing.md")
    );
}

#[tokio::test]
async fn test_moved_file_found_through_scope() {
    let vault = TestVault::new().unwrap();
    vault.add(&MarkdownFixture::guide("docs/archive/moved.md")).unwrap();
    let notes = vault.write("docs/notes.md", "See [it](moved.md#Setup).\n").unwrap();

    // Without a lookup the file is simply missing
    let report = validator(None).validate_file(&notes).await.unwrap();
    assert_eq!(report.summary.errors, 1);

    let lookup: Arc<dyn FilenameLookup> = Arc::new(FileCache::build(vault.path()));
    let report = validator(Some(lookup)).validate_file(&notes).await.unwrap();
    assert_eq!(report.summary.warnings, 1);

    match report.citations[0].validation.as_ref().unwrap() {
        ValidationResult::Warning {
            message,
            suggestion,
            path_conversion,
        } => {
            assert!(message.starts_with("Found in different directory:"));
            assert_eq!(suggestion.as_deref(), Some("Update path to: archive/moved.md"));
            let conversion = path_conversion.as_ref().unwrap();
            assert_eq!(conversion.original, "moved.md");
            assert_eq!(conversion.recommended, "archive/moved.md");
        }
        other => panic!("expected warning, got {other:?}"),
    }
}

#[tokio::test]
async fn test_broken_anchor_suggestions() {
    let vault = TestVault::new().unwrap();
    vault.add(&MarkdownFixture::guide("guide.md")).unwrap();
    vault
        .write("kebab.md", "# Title\n\n## Getting Started\n\nText.\n")
        .unwrap();
    let source = vault
        .write(
            "source.md",
            "[a](guide.md#Instal)\n[b](kebab.md#getting-started)\n[c](guide.md#^note2)\n",
        )
        .unwrap();

    let report = validator(None).validate_file(&source).await.unwrap();
    assert_eq!(report.summary.errors, 3);

    let suggestion = |i: usize| {
        report.citations[i]
            .validation
            .as_ref()
            .and_then(ValidationResult::suggestion)
            .map(ToString::to_string)
    };

    assert!(suggestion(0).unwrap().contains("#Install"));
    assert_eq!(suggestion(1).as_deref(), Some("Use raw header format: #Getting%20Started"));
    assert!(suggestion(2).unwrap().contains("#note1"));
}

#[tokio::test]
async fn test_internal_links_and_encoded_headers() {
    let vault = TestVault::new().unwrap();
    let source = vault
        .write(
            "self.md",
            "# Step 1: Install the tool\n\n\
             Jump to [step](#Step%201%20Install%20the%20tool).\n\n\
             Kept line. ^keep\n\n\
             See [[#^keep]] and [gone](#Nowhere).\n",
        )
        .unwrap();

    let report = validator(None).validate_file(&source).await.unwrap();
    let statuses: Vec<_> = report.citations.iter().filter_map(|c| c.status()).collect();
    assert_eq!(
        statuses,
        vec![ValidationStatus::Valid, ValidationStatus::Valid, ValidationStatus::Error]
    );
}

#[tokio::test]
async fn test_restrict_to_lines() {
    let vault = TestVault::new().unwrap();
    vault.add(&MarkdownFixture::guide("guide.md")).unwrap();
    let notes = vault.add(&MarkdownFixture::citing("notes.md", "guide.md")).unwrap();

    let report = validator(None).validate_file(&notes).await.unwrap();
    let report = report.restrict_to_lines(&(3..=4));
    assert_eq!(report.summary.total, 2);
    assert!(!report.has_errors());
}
