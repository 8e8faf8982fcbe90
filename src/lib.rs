//! citation-manager - markdown citation validation and content extraction
//!
//! Checks that every cross-document link in a markdown file points at a file and
//! anchor that exist, and bundles the content those links cite into one
//! deduplicated package.
//!
//! # Architecture Overview
//!
//! ```text
//!   source.md ──► ParseCache ──► ParsedDocument ──► CitationValidator ──► ContentExtractor
//!                   (one parse per file)   (anchor/section queries)   (status per link)   (dedup bundle)
//! ```
//!
//! - Every component reads documents through one shared [`cache::ParseCache`], so a
//!   file cited many times is read and tokenized once, even under concurrent requests.
//! - Link problems are data: each [`models::Citation`] carries a
//!   [`models::ValidationResult`] of `valid`, `warning` or `error`. Only failures to
//!   read the source file itself surface as [`core::CiteError`].
//! - Extraction eligibility is decided by a chain of
//!   [`extractor::eligibility::EligibilityStrategy`] values; extracted text is keyed by
//!   a content hash so identical sections are stored once.
//!
//! # Core Modules
//!
//! - [`markdown`] - tokenizer, link and anchor extraction
//! - [`document`] - [`document::ParsedDocument`] query facade
//! - [`cache`] - single-flight parse cache
//! - [`lookup`] - filename index for links pointing at moved files
//! - [`validator`] - path and anchor validation with suggestions
//! - [`extractor`] - eligibility, retrieval and deduplication
//!
//! ## Supporting Modules
//!
//! - [`cli`] - `validate` and `extract` commands
//! - [`config`] - `.citation-manager.toml` loading
//! - [`core`] - error types and user-facing error rendering
//! - [`models`] - citations, anchors and extraction results
//! - [`utils`] - path normalization and file discovery
//!
//! # Example
//!
//! ```rust,no_run
//! use citation_manager::cache::ParseCache;
//! use citation_manager::validator::CitationValidator;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), citation_manager::core::CiteError> {
//! let validator = CitationValidator::new(Arc::new(ParseCache::default()), None);
//! let report = validator.validate_file("docs/plan.md").await?;
//! for citation in &report.citations {
//!     println!("{}:{} {:?}", citation.line, citation.column, citation.status());
//! }
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod document;
pub mod extractor;
pub mod lookup;
pub mod markdown;
pub mod models;
pub mod utils;
pub mod validator;

// Available to unit tests and, through the feature, to the integration suite
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
