//! Content extraction.
//!
//! [`ContentExtractor`] turns the citations of a document into one
//! deduplicated bundle of cited text:
//!
//! 1. validate the source file (through the shared validator and cache)
//! 2. skip stop-marked citations, citations that failed validation and those
//!    the [eligibility chain](eligibility) rejects
//! 3. retrieve the cited text concurrently: a header section, a block line or
//!    the whole file
//! 4. [deduplicate](dedup) identical texts into a content index
//!
//! Per-citation problems become `skipped` or `error` outcomes; only a failure
//! to read the source file itself is returned as an error.
//!
//! # Examples
//!
//! ```rust,no_run
//! use citation_manager::cache::ParseCache;
//! use citation_manager::extractor::ContentExtractor;
//! use citation_manager::models::ExtractionFlags;
//! use citation_manager::validator::CitationValidator;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), citation_manager::core::CiteError> {
//! let validator = Arc::new(CitationValidator::new(Arc::new(ParseCache::default()), None));
//! let extractor = ContentExtractor::new(validator);
//! let result = extractor
//!     .extract_links_content("docs/plan.md", ExtractionFlags { full_files: true })
//!     .await?;
//! println!("{} unique blocks", result.stats.unique_content);
//! # Ok(())
//! # }
//! ```

pub mod dedup;
pub mod eligibility;

use futures::future::join_all;
use std::path::Path;
use std::sync::Arc;

use crate::core::CiteError;
use crate::document::ParsedDocument;
use crate::models::{
    Anchor, AnchorType, Citation, ExtractionFlags, ExtractionOutcome, ExtractionResult,
    ValidationResult,
};
use crate::utils::fs::percent_decode;
use crate::validator::CitationValidator;
use crate::validator::anchor_matching::strip_markup;
use crate::validator::path_resolution::PathResolution;
use dedup::{ProcessedCitation, deduplicate};
use eligibility::{EligibilityStrategy, StopMarkerStrategy, default_chain, evaluate_chain};

/// Strategy-driven, deduplicating content extractor.
pub struct ContentExtractor {
    validator: Arc<CitationValidator>,
    strategies: Vec<Box<dyn EligibilityStrategy>>,
}

impl std::fmt::Debug for ContentExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentExtractor")
            .field("validator", &self.validator)
            .field("strategies", &self.strategies.len())
            .finish()
    }
}

impl ContentExtractor {
    /// Extractor with the standard eligibility chain.
    #[must_use]
    pub fn new(validator: Arc<CitationValidator>) -> Self {
        Self::with_strategies(validator, default_chain())
    }

    /// Extractor with a custom eligibility chain, evaluated in order.
    #[must_use]
    pub fn with_strategies(
        validator: Arc<CitationValidator>,
        strategies: Vec<Box<dyn EligibilityStrategy>>,
    ) -> Self {
        Self {
            validator,
            strategies,
        }
    }

    /// Validate `path` and extract the content its citations point at.
    ///
    /// # Errors
    ///
    /// Returns an error only when the source file cannot be parsed.
    pub async fn extract_links_content(
        &self,
        path: impl AsRef<Path>,
        flags: ExtractionFlags,
    ) -> Result<ExtractionResult, CiteError> {
        let report = self.validator.validate_file(path).await?;
        Ok(self.extract_citations(report.citations, flags).await)
    }

    /// Extract content for an explicit list of citations.
    ///
    /// Citations not yet validated are validated first.
    pub async fn extract_citations(
        &self,
        citations: Vec<Citation>,
        flags: ExtractionFlags,
    ) -> ExtractionResult {
        let citations = self.validator.validate_citations(citations).await;
        let processed =
            join_all(citations.into_iter().map(|citation| self.process(citation, flags))).await;
        deduplicate(processed)
    }

    async fn process(&self, citation: Citation, flags: ExtractionFlags) -> ProcessedCitation {
        // A stop marker is reported as such even on a broken link
        if let Some(decision) = StopMarkerStrategy.evaluate(&citation, flags) {
            return skipped(citation, decision.reason);
        }

        if let Some(ValidationResult::Error { message, .. }) = &citation.validation {
            let reason = format!("Link failed validation: {message}");
            return skipped(citation, reason);
        }

        let decision = evaluate_chain(&self.strategies, &citation, flags);
        if !decision.eligible {
            tracing::trace!(
                target: "extractor",
                "Skipping {}: {}",
                citation.full_match,
                decision.reason
            );
            return skipped(citation, decision.reason);
        }

        let target_file = match self.validator.locate_target(&citation).await {
            PathResolution::Resolved(target) => target.path,
            PathResolution::Missing { .. } => {
                let reason = format!(
                    "Failed to read target file: {} not found",
                    citation.target.raw.as_deref().unwrap_or_default()
                );
                return ProcessedCitation {
                    citation,
                    target_file: None,
                    outcome: ExtractionOutcome::Error { reason },
                };
            }
        };

        let outcome = self.retrieve(&citation, &target_file, decision.reason).await;
        if let ExtractionOutcome::Error { reason } = &outcome {
            tracing::warn!(target: "extractor", "{}: {reason}", citation.full_match);
        }

        ProcessedCitation {
            citation,
            target_file: Some(target_file),
            outcome,
        }
    }

    async fn retrieve(&self, citation: &Citation, target: &Path, reason: String) -> ExtractionOutcome {
        let document = match self.validator.cache().resolve_parsed_file(target).await {
            Ok(document) => document,
            Err(error) => {
                return ExtractionOutcome::Error {
                    reason: format!("Failed to read target file: {error}"),
                };
            }
        };

        let anchor = citation.anchor.as_deref().filter(|a| !a.is_empty());
        let content = match (anchor, citation.anchor_type) {
            (None, _) => Some(document.extract_full_content()),
            (Some(anchor), Some(AnchorType::Block)) => {
                document.extract_block(anchor.trim_start_matches('^'))
            }
            (Some(anchor), _) => extract_header_section(&document, anchor),
        };

        match content {
            Some(content) => ExtractionOutcome::Success { content, reason },
            None => ExtractionOutcome::Error {
                reason: format!("Anchor not found: #{}", anchor.unwrap_or_default()),
            },
        }
    }
}

fn skipped(citation: Citation, reason: String) -> ProcessedCitation {
    ProcessedCitation {
        citation,
        target_file: None,
        outcome: ExtractionOutcome::Skipped { reason },
    }
}

/// Section under the heading a header anchor refers to.
///
/// The anchor may be the raw heading, its URL-encoded id, a percent-encoded
/// spelling or the heading with inline markup stripped.
fn extract_header_section(document: &ParsedDocument, anchor: &str) -> Option<String> {
    let decoded = percent_decode(anchor).unwrap_or_else(|| anchor.to_string());
    let heading = document
        .heading_text_for(anchor)
        .or_else(|| document.heading_text_for(&decoded))
        .or_else(|| {
            document
                .header_anchors()
                .iter()
                .filter_map(Anchor::raw_text)
                .find(|raw| strip_markup(raw) == decoded)
        })
        .unwrap_or(decoded.as_str());

    let level = document.heading_level(heading)?;
    document.extract_section(heading, level)
}
