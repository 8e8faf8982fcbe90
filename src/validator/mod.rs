//! Citation validation.
//!
//! [`CitationValidator`] classifies every citation of a document as valid,
//! warning or error and writes the result into the citation record itself.
//!
//! # Decision table
//!
//! | File resolved | Cross-directory fallback | Anchor resolved | Status  |
//! |---------------|--------------------------|-----------------|---------|
//! | no            | -                        | -               | error   |
//! | yes           | no                       | yes or absent   | valid   |
//! | yes           | no                       | no              | error   |
//! | yes           | yes                      | yes or absent   | warning |
//! | yes           | yes                      | no              | error   |
//!
//! A broken anchor is an error however the file was found. An exact match on a
//! kebab-case anchor is also an error when another header's text slugifies to
//! the same string; the raw header form is recommended instead.
//!
//! # Concurrency
//!
//! All citations of a file are validated concurrently. Target documents come
//! from the shared [`ParseCache`], so ten links to one file parse it once.

pub mod anchor_matching;
pub mod path_resolution;

use futures::future::join_all;
use serde::Serialize;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cache::ParseCache;
use crate::constants::{ANCHOR_SIMILARITY_THRESHOLD, MAX_ANCHOR_SUGGESTIONS};
use crate::core::CiteError;
use crate::document::ParsedDocument;
use crate::lookup::FilenameLookup;
use crate::models::{Citation, LinkScope, PathConversion, ValidationResult, ValidationStatus};
use crate::utils::fs::{absolutize, canonical_key, relative_path};
use anchor_matching::{AnchorMatch, match_anchor, shadowing_header};
use path_resolution::{PathResolution, ResolvedTarget, resolve_target};

/// Counts per validation status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ValidationSummary {
    /// Citations validated
    pub total: usize,
    /// Citations that resolved directly
    pub valid: usize,
    /// Citations resolved through a fallback
    pub warnings: usize,
    /// Broken citations
    pub errors: usize,
}

impl ValidationSummary {
    /// Tally the statuses of validated citations.
    #[must_use]
    pub fn from_citations(citations: &[Citation]) -> Self {
        let mut summary = Self {
            total: citations.len(),
            ..Self::default()
        };
        for citation in citations {
            match citation.status() {
                Some(ValidationStatus::Valid) => summary.valid += 1,
                Some(ValidationStatus::Warning) => summary.warnings += 1,
                Some(ValidationStatus::Error) | None => summary.errors += 1,
            }
        }
        summary
    }
}

/// Validation outcome for one file.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    /// File that was validated
    pub file: PathBuf,
    /// Aggregate counts
    pub summary: ValidationSummary,
    /// Every citation, enriched with its validation result
    pub citations: Vec<Citation>,
}

impl ValidationReport {
    fn new(file: PathBuf, citations: Vec<Citation>) -> Self {
        Self {
            file,
            summary: ValidationSummary::from_citations(&citations),
            citations,
        }
    }

    /// Whether any citation is broken.
    #[must_use]
    pub const fn has_errors(&self) -> bool {
        self.summary.errors > 0
    }

    /// Keep only citations on lines within `lines`, recomputing the summary.
    #[must_use]
    pub fn restrict_to_lines(mut self, lines: &RangeInclusive<usize>) -> Self {
        self.citations.retain(|c| lines.contains(&c.line));
        self.summary = ValidationSummary::from_citations(&self.citations);
        self
    }
}

/// Multi-strategy citation validator.
pub struct CitationValidator {
    cache: Arc<ParseCache>,
    lookup: Option<Arc<dyn FilenameLookup>>,
    similarity_threshold: f64,
    max_suggestions: usize,
}

impl std::fmt::Debug for CitationValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CitationValidator")
            .field("cache", &self.cache)
            .field("has_lookup", &self.lookup.is_some())
            .finish_non_exhaustive()
    }
}

impl CitationValidator {
    /// Create a validator over a shared cache and an optional filename lookup.
    #[must_use]
    pub fn new(cache: Arc<ParseCache>, lookup: Option<Arc<dyn FilenameLookup>>) -> Self {
        Self {
            cache,
            lookup,
            similarity_threshold: ANCHOR_SIMILARITY_THRESHOLD,
            max_suggestions: MAX_ANCHOR_SUGGESTIONS,
        }
    }

    /// Override anchor suggestion tuning.
    #[must_use]
    pub const fn with_suggestion_limits(mut self, threshold: f64, max_suggestions: usize) -> Self {
        self.similarity_threshold = threshold;
        self.max_suggestions = max_suggestions;
        self
    }

    /// The shared parse cache.
    #[must_use]
    pub const fn cache(&self) -> &Arc<ParseCache> {
        &self.cache
    }

    /// Validate every citation in the file at `path`.
    ///
    /// # Errors
    ///
    /// Fails only when the file itself cannot be parsed; broken citations are
    /// reported in the returned report.
    pub async fn validate_file(&self, path: impl AsRef<Path>) -> Result<ValidationReport, CiteError> {
        let path = path.as_ref();
        let document = self.cache.resolve_parsed_file(path).await?;
        tracing::debug!(
            target: "validator",
            "Validating {} citations in {}",
            document.links().len(),
            path.display()
        );

        let citations = self.validate_citations(document.links().to_vec()).await;
        Ok(ValidationReport::new(document.file_path().to_path_buf(), citations))
    }

    /// Validate one citation, typically built by hand.
    ///
    /// `context_path` replaces the citation's source path when given.
    pub async fn validate_single_citation(
        &self,
        mut citation: Citation,
        context_path: Option<&Path>,
    ) -> Citation {
        if let Some(context) = context_path {
            citation.source_path = absolutize(context);
        }
        self.enrich(citation).await
    }

    /// Validate citations concurrently, returning the same records enriched.
    pub async fn validate_citations(&self, citations: Vec<Citation>) -> Vec<Citation> {
        join_all(citations.into_iter().map(|citation| self.enrich(citation))).await
    }

    async fn enrich(&self, mut citation: Citation) -> Citation {
        if citation.is_validated() {
            tracing::debug!(
                target: "validator",
                "Citation at {}:{} already validated, leaving unchanged",
                citation.line,
                citation.column
            );
            return citation;
        }

        let result = self.classify(&citation).await;
        tracing::trace!(
            target: "validator",
            "{}:{} {} -> {}",
            citation.line,
            citation.column,
            citation.full_match,
            result.status()
        );
        citation.set_validation(result);
        citation
    }

    /// Locate the file a citation points at.
    ///
    /// Internal links resolve to their own document; cross-document links run
    /// the path strategies.
    pub async fn locate_target(&self, citation: &Citation) -> PathResolution {
        match (&citation.scope, citation.target.raw.as_deref()) {
            (LinkScope::CrossDocument, Some(raw)) if !raw.is_empty() => {
                resolve_target(&citation.source_path, raw, self.lookup.as_deref()).await
            }
            _ => PathResolution::Resolved(ResolvedTarget::same_document(&citation.source_path)),
        }
    }

    async fn classify(&self, citation: &Citation) -> ValidationResult {
        let target = match self.locate_target(citation).await {
            PathResolution::Resolved(target) => target,
            PathResolution::Missing { suggestion } => {
                return ValidationResult::Error {
                    message: format!(
                        "File not found: {}",
                        citation.target.raw.as_deref().unwrap_or_default()
                    ),
                    suggestion,
                    path_conversion: None,
                };
            }
        };

        let document = match self.cache.resolve_parsed_file(&target.path).await {
            Ok(document) => document,
            Err(error) => {
                return ValidationResult::error(format!("Failed to read target file: {error}"));
            }
        };

        if let Some(anchor) = citation.anchor.as_deref().filter(|a| !a.is_empty()) {
            if let Some(result) = self.check_anchor(&document, anchor) {
                return result;
            }
        }

        if target.cross_directory {
            let raw = citation.target.raw.clone().unwrap_or_default();
            let source_dir = canonical_key(&citation.source_path)
                .parent()
                .map_or_else(|| PathBuf::from("/"), Path::to_path_buf);
            let recommended = relative_path(&source_dir, &canonical_key(&target.path));
            return ValidationResult::Warning {
                message: format!("Found in different directory: {}", target.path.display()),
                suggestion: Some(format!("Update path to: {recommended}")),
                path_conversion: Some(PathConversion {
                    original: raw,
                    recommended,
                }),
            };
        }

        ValidationResult::Valid
    }

    /// `None` when the anchor is acceptable, otherwise the error to report.
    fn check_anchor(&self, document: &ParsedDocument, anchor: &str) -> Option<ValidationResult> {
        match match_anchor(document, anchor) {
            Some(AnchorMatch::Exact) => shadowing_header(document, anchor).map(|header| {
                let raw_form = header.url_encoded_id().unwrap_or(header.id());
                ValidationResult::error_with_suggestion(
                    format!(
                        "Kebab-case anchor '#{anchor}' is ambiguous with header '{}'",
                        header.id()
                    ),
                    format!("Use raw header format: #{raw_form}"),
                )
            }),
            Some(_) => None,
            None => Some(self.broken_anchor(document, anchor)),
        }
    }

    fn broken_anchor(&self, document: &ParsedDocument, anchor: &str) -> ValidationResult {
        let message = format!("Anchor not found: #{anchor}");

        if let Some(header) = shadowing_header(document, anchor) {
            let raw_form = header.url_encoded_id().unwrap_or(header.id());
            return ValidationResult::error_with_suggestion(
                message,
                format!("Use raw header format: #{raw_form}"),
            );
        }

        let lookup_id = anchor.strip_prefix('^').unwrap_or(anchor);
        let similar = document.find_similar_anchors_with(
            lookup_id,
            self.similarity_threshold,
            self.max_suggestions,
        );
        if similar.is_empty() {
            ValidationResult::error(message)
        } else {
            let listing = similar
                .iter()
                .map(|s| format!("#{s}"))
                .collect::<Vec<_>>()
                .join(", ");
            ValidationResult::error_with_suggestion(message, format!("Did you mean: {listing}?"))
        }
    }
}
