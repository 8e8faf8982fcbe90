//! Eligibility strategies.
//!
//! Each strategy either decides or passes (`None`). The chain runs in
//! precedence order and the first decision wins:
//!
//! 1. [`StopMarkerStrategy`] - `%%stop-extract-link%%` never extracts
//! 2. [`ForceMarkerStrategy`] - `%%force-extract%%` always extracts
//! 3. [`SectionLinkStrategy`] - header and block links extract by default
//! 4. [`FullFilesStrategy`] - whole-file links extract with `--full-files`
//!
//! When every strategy passes the citation is not eligible.

use crate::models::{Citation, EligibilityDecision, ExtractionFlags, ExtractionMarker};

/// One rule of the eligibility chain.
pub trait EligibilityStrategy: Send + Sync {
    /// Decide for `citation`, or return `None` to defer to the next strategy.
    fn evaluate(&self, citation: &Citation, flags: ExtractionFlags) -> Option<EligibilityDecision>;
}

/// Stop marker wins over everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct StopMarkerStrategy;

impl EligibilityStrategy for StopMarkerStrategy {
    fn evaluate(&self, citation: &Citation, _: ExtractionFlags) -> Option<EligibilityDecision> {
        (citation.extraction_marker == Some(ExtractionMarker::Stop))
            .then(|| EligibilityDecision::ineligible("Stop marker prevents extraction"))
    }
}

/// Force marker overrides the defaults below it.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForceMarkerStrategy;

impl EligibilityStrategy for ForceMarkerStrategy {
    fn evaluate(&self, citation: &Citation, _: ExtractionFlags) -> Option<EligibilityDecision> {
        (citation.extraction_marker == Some(ExtractionMarker::Force))
            .then(|| EligibilityDecision::eligible("Force marker overrides defaults"))
    }
}

/// Links with an anchor are eligible by default.
#[derive(Debug, Clone, Copy, Default)]
pub struct SectionLinkStrategy;

impl EligibilityStrategy for SectionLinkStrategy {
    fn evaluate(&self, citation: &Citation, _: ExtractionFlags) -> Option<EligibilityDecision> {
        citation
            .anchor
            .as_deref()
            .is_some_and(|anchor| !anchor.is_empty())
            .then(|| EligibilityDecision::eligible("Markdown anchor links eligible by default"))
    }
}

/// The caller asked for whole files.
#[derive(Debug, Clone, Copy, Default)]
pub struct FullFilesStrategy;

impl EligibilityStrategy for FullFilesStrategy {
    fn evaluate(&self, _: &Citation, flags: ExtractionFlags) -> Option<EligibilityDecision> {
        flags
            .full_files
            .then(|| EligibilityDecision::eligible("--full-files flag set"))
    }
}

/// The standard chain in precedence order.
#[must_use]
pub fn default_chain() -> Vec<Box<dyn EligibilityStrategy>> {
    vec![
        Box::new(StopMarkerStrategy),
        Box::new(ForceMarkerStrategy),
        Box::new(SectionLinkStrategy),
        Box::new(FullFilesStrategy),
    ]
}

/// Run `chain` and return the first decision, or the ineligible default.
#[must_use]
pub fn evaluate_chain(
    chain: &[Box<dyn EligibilityStrategy>],
    citation: &Citation,
    flags: ExtractionFlags,
) -> EligibilityDecision {
    chain
        .iter()
        .find_map(|strategy| strategy.evaluate(citation, flags))
        .unwrap_or_else(|| {
            EligibilityDecision::ineligible(
                "No strategy matched; full-file link requires --full-files",
            )
        })
}
