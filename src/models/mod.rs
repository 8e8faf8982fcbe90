//! Shared data models for citation validation and extraction
//!
//! These types flow through the whole pipeline: the markdown parser produces
//! [`Citation`]s and [`Anchor`]s, the validator enriches each citation with a
//! [`ValidationResult`], and the extractor turns validated citations into an
//! [`ExtractionResult`].

mod anchor;
mod citation;
mod extraction;

pub use anchor::{Anchor, AnchorType, url_encode_heading};
pub use citation::{
    Citation, ExtractionMarker, LinkScope, LinkSyntax, LinkTarget, PathConversion,
    ValidationResult, ValidationStatus,
};
pub use extraction::{
    CitationReference, ContentEntry, EligibilityDecision, ExtractionFlags, ExtractionOutcome,
    ExtractionResult, ExtractionStats, OutcomeStatus, SourceRef,
};
