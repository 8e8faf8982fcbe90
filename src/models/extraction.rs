use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use super::AnchorType;

/// Caller-supplied switches for content extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionFlags {
    /// Extract whole files for citations without an anchor
    pub full_files: bool,
}

/// Result of the eligibility chain for one citation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityDecision {
    /// Whether the citation's target should be extracted
    pub eligible: bool,
    /// Why
    pub reason: String,
}

impl EligibilityDecision {
    /// Eligible decision.
    #[must_use]
    pub fn eligible(reason: impl Into<String>) -> Self {
        Self {
            eligible: true,
            reason: reason.into(),
        }
    }

    /// Ineligible decision.
    #[must_use]
    pub fn ineligible(reason: impl Into<String>) -> Self {
        Self {
            eligible: false,
            reason: reason.into(),
        }
    }
}

/// Per-citation outcome of the retrieval loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionOutcome {
    /// Content retrieved
    Success {
        /// Extracted text
        content: String,
        /// Eligibility reason that admitted the citation
        reason: String,
    },
    /// Never reached retrieval
    Skipped {
        /// Why
        reason: String,
    },
    /// Retrieval failed
    Error {
        /// Why
        reason: String,
    },
}

impl ExtractionOutcome {
    /// Status discriminant.
    #[must_use]
    pub const fn status(&self) -> OutcomeStatus {
        match self {
            Self::Success { .. } => OutcomeStatus::Success,
            Self::Skipped { .. } => OutcomeStatus::Skipped,
            Self::Error { .. } => OutcomeStatus::Error,
        }
    }

    /// Reason string of any variant.
    #[must_use]
    pub fn reason(&self) -> &str {
        match self {
            Self::Success { reason, .. } | Self::Skipped { reason } | Self::Error { reason } => {
                reason
            }
        }
    }
}

/// Outcome status as reported in the final result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    /// Content extracted
    Success,
    /// Not extracted on purpose
    Skipped,
    /// Extraction failed
    Error,
}

/// One citation that produced a given piece of content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceRef {
    /// Target file the content came from
    pub target_file: PathBuf,
    /// Anchor used, if any
    pub anchor: Option<String>,
    /// Anchor kind, if any
    pub anchor_type: Option<AnchorType>,
}

/// A deduplicated piece of extracted content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentEntry {
    /// The text, stored once
    pub content: String,
    /// Length of `content` in bytes
    pub content_length: usize,
    /// Every citation target that produced this exact text
    pub sources: Vec<SourceRef>,
}

/// Per-citation record in the final result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CitationReference {
    /// Content fingerprint, `None` unless the extraction succeeded
    pub content_id: Option<String>,
    /// 1-based source line
    pub line: usize,
    /// 1-based source column
    pub column: usize,
    /// Raw target path (`None` for internal links)
    pub target: Option<String>,
    /// Anchor as written
    pub anchor: Option<String>,
    /// Outcome status
    pub status: OutcomeStatus,
    /// Decision or failure reason
    pub reason: String,
}

/// Aggregate deduplication statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionStats {
    /// Number of citations processed
    pub total_links: usize,
    /// Number of content index entries
    pub unique_content: usize,
    /// Successful extractions that repeated existing content
    pub duplicate_content_detected: usize,
    /// Bytes not stored thanks to deduplication
    pub bytes_saved: usize,
    /// `bytes_saved / total extracted bytes`, 0 when nothing was extracted
    pub compression_ratio: f64,
}

/// Everything one `extract_links_content` call produces.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    /// Fingerprint to content
    pub content_index: BTreeMap<String, ContentEntry>,
    /// One entry per citation, in source order
    pub citations: Vec<CitationReference>,
    /// Aggregate statistics
    pub stats: ExtractionStats,
}
