//! Content deduplication.
//!
//! Extracted texts are fingerprinted with SHA-256. The first citation producing
//! a fingerprint stores the text; later ones only add a [`SourceRef`] and are
//! counted as saved bytes.
//!
//! Only byte-identical texts collapse. A section that contains a smaller,
//! separately extracted subsection is stored twice.

use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::path::PathBuf;

use crate::constants::CONTENT_ID_LENGTH;
use crate::models::{
    Citation, CitationReference, ContentEntry, ExtractionOutcome, ExtractionResult,
    ExtractionStats, SourceRef,
};

/// A citation after the retrieval loop, before deduplication.
#[derive(Debug, Clone)]
pub struct ProcessedCitation {
    /// The validated citation
    pub citation: Citation,
    /// Resolved target file, when known
    pub target_file: Option<PathBuf>,
    /// What happened to it
    pub outcome: ExtractionOutcome,
}

/// Short content fingerprint: the first hex characters of SHA-256.
#[must_use]
pub fn content_id(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let mut id = hex::encode(hasher.finalize());
    id.truncate(CONTENT_ID_LENGTH);
    id
}

/// Fold processed citations into the indexed, deduplicated result.
#[must_use]
pub fn deduplicate(processed: Vec<ProcessedCitation>) -> ExtractionResult {
    let total_links = processed.len();
    let mut content_index: BTreeMap<String, ContentEntry> = BTreeMap::new();
    let mut citations = Vec::with_capacity(total_links);
    let mut successes = 0usize;
    let mut total_bytes = 0usize;
    let mut bytes_saved = 0usize;

    for ProcessedCitation {
        citation,
        target_file,
        outcome,
    } in processed
    {
        let status = outcome.status();
        let mut reference = CitationReference {
            content_id: None,
            line: citation.line,
            column: citation.column,
            target: citation.target.raw.clone(),
            anchor: citation.anchor.clone(),
            status,
            reason: outcome.reason().to_string(),
        };

        if let ExtractionOutcome::Success { content, .. } = outcome {
            successes += 1;
            total_bytes += content.len();

            let id = content_id(&content);
            let source = SourceRef {
                target_file: target_file.unwrap_or_else(|| citation.source_path.clone()),
                anchor: citation.anchor.clone(),
                anchor_type: citation.anchor_type,
            };

            match content_index.entry(id.clone()) {
                Entry::Occupied(mut entry) => {
                    let entry = entry.get_mut();
                    bytes_saved += entry.content_length;
                    entry.sources.push(source);
                }
                Entry::Vacant(entry) => {
                    entry.insert(ContentEntry {
                        content_length: content.len(),
                        content,
                        sources: vec![source],
                    });
                }
            }
            reference.content_id = Some(id);
        }

        citations.push(reference);
    }

    #[allow(clippy::cast_precision_loss)]
    let compression_ratio = if total_bytes == 0 {
        0.0
    } else {
        bytes_saved as f64 / total_bytes as f64
    };

    let stats = ExtractionStats {
        total_links,
        unique_content: content_index.len(),
        duplicate_content_detected: successes - content_index.len(),
        bytes_saved,
        compression_ratio,
    };

    tracing::debug!(
        target: "extractor",
        "Deduplicated {successes} extractions into {} entries ({bytes_saved} bytes saved)",
        stats.unique_content
    );

    ExtractionResult {
        content_index,
        citations,
        stats,
    }
}
