//! Per-file query facade over a parse result.
//!
//! [`ParsedDocument`] hides the raw [`ParseOutput`] behind the questions the
//! validator and extractor need answered: does an anchor exist, which anchors
//! look like a mistyped one, and what text does a section or block span.
//!
//! Every lookup that can miss returns `Option`; turning a miss into a reportable
//! outcome is the caller's job.
//!
//! # Section boundaries
//!
//! ```markdown
//! ## Setup          <- extract_section("Setup", 2) starts here
//! text
//! ### Install       <- deeper heading, stays inside the section
//! text
//! ## Usage          <- same depth, section ends before this line
//! ```

pub mod similarity;

use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;

use crate::constants::{ANCHOR_SIMILARITY_THRESHOLD, MAX_ANCHOR_SUGGESTIONS};
use crate::markdown::{ParseOutput, Token, flatten};
use crate::models::{Anchor, AnchorType, Citation, url_encode_heading};

/// Immutable view of one parsed markdown file with memoized derived data.
#[derive(Debug)]
pub struct ParsedDocument {
    output: ParseOutput,
    anchor_ids: OnceLock<HashSet<String>>,
    header_anchors: OnceLock<Vec<Anchor>>,
    block_anchors: OnceLock<Vec<Anchor>>,
}

impl ParsedDocument {
    /// Wrap a parse result.
    #[must_use]
    pub const fn new(output: ParseOutput) -> Self {
        Self {
            output,
            anchor_ids: OnceLock::new(),
            header_anchors: OnceLock::new(),
            block_anchors: OnceLock::new(),
        }
    }

    /// Absolute path of the document.
    #[must_use]
    pub fn file_path(&self) -> &Path {
        &self.output.file_path
    }

    /// Full source text.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.output.content
    }

    /// Block token tree.
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.output.tokens
    }

    /// Citations found in the document.
    #[must_use]
    pub fn links(&self) -> &[Citation] {
        &self.output.links
    }

    /// All anchors in source order.
    #[must_use]
    pub fn anchors(&self) -> &[Anchor] {
        &self.output.anchors
    }

    /// Every anchor id plus every URL-encoded header id.
    pub fn anchor_ids(&self) -> &HashSet<String> {
        self.anchor_ids.get_or_init(|| {
            let mut ids = HashSet::new();
            for anchor in &self.output.anchors {
                ids.insert(anchor.id().to_string());
                if let Some(encoded) = anchor.url_encoded_id() {
                    ids.insert(encoded.to_string());
                }
            }
            ids
        })
    }

    /// Header anchors in source order.
    pub fn header_anchors(&self) -> &[Anchor] {
        self.header_anchors.get_or_init(|| self.anchors_of(AnchorType::Header))
    }

    /// Block anchors in source order.
    pub fn block_anchors(&self) -> &[Anchor] {
        self.block_anchors.get_or_init(|| self.anchors_of(AnchorType::Block))
    }

    fn anchors_of(&self, kind: AnchorType) -> Vec<Anchor> {
        self.output
            .anchors
            .iter()
            .filter(|a| a.kind() == kind)
            .cloned()
            .collect()
    }

    /// Whether `id` matches an anchor id or a URL-encoded header id.
    #[must_use]
    pub fn has_anchor(&self, id: &str) -> bool {
        self.anchor_ids().contains(id)
    }

    /// Up to five anchor ids resembling `id`, best match first.
    ///
    /// Candidates below 0.30 normalized Levenshtein similarity are dropped.
    #[must_use]
    pub fn find_similar_anchors(&self, id: &str) -> Vec<String> {
        self.find_similar_anchors_with(id, ANCHOR_SIMILARITY_THRESHOLD, MAX_ANCHOR_SUGGESTIONS)
    }

    /// [`find_similar_anchors`](Self::find_similar_anchors) with explicit tuning.
    #[must_use]
    pub fn find_similar_anchors_with(&self, id: &str, threshold: f64, limit: usize) -> Vec<String> {
        let candidates = self.output.anchors.iter().flat_map(|anchor| {
            std::iter::once(anchor.id()).chain(anchor.url_encoded_id())
        });
        similarity::rank_similar(id, candidates, threshold, limit)
    }

    /// The complete source text.
    #[must_use]
    pub fn extract_full_content(&self) -> String {
        self.output.content.clone()
    }

    /// Text of the section introduced by the heading `heading_text` at depth
    /// `level`.
    ///
    /// The section runs from that heading up to (not including) the next
    /// heading of depth `level` or shallower, or to the end of the document.
    /// Returns `None` when no such heading exists.
    #[must_use]
    pub fn extract_section(&self, heading_text: &str, level: u8) -> Option<String> {
        let flat = flatten(&self.output.tokens);
        let start_index = flat.iter().position(|token| {
            token.is_heading()
                && token.depth == Some(level)
                && token.text.as_deref() == Some(heading_text)
        })?;

        let start = flat[start_index].range.start;
        let end = flat[start_index + 1..]
            .iter()
            .find(|token| token.is_heading() && token.depth.is_some_and(|d| d <= level))
            .map_or(self.output.content.len(), |token| token.range.start);

        self.output.content.get(start..end).map(ToString::to_string)
    }

    /// The single source line carrying block anchor `anchor_id` (without `^`).
    #[must_use]
    pub fn extract_block(&self, anchor_id: &str) -> Option<String> {
        let anchor = self
            .block_anchors()
            .iter()
            .find(|anchor| anchor.id() == anchor_id)?;

        let index = anchor.line().checked_sub(1)?;
        self.output.content.lines().nth(index).map(ToString::to_string)
    }

    /// Depth of the first heading whose text, or URL-encoded text, equals
    /// `heading`.
    #[must_use]
    pub fn heading_level(&self, heading: &str) -> Option<u8> {
        flatten(&self.output.tokens)
            .into_iter()
            .filter(|token| token.is_heading())
            .find(|token| {
                token
                    .text
                    .as_deref()
                    .is_some_and(|text| text == heading || url_encode_heading(text) == heading)
            })
            .and_then(|token| token.depth)
    }

    /// Heading text for a header anchor id or URL-encoded id.
    #[must_use]
    pub fn heading_text_for(&self, anchor: &str) -> Option<&str> {
        self.header_anchors()
            .iter()
            .find(|a| a.id() == anchor || a.url_encoded_id() == Some(anchor))
            .and_then(Anchor::raw_text)
    }
}
