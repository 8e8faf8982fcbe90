//! Anchor matching strategies and the kebab-case strictness check.

use regex::Regex;
use std::sync::LazyLock;

use crate::document::ParsedDocument;
use crate::models::{Anchor, url_encode_heading};
use crate::utils::fs::percent_decode;

/// Which strategy matched a citation's anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorMatch {
    /// Identical to an anchor id or URL-encoded id
    Exact,
    /// Matched after percent-decoding
    Decoded,
    /// `^id` matched a block anchor
    Block,
    /// Matched a header once inline markup was stripped
    NormalizedMarkdown,
}

type AnchorStrategy = fn(&ParsedDocument, &str) -> bool;

const STRATEGIES: &[(AnchorMatch, AnchorStrategy)] = &[
    (AnchorMatch::Exact, exact),
    (AnchorMatch::Decoded, decoded),
    (AnchorMatch::Block, block),
    (AnchorMatch::NormalizedMarkdown, normalized_markdown),
];

static KEBAB_CASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)+$").expect("kebab regex compiles"));

/// Run the strategies in order and report the first that matches.
#[must_use]
pub fn match_anchor(document: &ParsedDocument, anchor: &str) -> Option<AnchorMatch> {
    STRATEGIES
        .iter()
        .find(|(_, strategy)| strategy(document, anchor))
        .map(|(kind, _)| *kind)
}

fn exact(document: &ParsedDocument, anchor: &str) -> bool {
    document.has_anchor(anchor)
}

fn decoded(document: &ParsedDocument, anchor: &str) -> bool {
    percent_decode(anchor).is_some_and(|d| d != anchor && document.has_anchor(&d))
}

fn block(document: &ParsedDocument, anchor: &str) -> bool {
    anchor
        .strip_prefix('^')
        .is_some_and(|id| document.block_anchors().iter().any(|a| a.id() == id))
}

fn normalized_markdown(document: &ParsedDocument, anchor: &str) -> bool {
    let decoded = percent_decode(anchor);
    let wanted: Vec<&str> = std::iter::once(anchor).chain(decoded.as_deref()).collect();

    document.header_anchors().iter().filter_map(Anchor::raw_text).any(|raw| {
        let plain = strip_markup(raw);
        let encoded = url_encode_heading(&plain);
        wanted.iter().any(|w| *w == plain || *w == encoded)
    })
}

/// Remove inline emphasis, code, highlight and strikethrough markers.
#[must_use]
pub fn strip_markup(text: &str) -> String {
    text.replace("==", "")
        .replace("~~", "")
        .chars()
        .filter(|c| !matches!(c, '*' | '_' | '`'))
        .collect()
}

/// Lowercase kebab slug of heading text: markup removed, whitespace and
/// hyphen runs become one `-`, other punctuation is dropped.
#[must_use]
pub fn kebab_slug(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in strip_markup(text).chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else if c.is_whitespace() || c == '-' {
            pending_dash = true;
        }
    }
    slug
}

/// Whether `anchor` looks like a generated kebab-case slug.
#[must_use]
pub fn is_kebab_case(anchor: &str) -> bool {
    KEBAB_CASE.is_match(anchor)
}

/// A header other than `anchor` itself whose text slugifies to `anchor`.
///
/// Used both for the strictness check on exact kebab matches and to suggest
/// the raw header form for broken kebab anchors.
#[must_use]
pub fn shadowing_header<'a>(document: &'a ParsedDocument, anchor: &str) -> Option<&'a Anchor> {
    if !is_kebab_case(anchor) {
        return None;
    }
    document
        .header_anchors()
        .iter()
        .find(|header| header.id() != anchor && kebab_slug(header.id()) == anchor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::parse_content;
    use std::path::Path;

    fn document(content: &str) -> ParsedDocument {
        ParsedDocument::new(parse_content(Path::new("/vault/t.md"), content.to_string()))
    }

    #[test]
    fn test_strategy_order() {
        let doc = document("# Getting Started\n\n## **Bold** Move\n\nline ^blk-1\n");
        assert_eq!(match_anchor(&doc, "Getting Started"), Some(AnchorMatch::Exact));
        assert_eq!(match_anchor(&doc, "Getting%20Started"), Some(AnchorMatch::Exact));
        assert_eq!(match_anchor(&doc, "Getting%20Started%20"), None);
        assert_eq!(match_anchor(&doc, "^blk-1"), Some(AnchorMatch::Block));
        assert_eq!(match_anchor(&doc, "Bold Move"), Some(AnchorMatch::NormalizedMarkdown));
        assert_eq!(match_anchor(&doc, "Bold%20Move"), Some(AnchorMatch::NormalizedMarkdown));
        assert_eq!(match_anchor(&doc, "Nope"), None);
    }

    #[test]
    fn test_decoded_match() {
        let doc = document("# Q&A: Notes\n");
        assert_eq!(match_anchor(&doc, "Q%26A%3A%20Notes"), Some(AnchorMatch::Decoded));
    }

    #[test]
    fn test_block_strategy_ignores_headers() {
        let doc = document("# intro\n");
        assert_eq!(match_anchor(&doc, "^intro"), None);
    }

    #[test]
    fn test_kebab_slug() {
        assert_eq!(kebab_slug("Getting Started"), "getting-started");
        assert_eq!(kebab_slug("The `parse()` Step: Part 2"), "the-parse-step-part-2");
        assert!(is_kebab_case("getting-started"));
        assert!(!is_kebab_case("Getting-Started"));
        assert!(!is_kebab_case("single"));
    }

    #[test]
    fn test_shadowing_header() {
        let doc = document("# getting-started\n\n# Getting Started\n");
        let shadow = shadowing_header(&doc, "getting-started").unwrap();
        assert_eq!(shadow.id(), "Getting Started");

        let lone = document("# getting-started\n");
        assert!(shadowing_header(&lone, "getting-started").is_none());
    }
}
