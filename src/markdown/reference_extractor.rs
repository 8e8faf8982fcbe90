//! Citation and anchor extraction for markdown documents.
//!
//! # Supported Citation Types
//!
//! - **Markdown links**: `[text](path.md)`, `[text](path.md#Header%20Text)`,
//!   `[text](path.md#^block-id)`, `[text](#Internal%20Header)`
//! - **Wiki links**: `[[path]]`, `[[path#Header|text]]`, `[[#Internal]]`
//!
//! # Extraction Rules
//!
//! - Skips URLs with a scheme (`https://`, `mailto:`, ...)
//! - Skips images (`![alt](img.md)`)
//! - Skips anything inside fenced code blocks or inline code spans
//! - Markdown links are only citations when they point at a markdown file or
//!   are a bare `#anchor`
//!
//! # Extraction Markers
//!
//! A marker written right after a citation on the same line overrides the
//! extractor's default eligibility:
//!
//! ```markdown
//! See [the guide](guide.md) %%force-extract%%
//! Ignore [this section](notes.md#Draft) <!-- stop-extract-link -->
//! ```
//!
//! # Anchors
//!
//! Every heading token yields a header anchor; a `^block-id` at the end of a
//! line yields a block anchor.

use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

use super::tokenizer::{Token, flatten};
use crate::constants::{
    FORCE_MARKER_HTML, FORCE_MARKER_OBSIDIAN, STOP_MARKER_HTML, STOP_MARKER_OBSIDIAN,
};
use crate::models::{
    Anchor, AnchorType, Citation, ExtractionMarker, LinkScope, LinkSyntax, LinkTarget,
};
use crate::utils::fs::{is_markdown_file, normalize_path, percent_decode};

static MARKDOWN_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\]]*)\]\(([^)]*)\)").expect("link regex compiles")
});

static WIKI_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\[([^\]|#]*)(?:#([^\]|]*))?(?:\|([^\]]*))?\]\]")
        .expect("wiki regex compiles")
});

static BLOCK_ANCHOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s)\^([A-Za-z0-9][A-Za-z0-9_-]*)\s*$")
        .expect("block anchor regex compiles")
});

static URL_SCHEME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*:").expect("scheme regex compiles")
});

const FORCE_MARKERS: &[&str] = &[FORCE_MARKER_OBSIDIAN, FORCE_MARKER_HTML];
const STOP_MARKERS: &[&str] = &[STOP_MARKER_OBSIDIAN, STOP_MARKER_HTML];

/// Extract every citation from markdown content.
///
/// `source_path` should be absolute; it anchors the resolved target paths.
/// Citations are returned in source order (line, then column).
#[must_use]
pub fn extract_citations(content: &str, source_path: &Path) -> Vec<Citation> {
    let masked = mask_code(content);
    let source_dir = source_path.parent().unwrap_or_else(|| Path::new(""));
    let mut citations = Vec::new();

    for (index, line) in masked.lines().enumerate() {
        let line_number = index + 1;

        for cap in MARKDOWN_LINK.captures_iter(line) {
            let (Some(whole), Some(text), Some(dest)) = (cap.get(0), cap.get(1), cap.get(2))
            else {
                continue;
            };
            if line[..whole.start()].ends_with('!') {
                continue;
            }

            let destination = clean_destination(dest.as_str());
            let (path, anchor) = split_anchor(&destination);
            if path.is_empty() && anchor.is_none() {
                continue;
            }
            if !path.is_empty() && (is_external_reference(&path) || !is_markdown_target(&path)) {
                continue;
            }

            citations.push(build_citation(
                source_path,
                source_dir,
                LinkSyntax::Markdown,
                &path,
                anchor,
                Some(text.as_str().to_string()),
                whole.as_str(),
                line,
                line_number,
                whole.start(),
            ));
        }

        for cap in WIKI_LINK.captures_iter(line) {
            let Some(whole) = cap.get(0) else {
                continue;
            };
            let path = cap.get(1).map_or("", |m| m.as_str()).trim().to_string();
            let anchor = cap
                .get(2)
                .map(|m| m.as_str().trim().to_string())
                .filter(|a| !a.is_empty());
            if path.is_empty() && anchor.is_none() {
                continue;
            }
            if is_external_reference(&path) {
                continue;
            }

            citations.push(build_citation(
                source_path,
                source_dir,
                LinkSyntax::Wiki,
                &path,
                anchor,
                cap.get(3).map(|m| m.as_str().trim().to_string()),
                whole.as_str(),
                line,
                line_number,
                whole.start(),
            ));
        }
    }

    citations.sort_by_key(|c| (c.line, c.column));
    citations
}

/// Extract header anchors (from heading tokens) and block anchors (from
/// trailing `^id` markers).
#[must_use]
pub fn extract_anchors(content: &str, tokens: &[Token]) -> Vec<Anchor> {
    let mut anchors: Vec<Anchor> = flatten(tokens)
        .into_iter()
        .filter(|token| token.is_heading())
        .filter_map(|token| {
            let text = token.text.as_deref()?;
            if text.is_empty() {
                return None;
            }
            let (line, column) = line_col(content, token.range.start);
            Some(Anchor::header(text, line, column))
        })
        .collect();

    let masked = mask_code(content);
    for (index, line) in masked.lines().enumerate() {
        if let Some(id) = BLOCK_ANCHOR.captures(line).and_then(|cap| cap.get(1)) {
            // Column of the caret, 1-based, in characters
            let caret = id.start().saturating_sub(1);
            let column = line[..caret].chars().count() + 1;
            anchors.push(Anchor::block(id.as_str(), index + 1, column));
        }
    }

    anchors.sort_by_key(|a| (a.line(), a.column()));
    anchors
}

/// Check whether a path has a URL scheme (`https:`, `mailto:`, ...).
///
/// Windows drive letters (`C:`) are not treated as schemes.
#[must_use]
pub fn is_external_reference(path: &str) -> bool {
    let trimmed = path.trim();
    if trimmed.len() >= 2 && trimmed.as_bytes()[1] == b':' && trimmed.as_bytes()[0].is_ascii_alphabetic() {
        // Drive letter, or a one-letter scheme nobody uses
        return trimmed.get(2..3).is_some_and(|rest| rest != "\\" && rest != "/");
    }
    URL_SCHEME.is_match(trimmed)
}

#[allow(clippy::too_many_arguments)]
fn build_citation(
    source_path: &Path,
    source_dir: &Path,
    link_type: LinkSyntax,
    path: &str,
    anchor: Option<String>,
    text: Option<String>,
    full_match: &str,
    line: &str,
    line_number: usize,
    byte_start: usize,
) -> Citation {
    let scope = if path.is_empty() {
        LinkScope::Internal
    } else {
        LinkScope::CrossDocument
    };

    let anchor_type = anchor.as_deref().map(|a| {
        if a.starts_with('^') {
            AnchorType::Block
        } else {
            AnchorType::Header
        }
    });

    let target = if path.is_empty() {
        LinkTarget::default()
    } else {
        let decoded = percent_decode(path).unwrap_or_else(|| path.to_string());
        LinkTarget {
            raw: Some(path.to_string()),
            absolute: Some(normalize_path(&source_dir.join(decoded))),
            relative: Some(path.to_string()),
        }
    };

    let after = &line[byte_start + full_match.len()..];
    let column = line[..byte_start].chars().count() + 1;

    Citation {
        source_path: source_path.to_path_buf(),
        link_type,
        scope,
        anchor_type,
        target,
        anchor,
        text,
        full_match: full_match.to_string(),
        line: line_number,
        column,
        extraction_marker: detect_marker(after),
        validation: None,
    }
}

fn detect_marker(after: &str) -> Option<ExtractionMarker> {
    let rest = after.trim_start();
    if FORCE_MARKERS.iter().any(|m| rest.starts_with(m)) {
        Some(ExtractionMarker::Force)
    } else if STOP_MARKERS.iter().any(|m| rest.starts_with(m)) {
        Some(ExtractionMarker::Stop)
    } else {
        None
    }
}

/// Strip `<...>` wrapping and a trailing `"title"` from a link destination.
fn clean_destination(dest: &str) -> String {
    let trimmed = dest.trim();
    if let Some(inner) = trimmed.strip_prefix('<') {
        if let Some(end) = inner.find('>') {
            return inner[..end].to_string();
        }
    }
    match trimmed.find(" \"") {
        Some(pos) => trimmed[..pos].trim().to_string(),
        None => trimmed.to_string(),
    }
}

fn split_anchor(destination: &str) -> (String, Option<String>) {
    match destination.split_once('#') {
        Some((path, anchor)) => {
            let anchor = anchor.trim();
            (
                path.trim().to_string(),
                (!anchor.is_empty()).then(|| anchor.to_string()),
            )
        }
        None => (destination.trim().to_string(), None),
    }
}

fn is_markdown_target(path: &str) -> bool {
    let decoded = percent_decode(path).unwrap_or_else(|| path.to_string());
    is_markdown_file(Path::new(&decoded))
}

/// Convert a byte offset into a 1-based (line, column) pair; the column counts
/// characters.
#[must_use]
pub fn line_col(content: &str, offset: usize) -> (usize, usize) {
    let before = content.get(..offset).unwrap_or(content);
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |pos| pos + 1);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}

/// Blank out fenced code blocks and inline code spans.
///
/// Every masked character becomes a single space and newlines are kept, so
/// line numbers and character columns of the result match the input.
fn mask_code(content: &str) -> String {
    let mut result = String::with_capacity(content.len());
    let mut in_fence = false;

    for line in content.split_inclusive('\n') {
        let trimmed = line.trim_start();
        let is_fence = trimmed.starts_with("```") || trimmed.starts_with("~~~");

        if is_fence || in_fence {
            if is_fence {
                in_fence = !in_fence;
            }
            for ch in line.chars() {
                result.push(if ch == '\n' || ch == '\r' { ch } else { ' ' });
            }
            continue;
        }

        let mut in_inline = false;
        for ch in line.chars() {
            if ch == '`' {
                in_inline = !in_inline;
                result.push(' ');
            } else if in_inline && ch != '\n' && ch != '\r' {
                result.push(' ');
            } else {
                result.push(ch);
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::tokenizer::tokenize;
    use std::path::PathBuf;

    fn source() -> PathBuf {
        PathBuf::from("/vault/docs/guide.md")
    }

    #[test]
    fn test_extract_markdown_links() {
        let content = "\
Check the [setup](./setup.md#Getting%20Started) page.
Also [notes](../notes/notes.md) and [local](#Overview).
";
        let citations = extract_citations(content, &source());
        assert_eq!(citations.len(), 3);

        let setup = &citations[0];
        assert_eq!(setup.link_type, LinkSyntax::Markdown);
        assert_eq!(setup.scope, LinkScope::CrossDocument);
        assert_eq!(setup.target.raw.as_deref(), Some("./setup.md"));
        assert_eq!(setup.target.absolute, Some(PathBuf::from("/vault/docs/setup.md")));
        assert_eq!(setup.anchor.as_deref(), Some("Getting%20Started"));
        assert_eq!(setup.anchor_type, Some(AnchorType::Header));
        assert_eq!((setup.line, setup.column), (1, 11));

        assert_eq!(citations[1].target.absolute, Some(PathBuf::from("/vault/notes/notes.md")));
        assert_eq!(citations[1].anchor, None);

        let local = &citations[2];
        assert_eq!(local.scope, LinkScope::Internal);
        assert_eq!(local.target.raw, None);
        assert_eq!(local.anchor.as_deref(), Some("Overview"));
    }

    #[test]
    fn test_block_reference_citation() {
        let citations = extract_citations("See [note](ref.md#^note1).", &source());
        assert_eq!(citations[0].anchor.as_deref(), Some("^note1"));
        assert_eq!(citations[0].anchor_type, Some(AnchorType::Block));
    }

    #[test]
    fn test_wiki_links() {
        let content = "Read [[design#Data Model|the model]] and [[#Local]].";
        let citations = extract_citations(content, &source());
        assert_eq!(citations.len(), 2);
        assert_eq!(citations[0].link_type, LinkSyntax::Wiki);
        assert_eq!(citations[0].target.raw.as_deref(), Some("design"));
        assert_eq!(citations[0].anchor.as_deref(), Some("Data Model"));
        assert_eq!(citations[0].text.as_deref(), Some("the model"));
        assert_eq!(citations[1].scope, LinkScope::Internal);
    }

    #[test]
    fn test_skips_urls_images_code_and_non_markdown() {
        let content = "\
[site](https://example.com/page.md) ![img](diagram.md) [code](src/main.rs)
`[inline](inline.md)`

```markdown
[fenced](fenced.md)
```
[real](real.md)
";
        let citations = extract_citations(content, &source());
        assert_eq!(citations.len(), 1);
        assert_eq!(citations[0].target.raw.as_deref(), Some("real.md"));
        assert_eq!(citations[0].line, 7);
    }

    #[test]
    fn test_extraction_markers() {
        let content = "\
[a](a.md) %%force-extract%%
[b](b.md#Intro) <!-- stop-extract-link -->
[c](c.md) trailing words %%force-extract%%
";
        let citations = extract_citations(content, &source());
        assert_eq!(citations[0].extraction_marker, Some(ExtractionMarker::Force));
        assert_eq!(citations[1].extraction_marker, Some(ExtractionMarker::Stop));
        assert_eq!(citations[2].extraction_marker, None);
    }

    #[test]
    fn test_destination_cleanup() {
        let content = "[a](<My File.md#Part One>) [b](b.md \"Title\")";
        let citations = extract_citations(content, &source());
        assert_eq!(citations[0].target.raw.as_deref(), Some("My File.md"));
        assert_eq!(citations[0].anchor.as_deref(), Some("Part One"));
        assert_eq!(citations[1].target.raw.as_deref(), Some("b.md"));
    }

    #[test]
    fn test_extract_anchors() {
        let content = "\
# Title

## Setup: Local

Remember this. ^note1

```
not-an-anchor ^fake
```
";
        let anchors = extract_anchors(content, &tokenize(content));
        assert_eq!(anchors.len(), 3);
        assert_eq!(anchors[0].id(), "Title");
        assert_eq!(anchors[1].url_encoded_id(), Some("Setup%20Local"));
        assert_eq!(anchors[1].line(), 3);
        assert_eq!(anchors[2], Anchor::block("note1", 5, 16));
    }

    #[test]
    fn test_is_external_reference() {
        assert!(is_external_reference("https://example.com"));
        assert!(is_external_reference("mailto:someone@example.com"));
        assert!(!is_external_reference("docs/guide.md"));
        assert!(!is_external_reference("C:/docs/guide.md"));
    }

    #[test]
    fn test_line_col() {
        let content = "ab\ncdé f";
        assert_eq!(line_col(content, 0), (1, 1));
        assert_eq!(line_col(content, 3), (2, 1));
        assert_eq!(line_col(content, content.find('f').unwrap()), (2, 5));
    }
}
