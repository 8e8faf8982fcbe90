//! Block-level token tree built on `pulldown-cmark`.
//!
//! Every block element (heading, paragraph, list, list item, block quote, code
//! block, table, HTML block, rule) becomes a [`Token`] carrying its byte range
//! in the source. Nesting is reconstructed from range containment, so a list
//! item's paragraphs are children of the item and the item a child of the list.
//!
//! Heading tokens additionally carry their depth and their inline text *as
//! written* (emphasis and code markup kept), which is what header anchors and
//! section lookups compare against.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag};
use std::ops::Range;

/// Block token kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// ATX or setext heading
    Heading,
    /// Paragraph
    Paragraph,
    /// Ordered or unordered list
    List,
    /// List item
    Item,
    /// Block quote
    BlockQuote,
    /// Fenced or indented code
    CodeBlock,
    /// Table
    Table,
    /// Raw HTML block
    Html,
    /// Thematic break
    Rule,
    /// Footnote definitions, metadata blocks and the like
    Other,
}

/// A block token with its source range and nested children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Kind of block
    pub kind: TokenKind,
    /// Byte range in the source text
    pub range: Range<usize>,
    /// Heading depth (1-6), `None` for other kinds
    pub depth: Option<u8>,
    /// Heading text as written, `None` for other kinds
    pub text: Option<String>,
    /// Nested block tokens
    pub children: Vec<Token>,
}

impl Token {
    /// Raw source text of this token.
    #[must_use]
    pub fn raw<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.range.clone()).unwrap_or_default()
    }

    /// Whether this token is a heading.
    #[must_use]
    pub fn is_heading(&self) -> bool {
        self.kind == TokenKind::Heading
    }
}

/// Tokenize markdown into a tree of block tokens.
#[must_use]
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_FOOTNOTES);

    let mut roots: Vec<Token> = Vec::new();
    let mut stack: Vec<Token> = Vec::new();

    for (event, range) in Parser::new_ext(source, options).into_offset_iter() {
        let Some((kind, depth)) = classify(&event) else {
            continue;
        };

        // Close every open container that ends before this block starts
        while stack.last().is_some_and(|top| range.start >= top.range.end) {
            if let Some(done) = stack.pop() {
                attach(&mut stack, &mut roots, done);
            }
        }

        let text = depth.map(|_| heading_text(source.get(range.clone()).unwrap_or_default()));
        stack.push(Token {
            kind,
            range,
            depth,
            text,
            children: Vec::new(),
        });
    }

    while let Some(done) = stack.pop() {
        attach(&mut stack, &mut roots, done);
    }

    roots
}

/// Flatten a token tree into document order, visiting each token before its
/// children and its children before its next sibling.
#[must_use]
pub fn flatten(tokens: &[Token]) -> Vec<&Token> {
    let mut flat = Vec::new();
    walk(tokens, &mut flat);
    flat
}

fn walk<'a>(tokens: &'a [Token], flat: &mut Vec<&'a Token>) {
    for token in tokens {
        flat.push(token);
        walk(&token.children, flat);
    }
}

fn attach(stack: &mut [Token], roots: &mut Vec<Token>, token: Token) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(token);
    } else {
        roots.push(token);
    }
}

fn classify(event: &Event<'_>) -> Option<(TokenKind, Option<u8>)> {
    match event {
        Event::Start(tag) => match tag {
            Tag::Heading { level, .. } => Some((TokenKind::Heading, Some(heading_depth(*level)))),
            Tag::Paragraph => Some((TokenKind::Paragraph, None)),
            Tag::List(_) => Some((TokenKind::List, None)),
            Tag::Item => Some((TokenKind::Item, None)),
            Tag::BlockQuote(_) => Some((TokenKind::BlockQuote, None)),
            Tag::CodeBlock(_) => Some((TokenKind::CodeBlock, None)),
            Tag::Table(_) => Some((TokenKind::Table, None)),
            Tag::HtmlBlock => Some((TokenKind::Html, None)),
            Tag::FootnoteDefinition(_) | Tag::MetadataBlock(_) => Some((TokenKind::Other, None)),
            _ => None,
        },
        Event::Rule => Some((TokenKind::Rule, None)),
        _ => None,
    }
}

const fn heading_depth(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Inline text of a heading as written: ATX markers and closing hashes removed,
/// setext underline dropped.
fn heading_text(raw: &str) -> String {
    let trimmed = raw.trim_end_matches(['\n', '\r']);
    let first = trimmed.trim_start();

    if first.starts_with('#') {
        let line = first.lines().next().unwrap_or_default();
        let body = line.trim_start_matches('#').trim();
        // Optional closing sequence: a run of '#' preceded by whitespace
        let without_closing = body.trim_end_matches('#');
        if without_closing.len() < body.len()
            && (without_closing.is_empty() || without_closing.ends_with([' ', '\t']))
        {
            return without_closing.trim().to_string();
        }
        return body.to_string();
    }

    let lines: Vec<&str> = trimmed.lines().collect();
    let content_lines = lines.split_last().map_or(&lines[..], |(_, rest)| rest);
    content_lines
        .iter()
        .map(|line| line.trim())
        .collect::<Vec<_>>()
        .join(" ")
}
