use serde::{Deserialize, Serialize};

/// Kind of target an anchor (or a citation's anchor) refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorType {
    /// A markdown heading
    Header,
    /// An inline `^block-id` marker
    Block,
}

impl std::fmt::Display for AnchorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Header => write!(f, "header"),
            Self::Block => write!(f, "block"),
        }
    }
}

/// A named target inside a document.
///
/// Header anchors always carry their raw heading text and URL-encoded id; block
/// anchors carry only an identifier, so the variants keep those fields apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "anchorType", rename_all = "lowercase")]
pub enum Anchor {
    /// Heading anchor
    #[serde(rename_all = "camelCase")]
    Header {
        /// Identifier (the raw heading text)
        id: String,
        /// Heading text as written, inline markup included
        raw_text: String,
        /// Link-friendly form: `:` removed, whitespace runs replaced by `%20`
        url_encoded_id: String,
        /// 1-based line
        line: usize,
        /// 1-based column
        column: usize,
    },
    /// Block reference anchor (`^id` at the end of a line)
    Block {
        /// Identifier without the leading `^`
        id: String,
        /// 1-based line
        line: usize,
        /// 1-based column of the `^`
        column: usize,
    },
}

impl Anchor {
    /// Build a header anchor from heading text, deriving the URL-encoded id.
    #[must_use]
    pub fn header(raw_text: impl Into<String>, line: usize, column: usize) -> Self {
        let raw_text = raw_text.into();
        Self::Header {
            id: raw_text.clone(),
            url_encoded_id: url_encode_heading(&raw_text),
            raw_text,
            line,
            column,
        }
    }

    /// Build a block anchor.
    #[must_use]
    pub fn block(id: impl Into<String>, line: usize, column: usize) -> Self {
        Self::Block {
            id: id.into(),
            line,
            column,
        }
    }

    /// The anchor identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Header { id, .. } | Self::Block { id, .. } => id,
        }
    }

    /// The URL-encoded id, present only for header anchors.
    #[must_use]
    pub fn url_encoded_id(&self) -> Option<&str> {
        match self {
            Self::Header { url_encoded_id, .. } => Some(url_encoded_id),
            Self::Block { .. } => None,
        }
    }

    /// The raw heading text, present only for header anchors.
    #[must_use]
    pub fn raw_text(&self) -> Option<&str> {
        match self {
            Self::Header { raw_text, .. } => Some(raw_text),
            Self::Block { .. } => None,
        }
    }

    /// Anchor kind.
    #[must_use]
    pub const fn kind(&self) -> AnchorType {
        match self {
            Self::Header { .. } => AnchorType::Header,
            Self::Block { .. } => AnchorType::Block,
        }
    }

    /// 1-based line number.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::Header { line, .. } | Self::Block { line, .. } => *line,
        }
    }

    /// 1-based column number.
    #[must_use]
    pub const fn column(&self) -> usize {
        match self {
            Self::Header { column, .. } | Self::Block { column, .. } => *column,
        }
    }
}

/// Encode heading text the way links to it are written: colons dropped and each
/// whitespace run replaced with `%20`.
#[must_use]
pub fn url_encode_heading(text: &str) -> String {
    text.replace(':', "").split_whitespace().collect::<Vec<_>>().join("%20")
}
