use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::AnchorType;

/// Syntax the citation was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkSyntax {
    /// `[text](path#anchor)`
    Markdown,
    /// `[[path#anchor|text]]`
    Wiki,
}

/// Whether the citation points into its own document or another one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LinkScope {
    /// Same document (`#anchor` only)
    Internal,
    /// Another file
    CrossDocument,
}

/// Extraction marker written right after a citation in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMarker {
    /// `%%force-extract%%` or `<!-- force-extract -->`
    Force,
    /// `%%stop-extract-link%%` or `<!-- stop-extract-link -->`
    Stop,
}

/// Target path fields of a citation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkTarget {
    /// Path exactly as written, `None` for internal links
    pub raw: Option<String>,
    /// Lexically resolved absolute path, `None` for internal links
    pub absolute: Option<PathBuf>,
    /// Path relative to the source document's directory
    pub relative: Option<String>,
}

/// Hint telling the author how to rewrite a path that only resolved by fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathConversion {
    /// Path as written in the citation
    pub original: String,
    /// Correct relative path from the source document
    pub recommended: String,
}

/// Classification a citation receives from the validator.
///
/// A `Valid` result carries nothing; the message of `Warning` and `Error` is
/// structurally required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ValidationResult {
    /// Target file and anchor resolved directly
    Valid,
    /// Resolved, but only through a fallback that deserves attention
    #[serde(rename_all = "camelCase")]
    Warning {
        /// Human-readable description
        message: String,
        /// Suggested fix
        #[serde(skip_serializing_if = "Option::is_none")]
        suggestion: Option<String>,
        /// Path rewrite hint
        #[serde(skip_serializing_if = "Option::is_none")]
        path_conversion: Option<PathConversion>,
    },
    /// Broken file, broken anchor or disallowed form
    #[serde(rename_all = "camelCase")]
    Error {
        /// Human-readable description
        message: String,
        /// Suggested fix
        #[serde(skip_serializing_if = "Option::is_none")]
        suggestion: Option<String>,
        /// Path rewrite hint
        #[serde(skip_serializing_if = "Option::is_none")]
        path_conversion: Option<PathConversion>,
    },
}

impl ValidationResult {
    /// Error without suggestion.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
            suggestion: None,
            path_conversion: None,
        }
    }

    /// Error with a suggestion.
    #[must_use]
    pub fn error_with_suggestion(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
            suggestion: Some(suggestion.into()),
            path_conversion: None,
        }
    }

    /// The status discriminant.
    #[must_use]
    pub const fn status(&self) -> ValidationStatus {
        match self {
            Self::Valid => ValidationStatus::Valid,
            Self::Warning { .. } => ValidationStatus::Warning,
            Self::Error { .. } => ValidationStatus::Error,
        }
    }

    /// Message for warnings and errors.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Valid => None,
            Self::Warning { message, .. } | Self::Error { message, .. } => Some(message),
        }
    }

    /// Suggestion for warnings and errors.
    #[must_use]
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::Valid => None,
            Self::Warning { suggestion, .. } | Self::Error { suggestion, .. } => {
                suggestion.as_deref()
            }
        }
    }

    /// Path conversion hint for warnings and errors.
    #[must_use]
    pub const fn path_conversion(&self) -> Option<&PathConversion> {
        match self {
            Self::Valid => None,
            Self::Warning {
                path_conversion, ..
            }
            | Self::Error {
                path_conversion, ..
            } => path_conversion.as_ref(),
        }
    }
}

/// Validation status without payload, used for summaries and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    /// Resolved
    Valid,
    /// Resolved through fallback
    Warning,
    /// Broken
    Error,
}

impl std::fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Valid => write!(f, "valid"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A reference from one document to a file and optionally an anchor in it.
///
/// Records are produced by the parser and enriched by the validator, which fills
/// [`Citation::validation`] exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Citation {
    /// Document the citation was found in
    pub source_path: PathBuf,
    /// Link syntax
    pub link_type: LinkSyntax,
    /// Internal or cross-document
    pub scope: LinkScope,
    /// Anchor kind, `None` when the citation has no anchor
    pub anchor_type: Option<AnchorType>,
    /// Target path fields
    pub target: LinkTarget,
    /// Anchor text as written (block anchors keep their `^`)
    pub anchor: Option<String>,
    /// Link text
    pub text: Option<String>,
    /// Full source match
    pub full_match: String,
    /// 1-based line
    pub line: usize,
    /// 1-based column
    pub column: usize,
    /// Marker written right after the citation
    pub extraction_marker: Option<ExtractionMarker>,
    /// Validation metadata, absent until validated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationResult>,
}

impl Citation {
    /// Build a synthetic cross-document citation, for example from a CLI argument.
    ///
    /// The raw path is kept as given; `source_path` is the document the path is
    /// relative to.
    #[must_use]
    pub fn synthetic(source_path: &Path, raw_target: &str, anchor: Option<&str>) -> Self {
        let absolute = source_path
            .parent()
            .map(|dir| crate::utils::fs::normalize_path(&dir.join(raw_target)));
        let anchor_type = anchor.map(|a| {
            if a.starts_with('^') {
                AnchorType::Block
            } else {
                AnchorType::Header
            }
        });
        let full_match = match anchor {
            Some(a) => format!("[{raw_target}]({raw_target}#{a})"),
            None => format!("[{raw_target}]({raw_target})"),
        };

        Self {
            source_path: source_path.to_path_buf(),
            link_type: LinkSyntax::Markdown,
            scope: LinkScope::CrossDocument,
            anchor_type,
            target: LinkTarget {
                raw: Some(raw_target.to_string()),
                absolute,
                relative: Some(raw_target.to_string()),
            },
            anchor: anchor.map(ToString::to_string),
            text: None,
            full_match,
            line: 0,
            column: 0,
            extraction_marker: None,
            validation: None,
        }
    }

    /// Whether the validator has already run on this record.
    #[must_use]
    pub const fn is_validated(&self) -> bool {
        self.validation.is_some()
    }

    /// Validation status, if validated.
    #[must_use]
    pub fn status(&self) -> Option<ValidationStatus> {
        self.validation.as_ref().map(ValidationResult::status)
    }

    /// Record the validation result.
    ///
    /// Returns `false` and leaves the record untouched when it was already
    /// validated.
    pub fn set_validation(&mut self, result: ValidationResult) -> bool {
        if self.validation.is_some() {
            return false;
        }
        self.validation = Some(result);
        true
    }
}
