//! Constants shared across the citation pipeline.
//!
//! Similarity tuning, extraction markers and file naming live here so the
//! validator, extractor and CLI agree on them.

/// Minimum normalized Levenshtein score for an anchor suggestion.
///
/// Kept low on purpose: partially typed anchors should still produce hints.
pub const ANCHOR_SIMILARITY_THRESHOLD: f64 = 0.30;

/// Maximum number of anchor suggestions reported for a broken anchor.
pub const MAX_ANCHOR_SUGGESTIONS: usize = 5;

/// Minimum score for a "did you mean" filename suggestion.
pub const FILENAME_SIMILARITY_THRESHOLD: f64 = 0.60;

/// Maximum number of filename suggestions.
pub const MAX_FILENAME_SUGGESTIONS: usize = 3;

/// Length of the content fingerprint (hex chars of a SHA-256 digest).
pub const CONTENT_ID_LENGTH: usize = 16;

/// Obsidian comment marker forcing extraction of the preceding link.
pub const FORCE_MARKER_OBSIDIAN: &str = "%%force-extract%%";

/// HTML comment marker forcing extraction of the preceding link.
pub const FORCE_MARKER_HTML: &str = "<!-- force-extract -->";

/// Obsidian comment marker preventing extraction of the preceding link.
pub const STOP_MARKER_OBSIDIAN: &str = "%%stop-extract-link%%";

/// HTML comment marker preventing extraction of the preceding link.
pub const STOP_MARKER_HTML: &str = "<!-- stop-extract-link -->";

/// Project-local configuration file name.
pub const CONFIG_FILE_NAME: &str = ".citation-manager.toml";

/// Environment variable overriding the configured scope directory.
pub const SCOPE_ENV_VAR: &str = "CITATION_MANAGER_SCOPE";

/// Directory names skipped while scanning a scope for markdown files.
pub const IGNORED_DIRS: &[&str] = &[".git", "node_modules", "target", ".obsidian"];
