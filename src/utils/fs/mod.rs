//! File system helpers.
//!
//! - [`paths`] - lexical normalization, cache keys, relative paths, percent decoding
//! - [`discovery`] - markdown file discovery used by the filename lookup

pub mod discovery;
pub mod paths;

pub use discovery::{is_markdown_file, list_markdown_files};
pub use paths::{absolutize, canonical_key, normalize_path, percent_decode, relative_path};
