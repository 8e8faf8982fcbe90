//! Cross-platform utilities and helpers
//!
//! - [`fs`] - path normalization, cache keys and markdown file discovery

pub mod fs;

pub use fs::{canonical_key, normalize_path, percent_decode, relative_path};
