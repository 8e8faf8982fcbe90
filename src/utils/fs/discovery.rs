//! Markdown file discovery.

use std::path::{Path, PathBuf};

use crate::constants::IGNORED_DIRS;

/// Check whether a path has a markdown extension (`.md` or `.markdown`, any case).
///
/// ```rust,no_run
/// # use citation_manager::utils::fs::is_markdown_file;
/// # use std::path::Path;
/// assert!(is_markdown_file(Path::new("guide.md")));
/// assert!(is_markdown_file(Path::new("README.MD")));
/// assert!(!is_markdown_file(Path::new("config.toml")));
/// ```
#[must_use]
pub fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md") || ext.eq_ignore_ascii_case("markdown"))
}

/// Recursively find all markdown files under `dir`.
///
/// Follows symbolic links, silently skips unreadable entries and the usual
/// tool directories (`.git`, `node_modules`, ...). A missing directory yields
/// an empty list.
#[must_use]
pub fn list_markdown_files(dir: &Path) -> Vec<PathBuf> {
    if !dir.exists() {
        return Vec::new();
    }

    walkdir::WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || !entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| IGNORED_DIRS.contains(&name))
        })
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file() && is_markdown_file(entry.path()))
        .map(walkdir::DirEntry::into_path)
        .collect()
}
