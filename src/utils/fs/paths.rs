//! Path utilities for normalization, cache keys and relative-path computation.
//!
//! Citations are written as relative, sometimes percent-encoded paths; the cache
//! keys documents by absolute canonical path. The helpers here bridge the two
//! without touching the filesystem unless the function says so.

use std::path::{Component, Path, PathBuf};

/// Normalizes a path by resolving `.` and `..` components.
///
/// Performs logical path resolution without accessing the filesystem. Leading
/// `..` components of a relative path are preserved; `..` at the root of an
/// absolute path is dropped.
///
/// # Examples
///
/// ```rust,no_run
/// use citation_manager::utils::fs::normalize_path;
/// use std::path::{Path, PathBuf};
///
/// assert_eq!(normalize_path(Path::new("/foo/./bar/../baz")), PathBuf::from("/foo/baz"));
/// assert_eq!(normalize_path(Path::new("../src/./lib.rs")), PathBuf::from("../src/lib.rs"));
/// ```
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match components.last() {
                Some(Component::Normal(_)) => {
                    components.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => components.push(component),
            },
            c => components.push(c),
        }
    }

    components.iter().collect()
}

/// Make a path absolute against the current directory and normalize it lexically.
#[must_use]
pub fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize_path(path)
    } else {
        let cwd = std::env::current_dir().unwrap_or_default();
        normalize_path(&cwd.join(path))
    }
}

/// Canonical key for a document path.
///
/// Uses the filesystem's canonical path when the file exists so that two
/// spellings of the same file (relative, `..`-laden, symlinked) collapse to one
/// key; otherwise falls back to [`absolutize`].
#[must_use]
pub fn canonical_key(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| absolutize(path))
}

/// Lexical relative path from `from_dir` to `to`, using `/` separators.
///
/// Both paths should be absolute. Returns `to` unchanged when no common
/// ancestor exists (different drive prefixes on Windows).
#[must_use]
pub fn relative_path(from_dir: &Path, to: &Path) -> String {
    let from = normalize_path(from_dir);
    let to = normalize_path(to);

    let from_parts: Vec<Component<'_>> = from.components().collect();
    let to_parts: Vec<Component<'_>> = to.components().collect();

    if from_parts.first() != to_parts.first() {
        return to.to_string_lossy().replace('\\', "/");
    }

    let common = from_parts
        .iter()
        .zip(to_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = Vec::new();
    for _ in common..from_parts.len() {
        parts.push("..".to_string());
    }
    for component in &to_parts[common..] {
        parts.push(component.as_os_str().to_string_lossy().into_owned());
    }

    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}

/// Percent-decode a path or anchor; `None` when the input is not valid UTF-8 once
/// decoded.
#[must_use]
pub fn percent_decode(input: &str) -> Option<String> {
    urlencoding::decode(input).ok().map(std::borrow::Cow::into_owned)
}
