//! Filename fallback lookup.
//!
//! When a citation's path does not resolve, the validator asks a
//! [`FilenameLookup`] whether a file with the same name exists somewhere in
//! the scope directory. [`FileCache`] is the default implementation: it indexes
//! every markdown file under the scope once and answers by file name.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use strsim::normalized_levenshtein;

use crate::constants::{FILENAME_SIMILARITY_THRESHOLD, MAX_FILENAME_SUGGESTIONS};
use crate::utils::fs::list_markdown_files;

/// Answer of a filename lookup.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LookupResult {
    /// Whether exactly one file matched
    pub found: bool,
    /// Absolute path of the match
    pub path: Option<PathBuf>,
    /// Set by the caller once it knows the expected directory
    pub is_cross_directory: bool,
    /// Human-readable explanation, used as a suggestion on failure
    pub message: Option<String>,
}

impl LookupResult {
    fn found(path: PathBuf) -> Self {
        Self {
            found: true,
            path: Some(path),
            ..Self::default()
        }
    }

    fn not_found(message: String) -> Self {
        Self {
            message: Some(message),
            ..Self::default()
        }
    }
}

/// Resolve a bare file name to a file in the scope.
pub trait FilenameLookup: Send + Sync {
    /// Look up `name` (a file name or a path whose file name is used).
    fn resolve(&self, name: &str) -> LookupResult;
}

/// Name index over every markdown file in a directory tree.
#[derive(Debug, Clone, Default)]
pub struct FileCache {
    scope: PathBuf,
    by_name: HashMap<String, Vec<PathBuf>>,
}

impl FileCache {
    /// Index all markdown files under `scope`.
    ///
    /// A missing scope yields an empty index.
    #[must_use]
    pub fn build(scope: &Path) -> Self {
        let mut by_name: HashMap<String, Vec<PathBuf>> = HashMap::new();
        for path in list_markdown_files(scope) {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                by_name.entry(name.to_string()).or_default().push(path.clone());
            }
        }
        for paths in by_name.values_mut() {
            paths.sort();
        }

        tracing::debug!(
            target: "lookup",
            "Indexed {} file names under {}",
            by_name.len(),
            scope.display()
        );

        Self {
            scope: scope.to_path_buf(),
            by_name,
        }
    }

    /// Scope directory the index was built from.
    #[must_use]
    pub fn scope(&self) -> &Path {
        &self.scope
    }

    /// Number of distinct file names indexed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Whether nothing was indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    fn similar_names(&self, name: &str) -> Vec<&str> {
        let mut scored: Vec<(&str, f64)> = self
            .by_name
            .keys()
            .map(|candidate| (candidate.as_str(), normalized_levenshtein(name, candidate)))
            .filter(|(_, score)| *score >= FILENAME_SIMILARITY_THRESHOLD)
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        scored
            .into_iter()
            .take(MAX_FILENAME_SUGGESTIONS)
            .map(|(candidate, _)| candidate)
            .collect()
    }
}

impl FilenameLookup for FileCache {
    fn resolve(&self, name: &str) -> LookupResult {
        let file_name = Path::new(name)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(name);

        let mut candidates = vec![file_name.to_string()];
        if Path::new(file_name).extension().is_none() {
            candidates.push(format!("{file_name}.md"));
        }

        for candidate in &candidates {
            match self.by_name.get(candidate).map(Vec::as_slice) {
                Some([only]) => return LookupResult::found(only.clone()),
                Some(many) if many.len() > 1 => {
                    let listing = many
                        .iter()
                        .map(|p| p.display().to_string())
                        .collect::<Vec<_>>()
                        .join(", ");
                    return LookupResult::not_found(format!(
                        "Multiple files named '{candidate}' found: {listing}"
                    ));
                }
                _ => {}
            }
        }

        let similar = self.similar_names(file_name);
        if similar.is_empty() {
            LookupResult::not_found(format!(
                "No file named '{file_name}' under {}",
                self.scope.display()
            ))
        } else {
            LookupResult::not_found(format!("Did you mean: {}?", similar.join(", ")))
        }
    }
}
