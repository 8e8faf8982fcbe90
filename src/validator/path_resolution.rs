//! Target path resolution strategies.
//!
//! Strategies run in a fixed order and the first hit wins:
//!
//! 1. [`relative`] - relative to the source directory, percent-decoded first
//! 2. [`vault_root`] - a leading `/` is read as relative to some ancestor of
//!    the source directory (the vault root)
//! 3. [`symlink`] - relative to the real directory of a symlinked source file
//! 4. filename lookup - the [`FilenameLookup`] collaborator finds the file by
//!    name, possibly in another directory
//!
//! Only the last strategy can report `cross_directory`.

use std::path::{Path, PathBuf};

use crate::lookup::FilenameLookup;
use crate::utils::fs::{absolutize, canonical_key, normalize_path, percent_decode};

/// Which strategy located the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStrategy {
    /// The source document itself (internal links)
    SameDocument,
    /// Relative to the source directory
    Relative,
    /// Root-relative path against a vault ancestor
    VaultRoot,
    /// Relative to the symlink target's directory
    Symlink,
    /// Found by file name alone
    FilenameLookup,
}

/// A located target file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// Absolute path of the target
    pub path: PathBuf,
    /// Strategy that produced it
    pub strategy: PathStrategy,
    /// The file lives in a different directory than the citation implies
    pub cross_directory: bool,
}

impl ResolvedTarget {
    fn direct(path: PathBuf, strategy: PathStrategy) -> Self {
        Self {
            path,
            strategy,
            cross_directory: false,
        }
    }

    /// Target of an internal link.
    #[must_use]
    pub fn same_document(source_path: &Path) -> Self {
        Self::direct(absolutize(source_path), PathStrategy::SameDocument)
    }
}

/// Result of running the strategy chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathResolution {
    /// Some strategy found the file
    Resolved(ResolvedTarget),
    /// Nothing matched; carries the lookup collaborator's explanation
    Missing {
        /// Suggestion for the author
        suggestion: Option<String>,
    },
}

/// Inputs shared by every strategy.
struct ResolveContext<'a> {
    source_dir: PathBuf,
    source_path: PathBuf,
    spellings: Vec<String>,
    lookup: Option<&'a dyn FilenameLookup>,
}

/// Locate `raw_target` as cited from `source_path`.
///
/// Filesystem checks go through `tokio::fs`, so many citations can be resolved
/// concurrently without blocking the runtime.
pub async fn resolve_target(
    source_path: &Path,
    raw_target: &str,
    lookup: Option<&dyn FilenameLookup>,
) -> PathResolution {
    let source_path = absolutize(source_path);
    let source_dir = source_path
        .parent()
        .map_or_else(|| PathBuf::from("/"), Path::to_path_buf);

    let ctx = ResolveContext {
        source_dir,
        source_path,
        spellings: spellings(raw_target),
        lookup,
    };

    let mut resolved = relative(&ctx).await;
    if resolved.is_none() {
        resolved = vault_root(&ctx).await;
    }
    if resolved.is_none() {
        resolved = symlink(&ctx).await;
    }

    if let Some(target) = resolved {
        tracing::trace!(
            target: "validator",
            "Resolved '{raw_target}' via {:?} to {}",
            target.strategy,
            target.path.display()
        );
        return PathResolution::Resolved(target);
    }

    filename_lookup(&ctx, raw_target)
}

/// Candidate spellings: percent-decoded first, then raw, each also with `.md`
/// appended when the name has no extension (wiki links omit it).
fn spellings(raw: &str) -> Vec<String> {
    let mut all = Vec::with_capacity(4);
    for spelling in base_spellings(raw) {
        let needs_extension = Path::new(&spelling).extension().is_none();
        if needs_extension {
            all.push(format!("{spelling}.md"));
        }
        all.push(spelling);
    }
    all
}

/// Percent-decoded spelling followed by the raw one when they differ.
fn base_spellings(raw: &str) -> Vec<String> {
    let mut base = Vec::with_capacity(2);
    if let Some(decoded) = percent_decode(raw) {
        base.push(decoded);
    }
    if !base.iter().any(|s| s == raw) {
        base.push(raw.to_string());
    }
    base
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .is_ok_and(|metadata| metadata.is_file())
}

async fn first_file_under(dir: &Path, spellings: &[String]) -> Option<PathBuf> {
    for spelling in spellings {
        let candidate = normalize_path(&dir.join(spelling));
        if is_file(&candidate).await {
            return Some(candidate);
        }
    }
    None
}

async fn relative(ctx: &ResolveContext<'_>) -> Option<ResolvedTarget> {
    first_file_under(&ctx.source_dir, &ctx.spellings)
        .await
        .map(|path| ResolvedTarget::direct(path, PathStrategy::Relative))
}

async fn vault_root(ctx: &ResolveContext<'_>) -> Option<ResolvedTarget> {
    let stripped: Vec<String> = ctx
        .spellings
        .iter()
        .filter_map(|s| s.strip_prefix('/'))
        .map(ToString::to_string)
        .collect();
    if stripped.is_empty() {
        return None;
    }

    for root in ctx.source_dir.ancestors() {
        if let Some(path) = first_file_under(root, &stripped).await {
            return Some(ResolvedTarget::direct(path, PathStrategy::VaultRoot));
        }
    }
    None
}

async fn symlink(ctx: &ResolveContext<'_>) -> Option<ResolvedTarget> {
    let real = tokio::fs::canonicalize(&ctx.source_path).await.ok()?;
    let real_dir = real.parent()?;
    if real_dir == ctx.source_dir {
        return None;
    }
    first_file_under(real_dir, &ctx.spellings)
        .await
        .map(|path| ResolvedTarget::direct(path, PathStrategy::Symlink))
}

/// Ask the lookup collaborator by file name.
///
/// The decoded name is tried before the raw one; the lookup adds `.md` itself.
/// When neither matches, the message of the first attempt is kept.
fn filename_lookup(ctx: &ResolveContext<'_>, raw_target: &str) -> PathResolution {
    let Some(lookup) = ctx.lookup else {
        return PathResolution::Missing { suggestion: None };
    };

    let mut first_message = None;
    for name in base_spellings(raw_target) {
        let result = lookup.resolve(&name);
        match result.path {
            Some(path) if result.found => {
                let expected_dir = normalize_path(&ctx.source_dir.join(&name))
                    .parent()
                    .map(canonical_key);
                let cross_directory = path.parent().map(canonical_key) != expected_dir;
                tracing::debug!(
                    target: "validator",
                    "Filename lookup matched '{raw_target}' to {} (cross-directory: {cross_directory})",
                    path.display()
                );
                return PathResolution::Resolved(ResolvedTarget {
                    path,
                    strategy: PathStrategy::FilenameLookup,
                    cross_directory: cross_directory || result.is_cross_directory,
                });
            }
            _ => {
                if first_message.is_none() {
                    first_message = result.message;
                }
            }
        }
    }

    PathResolution::Missing {
        suggestion: first_message,
    }
}
