//! Wiring shared by the CLI commands.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cache::ParseCache;
use crate::config::Config;
use crate::extractor::ContentExtractor;
use crate::lookup::{FileCache, FilenameLookup};
use crate::utils::fs::absolutize;
use crate::validator::CitationValidator;

/// Validator and extractor sharing one parse cache.
#[derive(Debug)]
pub struct Pipeline {
    /// Shared validator
    pub validator: Arc<CitationValidator>,
    /// Extractor reusing the validator's cache
    pub extractor: ContentExtractor,
}

impl Pipeline {
    /// Build the pipeline for one invocation.
    ///
    /// Filename fallback lookup is enabled only when a scope directory is known.
    #[must_use]
    pub fn new(scope: Option<&Path>, config: &Config) -> Self {
        let lookup = scope.map(|dir| {
            let dir = absolutize(dir);
            tracing::debug!("Indexing scope {}", dir.display());
            Arc::new(FileCache::build(&dir)) as Arc<dyn FilenameLookup>
        });

        let validator = Arc::new(
            CitationValidator::new(Arc::new(ParseCache::default()), lookup).with_suggestion_limits(
                config.suggestions.similarity_threshold,
                config.suggestions.max_suggestions,
            ),
        );
        let extractor = ContentExtractor::new(Arc::clone(&validator));

        Self {
            validator,
            extractor,
        }
    }
}

/// Command-line scope wins over the configured one.
#[must_use]
pub fn effective_scope(cli_scope: Option<PathBuf>, config: &Config) -> Option<PathBuf> {
    cli_scope.or_else(|| config.scope.clone())
}
