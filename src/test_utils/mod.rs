//! Test utilities for citation-manager
//!
//! Helpers shared by unit tests and the integration suite: a temporary vault
//! of markdown files, canned documents and one-time logging setup.
//!
//! # Example
//!
//! ```rust,no_run
//! use citation_manager::test_utils::{MarkdownFixture, TestVault};
//!
//! let vault = TestVault::new().unwrap();
//! vault.add(&MarkdownFixture::guide("docs/guide.md")).unwrap();
//! assert!(vault.file_exists("docs/guide.md"));
//! ```

pub mod environment;
pub mod fixtures;

pub use environment::TestVault;
pub use fixtures::MarkdownFixture;

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests, once per process.
///
/// Uses `level` when given, else `RUST_LOG`; with neither, logging stays off.
///
/// ```bash
/// RUST_LOG=citation_manager=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}
