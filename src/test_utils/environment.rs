//! Temporary vault of markdown files.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use super::fixtures::MarkdownFixture;

/// A temporary directory tree removed on drop.
pub struct TestVault {
    temp_dir: TempDir,
}

impl TestVault {
    /// Create an empty vault.
    pub fn new() -> Result<Self> {
        super::init_test_logging(None);
        Ok(Self {
            temp_dir: TempDir::new().context("Failed to create temp vault")?,
        })
    }

    /// Root directory of the vault.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of `relative` inside the vault.
    pub fn join(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.temp_dir.path().join(relative)
    }

    /// Write a file, creating parent directories.
    pub fn write(&self, relative: impl AsRef<Path>, content: &str) -> Result<PathBuf> {
        let path = self.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    /// Write a fixture at its own path.
    pub fn add(&self, fixture: &MarkdownFixture) -> Result<PathBuf> {
        self.write(&fixture.path, &fixture.content)
    }

    pub fn file_exists(&self, relative: impl AsRef<Path>) -> bool {
        self.join(relative).exists()
    }
}
