//! Canned markdown documents.

/// A markdown file and where it belongs in a vault.
#[derive(Debug, Clone)]
pub struct MarkdownFixture {
    pub path: String,
    pub content: String,
}

impl MarkdownFixture {
    /// Arbitrary content at `path`.
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// A guide with nested sections and one block anchor.
    ///
    /// Headings: `Guide`, `Setup`, `Install`, `Usage`. Block: `^note1`.
    pub fn guide(path: impl Into<String>) -> Self {
        Self::new(
            path,
            "\
# Guide

## Setup

Run the setup script first.

### Install

Install the binary.

## Usage

Call it from anywhere. ^note1
",
        )
    }

    /// A document citing `target` once per supported form, plus a broken link.
    pub fn citing(path: impl Into<String>, target: &str) -> Self {
        Self::new(
            path,
            format!(
                "\
# Notes

See [setup]({target}#Setup) before starting.
The note in [usage]({target}#^note1) matters.
Whole guide: [guide]({target}).
Also [[{target}#Usage|usage]].
Broken: [gone](missing.md).
"
            ),
        )
    }
}
