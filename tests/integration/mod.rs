//! Integration test suite for citation-manager
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! - **cache_behavior**: one parse per file across validator and extractor
//! - **cli**: command-line parsing, exit codes and output formats
//! - **extract**: content extraction and deduplication
//! - **validate**: citation validation scenarios

#[path = "../common/mod.rs"]
mod common;

mod cache_behavior;
mod cli;
mod extract;
mod validate;
