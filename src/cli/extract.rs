//! `extract` command: bundle cited content as JSON.
//!
//! ```bash
//! # Everything a document cites (sections and blocks; whole files with --full-files)
//! citation-manager extract links docs/plan.md --full-files
//!
//! # A single file or a single section, without a source document
//! citation-manager extract file docs/guide.md
//! citation-manager extract header docs/guide.md "Getting Started"
//! ```

use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};

use super::common::{Pipeline, effective_scope};
use crate::config::Config;
use crate::models::{Citation, ExtractionFlags, ExtractionResult, OutcomeStatus};

/// Extract cited content.
#[derive(Args, Debug)]
pub struct ExtractCommand {
    #[command(subcommand)]
    command: ExtractSubcommand,
}

#[derive(Subcommand, Debug)]
enum ExtractSubcommand {
    /// Extract the content cited by every link in a document
    Links {
        /// Source markdown file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Directory searched for misplaced link targets
        #[arg(long, value_name = "DIR")]
        scope: Option<PathBuf>,

        /// Also extract links without an anchor as whole files
        #[arg(long)]
        full_files: bool,
    },

    /// Extract one whole file
    File {
        /// Target file, relative to the current directory
        #[arg(value_name = "TARGET")]
        target: String,

        /// Directory searched when the target is not found directly
        #[arg(long, value_name = "DIR")]
        scope: Option<PathBuf>,
    },

    /// Extract one section of a file
    Header {
        /// Target file, relative to the current directory
        #[arg(value_name = "TARGET")]
        target: String,

        /// Heading text (or its URL-encoded form)
        #[arg(value_name = "HEADING")]
        heading: String,

        /// Directory searched when the target is not found directly
        #[arg(long, value_name = "DIR")]
        scope: Option<PathBuf>,
    },
}

impl ExtractCommand {
    /// Run the extraction and print the result as JSON.
    ///
    /// # Errors
    ///
    /// Fails when the source file cannot be parsed, or when a single-target
    /// extraction produced nothing.
    pub async fn execute(self, config: &Config) -> Result<()> {
        match self.command {
            ExtractSubcommand::Links {
                file,
                scope,
                full_files,
            } => {
                let scope = effective_scope(scope, config);
                let pipeline = Pipeline::new(scope.as_deref(), config);
                let flags = ExtractionFlags {
                    full_files: full_files || config.full_files,
                };

                let result = pipeline.extractor.extract_links_content(&file, flags).await?;
                print_result(&result)
            }
            ExtractSubcommand::File { target, scope } => {
                extract_single(config, scope, &target, None).await
            }
            ExtractSubcommand::Header {
                target,
                heading,
                scope,
            } => extract_single(config, scope, &target, Some(&heading)).await,
        }
    }
}

async fn extract_single(
    config: &Config,
    scope: Option<PathBuf>,
    target: &str,
    heading: Option<&str>,
) -> Result<()> {
    let scope = effective_scope(scope, config);
    let pipeline = Pipeline::new(scope.as_deref(), config);

    // The synthetic citation is resolved relative to the working directory
    let context = std::env::current_dir()?.join("cli");
    let citation = Citation::synthetic(&context, target, heading);
    let citation = pipeline
        .validator
        .validate_single_citation(citation, Some(Path::new(&context)))
        .await;

    let result = pipeline
        .extractor
        .extract_citations(vec![citation], ExtractionFlags { full_files: true })
        .await;
    print_result(&result)?;

    match result.citations.first() {
        Some(reference) if reference.status != OutcomeStatus::Success => {
            bail!("Extraction failed: {}", reference.reason)
        }
        _ => Ok(()),
    }
}

fn print_result(result: &ExtractionResult) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(result)?);
    Ok(())
}
