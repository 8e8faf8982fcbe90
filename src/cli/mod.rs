//! Command-line interface.
//!
//! # Commands
//!
//! - [`validate`] - check every citation in a markdown file
//! - [`extract`] - bundle the content citations point at as JSON
//!
//! # Global Options
//!
//! - `--verbose` / `-v` - debug logging on stderr
//! - `--quiet` / `-q` - no logging and no text report
//! - `--config <path>` - configuration file instead of `.citation-manager.toml`
//!
//! `RUST_LOG` overrides the default log filter when neither flag is given.

pub mod common;
pub mod extract;
pub mod validate;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use extract::ExtractCommand;
use validate::ValidateCommand;

/// Validate and extract markdown citations.
#[derive(Parser, Debug)]
#[command(name = "citation-manager", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress logging and text output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Configuration file to use
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate the citations in a markdown file
    Validate(ValidateCommand),

    /// Extract cited content
    Extract(ExtractCommand),
}

impl Cli {
    /// Initialize logging, load configuration and run the selected command.
    ///
    /// # Errors
    ///
    /// Propagates configuration and command failures.
    pub async fn execute(self) -> Result<()> {
        init_logging(self.verbose, self.quiet);

        let config = Config::load(self.config.as_deref()).await?;
        tracing::debug!(?config, "Configuration loaded");

        match self.command {
            Commands::Validate(cmd) => cmd.execute(&config, self.quiet).await,
            Commands::Extract(cmd) => cmd.execute(&config).await,
        }
    }
}

/// Install the stderr subscriber.
///
/// `--quiet` disables logging, `--verbose` forces `debug`, otherwise
/// `RUST_LOG` applies with `warn` as the fallback.
pub fn init_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // Ignore the error if a subscriber is already installed
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .try_init();
}
